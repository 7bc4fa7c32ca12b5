//! # Disclosure Scanner
//!
//! Static, progressive-disclosure metadata extraction for source files.
//!
//! ## Philosophy
//!
//! An agent should be able to discover callable units cheaply and only pay
//! for detail it asks for. Every public top-level function is therefore
//! described in three layers:
//! - `hook`: name plus a bounded one-sentence summary (read by default)
//! - `toolDefinition`: parameters, return type and full documentation
//! - `deepContext`: a pointer to the implementation, never the body itself
//!
//! Source is parsed, never executed.
//!
//! ## Architecture
//!
//! ```text
//! Paths
//!     │
//!     ├──> Language Detection (from extension or explicit tag)
//!     │
//!     ├──> Syntax Adapter (tree-sitter) → canonical top-level nodes
//!     │
//!     ├──> Declaration Visitor → function-like declarations, source order
//!     │
//!     ├──> Visibility Filter → public only
//!     │
//!     ├──> Documentation Normalizer → cleaned text + bounded summary
//!     │
//!     └──> Layering Assembler → DisclosureRecord[]
//!          └─> merged per file, in input order, into a ScanReport
//! ```
//!
//! ## Example
//!
//! ```rust
//! use disclosure_scanner::{Language, Scanner, ScannerConfig};
//!
//! let scanner = Scanner::new(ScannerConfig::default()).unwrap();
//!
//! let code = r#"
//! def calculate_risk(amount: float, credit_score: int) -> str:
//!     """Analyzes the financial risk of a loan application."""
//!     return "High" if credit_score < 600 else "Low"
//!
//! def _private_helper():
//!     pass
//! "#;
//!
//! let records = scanner.scan_source(code, "risk.py", Language::Python).unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].hook.name, "calculate_risk");
//! assert_eq!(records[0].tool_definition.return_type, "str");
//! ```

pub mod adapter;
mod assembler;
mod config;
mod discovery;
mod docs;
mod error;
mod language;
mod scanner;
mod types;
mod visibility;
mod visitor;

pub use adapter::{AdapterRegistry, RawDeclaration, RawParameter, SyntaxAdapter, SyntaxNode};
pub use config::{ScannerConfig, DEFAULT_MAX_SUMMARY_CHARS, DEFAULT_TRUNCATION_MARKER};
pub use discovery::SourceDiscovery;
pub use docs::{Documentation, RawDoc, NO_DESCRIPTION};
pub use error::{ErrorLocation, Result, ScanError};
pub use language::Language;
pub use scanner::Scanner;
pub use types::{
    DeepContext, Declaration, DisclosureRecord, FileRecords, FileScan, Hook, Layer, Parameter,
    ScanErrorEntry, ScanReport, ScanSummary, SourceLocation, ToolDefinition, UNKNOWN_TYPE,
};
pub use visibility::{Visibility, VisibilityMarker, VisibilityRule};
pub use visitor::DeclarationVisitor;
