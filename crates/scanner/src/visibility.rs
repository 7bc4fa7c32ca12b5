use serde::{Deserialize, Serialize};

/// Whether a declaration may be disclosed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

/// Visibility syntax found on a declaration by its adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityMarker {
    /// Carries the language's export keyword (`pub`, `export`)
    Exported,
    /// Language has an export keyword but this declaration lacks it
    Unexported,
    /// Language has no visibility syntax
    Absent,
}

/// Per-adapter rule deciding visibility from name and marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityRule {
    /// `_name` is private, everything else public
    NamingConvention,
    /// Only exported declarations are public; `_name` stays private
    ExportKeyword,
}

impl VisibilityRule {
    /// Classify one declaration. Never consults anything but its own syntax.
    #[must_use]
    pub fn classify(self, name: &str, marker: VisibilityMarker) -> Visibility {
        if has_private_prefix(name) {
            return Visibility::Private;
        }

        match self {
            Self::NamingConvention => Visibility::Public,
            Self::ExportKeyword => match marker {
                VisibilityMarker::Exported => Visibility::Public,
                VisibilityMarker::Unexported | VisibilityMarker::Absent => Visibility::Private,
            },
        }
    }
}

fn has_private_prefix(name: &str) -> bool {
    name.starts_with('_')
}
