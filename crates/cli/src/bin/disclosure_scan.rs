use anyhow::Result;

fn main() -> Result<()> {
    let code = disclosure_cli::main_entry()?;
    std::process::exit(code);
}
