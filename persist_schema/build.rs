use anyhow::{anyhow, Result};
use const_gen::{const_declaration, CompileConst};
use persist_format::persist_types::types::TypeTraits;
use persist_format::Describe;
use std::env;
use std::fs;
use std::path::Path;

#[path = "src/records.rs"]
#[allow(dead_code)]
mod records;

/// Bake descriptors into constants, so that there is no Format derivation at runtime.
fn main() -> Result<()> {
    let mut const_declarations = vec![];
    if cfg!(feature = "log_records") {
        const_declarations.push(log_records());
    }
    if cfg!(feature = "key_records") {
        const_declarations.push(key_records());
    }

    let out_dir = env::var_os("OUT_DIR").ok_or(anyhow!("OUT_DIR is not set"))?;
    let dest_path = Path::new(&out_dir).join("const_gen.rs");
    fs::write(&dest_path, const_declarations.join("\n"))?;

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/records.rs");

    Ok(())
}

fn log_records() -> String {
    use records::LogEntry;

    let entry = LogEntry::descriptor();
    let entry_fixed = <LogEntry as TypeTraits>::IS_FIXED_SIZE;
    let log = Vec::<LogEntry>::descriptor();

    [
        const_declaration!(pub LOG_ENTRY_DESCRIPTOR = entry),
        const_declaration!(pub LOG_ENTRY_IS_FIXED_SIZE = entry_fixed),
        const_declaration!(pub LOG_DESCRIPTOR = log),
    ]
    .join("\n")
}

fn key_records() -> String {
    use records::RowKey;

    let key = RowKey::descriptor();
    let key_fixed = <RowKey as TypeTraits>::IS_FIXED_SIZE;

    [
        const_declaration!(pub ROW_KEY_DESCRIPTOR = key),
        const_declaration!(pub ROW_KEY_IS_FIXED_SIZE = key_fixed),
    ]
    .join("\n")
}
