//! Shared test utilities

#![allow(dead_code)]

pub mod http;

use std::path::PathBuf;

use tempfile::TempDir;

/// Catalog used across the HTTP tests
pub const CATALOG_TOML: &str = r#"
[programs.Foo.stable]
version = "1.2"
build = 5

[programs.Bar.stable]
version = "1.0"
build = 1

[programs.Bar.beta]
version = "1.1"
build = 1

[programs.Bar.alpha]
version = "2.0"
build = 0

[programs.Legacy.stable]
version = "1.10"
"#;

/// Write a catalog file with the given name into a fresh temp directory
pub fn write_catalog(file_name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(file_name);
    std::fs::write(&path, content).unwrap();
    (temp_dir, path)
}
