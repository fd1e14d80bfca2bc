//! Test utilities for taiwa-core crate

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tempfile::Builder;

/// Creates a temporary config file with the given content.
/// Uses tempfile::Builder to ensure unique directories for parallel tests.
///
/// # Panics
/// Panics if temp directory creation or file writing fails.
pub fn create_temp_config(content: &str) -> PathBuf {
    let temp_dir = Builder::new()
        .prefix("taiwa-test")
        .rand_bytes(8)
        .tempdir()
        .unwrap();
    let config_path = temp_dir.path().join("taiwa.yml");
    File::create(&config_path)
        .unwrap()
        .write_all(content.as_bytes())
        .unwrap();
    // Keep the temp directory alive by leaking it (this is just for tests)
    let _ = Box::leak(Box::new(temp_dir));
    config_path
}

/// Writes a `.env` style file into a fresh temporary directory.
pub fn create_temp_env_file(content: &str) -> PathBuf {
    let temp_dir = Builder::new()
        .prefix("taiwa-env")
        .rand_bytes(8)
        .tempdir()
        .unwrap();
    let env_path = temp_dir.path().join(".env");
    std::fs::write(&env_path, content).unwrap();
    let _ = Box::leak(Box::new(temp_dir));
    env_path
}
