#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! migration

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    /// Write the desired-state document and return its path
    pub fn write_desired_state(&self, content: &str) -> PathBuf {
        let path = self.root.path().join("providers.json");
        fs::write(&path, content).unwrap();
        path
    }
}

/// The regflow binary with a clean Azure environment and no colors
pub fn regflow() -> Command {
    let mut cmd = Command::cargo_bin("regflow").unwrap();
    cmd.env_remove("AZURE_TENANT_ID")
        .env_remove("AZURE_CLIENT_ID")
        .env_remove("AZURE_CLIENT_SECRET")
        .env_remove("AZURE_AUTHORITY_HOST")
        .env_remove("AZURE_RESOURCE_MANAGER_ENDPOINT")
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "info");
    cmd
}
