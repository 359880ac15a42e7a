//! Azure CLI wrapper
//!
//! Borrows the token of an existing `az login` session.

use crate::auth::AccessToken;
use crate::error::{AzureError, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;

#[cfg(windows)]
const AZ_PROGRAM: &str = "az.cmd";
#[cfg(not(windows))]
const AZ_PROGRAM: &str = "az";

/// Azure CLI wrapper
pub struct AzCli {
    program: String,
}

impl Default for AzCli {
    fn default() -> Self {
        Self::new()
    }
}

impl AzCli {
    pub fn new() -> Self {
        Self::with_program(AZ_PROGRAM)
    }

    /// Use a specific executable instead of `az` from `PATH`
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run an az command and return stdout
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: {} {}", self.program, args.join(" "));

        let output = cmd.output().await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AzureError::AzCliNotFound,
            _ => AzureError::IoError(e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AzureError::CliCredential(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Get an access token for `resource` from the logged-in CLI session
    pub async fn get_access_token(&self, resource: &str) -> Result<AccessToken> {
        let output = self
            .run_command(&[
                "account",
                "get-access-token",
                "--resource",
                resource,
                "--output",
                "json",
            ])
            .await?;

        let token: CliAccessToken = serde_json::from_str(&output)?;
        let expires_at = token
            .expires_on
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

        if let Some(subscription) = &token.subscription {
            tracing::debug!("Azure CLI session default subscription: {}", subscription);
        }

        Ok(AccessToken::new(token.access_token, expires_at))
    }
}

/// Output of `az account get-access-token`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliAccessToken {
    access_token: String,
    /// Unix seconds; older az releases only emit the local-time `expiresOn`
    #[serde(rename = "expires_on", default)]
    expires_on: Option<i64>,
    #[serde(default)]
    subscription: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_executable() {
        let az = AzCli::with_program("/nonexistent/bin/az");
        let err = az
            .get_access_token(crate::auth::RESOURCE_MANAGER_RESOURCE)
            .await
            .unwrap_err();
        assert!(matches!(err, AzureError::AzCliNotFound));
    }

    #[cfg(unix)]
    fn fake_az(dir: &std::path::Path, script: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("az");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_token_from_cli_session() {
        let temp_dir = tempfile::tempdir().unwrap();
        let program = fake_az(
            temp_dir.path(),
            r#"echo '{"accessToken":"cli-token","expiresOn":"2030-01-01 00:00:00.000000","expires_on":1893456000,"subscription":"sub-1","tenant":"tenant-1","tokenType":"Bearer"}'"#,
        );

        let token = AzCli::with_program(program)
            .get_access_token(crate::auth::RESOURCE_MANAGER_RESOURCE)
            .await
            .unwrap();

        assert_eq!(token.secret(), "cli-token");
        assert_eq!(
            token.expires_at(),
            DateTime::<Utc>::from_timestamp(1_893_456_000, 0)
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_logged_out_session() {
        let temp_dir = tempfile::tempdir().unwrap();
        let program = fake_az(
            temp_dir.path(),
            "echo \"ERROR: Please run 'az login' to setup account.\" >&2; exit 1",
        );

        let err = AzCli::with_program(program)
            .get_access_token(crate::auth::RESOURCE_MANAGER_RESOURCE)
            .await
            .unwrap_err();
        match err {
            AzureError::CliCredential(message) => assert!(message.contains("az login")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
