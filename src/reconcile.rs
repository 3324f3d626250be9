//! Live network reconciliation
//!
//! Once every backend has written its files the running stack is brought up
//! to date: a primary service restart, then a trial/commit apply through
//! netplan. Either path succeeding is enough. Nothing is rolled back when both
//! fail; the files stay ahead of the running state until the caller retries.

use crate::config::ReconcileSettings;
use crate::error::{NetcfgError, NetcfgResult};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

/// Runs external commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, argv: &[String]) -> NetcfgResult<()>;
}

/// Runs commands with `tokio::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, argv: &[String]) -> NetcfgResult<()> {
        let (program, args) = argv.split_first()
            .ok_or_else(|| NetcfgError::InvalidParameter("empty command".to_string()))?;
        let cmd = argv.join(" ");

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| NetcfgError::CommandFailed {
                cmd: cmd.clone(),
                code: None,
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(NetcfgError::CommandFailed {
                cmd,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

/// Applies written configuration to the live network stack
pub struct ServiceReconciler<R: CommandRunner = SystemRunner> {
    runner: R,
    settings: ReconcileSettings,
}

impl ServiceReconciler<SystemRunner> {
    pub fn new(settings: ReconcileSettings) -> Self {
        Self::with_runner(SystemRunner, settings)
    }
}

impl<R: CommandRunner> ServiceReconciler<R> {
    pub fn with_runner(runner: R, settings: ReconcileSettings) -> Self {
        Self { runner, settings }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Restart the network service, falling back to netplan try + apply
    ///
    /// Both paths are always attempted, in order. Fails with the last error
    /// only when neither succeeded.
    pub async fn restart_service(&self) -> NetcfgResult<()> {
        let mut restarted = false;
        let mut last_error = None;

        info!("Restarting network service: {}", self.settings.primary.join(" "));
        match self.runner.run(&self.settings.primary).await {
            Ok(()) => restarted = true,
            Err(e) => {
                warn!("Primary restart failed: {}", e);
                last_error = Some(e);
            }
        }

        info!("Applying declarative config: {} / {}",
            self.settings.trial.join(" "), self.settings.commit.join(" "));
        match self.trial_and_commit().await {
            Ok(()) => restarted = true,
            Err(e) => {
                warn!("Trial/commit apply failed: {}", e);
                last_error = Some(e);
            }
        }

        match last_error {
            Some(e) if !restarted => Err(NetcfgError::ReconcileFailure(Box::new(e))),
            _ => Ok(()),
        }
    }

    async fn trial_and_commit(&self) -> NetcfgResult<()> {
        self.runner.run(&self.settings.trial).await?;
        self.runner.run(&self.settings.commit).await
    }
}
