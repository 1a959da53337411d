//! The blockstream CLI.

use crate::{
    flags::{EngineArgs, NodeArgs, QueueArgs, StorageArgs},
    service,
};
use anyhow::{Context, Result};
use blockstream_cli::{LogArgs, MetricsArgs, cli_styles};
use clap::Parser;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Streams reorg-aware block announcements from an Ethereum node.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, styles = cli_styles(), long_about = None)]
pub struct Cli {
    /// Logging arguments.
    #[command(flatten)]
    pub log: LogArgs,
    /// Prometheus arguments.
    #[command(flatten)]
    pub metrics: MetricsArgs,
    /// Node connection arguments.
    #[command(flatten)]
    pub node: NodeArgs,
    /// Chain state storage arguments.
    #[command(flatten)]
    pub storage: StorageArgs,
    /// Queue arguments.
    #[command(flatten)]
    pub queues: QueueArgs,
    /// Reconciliation arguments.
    #[command(flatten)]
    pub engine: EngineArgs,
}

impl Cli {
    /// Runs the CLI.
    pub fn run(self) -> Result<()> {
        self.init_stack()?;
        Self::run_until_ctrl_c(|cancel| service::run(self, cancel))
    }

    /// Initializes the tracing subscriber and, if enabled, the Prometheus
    /// exporter.
    ///
    /// This function should be called at the beginning of the program.
    pub fn init_stack(&self) -> Result<()> {
        self.log.init_tracing()?;

        if let Some(addr) = self.metrics.init_metrics()? {
            blockstream_core::Metrics::init();
            info!(target: "blockstream", %addr, "Metrics enabled");
        }
        Ok(())
    }

    /// Runs the future returned by `f` to completion on a new runtime.
    ///
    /// Ctrl-C fires the cancellation token handed to `f`.
    pub fn run_until_ctrl_c<F, Fut>(f: F) -> Result<()>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let rt = Self::tokio_runtime().context("failed to build the tokio runtime")?;
        rt.block_on(async move {
            let cancel = CancellationToken::new();
            let signal = cancel.clone();
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        info!(target: "blockstream", "Received ctrl-c, stopping after the current tick");
                        signal.cancel();
                    }
                    Err(err) => {
                        warn!(target: "blockstream", %err, "Failed to listen for ctrl-c");
                    }
                }
            });
            f(cancel).await
        })
    }

    /// Creates a new default tokio multi-thread [Runtime](tokio::runtime::Runtime) with all
    /// features enabled.
    pub fn tokio_runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
        tokio::runtime::Builder::new_multi_thread().enable_all().build()
    }
}
