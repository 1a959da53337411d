//! Wires the node client, state store and queues into a running driver.

use crate::cli::Cli;
use anyhow::{Context, Result};
use blockstream_client::ValidatedClient;
use blockstream_core::{PollDriver, ReconciliationEngine};
use blockstream_publisher::FileQueuePublisher;
use blockstream_storage::FileChainStateStore;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Connects to the node, checks its network, and runs the poll driver until
/// the time budget runs out or `cancel` fires.
pub async fn run(cli: Cli, cancel: CancellationToken) -> Result<()> {
    let timeout = cli.node.request_timeout();
    let client = ValidatedClient::new_http(cli.node.node_url.clone(), timeout);

    info!(target: "blockstream", node_url = %cli.node.node_url, "Connecting to node");
    client
        .verify_network(cli.node.network_id)
        .await
        .inspect_err(|err| {
            error!(target: "blockstream", %err, expected = cli.node.network_id, "Node check failed")
        })
        .context("failed to verify the node")?;

    let store = FileChainStateStore::open(
        cli.storage.state_dir(),
        &cli.storage.state_record,
        cli.storage.ttl(),
    )
    .await
    .context("failed to open the chain state store")?;

    let publisher = FileQueuePublisher::open(cli.storage.queue_dir(), &cli.queues.names())
        .await
        .context("failed to open the queues")?;

    let engine =
        ReconciliationEngine::new(client, store, publisher, cli.engine.engine_config(timeout));
    let driver = PollDriver::new(engine, cli.engine.driver_config());

    let summary = driver
        .run(cli.engine.tick_context(), cancel)
        .await
        .context("unexpected error encountered")?;

    info!(
        target: "blockstream",
        ticks = summary.ticks,
        failed_ticks = summary.failed_ticks,
        announced = summary.announced,
        removed = summary.removed,
        "Stopped"
    );
    Ok(())
}
