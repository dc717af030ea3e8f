//! Binary entry point (spec §6): reads `MODE` from the environment and
//! wires up either a coordinator or a share node. Grounded in
//! `bleep-rpc::rpc`'s `main` (`tracing_subscriber::fmt::init()`,
//! `warp::serve(routes).run(addr)`), generalized to dispatch on a
//! `Config::mode` instead of always building the same route set.

mod config;

use anyhow::{Context, Result};
use config::{Config, Mode, NodeId};
use std::sync::Arc;
use tracing::info;
use voteshare_core::{ElectionRegistry, FingerprintBuffer, InMemoryRegistry, VoterRegistry};
use warp::Filter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env().context("loading configuration from environment")?;

    match config.mode {
        Mode::Coordinator => run_coordinator(config).await,
        Mode::Share => run_share_node(config).await,
    }
}

async fn run_coordinator(config: Config) -> Result<()> {
    let store = voteshare_coordinator::CoordinatorStore::open(&config.storage_path)
        .context("opening coordinator storage")?;

    let node_a_url = config.share_node_a_url.clone().context("SHARE_NODE_A_URL required in coordinator mode")?;
    let node_b_url = config.share_node_b_url.clone().context("SHARE_NODE_B_URL required in coordinator mode")?;

    let node_a: Box<dyn voteshare_coordinator::ShareNodeClient> = Box::new(
        voteshare_coordinator::HttpShareNodeClient::new(node_a_url, config.hmac_key.clone(), config.http_timeout),
    );
    let node_b: Box<dyn voteshare_coordinator::ShareNodeClient> = Box::new(
        voteshare_coordinator::HttpShareNodeClient::new(node_b_url, config.hmac_key.clone(), config.http_timeout),
    );

    // Stand-in for the out-of-scope registry CRUD service (spec §1); a
    // real deployment swaps this for an adapter over that service's
    // read API without touching `cast`/`tally`.
    let registry: Arc<InMemoryRegistry> = Arc::new(InMemoryRegistry::new());
    let election_registry: Arc<dyn ElectionRegistry> = registry.clone();
    let voter_registry: Arc<dyn VoterRegistry> = registry;

    let coordinator = Arc::new(voteshare_coordinator::Coordinator {
        election_registry,
        voter_registry,
        node_a,
        node_b,
        store,
        locks: voteshare_coordinator::locks::VoterLocks::new(),
    });
    let fingerprint_buffer = Arc::new(FingerprintBuffer::new());

    let routes = voteshare_coordinator::http::routes(coordinator, fingerprint_buffer)
        .recover(voteshare_coordinator::http::recover);

    info!(addr = %config.bind_addr, "starting coordinator");
    warp::serve(routes).run(config.bind_addr).await;
    Ok(())
}

async fn run_share_node(config: Config) -> Result<()> {
    let node_id = config.node_id.context("NODE_ID required in share mode")?;

    let store = voteshare_share_node::ShareStore::open(&config.storage_path).context("opening share-node storage")?;
    let service = Arc::new(voteshare_share_node::ShareNodeService::new(node_id_str(node_id).to_string(), store));
    let shared_key = Arc::new(config.hmac_key.clone());

    let routes = voteshare_share_node::http::routes(service, shared_key).recover(voteshare_share_node::http::recover);

    info!(addr = %config.bind_addr, node_id = node_id_str(node_id), "starting share node");
    warp::serve(routes).run(config.bind_addr).await;
    Ok(())
}

fn node_id_str(node_id: NodeId) -> &'static str {
    node_id.as_str()
}
