//! Auction peer.
//!
//! Opens the local store, bootstraps the peer identity, serves inbound
//! open/close notifications over RPC and reads commands from stdin:
//!
//!   sell <name> <price>
//!   bid <name> <price>
//!   close <name>
//!
//! Logging goes to stderr; stdout carries only command results.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use peer_auction::config::{
    COORDINATOR_KEY_ENV, DATA_DIR_ENV, DEFAULT_PORT, PEERS_FILE_ENV, RPC_TIMEOUT_ENV,
};
use peer_auction::{
    bootstrap_identity, AuctionCoordinator, CommandDispatcher, EventHandler, PeerConfig, PeerId,
    RedbStore, RpcServer, StaticDirectory, TcpRpcClient, ThreadRng,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "peer-auction", version, about = "Peer-to-peer auction peer")]
struct Args {
    /// Port of the RPC server; also selects the default data directory
    #[arg(default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Directory holding the peer's database
    #[arg(long, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Hex public key of the peer that receives open/close notifications
    #[arg(long, env = COORDINATOR_KEY_ENV)]
    coordinator: Option<String>,

    /// JSON file mapping peer keys to socket addresses
    #[arg(long, env = PEERS_FILE_ENV)]
    peers: Option<PathBuf>,

    /// RPC round-trip timeout in milliseconds
    #[arg(long, env = RPC_TIMEOUT_ENV)]
    rpc_timeout_ms: Option<u64>,
}

fn init_logging_stderr() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .init();
}

fn build_config(args: &Args) -> anyhow::Result<PeerConfig> {
    let mut config = PeerConfig::from_env(args.port)?;
    if let Some(dir) = &args.data_dir {
        config = config.with_data_dir(dir.clone());
    }
    if let Some(key) = &args.coordinator {
        let coordinator: PeerId = key.parse().context("Invalid --coordinator key")?;
        config = config.with_coordinator(coordinator);
    }
    if let Some(path) = &args.peers {
        config = config.with_peers_file(path.clone());
    }
    if let Some(ms) = args.rpc_timeout_ms {
        config = config.with_rpc_timeout_ms(ms);
    }
    Ok(config)
}

fn print_line(text: &str) {
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{text}").and_then(|()| stdout.flush()) {
        warn!("Failed to write to stdout: {}", e);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging_stderr();

    let config = build_config(&args)?;
    info!("Starting peer with {:?}", config);

    let store = RedbStore::open(config.database_path())
        .with_context(|| format!("Failed to open store in {}", config.data_dir.display()))?;
    let identity = bootstrap_identity(&store, &ThreadRng)
        .await
        .context("Identity bootstrap failed")?;
    print_line(&format!("Peer#{} running...", args.port));

    let directory = match &config.peers_file {
        Some(path) => StaticDirectory::from_file(path)?,
        None => StaticDirectory::new(),
    };
    directory.insert(identity.peer_id(), config.listen_addr);
    let directory = Arc::new(directory);

    let shutdown = CancellationToken::new();
    let server = RpcServer::bind(
        config.listen_addr,
        Arc::new(EventHandler::new()),
        shutdown.clone(),
        config.rpc_timeout(),
    )
    .await
    .context("Failed to start RPC server")?;
    let server_task = tokio::spawn(server.run());
    print_line(&format!(
        "Peer#{} rpc server started listening on public key: {}",
        args.port,
        identity.peer_id()
    ));

    if config.coordinator.is_none() {
        warn!("No coordinating peer configured; open/close notifications are skipped");
    }
    let client = TcpRpcClient::new(
        identity.rpc_signing_key().clone(),
        directory,
        config.rpc_timeout(),
    );
    let dispatcher = CommandDispatcher::new(AuctionCoordinator::new(
        store,
        client,
        config.coordinator,
    ));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) if line.trim().is_empty() => {}
                    Ok(Some(line)) => {
                        let outcome = dispatcher.execute(&line).await;
                        print_line(&outcome.message);
                    }
                    Ok(None) => {
                        info!("stdin closed");
                        break;
                    }
                    Err(e) => {
                        error!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
        }
    }

    shutdown.cancel();
    if let Err(e) = server_task.await {
        warn!("RPC server task ended abnormally: {}", e);
    }
    info!("Peer#{} stopped", args.port);
    Ok(())
}
