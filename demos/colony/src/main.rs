//! Colony demo: a scripted simulation behind the workgrid board
//!
//! Wires the three layers together the way a real host would:
//! - a dedicated host thread owns the simulation and runs both scripted
//!   mutations and marshaled web writes
//! - a replication hub keeps the worker-side model in sync and publishes
//!   snapshots
//! - the web surface serves polling clients
//!
//! Run it, then poll `http://127.0.0.1:8750/board/revision` and fetch
//! `/board/state` when the revision moves.

mod sim;

use sim::{ActivityBoard, ChannelDispatcher, ColonySim};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;
use workgrid_core::ActivityLookup;
use workgrid_sync::Hub;
use workgrid_web::{ServerConfig, WebState};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "colony.ron".to_string());
    let config = ServerConfig::load_or_default(&config_path)?;
    let addr: SocketAddr = config.listen.parse()?;

    let hub = Arc::new(Hub::new()?);
    let activity = Arc::new(ActivityBoard::new());
    let sim = ColonySim::bootstrap(Arc::clone(&hub), Arc::clone(&activity));

    let (tx, rx) = mpsc::channel();
    let stop = Arc::new(AtomicBool::new(false));
    let host_thread = {
        let stop = Arc::clone(&stop);
        std::thread::Builder::new()
            .name("colony-host".into())
            .spawn(move || sim::run_host_loop(sim, rx, stop))?
    };

    let state = Arc::new(WebState {
        hub,
        dispatcher: Arc::new(ChannelDispatcher::new(tx)),
        activity: Some(activity as Arc<dyn ActivityLookup + Send + Sync>),
        config,
    });

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        tokio::select! {
            result = workgrid_web::serve(state, addr) => result.map_err(Box::<dyn std::error::Error>::from),
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                Ok(())
            }
        }
    })?;

    stop.store(true, Ordering::Relaxed);
    host_thread
        .join()
        .map_err(|_| "colony host thread panicked")?;
    Ok(())
}
