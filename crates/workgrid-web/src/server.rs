//! Connection accept loop

use crate::{Result, WebState};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// Serve the board endpoints until the task is dropped
///
/// Each connection gets its own task; handlers only ever read the published
/// snapshot or dispatch a job, so connections never contend on the model.
pub async fn serve(state: Arc<WebState>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "workgrid web listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let state = Arc::clone(&state);

        tokio::task::spawn(async move {
            let service = service_fn(move |req| crate::handle_request(Arc::clone(&state), req));
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                debug!(%peer, error = %err, "connection closed with error");
            }
        });
    }
}
