//! Stand-ins for the relay's and gateway's collaborators.

mod backend;
mod completion;
mod echo;

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

pub use backend::{BackendMock, TestBackend};
pub use completion::{CompletionMock, RecordedCompletion, TestCompletionServer};
pub use echo::{EchoBackend, EchoedRequest};

/// Serves the router on an ephemeral local port.
pub(crate) async fn spawn_router(app: Router) -> anyhow::Result<(SocketAddr, tokio::task::JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Ok((address, handle))
}

/// An address nothing listens on.
pub async fn unused_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
