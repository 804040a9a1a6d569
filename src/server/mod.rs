//! Network front of the service: a gRPC server and an HTTP/JSON gateway
//! sharing the same endpoints and storage.

pub mod endpoints;
pub mod errors;
pub mod gateway;
pub mod grpc;

mod deadline;
pub use deadline::Deadline;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::info;
use salvo::prelude::{Listener, TcpListener};
use tokio::sync::watch;

use crate::{params, traits};
use endpoints::EndpointContext;
use errors::ServerError;

pub struct Server {
    pub grpc_addr: SocketAddr,
    pub http_addr: SocketAddr,

    /// Time given to in-flight HTTP requests once shutdown is requested
    shutdown_grace: Duration,
}

impl Server {
    pub fn new(grpc_addr: SocketAddr, http_addr: SocketAddr) -> Self {
        Self {
            grpc_addr,
            http_addr,
            shutdown_grace: params::configurables().shutdown_grace,
        }
    }

    /// Serves both fronts until `shutdown` flips to `true` or one of them fails.
    pub async fn start(
        self,
        store: traits::StoreRef,
        shutdown: watch::Receiver<bool>,
    ) -> Result<(), ServerError> {
        let ctx = Arc::new(EndpointContext::new(store));

        let acceptor = TcpListener::new(self.http_addr).try_bind().await?;
        info!("http gateway listening on {}", self.http_addr);
        let http = salvo::Server::new(acceptor);
        let handle = http.handle();
        let grace = self.shutdown_grace;
        let stop = stopped(shutdown.clone());
        tokio::spawn(async move {
            stop.await;
            info!("stopping http gateway");
            handle.stop_graceful(Some(grace));
        });
        let http = async {
            http.try_serve(gateway::router(ctx.clone()))
                .await
                .map_err(ServerError::from)
        };

        info!("grpc server listening on {}", self.grpc_addr);
        let grpc = async {
            tonic::transport::Server::builder()
                .add_service(grpc::BlogService::new(ctx.clone()).into_server())
                .serve_with_shutdown(self.grpc_addr, stopped(shutdown.clone()))
                .await
                .map_err(ServerError::from)
        };

        tokio::try_join!(grpc, http)?;

        info!("servers stopped");
        Ok(())
    }
}

async fn stopped(mut shutdown: watch::Receiver<bool>) {
    // A dropped sender also means stop
    let _ = shutdown.wait_for(|stop| *stop).await;
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::traits::testing::MemoryStore;

    fn local() -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, 0))
    }

    #[tokio::test]
    async fn stops_on_shutdown() {
        let (stop_tx, stop_rx) = watch::channel(false);
        let server = Server::new(local(), local());

        let running = tokio::spawn(server.start(Arc::new(MemoryStore::new()), stop_rx));
        tokio::time::sleep(Duration::from_millis(100)).await;
        stop_tx.send_replace(true);

        let result = tokio::time::timeout(Duration::from_secs(10), running)
            .await
            .expect("servers did not stop")
            .unwrap();
        assert!(result.is_ok(), "{result:?}");
    }

    #[tokio::test]
    async fn bind_failures_are_reported() {
        let taken = std::net::TcpListener::bind(local()).unwrap();
        let (_stop_tx, stop_rx) = watch::channel(false);
        let server = Server::new(local(), taken.local_addr().unwrap());

        let result = server.start(Arc::new(MemoryStore::new()), stop_rx).await;

        assert!(result.is_err());
    }
}
