//! HTTP server: accept loop, routing table, graceful shutdown.
//!
//! On SIGTERM or Ctrl-C the server stops accepting new connections, lets
//! every in-flight request run to completion, and returns from
//! [`Server::serve`] so `main` exits cleanly. This plays well with container
//! orchestrators, which send SIGTERM and wait a grace period before SIGKILL.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::Error;
use crate::response::{self, Response};
use crate::routes::{self, AppState};

/// The API surface, one entry per route. All routes are GET.
#[derive(Clone, Copy, Debug)]
enum Route {
    Comment,
    Header,
    Metadata,
    Epochs,
    EpochByKey,
    EpochSpeed,
    Now,
}

fn routing_table() -> matchit::Router<Route> {
    let mut table = matchit::Router::new();
    for (path, route) in [
        ("/comment", Route::Comment),
        ("/header", Route::Header),
        ("/metadata", Route::Metadata),
        ("/epochs", Route::Epochs),
        ("/epochs/{epoch}", Route::EpochByKey),
        ("/epochs/{epoch}/speed", Route::EpochSpeed),
        ("/now", Route::Now),
    ] {
        table
            .insert(path, route)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
    }
    table
}

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    pub fn bind(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Starts accepting connections and dispatching them against `state`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve(self, state: AppState) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;

        let state = Arc::new(state);
        let table = Arc::new(routing_table());

        info!(addr = %self.addr, "iss-tracker listening");

        // JoinSet tracks every spawned connection task so we can wait for
        // them all to finish during graceful shutdown.
        let mut tasks = tokio::task::JoinSet::new();

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Check shutdown first so a SIGTERM immediately stops
                // accepting new connections, even if more are queued.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let state = Arc::clone(&state);
                    let table = Arc::clone(&table);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        let svc = service_fn(move |req| {
                            let state = Arc::clone(&state);
                            let table = Arc::clone(&table);
                            async move { dispatch(&state, &table, req).await }
                        });

                        // `auto::Builder` handles both HTTP/1.1 and HTTP/2,
                        // whatever the client negotiates.
                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet does not grow
                // without bound on long-running servers.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        // Drain: wait for every in-flight connection to finish.
        while tasks.join_next().await.is_some() {}

        info!("iss-tracker stopped");
        Ok(())
    }
}

/// Routes one request and produces one response.
///
/// The error type is [`Infallible`]: every failure is rendered as a response
/// inside the handlers, so hyper never sees an error.
async fn dispatch(
    state: &AppState,
    table: &matchit::Router<Route>,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<Response, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let response = if method != http::Method::GET {
        response::status(http::StatusCode::METHOD_NOT_ALLOWED)
    } else {
        match table.at(&path) {
            Err(_) => response::status(http::StatusCode::NOT_FOUND),
            Ok(matched) => {
                let epoch = matched.params.get("epoch").unwrap_or_default();
                match matched.value {
                    Route::Comment => routes::comment(state),
                    Route::Header => routes::header(state),
                    Route::Metadata => routes::metadata(state),
                    Route::Epochs => routes::epochs(state, req.uri().query()),
                    Route::EpochByKey => routes::epoch_by_key(state, epoch),
                    Route::EpochSpeed => routes::epoch_speed(state, epoch),
                    Route::Now => routes::now(state),
                }
            }
        }
    };

    info!(%method, %path, status = response.status().as_u16(), "served");
    Ok(response)
}

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both SIGTERM and SIGINT (Ctrl-C, for local dev).
/// On Windows only Ctrl-C is available.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
