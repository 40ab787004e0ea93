//! coiserve - Static file server with cross-origin isolation headers.
//!
//! Serves a directory over HTTP with `Cross-Origin-Opener-Policy` and
//! `Cross-Origin-Embedder-Policy` on every response, which browsers
//! require before enabling SharedArrayBuffer and the other
//! high-precision APIs the wasm build needs. Runs until killed.

mod server;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Serve a directory with cross-origin isolation headers.
#[derive(Parser, Debug)]
#[command(name = "coiserve")]
#[command(about = "Static file server with cross-origin isolation headers")]
struct Args {
    /// Directory to serve
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt().with_target(false).init();

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("serving {} at http://{}", args.dir.display(), addr);

    axum::serve(listener, server::router(&args.dir)).await?;
    Ok(())
}
