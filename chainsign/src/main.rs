use std::error::Error;
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;

use clap::Parser;
use libchainsign::SigningService;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod api;
mod error;

/// HTTP signing service issuing per-device signature chains
#[derive(Parser)]
#[command(name = "chainsign", version)]
struct Args {
    /// Address and port the HTTP server binds to
    #[arg(short, long, env = "CHAINSIGN_LISTEN", default_value = "0.0.0.0:8080")]
    listen: SocketAddr,
    /// Log filter to use when RUST_LOG is not set, e.g. "debug" or "chainsign=trace"
    #[arg(long, env = "CHAINSIGN_LOG", default_value = "info")]
    log_level: String,
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn serve(listen: SocketAddr) -> Result<(), Box<dyn Error>> {
    // Devices live only as long as the process.
    let service = Arc::new(SigningService::in_memory());
    let app = api::router(service);

    let listener = TcpListener::bind(listen).await?;
    tracing::info!(address = %listener.local_addr()?, "chainsign listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("chainsign stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received interrupt, shutting down"),
        Err(e) => {
            tracing::warn!(error = %e, "cannot listen for interrupts, running until killed");
            std::future::pending::<()>().await;
        }
    }
}

fn human<T>(res: Result<T, Box<dyn Error>>) -> T {
    match res {
        Ok(val) => val,
        Err(e) => {
            tracing::error!("error: {}", e);
            process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(&args.log_level);

    human(serve(args.listen).await);
}

#[test]
fn test_args() {
    use clap::CommandFactory;

    Args::command().debug_assert();

    let args = Args::try_parse_from(["chainsign", "-l", "127.0.0.1:9000", "--log-level", "debug"])
        .unwrap();
    assert_eq!(args.listen, "127.0.0.1:9000".parse().unwrap());
    assert_eq!(args.log_level, "debug");

    assert!(Args::try_parse_from(["chainsign", "--listen", "not an address"]).is_err());
}
