use std::{
    env,
    error::Error,
    fs::OpenOptions,
    net::SocketAddr,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use time::Duration;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

use cashcontrol::{AppState, build_router, graceful_shutdown, logging_middleware};

/// The REST API server for CashControl.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// How many hours a session token stays valid after log-in.
    #[arg(long, default_value_t = 24)]
    session_hours: i64,

    /// File path to write debug logs to.
    #[arg(long, default_value = "debug.log")]
    log_path: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(&args.log_path)?;

    if args.session_hours <= 0 {
        return Err("--session-hours must be greater than zero".into());
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let secret = env::var("SECRET").map_err(|_| "The environment variable 'SECRET' must be set")?;

    let conn = Connection::open(&args.db_path)?;
    let state =
        AppState::new(conn, &secret)?.with_session_duration(Duration::hours(args.session_hours));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state))
        .layer(middleware::from_fn(logging_middleware));

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

/// Log `info` and above to stdout and everything at `debug` and above to the
/// file at `log_path`.
///
/// The stdout level can be overridden with the `RUST_LOG` environment variable.
fn setup_logging(log_path: &str) -> Result<(), Box<dyn Error>> {
    let stdout_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(stdout_filter);

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Internal errors are already logged when they are turned into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
