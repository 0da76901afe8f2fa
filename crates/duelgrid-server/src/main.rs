//! Standalone duelgrid server.
//!
//! ```text
//! duelgrid-server --port 8080 --seed 7
//! RUST_LOG=debug duelgrid-server
//! ```

use std::time::Duration;

use clap::Parser;
use duelgrid::prelude::*;
use tracing_subscriber::EnvFilter;

/// Two-player tic-tac-toe rooms over WebSocket.
#[derive(Parser, Debug)]
#[command(name = "duelgrid-server", version, about, long_about = None)]
struct Args {
    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Fixed seed for turn assignment (reproducible games)
    #[arg(long, env = "DUELGRID_SEED")]
    seed: Option<u64>,

    /// Close connections that send nothing for this many seconds
    #[arg(long)]
    idle_timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), DuelgridError> {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let addr = format!("{}:{}", args.host, args.port);

    let config = CoordinatorConfig {
        rng_seed: args.seed,
        ..CoordinatorConfig::default()
    };
    let mut builder = DuelgridServer::builder()
        .bind(&addr)
        .coordinator_config(config);
    if let Some(secs) = args.idle_timeout_secs {
        builder = builder.idle_timeout(Duration::from_secs(secs));
    }

    let server = builder.build().await?;
    tracing::info!(%addr, seed = ?args.seed, "starting duelgrid server");

    tokio::select! {
        result = server.run() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received Ctrl+C, shutting down");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["duelgrid-server"]).unwrap();
        // HOST/PORT may be set in the environment running the tests.
        if std::env::var_os("PORT").is_none() {
            assert_eq!(args.port, 8080);
        }
        if std::env::var_os("DUELGRID_SEED").is_none() {
            assert_eq!(args.seed, None);
        }
        assert_eq!(args.idle_timeout_secs, None);
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "duelgrid-server",
            "--host",
            "127.0.0.1",
            "-p",
            "9001",
            "--seed",
            "42",
            "--idle-timeout-secs",
            "30",
        ])
        .unwrap();
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 9001);
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.idle_timeout_secs, Some(30));
    }
}
