use anyhow::{Context, Result};
use axum::http::StatusCode;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

mod stub;

use stub::StubConfig;

#[derive(Parser, Debug)]
#[command(name = "docask-tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve a canned answering service on `/ask`.
    StubServer {
        #[arg(long, default_value = "127.0.0.1:5000")]
        bind: String,
        #[arg(long)]
        answer: Option<String>,
        /// Reply to every request with this error message.
        #[arg(long)]
        fail_with: Option<String>,
        #[arg(long, default_value_t = 500)]
        fail_status: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    match cli.command {
        Command::StubServer {
            bind,
            answer,
            fail_with,
            fail_status,
        } => {
            let fail_status = StatusCode::from_u16(fail_status)
                .with_context(|| format!("invalid status code {fail_status}"))?;
            let config = StubConfig {
                answer,
                fail_with,
                fail_status,
            };
            let listener = TcpListener::bind(&bind)
                .await
                .with_context(|| format!("failed to bind {bind}"))?;
            info!(addr = %listener.local_addr()?, "stub answering service listening");
            axum::serve(listener, stub::router(config)).await?;
        }
    }

    Ok(())
}
