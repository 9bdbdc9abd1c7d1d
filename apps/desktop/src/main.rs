use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{
    AskController, ControllerEvent, HttpAskTransport, SubmissionState, UploadedFile,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "docask", about = "Ask a question about a document")]
struct Args {
    /// Document to upload with the question.
    #[arg(long)]
    file: Option<PathBuf>,
    #[arg(long, default_value = "")]
    question: String,
    /// Ask endpoint; a bare base URL gets `/ask` appended.
    #[arg(long)]
    endpoint: Option<String>,
    /// Request timeout in seconds; 0 waits indefinitely.
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Settings file (defaults to ./docask.toml).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match args.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut settings = load_settings(args.config.as_deref());
    if let Some(endpoint) = &args.endpoint {
        settings.set_endpoint(endpoint);
    }
    if let Some(secs) = args.timeout_secs {
        settings.set_timeout_secs(secs);
    }
    info!(endpoint = %settings.endpoint, timeout = ?settings.request_timeout, "settings loaded");

    let transport =
        HttpAskTransport::new(settings.endpoint.clone()).with_timeout(settings.request_timeout);
    let controller = AskController::new(Arc::new(transport));

    let mut events = controller.subscribe_events();
    let view = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let settled = matches!(
                        &event,
                        ControllerEvent::StateChanged(state) if state.is_terminal()
                    );
                    if let Some(line) = render::render(&event) {
                        render::print(line);
                    }
                    if settled {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "view lagged behind events"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    if let Some(path) = &args.file {
        controller.update_file(Some(UploadedFile::from_path(path).await?));
    }
    controller.update_question(args.question);

    let state = controller.submit().await;
    let _ = view.await;

    Ok(match state {
        SubmissionState::Succeeded(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
