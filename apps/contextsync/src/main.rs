use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{load_settings, ContextEngineClient, ContextTransport, EngineSettings};
use panel::{controller::events::sync_notice, NoticeLevel, PanelRuntime, PanelState, Trigger};
use shared::domain::LineRange;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod bridge;
mod host;
mod selection;

use host::TerminalHost;

#[derive(Parser, Debug)]
#[command(name = "contextsync", about = "Explain code and surface related discussions from a local context engine")]
struct Args {
    #[arg(long, global = true)]
    host: Option<String>,
    #[arg(long, global = true)]
    port: Option<u16>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Settings file (defaults to ./contextsync.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Explain the intent of a code span.
    Explain(SpanArgs),
    /// Show Slack/Jira context related to a code span.
    Context(SpanArgs),
    /// Ask the engine to pull fresh items from its sources.
    Sync,
    /// Check that the engine is reachable.
    Status,
    /// Serve an editor over newline-delimited JSON on stdin/stdout.
    Stdio {
        #[arg(long)]
        system_clipboard: bool,
    },
}

#[derive(clap::Args, Debug)]
struct SpanArgs {
    #[arg(long)]
    file: PathBuf,
    /// 1-based inclusive span, e.g. `3-7`.
    #[arg(long)]
    lines: LineRange,
    /// Write the rendered panel document here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn resolve_settings(args: &Args) -> EngineSettings {
    let mut settings = load_settings(args.config.as_deref());
    if let Some(host) = &args.host {
        settings.host = host.clone();
    }
    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(secs) = args.timeout_secs {
        settings.request_timeout = Duration::from_secs(secs.max(1));
    }
    settings
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let settings = resolve_settings(&args);
    let client = ContextEngineClient::new(&settings)?;
    debug!(engine = %client.base_url(), "context engine client ready");
    let state = PanelState::new().with_refresh_after_sync(settings.refresh_after_sync);

    match args.command {
        Command::Explain(span) => {
            let selection = selection::read_selection(&span.file, span.lines).await?;
            run_once(client, state, Trigger::ExplainSelection(Some(selection)), span.out).await
        }
        Command::Context(span) => {
            let selection = selection::read_selection(&span.file, span.lines).await?;
            run_once(
                client,
                state,
                Trigger::ShowContextForSelection(Some(selection)),
                span.out,
            )
            .await
        }
        Command::Sync => {
            let notice = sync_notice(&client.sync().await);
            println!("{}", notice.message);
            if notice.level == NoticeLevel::Error {
                bail!("sync failed");
            }
            Ok(())
        }
        Command::Status => {
            let status = client
                .health()
                .await
                .with_context(|| format!("context engine at {} is not healthy", client.base_url()))?;
            println!("{}", status.message);
            Ok(())
        }
        Command::Stdio { system_clipboard } => {
            bridge::serve(Arc::new(client), state, system_clipboard).await
        }
    }
}

async fn run_once(
    client: ContextEngineClient,
    state: PanelState,
    trigger: Trigger,
    out: Option<PathBuf>,
) -> Result<()> {
    let transport: Arc<dyn ContextTransport> = Arc::new(client);
    let mut runtime = PanelRuntime::new(transport, TerminalHost::default(), state);
    runtime.handle_trigger(trigger);
    runtime.drain().await;

    let failed = matches!(runtime.state().view(), panel::ViewState::Failed(_));
    let host = runtime.into_host();
    let document = host
        .latest_document()
        .context("nothing was rendered; the selection was rejected")?;
    match out {
        Some(path) => tokio::fs::write(&path, document)
            .await
            .with_context(|| format!("failed to write '{}'", path.display()))?,
        None => println!("{document}"),
    }
    if failed {
        bail!("context engine request failed");
    }
    Ok(())
}
