//! Dapdash CLI - terminal dashboard for notebook execution streams

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;

use dapdash::catalog;
use dapdash::dashboard::DashboardApp;
use dapdash::error::{DashError, FixSuggestion};
use dapdash::exports;
use dapdash::message::{Phase, StreamMsg};
use dapdash::request::ExecuteRequest;
use dapdash::stream::{make_stream_client, MockStreamClient, StreamClient, StreamMode, STREAM_MODE_ENV};
use dapdash::types::TemplateId;

#[derive(Parser)]
#[command(name = "dapdash")]
#[command(about = "DAP Notebook - terminal dashboard for analysis execution streams")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the dashboard
    Run {
        /// Stream client implementation
        #[arg(short, long, value_enum, env = STREAM_MODE_ENV, default_value_t = StreamMode::Mock)]
        mode: StreamMode,

        /// Analysis template to run
        #[arg(short, long, default_value = "alpha_diversity")]
        template: String,

        /// Directory holding notebook exports
        #[arg(short, long, default_value = exports::DEFAULT_EXPORTS_DIR)]
        exports: PathBuf,
    },

    /// Execute the mock timeline headless and print messages as NDJSON
    Stream {
        /// Analysis template to run
        #[arg(short, long, default_value = "alpha_diversity")]
        template: String,
    },

    /// List the built-in analysis templates
    Templates,

    /// Summarize a notebook exports directory
    Exports {
        /// Directory holding notebook exports
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { mode, template, exports } => run_dashboard(mode, &template, exports).await,
        Commands::Stream { template } => stream_headless(&template).await,
        Commands::Templates => list_templates(),
        Commands::Exports { dir } => summarize_exports(&dir).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

/// Validate a template argument against the built-in catalog.
fn resolve_template(template: &str) -> Result<TemplateId, DashError> {
    let id = TemplateId::new(template)?;
    if catalog::find(id.as_str()).is_none() {
        return Err(DashError::UnknownTemplate(template.to_string()));
    }
    Ok(id)
}

async fn run_dashboard(
    mode: StreamMode,
    template: &str,
    exports_dir: PathBuf,
) -> Result<(), DashError> {
    let template_id = resolve_template(template)?;
    let client = make_stream_client(mode);
    let app = DashboardApp::new(client, template_id, exports_dir);
    app.run().await?;
    Ok(())
}

/// Run the fixed demo timeline without a terminal UI, one JSON message per
/// line. Exits when the stream reaches done or error.
async fn stream_headless(template: &str) -> Result<(), DashError> {
    let template_id = resolve_template(template)?;

    let client = MockStreamClient::new();
    let (tx, rx) = mpsc::unbounded_channel();
    client.on_message(Arc::new(move |msg| {
        let _ = tx.send(msg);
    }));
    client.connect().await?;
    client.execute(ExecuteRequest::new(template_id)).await?;

    let mut messages = UnboundedReceiverStream::new(rx);
    while let Some(msg) = messages.next().await {
        println!("{}", serde_json::to_string(&msg)?);
        let finished =
            msg.is_error() || matches!(msg, StreamMsg::Status { phase: Phase::Done, .. });
        if finished {
            break;
        }
    }

    client.close();
    Ok(())
}

fn list_templates() -> Result<(), DashError> {
    println!("{}", "Built-in analysis templates:".cyan().bold());
    for t in catalog::BUILTIN_TEMPLATES {
        println!(
            "  {} {} ({})",
            t.id.cyan(),
            t.title,
            t.figure.label().dimmed()
        );
        println!("      {}", t.summary.dimmed());
    }
    Ok(())
}

async fn summarize_exports(dir: &PathBuf) -> Result<(), DashError> {
    let state = exports::refresh(dir).await;

    match state.preview {
        Some(preview) => println!("{} table preview: {}", "✓".green(), preview),
        None => println!("{} table preview: none", "-".dimmed()),
    }

    for name in exports::FIGURE_NAMES {
        let slot = &state.figures[name];
        if let Some(spec) = &slot.spec {
            println!("{} {}: spec ({} traces)", "✓".green(), name, spec.trace_count());
        } else if let Some(png) = &slot.image_path {
            println!("{} {}: image {}", "✓".green(), name, png.display());
        } else {
            println!("{} {}: no data", "-".dimmed(), name);
        }
    }

    for error in &state.errors {
        eprintln!("{} {}", "!".yellow(), error);
    }

    Ok(())
}
