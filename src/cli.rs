use crate::engine::PlaygroundClient;
use crate::model::{InterpreterResult, RunConfig};
use crate::render::render_outcome;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{LineWriter, Read, Write};
use std::time::Duration;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "ts-playground",
    version,
    about = "Remote code playground client with optional TUI"
)]
pub struct Cli {
    /// Base URL for the playground service
    #[arg(long, default_value = "http://localhost:5000")]
    pub base_url: String,

    /// Print rendered output lines and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Print the raw service reply as JSON and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Read code from a file instead of stdin (non-TUI modes)
    #[arg(long)]
    pub file: Option<std::path::PathBuf>,

    /// Per-request timeout (e.g. 30s); no local timeout when omitted
    #[arg(long)]
    pub request_timeout: Option<humantime::Duration>,
}

pub async fn run(args: Cli) -> Result<()> {
    if args.text && args.json {
        return Err(anyhow::anyhow!(
            "--text and --json are mutually exclusive; pick one output mode."
        ));
    }

    if !args.json && !args.text {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_text(args).await;
        }
    }

    if args.json {
        return run_json(args).await;
    }

    run_text(args).await
}

/// Build a `RunConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> RunConfig {
    RunConfig {
        base_url: args.base_url.clone(),
        request_timeout: args.request_timeout.map(Duration::from),
        user_agent: format!("ts-playground-cli/{}", env!("CARGO_PKG_VERSION")),
    }
}

/// Read the code to submit from --file, or stdin when no file is given.
/// The contents are submitted verbatim.
fn read_code(args: &Cli) -> Result<String> {
    match args.file.as_deref() {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("read code from {}", path.display())),
        None => {
            let mut code = String::new();
            std::io::stdin()
                .read_to_string(&mut code)
                .context("read code from stdin")?;
            Ok(code)
        }
    }
}

/// Submit once and print rendered output lines to stdout. Diagnostics go
/// to stderr; an interpreter exception is an expected outcome and still
/// exits 0, while transport and service failures propagate as errors.
async fn run_text(args: Cli) -> Result<()> {
    let code = read_code(&args)?;
    let cfg = build_config(&args);
    let client = PlaygroundClient::new(&cfg).context("create playground client")?;
    let resp = client.submit(&code).await.context("submit code")?;

    if !resp.success {
        return Err(anyhow::anyhow!("playground service reported failure"));
    }

    let stdout = std::io::stdout();
    let mut out = LineWriter::new(stdout.lock());
    match resp.outcome() {
        Some(
            result @ (InterpreterResult::Exception { .. } | InterpreterResult::Completed { .. }),
        ) => {
            for line in render_outcome(&result) {
                writeln!(out, "{}", line.text)?;
            }
        }
        Some(InterpreterResult::Unrecognized(raw)) => {
            eprintln!("unrecognized interpreter result: {raw}");
        }
        None => {
            eprintln!("reply carried no interpreter result");
        }
    }
    out.flush()?;
    Ok(())
}

/// Submit once and print the raw reply body, pretty-printed.
async fn run_json(args: Cli) -> Result<()> {
    let code = read_code(&args)?;
    let cfg = build_config(&args);
    let client = PlaygroundClient::new(&cfg).context("create playground client")?;
    let raw = client.submit_raw(&code).await.context("submit code")?;
    println!("{}", serde_json::to_string_pretty(&raw)?);
    Ok(())
}
