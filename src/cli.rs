use crate::engine::PokeApiClient;
use crate::model::{LookupConfig, LookupEvent, LookupRecord, LookupResult, Query};
use crate::orchestrator::LookupController;
use crate::render::{CardDocument, CardRenderer};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "pokedex-lookup",
    version,
    about = "PokéAPI lookup with optional TUI"
)]
pub struct Cli {
    /// Pokémon name or id to look up (opens the TUI when omitted)
    pub query: Option<String>,

    /// Base URL of the PokéAPI service
    #[arg(long, default_value = crate::model::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Upper bound on the wait for each lookup
    #[arg(long, default_value = "3s")]
    pub timeout: humantime::Duration,

    /// Print a JSON record and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print a text card and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Write the HTML card to this path
    #[arg(long)]
    pub html: Option<std::path::PathBuf>,

    /// Save the HTML card in the data directory
    #[arg(long)]
    pub save: bool,

    /// Open the written HTML card in the default browser
    #[arg(long)]
    pub open: bool,

    /// Export the lookup record as JSON
    #[arg(long)]
    pub export_json: Option<std::path::PathBuf>,
}

impl Cli {
    /// Whether this invocation hands the terminal to the TUI.
    pub fn wants_tui(&self) -> bool {
        cfg!(feature = "tui") && self.query.is_none() && !self.json && !self.text
    }
}

pub async fn run(args: Cli) -> Result<()> {
    if args.json && args.text {
        return Err(anyhow::anyhow!(
            "--json and --text are mutually exclusive. Pick one output mode."
        ));
    }
    if args.open && args.html.is_none() && !args.save {
        return Err(anyhow::anyhow!(
            "--open needs a card to open. Use it with --html <path> or --save."
        ));
    }

    let Some(raw) = args.query.clone() else {
        #[cfg(feature = "tui")]
        {
            if !args.json && !args.text {
                return crate::tui::run(args).await;
            }
        }
        return Err(anyhow::anyhow!("no query given. Pass a Pokémon name or id."));
    };

    let (out_tx, out_handle) = spawn_output_writer();
    let res = run_lookup(&args, &raw, &out_tx).await;

    // Flush queued output before any error reaches the exit path.
    drop(out_tx);
    let _ = out_handle.await;
    res
}

/// Build a `LookupConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> LookupConfig {
    LookupConfig {
        base_url: args.base_url.clone(),
        timeout: Duration::from(args.timeout),
        ..Default::default()
    }
}

/// Look up `raw` once and route the outcome: the card to stdout, alerts and
/// file notices to stderr.
async fn run_lookup(
    args: &Cli,
    raw: &str,
    out_tx: &mpsc::UnboundedSender<OutputLine>,
) -> Result<()> {
    let cfg = build_config(args);
    let client = PokeApiClient::new(&cfg)?;
    let renderer = CardRenderer::new()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<LookupEvent>();
    let mut controller = LookupController::new(client, cfg.timeout, event_tx);

    let query = Query::from_input(raw);
    let outcome = controller.lookup(query.clone()).await;

    while let Ok(ev) = event_rx.try_recv() {
        if let LookupEvent::Alert(alert) = ev {
            let _ = out_tx.send(OutputLine::Stderr(alert.message().to_string()));
        }
    }

    let record = LookupRecord::new(query, outcome.context("lookup failed")?);
    for line in present(args, &record)? {
        let _ = out_tx.send(OutputLine::Stdout(line));
    }

    if let Some(p) = args.export_json.as_deref() {
        crate::storage::export_json(p, &record)?;
        let _ = out_tx.send(OutputLine::Stderr(format!("Exported JSON: {}", p.display())));
    }

    for msg in mount_card(args, &renderer, &record.result)? {
        let _ = out_tx.send(OutputLine::Stderr(msg));
    }
    Ok(())
}

/// Stdout lines for one successful lookup in the selected output mode.
fn present(args: &Cli, record: &LookupRecord) -> Result<Vec<String>> {
    if args.json {
        let out = serde_json::to_string_pretty(record)?;
        return Ok(vec![out]);
    }
    let doc = CardDocument::from_result(&record.result);
    Ok(crate::text_summary::build_text_summary(&doc).lines)
}

/// Write (and optionally open) the HTML card. Returns status messages.
fn mount_card(args: &Cli, renderer: &CardRenderer, result: &LookupResult) -> Result<Vec<String>> {
    let mut messages = Vec::new();
    if args.html.is_none() && !args.save {
        return Ok(messages);
    }

    let html = renderer.render_page(&CardDocument::from_result(result))?;
    let mut written = None;

    if let Some(p) = args.html.as_deref() {
        crate::storage::write_html(p, &html)?;
        messages.push(format!("Wrote card: {}", p.display()));
        written = Some(p.to_path_buf());
    }
    if args.save {
        let p = crate::storage::save_card(result, &html).context("failed to save card")?;
        messages.push(format!("Saved: {}", p.display()));
        written = Some(p);
    }

    if args.open {
        if let Some(p) = written {
            open::that_detached(&p).with_context(|| format!("open {}", p.display()))?;
        }
    }
    Ok(messages)
}
