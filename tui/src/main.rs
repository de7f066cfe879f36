//! docs-chat Entry Point
//!
//! Usage:
//!   docs-chat [OPTIONS]                 open the widget over a page
//!   docs-chat ask <QUESTION>            ask once and print the answer
//!   docs-chat retrieve <QUERY>          print matching chunks
//!   docs-chat health                    check the service (exit 1 if down)
//!
//! Options:
//!   --page <FILE>     Markdown page to show under the widget
//!   --config <FILE>   Configuration file
//!   --api-url <URL>   RAG API base URL
//!   --dev             Log request and response bodies

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use docs_chat_core::api::{RagApi, RagClient, DEFAULT_TOP_K};
use docs_chat_core::config::{load_config_from_path, ConfigOverrides, WidgetConfig};
use docs_chat_core::transcript::TranscriptUi;

use docs_chat_tui::commands;
use docs_chat_tui::widgets::PageDocument;
use docs_chat_tui::App;

/// Chat with the course documentation from the terminal
#[derive(Parser, Debug)]
#[command(name = "docs-chat")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Markdown page to show under the widget
    #[arg(short = 'p', long, value_name = "FILE")]
    page: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "DOCS_CHAT_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// RAG API base URL (overrides config and DOCS_CHAT_API_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Log request and response bodies
    #[arg(long)]
    dev: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask one question and print the answer with its sources
    Ask {
        /// The question
        question: String,
        /// Restrict retrieval to one module
        #[arg(short, long)]
        module: Option<String>,
        /// Ground the answer only in the text of this file
        #[arg(long, value_name = "FILE")]
        selection_file: Option<PathBuf>,
        /// Print the raw response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the chunks most relevant to a query
    Retrieve {
        /// Search query
        query: String,
        /// Number of chunks
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: u32,
        /// Metadata filter, repeatable
        #[arg(short, long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,
        /// Print the raw chunks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether the RAG service is up
    Health,
}

/// `$XDG_STATE_HOME/docs-chat/docs-chat.log`, falling back to the cache dir
fn log_file_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("docs-chat")
        .join("docs-chat.log")
}

/// Default filter directives; `debug` when the resolved config is in dev mode
fn log_directives(config: &WidgetConfig) -> String {
    let level = if config.dev_mode { "debug" } else { "info" };
    format!("docs_chat_core={level},docs_chat_tui={level}")
}

/// Set up tracing: stderr for one-shot commands, a file under the TUI
fn init_logging(to_file: bool, config: &WidgetConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_directives(config)));

    if to_file {
        let path = log_file_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {parent:?}"))?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {path:?}"))?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .init();
    }

    Ok(())
}

fn resolve_config(args: &Args) -> Result<WidgetConfig> {
    let mut config =
        load_config_from_path(args.config.clone()).context("Failed to load configuration")?;

    let mut overrides = ConfigOverrides::new();
    if let Some(url) = &args.api_url {
        overrides = overrides.with_api_base_url(url.clone());
    }
    if args.dev {
        overrides = overrides.with_dev_mode(true);
    }
    overrides
        .apply(&mut config)
        .context("Invalid command-line option")?;
    Ok(config)
}

async fn run_command(command: Command, config: &WidgetConfig, api: &dyn RagApi) -> Result<()> {
    let ui = TranscriptUi::new(config.excerpt_chars, &config.docs_base_url);
    let mut out = io::stdout().lock();

    match command {
        Command::Ask {
            question,
            module,
            selection_file,
            json,
        } => {
            let selection = selection_file
                .map(|path| {
                    fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read selection file: {path:?}"))
                })
                .transpose()?;
            commands::run_ask(api, &ui, &question, module, selection.as_deref(), json, &mut out)
                .await?;
        }
        Command::Retrieve {
            query,
            top_k,
            filters,
            json,
        } => {
            commands::run_retrieve(api, &ui, &query, top_k, &filters, json, &mut out).await?;
        }
        Command::Health => {
            let healthy = commands::run_health(api, &mut out).await?;
            out.flush()?;
            if !healthy {
                std::process::exit(1);
            }
        }
    }

    out.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging waits for the config so dev mode from file or env applies
    let config = resolve_config(&args)?;
    init_logging(args.command.is_none(), &config)?;
    info!("docs-chat {}", env!("CARGO_PKG_VERSION"));
    info!(source = %config.source(), api = %config.api_base_url, dev = config.dev_mode, "Configuration loaded");

    let api: Arc<dyn RagApi> =
        Arc::new(RagClient::new(config.client_config()).context("Failed to create API client")?);

    if let Some(command) = args.command {
        return run_command(command, &config, api.as_ref()).await;
    }

    let page = match &args.page {
        Some(path) => PageDocument::load(path)?,
        None => PageDocument::landing(),
    };

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: docs-chat needs a terminal (TTY)");
        eprintln!();
        eprintln!("Use `docs-chat ask \"...\"` for non-interactive use.");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, config, page, api).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: WidgetConfig,
    page: PageDocument,
    api: Arc<dyn RagApi>,
) -> Result<()> {
    let mut app = App::new(config, page, api)?;
    app.run(terminal).await
}
