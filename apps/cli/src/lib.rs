//! # Invoice Portal
//!
//! The application layer: configuration, state, commands, and the two ways
//! of driving them (an interactive session and JSON draft replay).
//!
//! ## Module Organization
//! ```text
//! invoice_portal_lib/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── Command line (clap)
//! ├── session.rs      ◄─── Line-oriented command shell
//! ├── draft.rs        ◄─── JSON draft replay
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── form.rs     ◄─── Form state (Arc<Mutex<InvoiceForm>>)
//! │   ├── config.rs   ◄─── Layered configuration
//! │   └── export.rs   ◄─── Renderer + save target
//! ├── commands/
//! │   ├── form.rs     ◄─── get_form, set_customer, set_invoice_number,
//! │   │                    set_invoice_date
//! │   ├── items.rs    ◄─── add_item, update_item
//! │   ├── logo.rs     ◄─── upload_logo
//! │   └── export.rs   ◄─── download_pdf
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod cli;
pub mod commands;
pub mod draft;
pub mod error;
pub mod session;
pub mod state;

use anyhow::Context;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use draft::Draft;
use session::Session;
use state::ConfigState;

/// Default log filter when neither `RUST_LOG` nor `-v`/`-q` is given.
pub const DEFAULT_LOG_FILTER: &str = "info,invoice=debug";

/// Runs the application.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, to stderr                     │
/// │     • Default: info,invoice=debug; RUST_LOG or -v/-q override           │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → config.toml → INVOICE_* → command line                 │
/// │                                                                         │
/// │  3. Initialize State ─────────────────────────────────────────────────► │
/// │     • FormState: fresh form (INV-<millis>, today, one row)              │
/// │     • ExportState: lopdf renderer + fonts, saving into output_dir       │
/// │                                                                         │
/// │  4. Dispatch ─────────────────────────────────────────────────────────► │
/// │     • session: stdin or --script                                        │
/// │     • render: replay draft, export once                                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.log_filter())?;

    let config = ConfigState::load(cli.config.as_deref())
        .context("loading configuration")?
        .with_overrides(cli.overrides());
    info!(
        brand = %config.brand_name,
        theme = ?config.theme,
        output_dir = %config.output_dir.display(),
        "Starting invoice portal"
    );

    let session = Session::new(config).context("preparing the PDF renderer")?;
    let mut stdout = tokio::io::stdout();

    match cli.command.unwrap_or_default() {
        Command::Session(args) => match args.script {
            Some(path) => {
                let file = tokio::fs::File::open(&path)
                    .await
                    .with_context(|| format!("opening script {}", path.display()))?;
                session.run(BufReader::new(file), &mut stdout).await?;
            }
            None => {
                session
                    .run(BufReader::new(tokio::io::stdin()), &mut stdout)
                    .await?;
            }
        },
        Command::Render(args) => {
            let draft = Draft::load(&args.draft).await?;
            let base_dir = args
                .draft
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            draft.apply(session.form(), &base_dir).await?;

            let saved = session.export().await?;
            println!("{}", saved.path);
        }
    }

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=invoice_pdf=trace` - Trace the renderer only
/// - Default: [`DEFAULT_LOG_FILTER`]
pub fn init_tracing(forced: Option<&str>) -> anyhow::Result<()> {
    let filter = match forced {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))
}
