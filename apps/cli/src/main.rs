//! # Invoice Portal Entry Point
//!
//! ```text
//! invoice-portal [--config FILE] [--out-dir DIR] [--theme plain|styled] [--brand NAME]
//!     session [--script FILE]     edit interactively (default)
//!     render <DRAFT.json>         fill from a draft and export
//! ```
//!
//! The actual setup is in lib.rs so the shell can be driven from tests.

use clap::Parser;

use invoice_portal_lib::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    invoice_portal_lib::run(Cli::parse()).await
}
