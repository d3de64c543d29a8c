//! # Session
//!
//! A line-oriented shell over the commands. Lines come from stdin or a
//! script file; every reply goes to the writer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  > item 0 price 12            update_item(0, unitPrice, "12")          │
//! │  #0 Poster  12 x 1 = ₹ 12.00  Subtotal: ₹ 12.00                        │
//! │  > date 31/12                 set_invoice_date("31/12")                │
//! │  error: [VALIDATION_ERROR] invoiceDate has invalid format: ...         │
//! │  > export                     download_pdf()                           │
//! │  Saved INV-1710027000000.pdf (1 page) to ./INV-1710027000000.pdf       │
//! │  > quit                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failing command prints its error and the session keeps reading, and
//! so does a line that is not valid UTF-8. Blank lines and lines starting
//! with `#` are skipped.

use std::fmt::Write as _;
use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use invoice_core::amount::{display_number, input_value};
use invoice_core::Amount;

use crate::commands::export::{download_pdf, ExportResponse};
use crate::commands::form::{
    get_form, set_customer, set_invoice_date, set_invoice_number, FormResponse,
};
use crate::commands::items::{add_item, update_item};
use crate::commands::logo::upload_logo;
use crate::error::ApiError;
use crate::state::{ConfigState, ExportState, FormState};

const HELP: &str = "\
Commands:
  show                          print the invoice
  json                          print the form as JSON
  add                           append an empty row
  item <index> <field> <value>  edit a row (field: name, quantity|qty, unitPrice|price)
  customer <text>               set the customer name
  number <text>                 set the invoice number
  date <YYYY-MM-DD>             set the invoice date (no value clears it)
  logo <path>                   load a logo image
  export                        save <invoice number>.pdf
  help                          show this text
  quit                          leave the session";

/// One parsed session line.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Show,
    Json,
    Add,
    Item {
        index: usize,
        field: String,
        value: String,
    },
    Customer(String),
    Number(String),
    Date(String),
    Logo(PathBuf),
    Export,
    Help,
    Quit,
}

/// What a command asks the loop to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// Parses one line. Blank lines and `#` comments give `None`.
pub fn parse_line(line: &str) -> Result<Option<SessionCommand>, ApiError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim_start()),
        None => (trimmed, ""),
    };

    let command = match verb {
        "show" => SessionCommand::Show,
        "json" => SessionCommand::Json,
        "add" => SessionCommand::Add,
        "item" => parse_item(rest)?,
        "customer" => SessionCommand::Customer(rest.to_string()),
        "number" => SessionCommand::Number(rest.to_string()),
        "date" => SessionCommand::Date(rest.trim().to_string()),
        "logo" => {
            let path = rest.trim();
            if path.is_empty() {
                return Err(ApiError::validation("usage: logo <path>"));
            }
            SessionCommand::Logo(PathBuf::from(path))
        }
        "export" => SessionCommand::Export,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => {
            return Err(ApiError::validation(format!(
                "unknown command '{}' (try 'help')",
                other
            )))
        }
    };
    Ok(Some(command))
}

fn parse_item(rest: &str) -> Result<SessionCommand, ApiError> {
    const USAGE: &str = "usage: item <index> <field> <value>";

    let (index, rest) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| ApiError::validation(USAGE))?;
    let index: usize = index.parse().map_err(|_| {
        ApiError::validation(format!("row index must be a whole number, got '{}'", index))
    })?;

    let rest = rest.trim_start();
    let (field, value) = match rest.split_once(char::is_whitespace) {
        Some((field, value)) => (field, value.trim_start()),
        None => (rest, ""),
    };
    if field.is_empty() {
        return Err(ApiError::validation(USAGE));
    }

    Ok(SessionCommand::Item {
        index,
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// The form, its configuration, and the export wiring for one session.
#[derive(Clone)]
pub struct Session {
    form: FormState,
    config: ConfigState,
    export: ExportState,
}

impl Session {
    /// Fresh form branded from `config`, exporting into `config.output_dir`.
    ///
    /// Fails when a configured font file cannot be loaded.
    pub fn new(config: ConfigState) -> Result<Self, ApiError> {
        let form = FormState::new(config.brand_name.clone());
        let export = ExportState::from_config(&config)?;
        Ok(Self::with_parts(form, config, export))
    }

    pub fn with_parts(form: FormState, config: ConfigState, export: ExportState) -> Self {
        Session {
            form,
            config,
            export,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Exports the current invoice.
    pub async fn export(&self) -> Result<ExportResponse, ApiError> {
        download_pdf(&self.form, &self.config, &self.export).await
    }

    /// Runs one command.
    pub async fn execute(&self, command: SessionCommand) -> Result<Reply, ApiError> {
        debug!(?command, "Session command");
        let output = match command {
            SessionCommand::Show => self.render_text(&get_form(&self.form)),
            SessionCommand::Json => serde_json::to_string_pretty(&get_form(&self.form))
                .map_err(|e| ApiError::internal(e.to_string()))?,
            SessionCommand::Add => {
                let response = add_item(&self.form);
                format!("Added row {}", response.items.len() - 1)
            }
            SessionCommand::Item {
                index,
                field,
                value,
            } => {
                let response = update_item(&self.form, index, &field, value)?;
                let item = &response.items[index];
                format!(
                    "#{} {}  {} x {} = {}  Subtotal: {}",
                    index,
                    item.name,
                    display_number(item.unit_price),
                    display_number(item.quantity),
                    self.config.format_amount(item.line_total()),
                    self.config.format_amount(response.totals.subtotal),
                )
            }
            SessionCommand::Customer(name) => {
                let form = set_customer(&self.form, &name);
                format!("Customer: {}", form.customer_name)
            }
            SessionCommand::Number(number) => {
                let form = set_invoice_number(&self.form, &number);
                format!("Invoice No: {}", form.invoice_number)
            }
            SessionCommand::Date(raw) => {
                let form = set_invoice_date(&self.form, &raw)?;
                format!("Date: {}", form.invoice_date)
            }
            SessionCommand::Logo(path) => {
                let response = upload_logo(&self.form, &path).await;
                match response.mime {
                    Some(mime) if response.accepted => format!("Logo loaded ({})", mime),
                    _ => "Logo unchanged".to_string(),
                }
            }
            SessionCommand::Export => {
                let saved = self.export().await?;
                format!(
                    "Saved {} ({} page{}) to {}",
                    saved.filename,
                    saved.page_count,
                    if saved.page_count == 1 { "" } else { "s" },
                    saved.path
                )
            }
            SessionCommand::Help => HELP.to_string(),
            SessionCommand::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Output(output))
    }

    /// Reads lines until EOF or `quit`, writing one reply per command.
    pub async fn run<R, W>(&self, mut reader: R, writer: &mut W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        let mut line_number = 0usize;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            line_number += 1;

            let result = match std::str::from_utf8(&buf) {
                Ok(line) => match parse_line(line) {
                    Ok(Some(command)) => self.execute(command).await,
                    Ok(None) => continue,
                    Err(e) => Err(e),
                },
                Err(e) => {
                    warn!(line = line_number, "Skipping line that is not valid UTF-8");
                    Err(ApiError::validation(format!(
                        "line {} is not valid UTF-8 (bad byte at offset {})",
                        line_number,
                        e.valid_up_to()
                    )))
                }
            };

            let text = match result {
                Ok(Reply::Output(text)) => text,
                Ok(Reply::Quit) => break,
                Err(e) => format!("error: {}", e),
            };
            writer.write_all(text.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok(())
    }

    /// Plain-text rendering of the invoice for `show`.
    fn render_text(&self, form: &FormResponse) -> String {
        let money = |amount: Amount| self.config.format_amount(amount);
        let mut out = String::new();

        let _ = writeln!(out, "{}", form.brand_name);
        let _ = writeln!(out, "INVOICE");
        let _ = writeln!(out, "Customer:   {}", form.customer_name);
        let _ = writeln!(out, "Invoice No: {}", form.invoice_number);
        let _ = writeln!(out, "Date:       {}", form.invoice_date);
        if form.has_logo {
            let _ = writeln!(out, "Logo:       loaded");
        }
        let _ = writeln!(
            out,
            "{:>3}  {:<24} {:>10} {:>8} {:>14}",
            "#", "Item", "Price", "Qty", "Total"
        );
        for (index, item) in form.items.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>3}  {:<24} {:>10} {:>8} {:>14}",
                index,
                item.name,
                input_value(item.unit_price),
                input_value(item.quantity),
                money(item.line_total()),
            );
        }
        let _ = writeln!(out, "Sub Total: {}", money(form.totals.subtotal));
        let _ = write!(out, "Total:     {}", money(form.totals.total));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::Path;

    fn session(dir: &Path) -> Session {
        let config = ConfigState {
            output_dir: dir.to_path_buf(),
            ..ConfigState::default()
        };
        let form = FormState::started_at(
            config.brand_name.clone(),
            Utc.with_ymd_and_hms(2024, 3, 9, 23, 30, 0).unwrap(),
        );
        let export = ExportState::from_config(&config).unwrap();
        Session::with_parts(form, config, export)
    }

    fn scratch_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("invoice-session-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    async fn run_script(session: &Session, script: &str) -> String {
        run_bytes(session, script.as_bytes()).await
    }

    async fn run_bytes(session: &Session, script: &[u8]) -> String {
        let mut out = Vec::new();
        session.run(script, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_item_keeps_value_text() {
        let cmd = parse_line("item 2 name Large Poster A2").unwrap().unwrap();
        assert_eq!(
            cmd,
            SessionCommand::Item {
                index: 2,
                field: "name".to_string(),
                value: "Large Poster A2".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_item_without_value_is_empty() {
        let cmd = parse_line("item 0 qty").unwrap().unwrap();
        assert_eq!(
            cmd,
            SessionCommand::Item {
                index: 0,
                field: "qty".to_string(),
                value: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_lines() {
        assert!(parse_line("item x name y").is_err());
        assert!(parse_line("item").is_err());
        assert!(parse_line("frobnicate").is_err());
        assert!(parse_line("logo").is_err());
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# setup").unwrap(), None);
        assert_eq!(parse_line("date").unwrap(), Some(SessionCommand::Date(String::new())));
    }

    #[tokio::test]
    async fn test_script_edits_and_totals() {
        let dir = scratch_dir();
        let session = session(&dir);

        let out = run_script(
            &session,
            "item 0 quantity 2\nitem 0 price 10\nadd\nitem 1 price 2.5\nitem 1 qty 4\nshow\n",
        )
        .await;

        assert!(out.contains("Added row 1"));
        assert!(out.contains("Sub Total: ₹ 30.00"));
        assert!(out.contains("Invoice No: INV-1710027000000"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_errors_do_not_stop_the_session() {
        let dir = scratch_dir();
        let session = session(&dir);

        let out = run_script(&session, "item 9 name Ghost\ncustomer Asha\n").await;

        assert!(out.contains("error: [NOT_FOUND]"));
        assert!(out.contains("Customer: Asha"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_reported_and_skipped() {
        let dir = scratch_dir();
        let session = session(&dir);

        let out = run_bytes(&session, b"customer Jos\xE9\ncustomer Asha\n").await;

        assert!(out.contains("error: [VALIDATION_ERROR] line 1 is not valid UTF-8"));
        assert!(out.contains("Customer: Asha"));
        assert_eq!(session.form().with_form(|f| f.customer_name().to_string()), "Asha");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_last_line_without_newline_runs() {
        let dir = scratch_dir();
        let session = session(&dir);

        let out = run_script(&session, "customer Asha\r\nnumber INV-7").await;

        assert!(out.contains("Customer: Asha\n"));
        assert!(out.contains("Invoice No: INV-7"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_quit_stops_reading() {
        let dir = scratch_dir();
        let session = session(&dir);

        let out = run_script(&session, "quit\ncustomer Late\n").await;

        assert!(out.is_empty());
        assert_eq!(session.form().with_form(|f| f.customer_name().to_string()), "");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_nan_shows_in_subtotal() {
        let dir = scratch_dir();
        let session = session(&dir);

        let out = run_script(&session, "item 0 qty abc\n").await;

        assert!(out.contains("Subtotal: ₹ NaN"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_export_with_defaults() {
        let dir = scratch_dir();
        let session = session(&dir);

        let out = run_script(&session, "export\n").await;

        assert!(out.contains("Saved INV-1710027000000.pdf (1 page)"));
        assert!(dir.join("INV-1710027000000.pdf").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
