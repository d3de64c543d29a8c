//! Command line definition.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use invoice_pdf::Theme;

use crate::state::ConfigOverrides;

#[derive(Debug, Parser)]
#[command(
    name = "invoice-portal",
    version,
    about = "Fill in an invoice and export it as a PDF",
    long_about = "Fill in an invoice line by line, watch the subtotal, and export it\n\
                  to <invoice number>.pdf. Runs an interactive session by default."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file (default: config.toml in the platform config directory).
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Directory exported PDFs are saved into.
    #[arg(long = "out-dir", value_name = "DIR", global = true)]
    pub out_dir: Option<PathBuf>,

    /// Invoice look.
    #[arg(long, value_enum, global = true)]
    pub theme: Option<ThemeArg>,

    /// Business name shown in the header.
    #[arg(long, value_name = "NAME", global = true)]
    pub brand: Option<String>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output (-q warnings, -qq errors only).
    #[arg(short, long, action = ArgAction::Count, global = true, conflicts_with = "verbose")]
    pub quiet: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Edit the invoice interactively, or from a script of session lines.
    Session(SessionArgs),

    /// Fill the invoice from a JSON draft and export it.
    Render(RenderArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Session(SessionArgs::default())
    }
}

#[derive(Debug, Default, Args)]
pub struct SessionArgs {
    /// Read session lines from FILE instead of stdin.
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Draft file to render.
    #[arg(value_name = "DRAFT")]
    pub draft: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Plain,
    Styled,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Plain => Theme::Plain,
            ThemeArg::Styled => Theme::Styled,
        }
    }
}

impl Cli {
    /// Values that replace configuration loaded from file and environment.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            brand_name: self.brand.clone(),
            theme: self.theme.map(Theme::from),
            output_dir: self.out_dir.clone(),
        }
    }

    /// Log filter forced by `-v`/`-q`; `None` defers to `RUST_LOG`.
    pub fn log_filter(&self) -> Option<&'static str> {
        match (self.verbose, self.quiet) {
            (0, 0) => None,
            (1, _) => Some("info,invoice=debug"),
            (v, _) if v >= 2 => Some("debug,invoice=trace"),
            (_, 1) => Some("warn"),
            _ => Some("error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_session() {
        let cli = Cli::try_parse_from(["invoice-portal"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(
            cli.command.unwrap_or_default(),
            Command::Session(SessionArgs { script: None })
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "invoice-portal",
            "render",
            "draft.json",
            "--theme",
            "plain",
            "--out-dir",
            "/tmp/out",
            "--brand",
            "Studio",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.theme, Some(Theme::Plain));
        assert_eq!(overrides.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(overrides.brand_name.as_deref(), Some("Studio"));
        match cli.command {
            Some(Command::Render(args)) => assert_eq!(args.draft, PathBuf::from("draft.json")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verbosity_filters() {
        let cli = Cli::try_parse_from(["invoice-portal", "-vv"]).unwrap();
        assert_eq!(cli.log_filter(), Some("debug,invoice=trace"));

        let cli = Cli::try_parse_from(["invoice-portal", "-q"]).unwrap();
        assert_eq!(cli.log_filter(), Some("warn"));

        let cli = Cli::try_parse_from(["invoice-portal"]).unwrap();
        assert_eq!(cli.log_filter(), None);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["invoice-portal", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_clap_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
