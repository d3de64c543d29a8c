//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command line flags (`--brand`, `--theme`, `--out-dir`)
//! 2. Environment variables (`INVOICE_*`, nested keys with `__`)
//! 3. Config file (`--config`, or `config.toml` in the platform config dir)
//! 4. Defaults (this file)
//!
//! ## Example `config.toml`
//! ```toml
//! brand_name = "Dhruba Creation"
//! currency_symbol = "₹"
//! theme = "plain"
//! output_dir = "/home/me/invoices"
//!
//! [layout]
//! width = 555.0
//! window_width = 900.0
//!
//! # Faces able to draw the customer's script, e.g. Devanagari
//! [fonts]
//! regular = "/usr/share/fonts/noto/NotoSansDevanagari-Regular.ttf"
//! bold = "/usr/share/fonts/noto/NotoSansDevanagari-Bold.ttf"
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use invoice_core::{Amount, DEFAULT_BRAND_NAME};
use invoice_pdf::text::Font;
use invoice_pdf::{ExportError, FontProgram, FontSet, LayoutOptions, Theme, ViewOptions};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "INVOICE";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// Business name in the invoice header
    pub brand_name: String,

    /// Line under the brand name (styled theme only)
    pub tagline: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Terms paragraph next to the totals (styled theme only)
    pub terms: String,

    /// Footer strip contact line (styled theme only)
    pub footer: String,

    /// Signature caption (styled theme only)
    pub signature_label: String,

    /// Visual variant of the exported invoice
    pub theme: Theme,

    /// Directory exported PDFs are saved into
    pub output_dir: PathBuf,

    /// Page geometry of the export
    pub layout: LayoutOptions,

    /// TrueType files replacing the bundled faces
    pub fonts: FontPaths,
}

/// Font files for the PDF. Unset entries use the bundled DejaVu faces; a
/// regular face without a bold one is used for both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontPaths {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
}

/// Values given on the command line. `None` leaves the loaded value alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub brand_name: Option<String>,
    pub theme: Option<Theme>,
    pub output_dir: Option<PathBuf>,
}

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Config file not found: {0}")]
    MissingFile(PathBuf),
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Brand: "Dhruba Creation"
    /// - Currency: ₹
    /// - Theme: styled
    /// - Output: current directory
    fn default() -> Self {
        let view = ViewOptions::default();
        ConfigState {
            brand_name: DEFAULT_BRAND_NAME.to_string(),
            tagline: view.tagline,
            currency_symbol: view.currency_symbol,
            terms: view.terms,
            footer: view.footer,
            signature_label: view.signature_label,
            theme: view.theme,
            output_dir: PathBuf::from("."),
            layout: LayoutOptions::default(),
            fonts: FontPaths::default(),
        }
    }
}

impl ConfigState {
    /// Loads defaults, then the config file, then `INVOICE_*` variables.
    ///
    /// An explicit `path` must exist; the platform default is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Like [`ConfigState::load`], reading variables from `env` instead of
    /// the process environment when given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&ConfigState::default())?);

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::MissingFile(path.to_path_buf()));
                }
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(default) = default_config_path() {
                    builder = builder.add_source(File::from(default).required(false));
                }
            }
        }

        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .source(env);

        let config = builder
            .add_source(environment)
            .build()?
            .try_deserialize::<ConfigState>()?;
        Ok(config)
    }

    /// Applies command line values on top.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(brand_name) = overrides.brand_name {
            self.brand_name = brand_name;
        }
        if let Some(theme) = overrides.theme {
            self.theme = theme;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        self
    }

    /// Snapshot options for the renderer.
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            theme: self.theme,
            currency_symbol: self.currency_symbol.clone(),
            tagline: self.tagline.clone(),
            terms: self.terms.clone(),
            footer: self.footer.clone(),
            signature_label: self.signature_label.clone(),
        }
    }

    /// Loads the configured font files, falling back to the bundled faces.
    pub fn font_set(&self) -> Result<FontSet, ExportError> {
        let bundled = FontSet::default();
        let regular = match &self.fonts.regular {
            Some(path) => FontProgram::load(path)?,
            None => bundled.program(Font::Regular).clone(),
        };
        let bold = match (&self.fonts.bold, &self.fonts.regular) {
            (Some(path), _) => FontProgram::load(path)?,
            (None, Some(_)) => regular.clone(),
            (None, None) => bundled.program(Font::Bold).clone(),
        };
        Ok(FontSet::new(regular, bold))
    }

    /// Formats an amount the way the invoice shows it.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_amount(Amount::new(7.5)), "₹ 7.50");
    /// ```
    pub fn format_amount(&self, amount: Amount) -> String {
        amount.with_symbol(&self.currency_symbol)
    }
}

/// `config.toml` inside the platform config directory.
///
/// - **Linux**: `~/.config/invoice-portal/config.toml`
/// - **macOS**: `~/Library/Application Support/com.dhruba.invoice-portal/config.toml`
/// - **Windows**: `%APPDATA%\dhruba\invoice-portal\config\config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "dhruba", "invoice-portal")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn temp_config(contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("invoice-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_format_amount() {
        let config = ConfigState::default();
        assert_eq!(config.format_amount(Amount::new(7.5)), "₹ 7.50");
        assert_eq!(config.format_amount(Amount::new(f64::NAN)), "₹ NaN");
    }

    #[test]
    fn test_file_then_env() {
        let path = temp_config(
            r#"
brand_name = "Acme Prints"
theme = "plain"

[layout]
width = 500.0
"#,
        );

        let config = ConfigState::load_with_env(
            Some(&path),
            env(&[("INVOICE_CURRENCY_SYMBOL", "$"), ("INVOICE_THEME", "styled")]),
        )
        .unwrap();

        assert_eq!(config.brand_name, "Acme Prints");
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.theme, Theme::Styled);
        assert_eq!(config.layout.width, 500.0);
        assert_eq!(config.layout.window_width, 900.0);
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("absent-{}.toml", uuid::Uuid::new_v4()));
        let err = ConfigState::load_with_env(Some(&path), env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }

    #[test]
    fn test_overrides_win() {
        let config = ConfigState::default().with_overrides(ConfigOverrides {
            brand_name: Some("Studio".to_string()),
            theme: Some(Theme::Plain),
            output_dir: None,
        });
        assert_eq!(config.brand_name, "Studio");
        assert_eq!(config.theme, Theme::Plain);
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_font_paths_from_env() {
        let config = ConfigState::load_with_env(
            None,
            env(&[("INVOICE_FONTS__REGULAR", "/fonts/NotoSansDevanagari.ttf")]),
        )
        .unwrap();
        assert_eq!(
            config.fonts.regular,
            Some(PathBuf::from("/fonts/NotoSansDevanagari.ttf"))
        );
        assert_eq!(config.fonts.bold, None);
    }

    #[test]
    fn test_font_set_defaults_to_bundled() {
        let fonts = ConfigState::default().font_set().unwrap();
        assert_eq!(fonts.program(Font::Regular).name(), "DejaVuSans");
        assert_eq!(fonts.program(Font::Bold).name(), "DejaVuSans-Bold");
    }

    #[test]
    fn test_regular_font_doubles_as_bold() {
        let dir = std::env::temp_dir().join(format!("invoice-fonts-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("Custom.ttf");
        let bundled = FontSet::default();
        std::fs::write(&path, bundled.program(Font::Regular).data()).unwrap();

        let mut config = ConfigState::default();
        config.fonts.regular = Some(path);
        let fonts = config.font_set().unwrap();

        assert_eq!(fonts.program(Font::Regular).name(), "Custom");
        assert_eq!(fonts.program(Font::Bold).name(), "Custom");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_font_file_is_an_error() {
        let mut config = ConfigState::default();
        config.fonts.bold = Some(PathBuf::from("/nonexistent/Bold.ttf"));
        assert!(matches!(config.font_set(), Err(ExportError::Io { .. })));
    }

    #[test]
    fn test_view_options_carry_copy() {
        let mut config = ConfigState::default();
        config.terms = "Net 30".to_string();
        let options = config.view_options();
        assert_eq!(options.terms, "Net 30");
        assert_eq!(options.currency_symbol, "₹");
    }
}
