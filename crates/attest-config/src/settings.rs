//! The singleton report settings record

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Current supported settings schema version
pub const CURRENT_SETTINGS_VERSION: u32 = 1;

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to parse settings record: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported settings version: {0}")]
    UnsupportedVersion(u32),
}

/// Table rendering theme for the PDF report body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TableTheme {
    #[default]
    Striped,
    Grid,
    Plain,
}

/// Report font, limited to the built-in PDF font families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Helvetica,
    Times,
    Courier,
}

/// UI color theme. Carried in the record for compatibility; has no
/// effect on rendered reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UiTheme {
    #[default]
    Light,
    Dark,
}

macro_rules! impl_option_strings {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    other => Err(format!(
                        concat!("unknown ", stringify!($ty), ": {}"),
                        other
                    )),
                }
            }
        }
    };
}

impl_option_strings!(TableTheme { Striped => "striped", Grid => "grid", Plain => "plain" });
impl_option_strings!(FontFamily { Helvetica => "helvetica", Times => "times", Courier => "courier" });
impl_option_strings!(UiTheme { Light => "light", Dark => "dark" });

/// The singleton configuration controlling report identity and styling.
///
/// Persisted wholesale: `save` replaces the whole record, `load` returns
/// the whole record or the documented defaults. There is no partial-field
/// update at the storage layer and no migration path; a record with an
/// unrecognized version is rejected at load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Settings schema version
    pub settings_version: u32,

    pub company_name: String,
    pub tester_name: String,

    /// Report number prefix, e.g. "RPT"
    pub report_prefix: String,

    /// Optional embedded logo as a `data:image/...;base64,...` URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_data: Option<String>,

    pub table_theme: TableTheme,
    pub primary_font: FontFamily,
    pub ui_theme: UiTheme,

    /// The date stamped on generated reports (independent of per-entry
    /// test dates)
    pub report_date: NaiveDate,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            settings_version: CURRENT_SETTINGS_VERSION,
            company_name: "Your Company Name".into(),
            tester_name: "Default Tester".into(),
            report_prefix: "RPT".into(),
            logo_data: None,
            table_theme: TableTheme::default(),
            primary_font: FontFamily::default(),
            ui_theme: UiTheme::default(),
            report_date: attest_util::today(),
        }
    }
}

/// Parse a persisted settings record, rejecting unsupported versions.
pub fn parse_settings(json: &str) -> Result<ReportSettings, SettingsError> {
    let settings: ReportSettings = serde_json::from_str(json)?;
    if settings.settings_version != CURRENT_SETTINGS_VERSION {
        return Err(SettingsError::UnsupportedVersion(settings.settings_version));
    }
    Ok(settings)
}

/// Serialize a settings record for persistence.
pub fn settings_to_json(settings: &ReportSettings) -> Result<String, SettingsError> {
    Ok(serde_json::to_string(settings)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_run_contract() {
        let settings = ReportSettings::default();
        assert_eq!(settings.report_prefix, "RPT");
        assert_eq!(settings.table_theme, TableTheme::Striped);
        assert_eq!(settings.primary_font, FontFamily::Helvetica);
        assert_eq!(settings.ui_theme, UiTheme::Light);
        assert_eq!(settings.company_name, "Your Company Name");
        assert_eq!(settings.tester_name, "Default Tester");
        assert!(settings.logo_data.is_none());
    }

    #[test]
    fn roundtrip() {
        let mut settings = ReportSettings::default();
        settings.company_name = "Acme Test Labs".into();
        settings.table_theme = TableTheme::Grid;

        let json = settings_to_json(&settings).unwrap();
        let parsed = parse_settings(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn reject_wrong_version() {
        let mut settings = ReportSettings::default();
        settings.settings_version = 99;
        let json = settings_to_json(&settings).unwrap();

        let result = parse_settings(&json);
        assert!(matches!(
            result,
            Err(SettingsError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn absent_logo_is_omitted_from_record() {
        let json = settings_to_json(&ReportSettings::default()).unwrap();
        assert!(!json.contains("logo_data"));
    }

    #[test]
    fn option_strings_parse() {
        assert_eq!("grid".parse::<TableTheme>().unwrap(), TableTheme::Grid);
        assert_eq!("TIMES".parse::<FontFamily>().unwrap(), FontFamily::Times);
        assert_eq!("dark".parse::<UiTheme>().unwrap(), UiTheme::Dark);
        assert!("neon".parse::<TableTheme>().is_err());
    }
}
