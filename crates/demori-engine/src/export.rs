//! Export of aggregated profiles as CSV or JSON text.

use crate::error::{EngineError, Result};
use demori_core::AggregatedProfile;
use std::fmt::Write as _;
use std::str::FromStr;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values with a header row
    Csv,
    /// Pretty-printed JSON array
    Json,
}

impl FromStr for ExportFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(EngineError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Render profiles in the requested format.
///
/// # Errors
/// Returns error if JSON serialization fails.
pub fn render(profiles: &[AggregatedProfile], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => serde_json::to_string_pretty(profiles)
            .map_err(|e| EngineError::InvalidPayload(e.to_string())),
        ExportFormat::Csv => Ok(render_csv(profiles)),
    }
}

fn render_csv(profiles: &[AggregatedProfile]) -> String {
    let mut out = String::from(
        "name,company,title,location,emails,phones,social_profiles,confidence,partial\n",
    );

    for profile in profiles {
        let emails = profile
            .emails
            .iter()
            .map(|e| e.address.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        let phones = profile
            .phones
            .iter()
            .map(|p| p.number.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        let social = profile
            .social_profiles
            .iter()
            .map(|s| s.url.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{:.2},{}",
            csv_field(&profile.query.name),
            csv_field(&profile.query.company),
            csv_field(&profile.query.title),
            csv_field(&profile.query.location),
            csv_field(&emails),
            csv_field(&phones),
            csv_field(&social),
            profile.confidence,
            profile.partial,
        );
    }

    out
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
