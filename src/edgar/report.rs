use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strum::{EnumIter, IntoEnumIterator};

/// Form type codes as they appear in the `form` column of the submissions API.
///
/// Parsing is exact: EDGAR reports form codes in upper case, and `"d"` is not
/// the same filing category as `"D"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(try_from = "String", into = "String")]
pub enum ReportType {
    FormD,
    FormDA,
    Form10K,
    Form10Q,
    Form8K,
    Form4,
    FormS1,
    Form13F,
    Other(String),
}

impl TryFrom<String> for ReportType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ReportType::from_str(&s)
    }
}

impl From<ReportType> for String {
    fn from(rt: ReportType) -> Self {
        rt.to_string()
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportType::FormD => write!(f, "D"),
            ReportType::FormDA => write!(f, "D/A"),
            ReportType::Form10K => write!(f, "10-K"),
            ReportType::Form10Q => write!(f, "10-Q"),
            ReportType::Form8K => write!(f, "8-K"),
            ReportType::Form4 => write!(f, "4"),
            ReportType::FormS1 => write!(f, "S-1"),
            ReportType::Form13F => write!(f, "13F"),
            ReportType::Other(s) => write!(f, "{}", s),
        }
    }
}

pub static REPORT_TYPES: Lazy<String> = Lazy::new(|| {
    ReportType::iter()
        .filter(|t| !matches!(t, ReportType::Other(_)))
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
});

impl ReportType {
    pub fn list_types() -> &'static str {
        &REPORT_TYPES
    }

    /// Exact comparison against a raw `form` cell.
    pub fn matches(&self, form: &str) -> bool {
        match self {
            ReportType::Other(s) => s == form,
            known => ReportType::from_str(form).map_or(false, |rt| &rt == known),
        }
    }
}

impl FromStr for ReportType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<ReportType, std::string::String> {
        match s {
            "D" => Ok(ReportType::FormD),
            "D/A" => Ok(ReportType::FormDA),
            "10-K" => Ok(ReportType::Form10K),
            "10-Q" => Ok(ReportType::Form10Q),
            "8-K" => Ok(ReportType::Form8K),
            "4" => Ok(ReportType::Form4),
            "S-1" => Ok(ReportType::FormS1),
            "13F" => Ok(ReportType::Form13F),
            "" => Err("form type cannot be empty".to_string()),
            _ => Ok(ReportType::Other(s.to_string())),
        }
    }
}
