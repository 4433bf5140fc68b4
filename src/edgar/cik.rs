use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CikError {
    #[error("CIK cannot be empty")]
    Empty,
    #[error("CIK must contain only ASCII digits: {0}")]
    NotNumeric(String),
    #[error("CIK is longer than 10 digits: {0}")]
    TooLong(String),
}

/// Central Index Key of an EDGAR filer.
///
/// Keeps the identifier exactly as configured; the submissions API wants the
/// 10-digit zero-padded form, which is available through [`Cik::padded`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cik(String);

impl Cik {
    pub fn new(cik: impl Into<String>) -> Result<Self, CikError> {
        let cik = cik.into().trim().to_string();
        if cik.is_empty() {
            return Err(CikError::Empty);
        }
        if !cik.chars().all(|c| c.is_ascii_digit()) {
            return Err(CikError::NotNumeric(cik));
        }
        if cik.len() > 10 {
            return Err(CikError::TooLong(cik));
        }
        Ok(Cik(cik))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn padded(&self) -> String {
        format!("{:0>10}", self.0)
    }
}

impl FromStr for Cik {
    type Err = CikError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cik::new(s)
    }
}

impl TryFrom<String> for Cik {
    type Error = CikError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Cik::new(s)
    }
}

impl From<Cik> for String {
    fn from(cik: Cik) -> Self {
        cik.0
    }
}

impl std::fmt::Display for Cik {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
