use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::edgar::cik::Cik;
use crate::edgar::report::ReportType;

pub const DEFAULT_OUTPUT_PATH: &str = "form_d_filings.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = "software@example.com";
pub const EDGAR_DATA_URL: &str = "https://data.sec.gov";

#[derive(Clone, Debug)]
pub struct HarvestConfig {
    pub ciks: Vec<Cik>,
    pub output_path: PathBuf,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub data_url: Url,
    pub forms: Vec<ReportType>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            ciks: Vec::new(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            data_url: Url::parse(EDGAR_DATA_URL).expect("EDGAR_DATA_URL is a valid URL"),
            forms: vec![ReportType::FormD],
        }
    }
}

/// Settings given on the command line; each one that is set wins over the
/// environment.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub ciks: Vec<String>,
    pub output_path: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub forms: Vec<String>,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_ciks(values: &[String]) -> Result<Vec<Cik>> {
    values
        .iter()
        .map(|v| Cik::from_str(v).map_err(|e| anyhow!(e)))
        .collect()
}

fn parse_forms(values: &[String]) -> Result<Vec<ReportType>> {
    values
        .iter()
        .map(|v| ReportType::from_str(v).map_err(|e| anyhow!("invalid form type {:?}: {}", v, e)))
        .collect()
}

impl HarvestConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from defaults plus whatever `lookup` returns for the
    /// `FORMD_*`, `USER_AGENT` and `EDGAR_DATA_URL` keys.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(ciks) = lookup("FORMD_CIKS") {
            config.ciks = parse_ciks(&split_list(&ciks)).context("FORMD_CIKS")?;
        }
        if let Some(output) = lookup("FORMD_OUTPUT") {
            config.output_path = PathBuf::from(output);
        }
        if let Some(timeout) = lookup("FORMD_TIMEOUT_SECS") {
            let secs: u64 = timeout
                .trim()
                .parse()
                .map_err(|e| anyhow!("FORMD_TIMEOUT_SECS is not a number of seconds: {}", e))?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(user_agent) = lookup("USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(data_url) = lookup("EDGAR_DATA_URL") {
            config.data_url = Url::parse(&data_url)
                .map_err(|e| anyhow!("EDGAR_DATA_URL is not a valid URL: {}", e))?;
        }
        if let Some(forms) = lookup("FORMD_FORMS") {
            config.forms = parse_forms(&split_list(&forms)).context("FORMD_FORMS")?;
        }

        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self> {
        if !overrides.ciks.is_empty() {
            let ciks: Vec<String> = overrides.ciks.iter().flat_map(|c| split_list(c)).collect();
            self.ciks = parse_ciks(&ciks)?;
        }
        if let Some(output) = overrides.output_path {
            self.output_path = output;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(user_agent) = overrides.user_agent {
            self.user_agent = user_agent;
        }
        if !overrides.forms.is_empty() {
            let forms: Vec<String> = overrides.forms.iter().flat_map(|f| split_list(f)).collect();
            self.forms = parse_forms(&forms)?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ciks.is_empty() {
            return Err(anyhow!(
                "no CIKs configured; pass --cik or set FORMD_CIKS"
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(anyhow!("request timeout must be greater than zero"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(anyhow!("USER_AGENT cannot be empty; EDGAR rejects anonymous clients"));
        }
        if self.forms.is_empty() {
            return Err(anyhow!("at least one form type must be selected"));
        }
        Ok(())
    }
}
