use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::services::MetarSource;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn MetarSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn MetarSource>) -> Self {
        Self { source }
    }
}

#[derive(Deserialize)]
pub struct MetarQuery {
    pub icao: String,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub station: String,
    pub airport: Option<&'static str>,
    pub lines: Vec<LineResponse>,
}

#[derive(Debug, Serialize)]
pub struct LineResponse {
    pub label: &'static str,
    pub text: String,
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// 4 character icao station identifier, upper-cased
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StationCode(String);

impl StationCode {
    // trims and upper-cases input, then checks for exactly four ascii letters or digits
    pub fn parse(input: &str) -> Result<Self, SourceError> {
        let code = input.trim().to_ascii_uppercase();
        if code.len() != 4 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(SourceError::InvalidStationCode(input.trim().to_string()));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    // first letter of the code, used as a region hint
    pub fn prefix(&self) -> char {
        self.0.chars().next().unwrap_or(' ')
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// one cloud group from the report, base is in hundreds of feet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloudLayer {
    pub coverage: Option<String>,
    pub base: Option<u32>,
}

impl CloudLayer {
    pub fn new(coverage: &str, base: Option<u32>) -> Self {
        Self {
            coverage: Some(coverage.to_string()),
            base,
        }
    }
}

// tokenized fields of a single report, still as raw text. anything not found is None
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMetarFields {
    pub wind_direction: Option<String>,
    pub wind_speed: Option<String>,
    pub wind_gust: Option<String>,
    pub temperature: Option<String>,
    pub dewpoint: Option<String>,
    pub visibility: Option<String>,
    pub altimeter: Option<String>,
    pub time: Option<String>,
    pub clouds: Vec<CloudLayer>,
    pub raw: String,
}
