use thiserror::Error;

// why a single report field could not be turned into a sentence.
// these never leave the decoder
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{field} is missing from the report")]
    Missing { field: &'static str },

    #[error("{field} value '{value}' could not be parsed")]
    Malformed { field: &'static str, value: String },

    #[error("{field} value '{value}' is out of range")]
    OutOfRange { field: &'static str, value: String },

    #[error("day {day} does not exist in {year}-{month:02}")]
    InvalidDate { day: u32, month: u32, year: i32 },

    #[error("{field} overflowed while converting units")]
    Overflow { field: &'static str },
}

impl DecodeError {
    pub fn missing(field: &'static str) -> Self {
        Self::Missing { field }
    }

    pub fn malformed(field: &'static str, value: impl Into<String>) -> Self {
        Self::Malformed {
            field,
            value: value.into(),
        }
    }

    pub fn out_of_range(field: &'static str, value: impl Into<String>) -> Self {
        Self::OutOfRange {
            field,
            value: value.into(),
        }
    }
}

// failures before decoding starts: bad user input or upstream trouble
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid station code '{0}'")]
    InvalidStationCode(String),

    #[error("no METAR available for station {0}")]
    UnknownStation(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl SourceError {
    // text shown to the person who asked for the report
    pub fn user_message(&self) -> String {
        match self {
            SourceError::InvalidStationCode(_) => {
                "ICAO codes should be 4 characters (e.g., TFFF, KJFK, LFPG)".to_string()
            }
            SourceError::UnknownStation(code) => {
                format!("The code {} is invalid or not recognized", code)
            }
            SourceError::Upstream(msg) => format!("Error fetching METAR: {}", msg),
            SourceError::Request(e) => format!("Error fetching METAR: {}", e),
        }
    }
}
