use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::clouds::describe_layers;
use crate::error::DecodeError;
use crate::models::{RawMetarFields, StationCode};
use crate::obs_time::resolve_observation_time;
use crate::units::{format_temperature, resolve_pressure, resolve_visibility};
use crate::utils::escape_html;

pub const UNAVAILABLE: &str = "data unavailable";

pub const LABEL_RAW: &str = "Raw report";
pub const LABEL_WIND: &str = "Wind";
pub const LABEL_TEMPERATURE: &str = "Temperature";
pub const LABEL_VISIBILITY: &str = "Visibility";
pub const LABEL_PRESSURE: &str = "Pressure";
pub const LABEL_CLOUDS: &str = "Clouds";
pub const LABEL_TIME_UTC: &str = "Observation time (UTC)";
pub const LABEL_TIME_LOCAL: &str = "Local time (Martinique)";

// labels of a report, in output order
pub const REPORT_LABELS: [&str; 8] = [
    LABEL_RAW,
    LABEL_WIND,
    LABEL_TEMPERATURE,
    LABEL_VISIBILITY,
    LABEL_PRESSURE,
    LABEL_CLOUDS,
    LABEL_TIME_UTC,
    LABEL_TIME_LOCAL,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedField {
    pub label: &'static str,
    pub text: Option<String>,
}

impl DecodedField {
    fn from_result(label: &'static str, result: Result<String, DecodeError>) -> Self {
        match result {
            Ok(text) => Self {
                label,
                text: Some(text),
            },
            Err(e) => {
                debug!(field = label, error = %e, "field unavailable");
                Self { label, text: None }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.text.is_some()
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or(UNAVAILABLE)
    }
}

impl fmt::Display for DecodedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.text())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetarReport {
    fields: [DecodedField; 8],
}

impl MetarReport {
    pub fn fields(&self) -> &[DecodedField] {
        &self.fields
    }

    pub fn field(&self, label: &str) -> Option<&DecodedField> {
        self.fields.iter().find(|f| f.label == label)
    }

    // lines joined with <br> for embedding in a page
    pub fn to_html(&self) -> String {
        self.fields
            .iter()
            .map(|f| format!("{}: {}", escape_html(f.label), escape_html(f.text())))
            .collect::<Vec<_>>()
            .join("<br>")
    }

    // newline separated lines for the downloadable text file
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for field in &self.fields {
            out.push_str(&field.to_string());
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for MetarReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_plain_text())
    }
}

// decodes a report using the current time as the date anchor
pub fn decode(fields: &RawMetarFields, station: &StationCode) -> MetarReport {
    decode_at(fields, station, Utc::now())
}

// decodes against an explicit anchor; broken fields come out as unavailable lines
pub fn decode_at(
    fields: &RawMetarFields,
    station: &StationCode,
    anchor: DateTime<Utc>,
) -> MetarReport {
    let time = required(&fields.time, "time")
        .and_then(|code| resolve_observation_time(code, anchor));
    let (utc, local) = match time {
        Ok(t) => (Ok(t.utc_text()), Ok(t.local_text())),
        Err(e) => (Err(e.clone()), Err(e)),
    };

    MetarReport {
        fields: [
            DecodedField::from_result(LABEL_RAW, decode_raw(fields)),
            DecodedField::from_result(LABEL_WIND, decode_wind(fields)),
            DecodedField::from_result(LABEL_TEMPERATURE, decode_temperature(fields)),
            DecodedField::from_result(
                LABEL_VISIBILITY,
                required(&fields.visibility, "visibility")
                    .and_then(|repr| resolve_visibility(repr, station)),
            ),
            DecodedField::from_result(
                LABEL_PRESSURE,
                required(&fields.altimeter, "pressure").and_then(resolve_pressure),
            ),
            DecodedField::from_result(LABEL_CLOUDS, describe_layers(&fields.clouds)),
            DecodedField::from_result(LABEL_TIME_UTC, utc),
            DecodedField::from_result(LABEL_TIME_LOCAL, local),
        ],
    }
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, DecodeError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DecodeError::missing(field)),
    }
}

fn decode_raw(fields: &RawMetarFields) -> Result<String, DecodeError> {
    let raw = fields.raw.trim();
    if raw.is_empty() {
        return Err(DecodeError::missing("raw report"));
    }
    Ok(raw.to_string())
}

// direction and speed are reported exactly as given, speed in knots
fn decode_wind(fields: &RawMetarFields) -> Result<String, DecodeError> {
    let direction = required(&fields.wind_direction, "wind direction")?;
    let speed = required(&fields.wind_speed, "wind speed")?;

    let mut text = if direction == "VRB" {
        format!("variable at {} knots", speed)
    } else {
        format!("from {}° at {} knots", direction, speed)
    };
    if let Ok(gust) = required(&fields.wind_gust, "wind gust") {
        text.push_str(&format!(", gusting to {} knots", gust));
    }
    Ok(text)
}

fn decode_temperature(fields: &RawMetarFields) -> Result<String, DecodeError> {
    let temperature = format_temperature(required(&fields.temperature, "temperature")?)?;
    let dewpoint = format_temperature(required(&fields.dewpoint, "dew point")?)?;
    Ok(format!("{}°C, dew point {}°C", temperature, dewpoint))
}

// heading shown above a report, e.g. "TFFF - Martinique Aimé Césaire"
pub fn report_title(station: &StationCode, airport: Option<&str>) -> String {
    match airport {
        Some(name) => format!("{} - {}", station, name),
        None => station.to_string(),
    }
}
