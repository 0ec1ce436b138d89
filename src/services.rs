use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace, warn};

use crate::error::SourceError;
use crate::models::{CloudLayer, RawMetarFields, StationCode};

pub const DEFAULT_UPSTREAM_URL: &str = "https://aviationweather.gov/api/data/metar";

// groups after these are forecast, not observation
const TREND_MARKERS: &[&str] = &["TEMPO", "BECMG", "NOSIG"];

// where raw metar text comes from
#[async_trait]
pub trait MetarSource: Send + Sync {
    async fn fetch(&self, station: &StationCode) -> Result<String, SourceError>;
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

// fetches raw reports from the aviation weather api
pub struct HttpMetarSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMetarSource {
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl MetarSource for HttpMetarSource {
    async fn fetch(&self, station: &StationCode) -> Result<String, SourceError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("ids", station.as_str()), ("format", "raw")])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(station = %station, status = %response.status(), "upstream refused request");
            return Err(SourceError::Upstream(format!(
                "Failed to fetch data: {}",
                response.status()
            )));
        }

        let text = response.text().await?;
        first_report(&text).ok_or_else(|| SourceError::UnknownStation(station.to_string()))
    }
}

// the api may return several reports, newest first
fn first_report(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

// splits a raw report into the fields the decoder needs. unknown groups are
// skipped; reading stops at remarks or the first trend group
pub fn tokenize_metar(raw: &str) -> RawMetarFields {
    let mut fields = RawMetarFields {
        raw: raw.trim().to_string(),
        ..Default::default()
    };

    let parts: Vec<&str> = raw.split_whitespace().collect();
    let mut i = 0;

    // skip the "METAR" or "SPECI" prefix if it's there
    if i < parts.len() && (parts[i] == "METAR" || parts[i] == "SPECI") {
        i += 1;
    }

    // station code
    if i < parts.len() && parts[i].len() == 4 {
        i += 1;
    }

    while i < parts.len() {
        let part = parts[i];

        if part == "RMK" || TREND_MARKERS.contains(&part) {
            break;
        }

        // "1 1/2SM" is split over two groups
        if fields.visibility.is_none() && is_whole_miles(part) {
            if let Some(next) = parts.get(i + 1) {
                if next.ends_with("SM") && next.contains('/') {
                    fields.visibility = Some(format!("{} {}", part, next));
                    i += 2;
                    continue;
                }
            }
        }

        if fields.time.is_none() {
            if let Some(time) = parse_time_group(part) {
                fields.time = Some(time);
                i += 1;
                continue;
            }
        }

        if fields.wind_direction.is_none() {
            if let Some((direction, speed, gust)) = parse_wind_group(part) {
                fields.wind_direction = Some(direction);
                fields.wind_speed = Some(speed);
                fields.wind_gust = gust;
                i += 1;
                continue;
            }
        }

        if fields.visibility.is_none() && is_visibility_group(part) {
            fields.visibility = Some(part.to_string());
            i += 1;
            continue;
        }

        if let Some(layer) = parse_cloud_group(part) {
            fields.clouds.push(layer);
            i += 1;
            continue;
        }

        if fields.temperature.is_none() {
            if let Some((temperature, dewpoint)) = parse_temperature_group(part) {
                fields.temperature = Some(temperature);
                fields.dewpoint = dewpoint;
                i += 1;
                continue;
            }
        }

        if fields.altimeter.is_none() && is_altimeter_group(part) {
            fields.altimeter = Some(part.to_string());
            i += 1;
            continue;
        }

        trace!(group = part, "skipping group");
        i += 1;
    }

    debug!(
        layers = fields.clouds.len(),
        has_time = fields.time.is_some(),
        "tokenized metar"
    );
    fields
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_whole_miles(part: &str) -> bool {
    part.len() <= 2 && all_digits(part)
}

// "151230Z" -> "151230"
fn parse_time_group(part: &str) -> Option<String> {
    let digits = part.strip_suffix('Z')?;
    if digits.len() == 6 && all_digits(digits) {
        Some(digits.to_string())
    } else {
        None
    }
}

// "27015G25KT" -> ("270", "15", Some("25")), "VRB03KT" -> ("VRB", "03", None)
fn parse_wind_group(part: &str) -> Option<(String, String, Option<String>)> {
    let body = part.strip_suffix("KT")?;
    let direction = body.get(0..3)?;
    if direction != "VRB" && !all_digits(direction) {
        return None;
    }

    let rest = body.get(3..)?;
    let (speed, gust) = match rest.split_once('G') {
        Some((speed, gust)) => (speed, Some(gust)),
        None => (rest, None),
    };
    if !(2..=3).contains(&speed.len()) || !all_digits(speed) {
        return None;
    }
    if let Some(gust) = gust {
        if !all_digits(gust) {
            return None;
        }
    }

    Some((
        direction.to_string(),
        speed.to_string(),
        gust.map(str::to_string),
    ))
}

fn is_visibility_group(part: &str) -> bool {
    part == "CAVOK" || part.ends_with("SM") || (part.len() == 4 && all_digits(part))
}

// "BKN030CB" -> BKN at 30, "VV002" -> VV at 2, "FEW///" -> FEW with no base
fn parse_cloud_group(part: &str) -> Option<CloudLayer> {
    let (coverage, rest) = if part.starts_with("VV") {
        ("VV", part.get(2..)?)
    } else {
        let code = part.get(0..3)?;
        if !["FEW", "SCT", "BKN", "OVC"].contains(&code) {
            return None;
        }
        (code, part.get(3..)?)
    };

    let base = rest.get(0..3).filter(|b| all_digits(b)).and_then(|b| b.parse().ok());
    Some(CloudLayer::new(coverage, base))
}

// "28/M02" -> ("28", Some("M02")), "M05/" -> ("M05", None)
fn parse_temperature_group(part: &str) -> Option<(String, Option<String>)> {
    let (temperature, dewpoint) = part.split_once('/')?;
    if !is_temperature(temperature) {
        return None;
    }
    let dewpoint = if is_temperature(dewpoint) {
        Some(dewpoint.to_string())
    } else if dewpoint.is_empty() || dewpoint.chars().all(|c| c == '/') {
        None
    } else {
        return None;
    };
    Some((temperature.to_string(), dewpoint))
}

fn is_temperature(value: &str) -> bool {
    let digits = value.strip_prefix('M').unwrap_or(value);
    (1..=2).contains(&digits.len()) && all_digits(digits)
}

fn is_altimeter_group(part: &str) -> bool {
    (part.starts_with('Q') || part.starts_with('A'))
        && part.len() == 5
        && all_digits(&part[1..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tokenize_martinique() {
        let raw = "METAR TFFF 151230Z 09012KT 9999 FEW020 BKN030 28/M02 Q1015 NOSIG";
        let fields = tokenize_metar(raw);
        assert_eq!(
            fields,
            RawMetarFields {
                wind_direction: Some("090".into()),
                wind_speed: Some("12".into()),
                wind_gust: None,
                temperature: Some("28".into()),
                dewpoint: Some("M02".into()),
                visibility: Some("9999".into()),
                altimeter: Some("Q1015".into()),
                time: Some("151230".into()),
                clouds: vec![
                    CloudLayer::new("FEW", Some(20)),
                    CloudLayer::new("BKN", Some(30)),
                ],
                raw: raw.into(),
            }
        );
    }

    #[test]
    fn test_tokenize_us_report_with_remarks() {
        let raw = "KJFK 201751Z 27015G25KT 1 1/2SM -RA BR OVC008 M05/M08 A2992 RMK AO2 SLP132 T00110006";
        let fields = tokenize_metar(raw);
        assert_eq!(fields.time.as_deref(), Some("201751"));
        assert_eq!(fields.wind_direction.as_deref(), Some("270"));
        assert_eq!(fields.wind_speed.as_deref(), Some("15"));
        assert_eq!(fields.wind_gust.as_deref(), Some("25"));
        assert_eq!(fields.visibility.as_deref(), Some("1 1/2SM"));
        assert_eq!(fields.clouds, vec![CloudLayer::new("OVC", Some(8))]);
        assert_eq!(fields.temperature.as_deref(), Some("M05"));
        assert_eq!(fields.dewpoint.as_deref(), Some("M08"));
        assert_eq!(fields.altimeter.as_deref(), Some("A2992"));
    }

    #[test]
    fn test_tokenize_cavok_and_variable_wind() {
        let fields = tokenize_metar("LFPG 010000Z VRB03KT CAVOK 12/08 Q1021");
        assert_eq!(fields.wind_direction.as_deref(), Some("VRB"));
        assert_eq!(fields.visibility.as_deref(), Some("CAVOK"));
        assert!(fields.clouds.is_empty());
    }

    #[test]
    fn test_tokenize_missing_groups_stay_absent() {
        let fields = tokenize_metar("TFFF 151230Z AUTO ///// //// NCD");
        assert_eq!(fields.time.as_deref(), Some("151230"));
        assert!(fields.wind_direction.is_none());
        assert!(fields.visibility.is_none());
        assert!(fields.temperature.is_none());
        assert!(fields.altimeter.is_none());
        assert!(fields.clouds.is_empty());
    }

    #[test]
    fn test_tokenize_stops_at_trend() {
        let fields =
            tokenize_metar("LFPG 151230Z 24008KT 9999 FEW030 18/12 Q1018 TEMPO 4000 SHRA BKN015CB");
        assert_eq!(fields.clouds, vec![CloudLayer::new("FEW", Some(30))]);
        assert_eq!(fields.visibility.as_deref(), Some("9999"));

        // a missing observed group is not filled in from the forecast
        let fields = tokenize_metar("TFFF 151230Z ///// //// NCD 28/22 Q1015 BECMG 09015KT 8000 SCT020");
        assert!(fields.wind_direction.is_none());
        assert!(fields.visibility.is_none());
        assert!(fields.clouds.is_empty());
        assert_eq!(fields.altimeter.as_deref(), Some("Q1015"));

        let fields = tokenize_metar("EGLL 151220Z 27010KT CAVOK 15/09 Q1020 NOSIG OVC010");
        assert!(fields.clouds.is_empty());
    }

    #[test]
    fn test_cloud_groups() {
        assert_eq!(parse_cloud_group("BKN030CB"), Some(CloudLayer::new("BKN", Some(30))));
        assert_eq!(parse_cloud_group("VV002"), Some(CloudLayer::new("VV", Some(2))));
        assert_eq!(parse_cloud_group("FEW///"), Some(CloudLayer::new("FEW", None)));
        assert_eq!(parse_cloud_group("NSC"), None);
        assert_eq!(parse_cloud_group("BR"), None);
    }

    #[test]
    fn test_temperature_groups() {
        assert_eq!(
            parse_temperature_group("M05/"),
            Some(("M05".to_string(), None))
        );
        assert_eq!(parse_temperature_group("1/2SM"), None);
        assert_eq!(parse_temperature_group("////"), None);
    }

    #[test]
    fn test_first_report() {
        assert_eq!(
            first_report("\n  TFFF 151230Z 09012KT\nTFFF 151200Z 09010KT\n").as_deref(),
            Some("TFFF 151230Z 09012KT")
        );
        assert_eq!(first_report("  \n"), None);
    }
}
