use crate::error::DecodeError;
use crate::models::StationCode;

pub const CAVOK_PHRASE: &str =
    "CAVOK (no significant phenomena, visibility greater than 10 km)";

const METERS_PER_MILE: f64 = 1609.34;

// unit a region reports bare-number visibilities in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceUnit {
    StatuteMiles,
    Kilometers,
}

#[derive(Debug, Clone, Copy)]
pub struct UnitRegion {
    pub prefix: char,
    pub name: &'static str,
    pub visibility: DistanceUnit,
}

// regions that read visibility in statute miles, everyone else gets km
pub const MILE_REGIONS: &[UnitRegion] = &[
    UnitRegion {
        prefix: 'K',
        name: "United States",
        visibility: DistanceUnit::StatuteMiles,
    },
    UnitRegion {
        prefix: 'C',
        name: "Canada",
        visibility: DistanceUnit::StatuteMiles,
    },
];

pub fn region_for(station: &StationCode) -> Option<&'static UnitRegion> {
    let prefix = station.prefix();
    MILE_REGIONS.iter().find(|r| r.prefix == prefix)
}

pub fn visibility_unit(station: &StationCode) -> DistanceUnit {
    region_for(station)
        .map(|r| r.visibility)
        .unwrap_or(DistanceUnit::Kilometers)
}

// turns a visibility group into a sentence with an explicit unit.
// bare integers are meters, SM values are already statute miles
pub fn resolve_visibility(repr: &str, station: &StationCode) -> Result<String, DecodeError> {
    let repr = repr.trim();
    if repr.is_empty() {
        return Err(DecodeError::missing("visibility"));
    }

    if repr == "CAVOK" {
        return Ok(CAVOK_PHRASE.to_string());
    }

    if repr.contains("SM") {
        return resolve_statute_miles(&repr.replace("SM", ""))
            .ok_or_else(|| DecodeError::malformed("visibility", repr));
    }

    if let Ok(meters) = repr.parse::<u64>() {
        let meters = meters as f64;
        return Ok(match visibility_unit(station) {
            DistanceUnit::StatuteMiles => format!("{:.2} miles", meters / METERS_PER_MILE),
            DistanceUnit::Kilometers => format!("{:.2} km", meters / 1000.0),
        });
    }

    // a number we can read but whose unit we can't guess
    match repr.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(format!("{} (unit unspecified)", repr)),
        _ => Err(DecodeError::malformed("visibility", repr)),
    }
}

// handles "3", "1/2", "1 1/2" and the P (more than) / M (less than) markers
fn resolve_statute_miles(value: &str) -> Option<String> {
    let value = value.trim();
    let (qualifier, number) = if let Some(rest) = value.strip_prefix('P') {
        ("more than ", rest)
    } else if let Some(rest) = value.strip_prefix('M') {
        ("less than ", rest)
    } else {
        ("", value)
    };

    let miles = parse_miles(number)?;
    Some(format!("{}{:.2} miles", qualifier, miles))
}

fn parse_miles(number: &str) -> Option<f64> {
    let mut total = 0.0;
    let mut parts = 0;
    for part in number.split_whitespace() {
        parts += 1;
        total += match part.split_once('/') {
            Some((num, den)) => {
                let num: f64 = num.parse().ok()?;
                let den: f64 = den.parse().ok()?;
                if den == 0.0 {
                    return None;
                }
                num / den
            }
            None => part.parse::<f64>().ok()?,
        };
    }

    if parts == 0 || !total.is_finite() || total < 0.0 {
        return None;
    }
    Some(total)
}

// altimeter setting: Q is hectopascals, A is inches of mercury, digits as given
pub fn resolve_pressure(repr: &str) -> Result<String, DecodeError> {
    let repr = repr.trim();
    if repr.is_empty() {
        return Err(DecodeError::missing("pressure"));
    }

    let (value, unit) = if let Some(v) = repr.strip_prefix('Q') {
        (v, "hPa")
    } else if let Some(v) = repr.strip_prefix('A') {
        (v, "inHg")
    } else {
        return Ok(format!("{} (unit unspecified)", repr));
    };

    if value.is_empty() {
        return Err(DecodeError::malformed("pressure", repr));
    }
    Ok(format!("{} {}", value, unit))
}

// M marks a negative value, M05 becomes -05
pub fn format_temperature(repr: &str) -> Result<String, DecodeError> {
    let repr = repr.trim();
    if repr.is_empty() {
        return Err(DecodeError::missing("temperature"));
    }

    match repr.strip_prefix('M') {
        Some("") => Err(DecodeError::malformed("temperature", repr)),
        Some(rest) => Ok(format!("-{}", rest)),
        None => Ok(repr.to_string()),
    }
}
