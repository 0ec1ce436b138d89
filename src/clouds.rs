use tracing::debug;

use crate::error::DecodeError;
use crate::models::CloudLayer;

pub const CLEAR_SKY: &str = "clear sky";

// coverage codes and what they mean, in eighths of sky covered
pub const COVERAGE_TABLE: &[(&str, &str)] = &[
    ("FEW", "few clouds (1-2/8 sky covered)"),
    ("SCT", "scattered clouds (3-4/8 sky covered)"),
    ("BKN", "broken clouds (5-7/8 sky covered)"),
    ("OVC", "overcast (8/8 sky covered)"),
];

pub fn coverage_phrase(code: &str) -> Option<&'static str> {
    COVERAGE_TABLE
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, phrase)| *phrase)
}

// describes one layer, Ok(None) means it has no coverage code and is left out
pub fn describe_layer(layer: &CloudLayer) -> Result<Option<String>, DecodeError> {
    let code = match layer.coverage.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => code,
        _ => return Ok(None),
    };

    let mut phrase = match coverage_phrase(code) {
        Some(p) => p.to_string(),
        None => format!("unspecified coverage ({})", code),
    };

    if let Some(base) = layer.base {
        let feet = base
            .checked_mul(100)
            .ok_or(DecodeError::Overflow { field: "cloud base" })?;
        phrase.push_str(&format!(", at an altitude of {} feet", feet));
    }

    Ok(Some(phrase))
}

// joins every describable layer into one sentence. a failing layer is skipped;
// the field only fails when no reported layer could be described
pub fn describe_layers(layers: &[CloudLayer]) -> Result<String, DecodeError> {
    if layers.is_empty() {
        return Ok(CLEAR_SKY.to_string());
    }

    let phrases: Vec<String> = layers
        .iter()
        .filter_map(|layer| match describe_layer(layer) {
            Ok(phrase) => phrase,
            Err(e) => {
                debug!(?layer, error = %e, "skipping cloud layer");
                None
            }
        })
        .collect();

    if phrases.is_empty() {
        return Err(DecodeError::malformed(
            "clouds",
            format!("{} unreadable layer(s)", layers.len()),
        ));
    }
    Ok(phrases.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_empty_is_clear_sky() {
        assert_eq!(describe_layers(&[]).unwrap(), "clear sky");
    }

    #[test]
    fn test_broken_layer_with_base() {
        let text = describe_layers(&[CloudLayer::new("BKN", Some(30))]).unwrap();
        assert!(text.contains("broken clouds"));
        assert!(text.contains("3000 feet"));
    }

    #[rstest]
    #[case("FEW", "few clouds")]
    #[case("SCT", "scattered clouds")]
    #[case("BKN", "broken clouds")]
    #[case("OVC", "overcast")]
    fn test_coverage_table(#[case] code: &str, #[case] expected: &str) {
        assert!(coverage_phrase(code).unwrap().starts_with(expected));
    }

    #[test]
    fn test_unknown_code_without_base() {
        assert_eq!(
            describe_layers(&[CloudLayer::new("VV", None)]).unwrap(),
            "unspecified coverage (VV)"
        );
    }

    #[test]
    fn test_layers_joined_in_order() {
        let layers = vec![
            CloudLayer::new("FEW", Some(15)),
            CloudLayer::new("OVC", Some(80)),
        ];
        assert_eq!(
            describe_layers(&layers).unwrap(),
            "few clouds (1-2/8 sky covered), at an altitude of 1500 feet, \
             overcast (8/8 sky covered), at an altitude of 8000 feet"
        );
    }

    #[test]
    fn test_layer_without_code_is_skipped() {
        let layers = vec![
            CloudLayer {
                coverage: None,
                base: Some(20),
            },
            CloudLayer::new("SCT", None),
        ];
        assert_eq!(
            describe_layers(&layers).unwrap(),
            "scattered clouds (3-4/8 sky covered)"
        );
    }

    #[test]
    fn test_bad_layer_does_not_abort_siblings() {
        let layers = vec![
            CloudLayer::new("BKN", Some(u32::MAX)),
            CloudLayer::new("FEW", Some(25)),
        ];
        assert_eq!(
            describe_layers(&layers).unwrap(),
            "few clouds (1-2/8 sky covered), at an altitude of 2500 feet"
        );
    }

    #[test]
    fn test_all_layers_unusable_fails() {
        let layers = vec![
            CloudLayer {
                coverage: Some("  ".into()),
                base: None,
            },
            CloudLayer::new("OVC", Some(u32::MAX)),
        ];
        assert!(describe_layers(&layers).is_err());
    }
}
