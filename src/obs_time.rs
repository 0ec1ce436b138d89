use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Utc};

use crate::error::DecodeError;

// martinique is UTC-4 all year round
pub const LOCAL_ZONE_NAME: &str = "Martinique";
pub const LOCAL_OFFSET: FixedOffset = match FixedOffset::west_opt(4 * 3600) {
    Some(offset) => offset,
    None => panic!("local offset out of range"),
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationTime {
    pub utc: DateTime<Utc>,
    pub local: DateTime<FixedOffset>,
}

impl ObservationTime {
    pub fn utc_text(&self) -> String {
        format!("{} UTC", self.utc.format(TIMESTAMP_FORMAT))
    }

    pub fn local_text(&self) -> String {
        format!("{} (local time)", self.local.format(TIMESTAMP_FORMAT))
    }
}

// parses a DDHHMM code (trailing Z tolerated) using the anchor's year and month.
// no rollover: a day missing from the anchor's month is an error
pub fn resolve_observation_time(
    code: &str,
    anchor: DateTime<Utc>,
) -> Result<ObservationTime, DecodeError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(DecodeError::missing("time"));
    }

    let digits = code.strip_suffix('Z').unwrap_or(code);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::malformed("time", code));
    }

    let day = parse_component(&digits[0..2], 1..=31, code)?;
    let hour = parse_component(&digits[2..4], 0..=23, code)?;
    let minute = parse_component(&digits[4..6], 0..=59, code)?;

    let utc = Utc
        .with_ymd_and_hms(anchor.year(), anchor.month(), day, hour, minute, 0)
        .single()
        .ok_or(DecodeError::InvalidDate {
            day,
            month: anchor.month(),
            year: anchor.year(),
        })?;

    Ok(ObservationTime {
        utc,
        local: utc.with_timezone(&LOCAL_OFFSET),
    })
}

fn parse_component(
    text: &str,
    range: std::ops::RangeInclusive<u32>,
    code: &str,
) -> Result<u32, DecodeError> {
    let value: u32 = text
        .parse()
        .map_err(|_| DecodeError::malformed("time", code))?;
    if !range.contains(&value) {
        return Err(DecodeError::out_of_range("time", code));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn anchor(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 18, 45, 12).unwrap()
    }

    #[test]
    fn test_mid_month() {
        let t = resolve_observation_time("151230", anchor(2024, 5, 20)).unwrap();
        assert_eq!(t.utc_text(), "2024-05-15 12:30:00 UTC");
        assert_eq!(t.local_text(), "2024-05-15 08:30:00 (local time)");
    }

    #[test]
    fn test_local_crosses_midnight() {
        let t = resolve_observation_time("150230", anchor(2024, 5, 20)).unwrap();
        assert_eq!(t.utc_text(), "2024-05-15 02:30:00 UTC");
        assert_eq!(t.local_text(), "2024-05-14 22:30:00 (local time)");
    }

    #[test]
    fn test_trailing_z_accepted() {
        let t = resolve_observation_time("010000Z", anchor(2024, 1, 1)).unwrap();
        assert_eq!(t.local_text(), "2023-12-31 20:00:00 (local time)");
    }

    #[test]
    fn test_seconds_are_zeroed() {
        let t = resolve_observation_time("201845", anchor(2024, 5, 20)).unwrap();
        assert_eq!(t.utc, Utc.with_ymd_and_hms(2024, 5, 20, 18, 45, 0).unwrap());
    }

    // No rollover: the day is placed in the anchor's month even when the
    // report was clearly filed in the previous one.
    #[test]
    fn test_previous_month_report_stays_in_anchor_month() {
        let t = resolve_observation_time("312350", anchor(2024, 8, 1)).unwrap();
        assert_eq!(t.utc_text(), "2024-08-31 23:50:00 UTC");
    }

    #[test]
    fn test_day_missing_from_anchor_month_fails() {
        let err = resolve_observation_time("312350", anchor(2024, 4, 1)).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidDate {
                day: 31,
                month: 4,
                year: 2024
            }
        );
    }

    #[test]
    fn test_leap_day_depends_on_anchor_year() {
        assert!(resolve_observation_time("291200", anchor(2024, 2, 28)).is_ok());
        assert!(resolve_observation_time("291200", anchor(2023, 2, 28)).is_err());
    }

    #[test]
    fn test_first_of_month_read_on_last_day() {
        let t = resolve_observation_time("010030", anchor(2024, 1, 31)).unwrap();
        assert_eq!(t.utc_text(), "2024-01-01 00:30:00 UTC");
    }

    #[rstest]
    #[case("001230")]
    #[case("321230")]
    #[case("152430")]
    #[case("151260")]
    fn test_out_of_range(#[case] code: &str) {
        assert!(matches!(
            resolve_observation_time(code, anchor(2024, 5, 20)),
            Err(DecodeError::OutOfRange { .. })
        ));
    }

    #[rstest]
    #[case("1512")]
    #[case("15123")]
    #[case("AB1230")]
    #[case("1512300")]
    #[case("+51230")]
    fn test_malformed(#[case] code: &str) {
        assert!(matches!(
            resolve_observation_time(code, anchor(2024, 5, 20)),
            Err(DecodeError::Malformed { .. })
        ));
    }
}
