//! Spreadsheet day-count (serial) date conversion

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Serial 60 is the fictitious 1900-02-29 that legacy spreadsheets count.
const PHANTOM_LEAP_DAY: i64 = 60;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Day 1 of the short (pre-March 1900) count is 1900-01-01.
fn early_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 31)
}

/// From 1900-03-01 onward the phantom leap day shifts the count by one.
fn epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

/// Convert a serial day count to a date-time.
///
/// The integer part counts days (day 1 = 1900-01-01, including the
/// non-existent 1900-02-29); the fractional part is the time of day, rounded
/// to the second. Serial 60 has no calendar date and yields `None`.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    let days = serial.floor() as i64;
    let seconds = ((serial - serial.floor()) * SECONDS_PER_DAY).round() as i64;

    let base = match days {
        PHANTOM_LEAP_DAY => return None,
        d if d < PHANTOM_LEAP_DAY => early_epoch()?,
        _ => epoch()?,
    };

    let date = base.checked_add_signed(Duration::try_days(days)?)?;
    date.and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::try_seconds(seconds)?)
}

/// Convert a date-time to its serial day count
pub fn datetime_to_serial(dt: NaiveDateTime) -> Option<f64> {
    let date = dt.date();
    let march_first_1900 = NaiveDate::from_ymd_opt(1900, 3, 1)?;
    let base = if date < march_first_1900 {
        early_epoch()?
    } else {
        epoch()?
    };

    let days = (date - base).num_days();
    let seconds = (dt.time() - NaiveTime::MIN).num_seconds();
    Some(days as f64 + seconds as f64 / SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_known_serials() {
        assert_eq!(serial_to_datetime(1.0), Some(ymd(1900, 1, 1)));
        assert_eq!(serial_to_datetime(59.0), Some(ymd(1900, 2, 28)));
        assert_eq!(serial_to_datetime(61.0), Some(ymd(1900, 3, 1)));
        assert_eq!(serial_to_datetime(44562.0), Some(ymd(2022, 1, 1)));
        assert_eq!(serial_to_datetime(44941.0), Some(ymd(2023, 1, 15)));
    }

    #[test]
    fn test_phantom_leap_day_has_no_date() {
        assert_eq!(serial_to_datetime(60.0), None);
    }

    #[test]
    fn test_time_fraction() {
        let dt = serial_to_datetime(44941.5).unwrap();
        assert_eq!(dt, ymd(2023, 1, 15) + Duration::hours(12));
    }

    #[test]
    fn test_invalid_serials() {
        assert_eq!(serial_to_datetime(-1.0), None);
        assert_eq!(serial_to_datetime(f64::NAN), None);
        assert_eq!(serial_to_datetime(f64::INFINITY), None);
    }

    #[test]
    fn test_roundtrip() {
        for serial in [1.0, 59.0, 61.0, 1001.0, 44941.25, 49999.0] {
            let dt = serial_to_datetime(serial).unwrap();
            let back = datetime_to_serial(dt).unwrap();
            assert!((serial - back).abs() < 1e-6, "{serial} -> {dt} -> {back}");
        }
    }
}
