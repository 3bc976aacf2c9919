use chrono::{DateTime, Local, NaiveDate, SecondsFormat, TimeZone, Utc};

/// Fixed-point dollar amount: $1234.56
pub fn money(val: f64) -> String {
    if val < 0.0 {
        format!("-${:.2}", val.abs())
    } else {
        format!("${val:.2}")
    }
}

/// US-style calendar date in local time without zero padding: 1/5/2024
pub fn short_date(ts: &DateTime<Utc>) -> String {
    short_date_in(ts, &Local)
}

pub fn short_date_in<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format("%-m/%-d/%Y").to_string()
}

/// Storage form of a timestamp: 2024-01-05T00:00:00.000Z
pub fn iso_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp, or a bare YYYY-MM-DD as local midnight.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    parse_timestamp_in(s, &Local)
}

pub fn parse_timestamp_in<Tz: TimeZone>(s: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    let midnight = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "$1234.56");
        assert_eq!(money(-500.00), "-$500.00");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(1000000.99), "$1000000.99");
        assert_eq!(money(20.99), "$20.99");
        assert_eq!(money(40.0), "$40.00");
    }

    #[test]
    fn test_short_date_has_no_padding() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 5, 18, 30, 0).unwrap();
        assert_eq!(short_date_in(&ts, &Utc), "1/5/2024");
    }

    #[test]
    fn test_short_date_uses_the_given_zone() {
        // 02:30 UTC is still the previous evening five hours west.
        let ts = Utc.with_ymd_and_hms(2024, 1, 6, 2, 30, 0).unwrap();
        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(short_date_in(&ts, &west), "1/5/2024");
        assert_eq!(short_date_in(&ts, &Utc), "1/6/2024");
    }

    #[test]
    fn test_iso_timestamp_uses_millis_and_z() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(iso_timestamp(&ts), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_parse_timestamp_accepts_rfc3339_and_dates() {
        let expected = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp_in("2024-02-01T00:00:00.000Z", &Utc), Some(expected));
        assert_eq!(parse_timestamp_in("2024-02-01", &Utc), Some(expected));
        assert_eq!(parse_timestamp_in("2024-02-01T05:00:00+05:00", &Utc), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_bare_date_is_midnight_in_the_given_zone() {
        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        let ts = parse_timestamp_in("2024-02-01", &west).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 2, 1, 5, 0, 0).unwrap());
        assert_eq!(short_date_in(&ts, &west), "2/1/2024");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
