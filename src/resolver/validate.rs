use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Magnitude must be between 0 and 10")]
    Magnitude(f64),
    #[error("Invalid date format")]
    Date(String),
    #[error("{0} cannot be null")]
    Null(&'static str),
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

pub fn magnitude(magnitude: f64) -> Result<f64, ValidationError> {
    if (0.0..=10.0).contains(&magnitude) {
        Ok(magnitude)
    } else {
        Err(ValidationError::Magnitude(magnitude))
    }
}

pub fn date(date: &str) -> Result<DateTime<Utc>, ValidationError> {
    parse_date(date).ok_or_else(|| ValidationError::Date(date.to_owned()))
}

/// parses ISO-8601 timestamps, naive timestamps and plain dates, naive values are taken as UTC
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = NAIVE_FORMATS.iter().find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok()) {
        return Some(dt.and_utc());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn to_iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn now() -> String {
    to_iso(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn magnitude_bounds() {
        assert_eq!(super::magnitude(0.0), Ok(0.0));
        assert_eq!(super::magnitude(10.0), Ok(10.0));
        assert_eq!(super::magnitude(-0.1), Err(ValidationError::Magnitude(-0.1)));
        assert!(super::magnitude(11.0).is_err());
        assert!(super::magnitude(f64::NAN).is_err());
        assert_eq!(super::magnitude(11.0).unwrap_err().to_string(), "Magnitude must be between 0 and 10");
    }

    #[test]
    fn accepted_dates() {
        for s in [
            "2024-01-01T00:00:00.000Z",
            "2024-01-01T00:00:00Z",
            "2024-01-01T02:00:00+02:00",
            "2024-01-01T00:00:00",
            "2024-01-01T00:00",
            "2024-01-01 00:00:00",
            "2024-01-01",
            "2024/01/01 00:00:00.00",
            "2024/01/01",
        ] {
            let dt = super::date(s).unwrap();
            assert_eq!(super::to_iso(dt), "2024-01-01T00:00:00.000Z", "{s}");
        }
    }

    #[test]
    fn rejected_dates() {
        for s in ["", "not a date", "2024-13-01", "2024-02-30", "01/02/2024", "2024/13/01"] {
            assert_eq!(super::date(s), Err(ValidationError::Date(s.to_owned())));
        }
        assert_eq!(super::date("yesterday").unwrap_err().to_string(), "Invalid date format");
    }

    #[test]
    fn now_is_parseable() {
        assert!(super::parse_date(&super::now()).is_some());
    }
}
