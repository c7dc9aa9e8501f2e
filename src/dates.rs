//! Calendar dates as they travel through forms, storage and views.

use time::macros::format_description;
use time::Date;

/// Parse a `YYYY-MM-DD` date as posted by an HTML date input.
pub fn parse_iso(value: &str) -> Option<Date> {
    Date::parse(value, format_description!("[year]-[month]-[day]")).ok()
}

/// Parse an optional form value: empty and malformed input both yield `None`.
pub fn parse_optional(value: Option<&str>) -> Option<Date> {
    value.filter(|v| !v.is_empty()).and_then(parse_iso)
}

pub fn to_iso(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

/// Human-readable form, e.g. `Oct 21, 1929`.
pub fn to_display(date: Date) -> String {
    date.format(format_description!(
        "[month repr:short] [day padding:none], [year]"
    ))
    .unwrap_or_default()
}

/// Serde adapter storing `Option<Date>` as an ISO string or null.
pub mod optional_iso {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_some(&super::to_iso(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.filter(|value| !value.is_empty())
            .map(|value| {
                super::parse_iso(&value)
                    .ok_or_else(|| D::Error::custom(format!("invalid date '{value}'")))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn iso_round_trip() {
        assert_eq!(parse_iso("1929-10-21"), Some(date!(1929 - 10 - 21)));
        assert_eq!(to_iso(date!(1929 - 10 - 21)), "1929-10-21");
        assert_eq!(parse_iso("1929-13-01"), None);
    }

    #[test]
    fn display_format() {
        assert_eq!(to_display(date!(1920 - 01 - 02)), "Jan 2, 1920");
    }

    #[test]
    fn optional_parsing_ignores_blank() {
        assert_eq!(parse_optional(Some("")), None);
        assert_eq!(parse_optional(None), None);
        assert_eq!(
            parse_optional(Some("2020-06-01")),
            Some(date!(2020 - 06 - 01))
        );
    }
}
