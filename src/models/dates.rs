//! Date helpers for records stored with the shop's locale format (`dd/mm/yyyy`).

use chrono::{Local, NaiveDate};

pub const BR_DATE_FORMAT: &str = "%d/%m/%Y";

/// Today's date on the local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a stored date, accepting both the locale format and ISO `yyyy-mm-dd`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, BR_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

pub fn format_br(date: NaiveDate) -> String {
    date.format(BR_DATE_FORMAT).to_string()
}

/// `#[serde(with = "br_date")]` for `NaiveDate` fields persisted as `dd/mm/yyyy`.
pub mod br_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_br(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_locale_and_iso_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(parse_date("09/03/2024"), Some(expected));
        assert_eq!(parse_date("2024-03-09"), Some(expected));
        assert_eq!(parse_date("9 de março"), None);
    }

    #[test]
    fn formats_in_locale_order() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(format_br(date), "01/12/2024");
    }
}
