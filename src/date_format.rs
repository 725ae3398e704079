//! Serde formats for the dates and times sent over the wire.
//!
//! Use with `#[serde(with = "...")]`. Timestamps are RFC 3339 strings and
//! calendar dates are `YYYY-MM-DD`.

pub mod rfc3339 {
    //! Serialize a [time::OffsetDateTime] as an RFC 3339 string, e.g. "2025-01-31T12:00:00Z".
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{OffsetDateTime, format_description::well_known::Rfc3339};

    pub fn serialize<S>(dt: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = dt.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&s, &Rfc3339).map_err(serde::de::Error::custom)
    }
}

pub mod iso_date {
    //! Serialize a [time::Date] as "YYYY-MM-DD".
    //!
    //! The default serializer for [time::Date] without the human readable
    //! feature produces a tuple of year and ordinal day, which clients do not expect.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

    const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date
            .format(DATE_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Date::parse(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use time::{Date, OffsetDateTime, macros::date, macros::datetime};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "super::rfc3339")]
        at: OffsetDateTime,
        #[serde(with = "super::iso_date")]
        on: Date,
    }

    #[test]
    fn serializes_as_strings() {
        let stamped = Stamped {
            at: datetime!(2025-06-01 00:00:00 UTC),
            on: date!(2025 - 06 - 01),
        };

        let json = serde_json::to_string(&stamped).unwrap();

        assert_eq!(json, r#"{"at":"2025-06-01T00:00:00Z","on":"2025-06-01"}"#);
    }

    #[test]
    fn deserializes_what_it_serializes() {
        let json = r#"{"at":"2025-06-01T13:45:10.5Z","on":"2024-02-29"}"#;

        let stamped: Stamped = serde_json::from_str(json).unwrap();

        assert_eq!(stamped.at, datetime!(2025-06-01 13:45:10.5 UTC));
        assert_eq!(stamped.on, date!(2024 - 02 - 29));
    }
}
