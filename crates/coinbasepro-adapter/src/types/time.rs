/*
[INPUT]:  Timestamp strings in the formats the exchange emits
[OUTPUT]: UTC timestamps that serialize back as RFC 3339
[POS]:    Data layer - wire time type shared by REST and feed models
[UPDATE]: When the exchange introduces another timestamp format
*/

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Postgres-style timestamps returned by some REST endpoints
const SQL_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f+00";

/// Exchange timestamp, always UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(pub DateTime<Utc>);

impl Time {
    pub fn parse(raw: &str) -> Option<Self> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(parsed.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(raw, SQL_FORMAT)
            .ok()
            .map(|naive| Self(naive.and_utc()))
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Time {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Time::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339() {
        let time: Time = serde_json::from_str(r#""2014-11-07T08:19:27.028459Z""#).unwrap();
        assert_eq!(time.0.timestamp(), 1_415_348_367);
    }

    #[test]
    fn test_parse_sql_format() {
        let time: Time = serde_json::from_str(r#""2019-04-23 19:20:31.471658+00""#).unwrap();
        let expected = Utc.with_ymd_and_hms(2019, 4, 23, 19, 20, 31).unwrap();
        assert_eq!(time.0.timestamp(), expected.timestamp());

        let whole: Time = serde_json::from_str(r#""9999-04-12 23:20:50+00""#).unwrap();
        assert_eq!(serde_json::to_string(&whole).unwrap(), r#""9999-04-12T23:20:50Z""#);
    }

    #[test]
    fn test_reject_garbage() {
        assert!(serde_json::from_str::<Time>(r#""yesterday""#).is_err());
    }
}
