//! Metadata version tags.

use std::{fmt, str::FromStr};

use anyhow::{Context, Error, Result, bail};
use chrono::{Datelike, NaiveDate};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Version of an exported metadata set: a release date plus an optional
/// build number for several releases on the same day.
///
/// Written `2026-10-18` or `2026-10-18.2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MetadataVersion {
    date: NaiveDate,
    build: Option<u32>,
}

impl MetadataVersion {
    pub fn new(date: NaiveDate, build: Option<u32>) -> Self {
        Self { date, build }
    }

    pub fn today() -> Self {
        Self::new(chrono::Local::now().date_naive(), None)
    }

    /// Parse an explicit version, or fall back to today's date.
    pub fn parse(value: Option<&str>) -> Result<Self> {
        value.map_or_else(|| Ok(Self::today()), str::parse)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn build(&self) -> Option<u32> {
        self.build
    }

    /// Year of the release date, used for copyright lines.
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

impl FromStr for MetadataVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let expected = || format!("Invalid version '{s}'. Expected YYYY-MM-DD or YYYY-MM-DD.N.");
        let (text, build) = match s.split_once('.') {
            Some((text, build)) => (text, Some(build.parse::<u32>().with_context(expected)?)),
            None => (s, None),
        };
        let date = NaiveDate::parse_from_str(text, DATE_FORMAT).with_context(expected)?;
        // Zero-padded dates only.
        if date.format(DATE_FORMAT).to_string() != text {
            bail!(expected());
        }
        Ok(Self::new(date, build))
    }
}

impl fmt::Display for MetadataVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format(DATE_FORMAT))?;
        if let Some(build) = self.build {
            write!(f, ".{build}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_version_none() {
        let version = MetadataVersion::parse(None).unwrap();
        assert_eq!(version.date(), chrono::Local::now().date_naive());
        assert_eq!(version.build(), None);
    }

    #[test]
    fn test_parse_version_date() {
        let version = MetadataVersion::parse(Some("2024-12-01")).unwrap();
        assert_eq!(version, MetadataVersion::new(date(2024, 12, 1), None));
        assert_eq!(version.to_string(), "2024-12-01");
        assert_eq!(version.year(), 2024);
    }

    #[test]
    fn test_parse_version_with_build() {
        let version: MetadataVersion = "2024-12-01.3".parse().unwrap();
        assert_eq!(version.date(), date(2024, 12, 1));
        assert_eq!(version.build(), Some(3));
        assert_eq!(version.to_string(), "2024-12-01.3");
    }

    #[test]
    fn test_parse_version_invalid() {
        for bad in ["invalid", "2024-13-01", "2024-12-01.x", "2024-12-01.", "2024-12-1", "2024-12-01.1.2"] {
            assert!(MetadataVersion::parse(Some(bad)).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_ordering() {
        let a: MetadataVersion = "2024-12-01".parse().unwrap();
        let b: MetadataVersion = "2024-12-01.1".parse().unwrap();
        let c: MetadataVersion = "2025-01-01".parse().unwrap();
        assert!(a < b && b < c);
    }
}
