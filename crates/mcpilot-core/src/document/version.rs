//! Fixed-point document version counter.
//!
//! Versions advance in steps of 0.1 and are written as decimal strings with
//! one fractional digit. Counting in tenths keeps `1.1 + 0.1` equal to `1.2`
//! no matter how many saves happen.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentVersion {
    tenths: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid document version '{0}'")]
pub struct ParseVersionError(pub String);

impl DocumentVersion {
    /// Version given to a document on its first save.
    pub const INITIAL: DocumentVersion = DocumentVersion { tenths: 10 };

    pub fn from_tenths(tenths: u64) -> Self {
        Self { tenths }
    }

    pub fn tenths(self) -> u64 {
        self.tenths
    }

    pub fn next(self) -> Self {
        Self {
            tenths: self.tenths.saturating_add(1),
        }
    }

    /// Version to stamp on the next save.
    pub fn advance(current: Option<Self>) -> Self {
        match current {
            Some(version) => version.next(),
            None => Self::INITIAL,
        }
    }
}

impl fmt::Display for DocumentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tenths / 10, self.tenths % 10)
    }
}

impl FromStr for DocumentVersion {
    type Err = ParseVersionError;

    /// Parses a non-negative decimal, rounding half-up to the nearest tenth
    /// using its digits (no float conversion).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseVersionError(s.to_string());
        let trimmed = s.trim();
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: u64 = whole.parse().map_err(|_| invalid())?;
        let mut digits = fraction.bytes().map(|b| u64::from(b - b'0'));
        let first = digits.next().unwrap_or(0);
        let round_up = digits.next().is_some_and(|d| d >= 5);

        whole
            .checked_mul(10)
            .and_then(|t| t.checked_add(first))
            .and_then(|t| t.checked_add(u64::from(round_up)))
            .map(Self::from_tenths)
            .ok_or_else(invalid)
    }
}

impl Serialize for DocumentVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(VersionVisitor)
    }
}

struct VersionVisitor;

impl Visitor<'_> for VersionVisitor {
    type Value = DocumentVersion;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal version string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        v.checked_mul(10)
            .map(DocumentVersion::from_tenths)
            .ok_or_else(|| E::custom(ParseVersionError(v.to_string())))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        match u64::try_from(v) {
            Ok(v) => self.visit_u64(v),
            Err(_) => Err(E::custom(ParseVersionError(v.to_string()))),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() || v < 0.0 {
            return Err(E::custom(ParseVersionError(v.to_string())));
        }
        // Display for f64 never uses exponent notation.
        v.to_string().parse().map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_is_exact_over_many_saves() {
        let mut version = DocumentVersion::advance(None);
        for _ in 0..25 {
            version = DocumentVersion::advance(Some(version));
        }
        assert_eq!(version.to_string(), "3.5");
    }

    #[test]
    fn drifted_float_strings_round_to_nearest_tenth() {
        let cases = [
            ("1.2000000000000002", "1.2"),
            ("1.0999999999999999", "1.1"),
            ("1.96", "2.0"),
            ("2", "2.0"),
            ("0.1", "0.1"),
        ];
        for (raw, expected) in cases {
            let parsed: DocumentVersion = raw.parse().unwrap();
            assert_eq!(parsed.to_string(), expected, "parsing {raw}");
        }
    }

    #[test]
    fn rejects_garbage() {
        for raw in ["", "v1.0", "1.a", "-1.0", ".5"] {
            assert!(raw.parse::<DocumentVersion>().is_err(), "accepted {raw}");
        }
    }

    #[test]
    fn deserializes_from_string_or_number() {
        let from_str: DocumentVersion = serde_json::from_str("\"1.4\"").unwrap();
        let from_float: DocumentVersion = serde_json::from_str("1.4").unwrap();
        let from_int: DocumentVersion = serde_json::from_str("3").unwrap();

        assert_eq!(from_str, from_float);
        assert_eq!(from_int.to_string(), "3.0");
        assert_eq!(serde_json::to_string(&from_str).unwrap(), "\"1.4\"");
    }
}
