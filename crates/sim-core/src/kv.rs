//! Line-oriented `key=value` text shared by rules files and saves.
//!
//! Parsing never fails on its own: malformed lines are skipped and each
//! consumer pulls the keys it recognizes through the typed accessors,
//! validating the assembled value as a whole afterwards.

use std::collections::BTreeMap;
use std::fmt::{Display, Write as _};

use crate::ValidationError;

/// Raw key to value mapping produced by [`parse_kv`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KvMap {
    entries: BTreeMap<String, String>,
}

/// Parse `key = value` lines.
///
/// Blank lines, `#` comments, lines without `=` and lines with an empty key
/// or value are ignored. Key and value are trimmed. A repeated key keeps the
/// last value.
pub fn parse_kv(text: &str) -> KvMap {
    let mut entries = BTreeMap::new();
    for line in text.lines() {
        let line = line.trim_matches(is_blank);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim_matches(is_blank);
        let value = value.trim_matches(is_blank);
        if key.is_empty() || value.is_empty() {
            continue;
        }
        entries.insert(key.to_string(), value.to_string());
    }
    KvMap { entries }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

impl KvMap {
    /// Raw value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn require(&self, key: &str) -> Result<&str, ValidationError> {
        self.get(key)
            .ok_or_else(|| ValidationError::MissingKey(key.to_string()))
    }

    fn unparsable(key: &str, raw: &str) -> ValidationError {
        ValidationError::Unparsable {
            key: key.to_string(),
            raw: raw.to_string(),
        }
    }

    /// Signed integer value.
    pub fn int(&self, key: &str) -> Result<i64, ValidationError> {
        let raw = self.require(key)?;
        raw.parse().map_err(|_| Self::unparsable(key, raw))
    }

    /// Unsigned integer value.
    pub fn count(&self, key: &str) -> Result<u32, ValidationError> {
        let raw = self.require(key)?;
        raw.parse().map_err(|_| Self::unparsable(key, raw))
    }

    /// Decimal value; both `.` and `,` are accepted as the fractional separator.
    pub fn decimal(&self, key: &str) -> Result<f64, ValidationError> {
        let raw = self.require(key)?;
        raw.replace(',', ".")
            .parse()
            .map_err(|_| Self::unparsable(key, raw))
    }

    /// Boolean stored as `1` or `0`.
    pub fn flag(&self, key: &str) -> Result<bool, ValidationError> {
        match self.require(key)? {
            "1" => Ok(true),
            "0" => Ok(false),
            raw => Err(Self::unparsable(key, raw)),
        }
    }
}

/// Builder for `key=value` text.
///
/// `f64` values go through `Display`, which prints the shortest string that
/// parses back to the same bits.
#[derive(Debug, Default)]
pub struct KvWriter {
    out: String,
}

impl KvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(mut self, key: &str, value: impl Display) -> Self {
        // Writing into a String cannot fail.
        let _ = writeln!(self.out, "{key}={value}");
        self
    }

    pub fn put_flag(self, key: &str, value: bool) -> Self {
        self.put(key, u8::from(value))
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn trims_and_skips_noise() {
        let map = parse_kv(
            "# header\n\n  initial_population = 100 \r\nno separator here\nempty =\n= orphan\n\tland_price_min\t=\t17\n",
        );
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("initial_population"), Some("100"));
        assert_eq!(map.get("land_price_min"), Some("17"));
    }

    #[test]
    fn splits_on_first_equals_and_last_duplicate_wins() {
        let map = parse_kv("a=1=2\nb=1\nb=2\n");
        assert_eq!(map.get("a"), Some("1=2"));
        assert_eq!(map.get("b"), Some("2"));
    }

    #[test]
    fn decimal_accepts_comma_and_dot() {
        let map = parse_kv("dot = 0.5\ncomma = 0,07\nbad = half\n");
        assert_eq!(map.decimal("dot"), Ok(0.5));
        assert_eq!(map.decimal("comma"), Ok(0.07));
        assert_eq!(
            map.decimal("bad"),
            Err(ValidationError::Unparsable {
                key: "bad".into(),
                raw: "half".into()
            })
        );
    }

    #[test]
    fn typed_accessors_report_missing_and_garbage() {
        let map = parse_kv("n = 12abc\nflag = yes\nyear = -3\n");
        assert_eq!(
            map.int("absent"),
            Err(ValidationError::MissingKey("absent".into()))
        );
        assert!(matches!(map.int("n"), Err(ValidationError::Unparsable { .. })));
        assert!(matches!(map.flag("flag"), Err(ValidationError::Unparsable { .. })));
        assert!(matches!(map.count("year"), Err(ValidationError::Unparsable { .. })));
        assert_eq!(map.int("year"), Ok(-3));
    }

    #[test]
    fn writer_output_parses_back() {
        let text = KvWriter::new()
            .put("grain", 2799.5_f64)
            .put("third", 1.0_f64 / 3.0)
            .put_flag("busy", true)
            .finish();
        assert_eq!(text.lines().next(), Some("grain=2799.5"));
        let map = parse_kv(&text);
        assert_eq!(map.decimal("third"), Ok(1.0 / 3.0));
        assert_eq!(map.flag("busy"), Ok(true));
    }

    proptest! {
        #[test]
        fn decimals_keep_every_bit(x in prop::num::f64::NORMAL | prop::num::f64::ZERO) {
            let text = KvWriter::new().put("x", x).finish();
            let back = parse_kv(&text).decimal("x").unwrap();
            prop_assert_eq!(back.to_bits(), x.to_bits());
        }
    }
}
