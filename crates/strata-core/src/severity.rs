//! Rule severity levels

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;

/// Severity of a rule: whether and how a violation is reported
///
/// On the wire a severity is either one of the tokens `off`/`warn`/`error`
/// (case-insensitive) or its numeric alias `0`/`1`/`2`. Numeric aliases are
/// normalized at deserialization; serialization always emits the lowercase
/// token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Rule is disabled
    Off,
    /// Violations are reported but do not fail the run
    Warn,
    /// Violations fail the run
    Error,
}

impl Severity {
    /// Whether a rule at this severity runs at all
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Severity::Off)
    }

    /// The canonical lowercase token
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Off => "off",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    /// Numeric alias accepted on the wire
    pub fn from_number(value: u64) -> Option<Self> {
        match value {
            0 => Some(Severity::Off),
            1 => Some(Severity::Warn),
            2 => Some(Severity::Error),
            _ => None,
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Severity::Off),
            "warn" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            other => Err(format!(
                "unknown severity '{other}' (expected off/warn/error or 0/1/2)"
            )),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SeverityVisitor;

        impl de::Visitor<'_> for SeverityVisitor {
            type Value = Severity;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a severity token (off/warn/error) or numeric alias (0/1/2)")
            }

            fn visit_str<E>(self, value: &str) -> Result<Severity, E>
            where
                E: de::Error,
            {
                value.parse().map_err(de::Error::custom)
            }

            fn visit_u64<E>(self, value: u64) -> Result<Severity, E>
            where
                E: de::Error,
            {
                Severity::from_number(value).ok_or_else(|| {
                    de::Error::custom(format!("numeric severity must be 0, 1 or 2, got {value}"))
                })
            }

            fn visit_i64<E>(self, value: i64) -> Result<Severity, E>
            where
                E: de::Error,
            {
                u64::try_from(value)
                    .ok()
                    .and_then(Severity::from_number)
                    .ok_or_else(|| {
                        de::Error::custom(format!(
                            "numeric severity must be 0, 1 or 2, got {value}"
                        ))
                    })
            }

            // JSON5 sources surface every number as a float
            fn visit_f64<E>(self, value: f64) -> Result<Severity, E>
            where
                E: de::Error,
            {
                if value.fract() == 0.0 && (0.0..=2.0).contains(&value) {
                    self.visit_u64(value as u64)
                } else {
                    Err(de::Error::custom(format!(
                        "numeric severity must be 0, 1 or 2, got {value}"
                    )))
                }
            }
        }

        deserializer.deserialize_any(SeverityVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tokens_case_insensitively() {
        assert_eq!("off".parse::<Severity>().unwrap(), Severity::Off);
        assert_eq!("Warn".parse::<Severity>().unwrap(), Severity::Warn);
        assert_eq!("ERROR".parse::<Severity>().unwrap(), Severity::Error);
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn numeric_aliases_normalize() {
        let warn: Severity = serde_json::from_str("1").unwrap();
        assert_eq!(warn, Severity::Warn);
        let off: Severity = serde_json::from_str("0").unwrap();
        assert_eq!(off, Severity::Off);
        let error: Severity = serde_json::from_str("2").unwrap();
        assert_eq!(error, Severity::Error);
        assert!(serde_json::from_str::<Severity>("3").is_err());
    }

    #[test]
    fn serializes_as_lowercase_token() {
        assert_eq!(serde_json::to_string(&Severity::Warn).unwrap(), r#""warn""#);
        assert_eq!(serde_json::to_string(&Severity::Off).unwrap(), r#""off""#);
    }

    #[test]
    fn off_is_disabled() {
        assert!(!Severity::Off.is_enabled());
        assert!(Severity::Warn.is_enabled());
        assert!(Severity::Error.is_enabled());
    }
}
