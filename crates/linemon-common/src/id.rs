use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const PREFIX: &str = "ALT-";

/// Alert identifier, rendered as `ALT-00001`.
///
/// Identifiers are handed out by the alert ledger from a monotonically
/// increasing counter, so ordering by `AlertId` is ordering by creation.
///
/// # Examples
///
/// ```
/// use linemon_common::id::AlertId;
///
/// let id = AlertId::new(42);
/// assert_eq!(id.to_string(), "ALT-00042");
/// assert_eq!("ALT-00042".parse::<AlertId>().unwrap(), id);
/// assert!("42".parse::<AlertId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlertId(u64);

impl AlertId {
    pub const fn new(seq: u64) -> Self {
        Self(seq)
    }

    pub const fn seq(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{:05}", self.0)
    }
}

impl FromStr for AlertId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(PREFIX)
            .ok_or_else(|| format!("alert id must start with {PREFIX}: {s}"))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("invalid alert id: {s}"));
        }
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|e| format!("invalid alert id {s}: {e}"))
    }
}

impl Serialize for AlertId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AlertId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
