use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The fixed set of kline intervals the relay subscribes to and serves.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Interval {
    #[serde(rename = "1m")]
    Min1,
    #[serde(rename = "5m")]
    Min5,
    #[serde(rename = "15m")]
    Min15,
    #[serde(rename = "1h")]
    Hour1,
}

impl Interval {
    pub const ALL: [Interval; 4] = [
        Interval::Min1,
        Interval::Min5,
        Interval::Min15,
        Interval::Hour1,
    ];
}

impl TryFrom<&str> for Interval {
    type Error = &'static str;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "1m" => Ok(Interval::Min1),
            "5m" => Ok(Interval::Min5),
            "15m" => Ok(Interval::Min15),
            "1h" => Ok(Interval::Hour1),
            _ => Err("unable to parse interval"),
        }
    }
}

impl TryFrom<String> for Interval {
    type Error = &'static str;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().try_into()
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interval::Min1 => write!(f, "1m"),
            Interval::Min5 => write!(f, "5m"),
            Interval::Min15 => write!(f, "15m"),
            Interval::Hour1 => write!(f, "1h"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_all_intervals() {
        for interval in Interval::ALL {
            let s = interval.to_string();
            let parsed: Interval = s.as_str().try_into().unwrap();
            assert_eq!(parsed, interval);
        }
    }

    #[test]
    fn rejects_unknown_interval() {
        assert!(Interval::try_from("1d").is_err());
    }
}
