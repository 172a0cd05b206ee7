use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::ConfigError;

/// Represent a closed range of reference positions [start, end].
/// Both ends are inclusive, a single position `n` is [n, n].
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Clone, Copy)]
pub struct PositionInterval {
    pub start: u64,
    pub end: u64,
}

impl PositionInterval {
    ///
    /// Create a new interval, failing when `start > end`
    ///
    pub fn new(start: u64, end: u64) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::InvalidRegion {
                spec: format!("{}-{}", start, end),
                reason: "start is greater than end".to_string(),
            });
        }
        Ok(PositionInterval { start, end })
    }

    /// Interval covering exactly one position.
    pub fn point(position: u64) -> Self {
        PositionInterval {
            start: position,
            end: position,
        }
    }

    #[inline]
    pub fn contains(&self, position: u64) -> bool {
        self.start <= position && position <= self.end
    }

    /// Number of positions covered.
    pub fn width(&self) -> u64 {
        self.end - self.start + 1
    }

    /// True when the two intervals overlap or sit next to each other,
    /// i.e. their union is a single interval.
    #[inline]
    pub fn touches(&self, other: &PositionInterval) -> bool {
        self.start <= other.end.saturating_add(1) && other.start <= self.end.saturating_add(1)
    }
}

fn parse_bound(spec: &str, token: &str) -> Result<u64, ConfigError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ConfigError::InvalidRegion {
            spec: spec.to_string(),
            reason: "missing position".to_string(),
        });
    }
    token.parse::<u64>().map_err(|_| ConfigError::InvalidRegion {
        spec: spec.to_string(),
        reason: format!("'{}' is not a non-negative integer", token),
    })
}

impl FromStr for PositionInterval {
    type Err = ConfigError;

    ///
    /// Parse `"n"` or `"start-end"`
    ///
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim();
        let (start, end) = match spec.split_once('-') {
            Some((start, end)) => (parse_bound(spec, start)?, parse_bound(spec, end)?),
            None => {
                let position = parse_bound(spec, spec)?;
                (position, position)
            }
        };

        if start > end {
            return Err(ConfigError::InvalidRegion {
                spec: spec.to_string(),
                reason: "start is greater than end".to_string(),
            });
        }

        Ok(PositionInterval { start, end })
    }
}

impl Display for PositionInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}
