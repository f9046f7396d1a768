use std::{fmt, str::FromStr};

/// Bucket width and row cap handed to the store for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplingParams {
    /// Hours per bucket.
    pub interval: i16,
    pub limit: i16,
}

impl SamplingParams {
    pub const fn new(interval: i16, limit: i16) -> Self {
        Self { interval, limit }
    }
}

/// Which column of the range table a deployment reads.
///
/// `Variable` picks a coarser bucket for longer windows. `Fixed` always
/// queries hourly buckets and only stretches the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeProfile {
    #[default]
    Variable,
    Fixed,
}

struct RangeRow {
    token: &'static str,
    variable: SamplingParams,
    fixed_limit: Option<i16>,
}

const FIXED_INTERVAL: i16 = 1;

const RANGES: [RangeRow; 5] = [
    RangeRow { token: "1d", variable: SamplingParams::new(1, 24), fixed_limit: Some(24) },
    RangeRow { token: "1w", variable: SamplingParams::new(1, 168), fixed_limit: Some(168) },
    RangeRow { token: "1m", variable: SamplingParams::new(6, 124), fixed_limit: Some(744) },
    RangeRow { token: "3m", variable: SamplingParams::new(12, 186), fixed_limit: Some(2232) },
    RangeRow { token: "max", variable: SamplingParams::new(24, 1825), fixed_limit: None },
];

impl RangeProfile {
    /// Looks a range token up in the table. Unknown tokens, including the
    /// empty string, resolve to a zero limit and are still queried. The
    /// interval drops to zero with them under `Variable` and stays hourly
    /// under `Fixed`.
    pub fn resolve(self, token: &str) -> SamplingParams {
        let row = RANGES.iter().find(|row| row.token == token);

        match self {
            RangeProfile::Variable => row.map(|row| row.variable).unwrap_or_default(),
            RangeProfile::Fixed => SamplingParams::new(
                FIXED_INTERVAL,
                row.and_then(|row| row.fixed_limit).unwrap_or(0),
            ),
        }
    }

    pub fn tokens(self) -> impl Iterator<Item = &'static str> {
        RANGES
            .iter()
            .filter(move |row| match self {
                RangeProfile::Variable => true,
                RangeProfile::Fixed => row.fixed_limit.is_some(),
            })
            .map(|row| row.token)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown range profile {0:?}, expected \"variable\" or \"fixed\"")]
pub struct UnknownRangeProfile(pub String);

impl FromStr for RangeProfile {
    type Err = UnknownRangeProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "variable" | "a" => Ok(RangeProfile::Variable),
            "fixed" | "b" => Ok(RangeProfile::Fixed),
            _ => Err(UnknownRangeProfile(s.to_string())),
        }
    }
}

impl fmt::Display for RangeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeProfile::Variable => f.write_str("variable"),
            RangeProfile::Fixed => f.write_str("fixed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_table() {
        let expected = [
            ("1d", 1, 24),
            ("1w", 1, 168),
            ("1m", 6, 124),
            ("3m", 12, 186),
            ("max", 24, 1825),
        ];
        for (token, interval, limit) in expected {
            assert_eq!(
                RangeProfile::Variable.resolve(token),
                SamplingParams::new(interval, limit),
                "token {token}"
            );
        }
    }

    #[test]
    fn fixed_table_keeps_hourly_buckets() {
        let expected = [("1d", 24), ("1w", 168), ("1m", 744), ("3m", 2232)];
        for (token, limit) in expected {
            assert_eq!(
                RangeProfile::Fixed.resolve(token),
                SamplingParams::new(1, limit),
                "token {token}"
            );
        }
    }

    #[test]
    fn unknown_tokens_resolve_to_zero() {
        for token in ["", "bogus", "1D", " 1d", "1y"] {
            assert_eq!(RangeProfile::Variable.resolve(token), SamplingParams::new(0, 0));
        }
    }

    #[test]
    fn fixed_interval_survives_unknown_tokens() {
        for token in ["", "bogus", "1D", "max"] {
            assert_eq!(
                RangeProfile::Fixed.resolve(token),
                SamplingParams::new(1, 0),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn tokens_per_profile() {
        let variable: Vec<_> = RangeProfile::Variable.tokens().collect();
        assert_eq!(variable, ["1d", "1w", "1m", "3m", "max"]);
        let fixed: Vec<_> = RangeProfile::Fixed.tokens().collect();
        assert_eq!(fixed, ["1d", "1w", "1m", "3m"]);
    }

    #[test]
    fn parse_profile() {
        assert_eq!("variable".parse::<RangeProfile>().unwrap(), RangeProfile::Variable);
        assert_eq!("Fixed".parse::<RangeProfile>().unwrap(), RangeProfile::Fixed);
        assert_eq!("b".parse::<RangeProfile>().unwrap(), RangeProfile::Fixed);
        assert!("hourly".parse::<RangeProfile>().is_err());
    }
}
