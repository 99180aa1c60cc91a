//! Duty status enum as the single source of truth for status codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four duty statuses of a driver's daily log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DutyStatus {
    OffDuty,
    SleeperBerth,
    Driving,
    OnDutyNotDriving,
}

impl DutyStatus {
    /// All statuses in log-sheet row order.
    pub const ALL: [Self; 4] = [
        Self::OffDuty,
        Self::SleeperBerth,
        Self::Driving,
        Self::OnDutyNotDriving,
    ];

    /// Short wire code (`OFF`, `SB`, `D`, `ON`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::OffDuty => "OFF",
            Self::SleeperBerth => "SB",
            Self::Driving => "D",
            Self::OnDutyNotDriving => "ON",
        }
    }

    /// Whether time in this status counts toward cycle hours.
    #[must_use]
    pub const fn counts_toward_cycle(self) -> bool {
        !matches!(self, Self::OffDuty)
    }
}

impl fmt::Display for DutyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DutyStatus {
    type Err = UnknownDutyStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OFF" | "OFF_DUTY" => Ok(Self::OffDuty),
            "SB" | "SLEEPER_BERTH" => Ok(Self::SleeperBerth),
            "D" | "DRIVING" => Ok(Self::Driving),
            "ON" | "ON_DUTY_NOT_DRIVING" => Ok(Self::OnDutyNotDriving),
            _ => Err(UnknownDutyStatus(s.to_string())),
        }
    }
}

impl Serialize for DutyStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for DutyStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown duty status strings.
#[derive(Debug, Clone)]
pub struct UnknownDutyStatus(String);

impl fmt::Display for UnknownDutyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown duty status: {}", self.0)
    }
}

impl std::error::Error for UnknownDutyStatus {}
