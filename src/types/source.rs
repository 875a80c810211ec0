// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Target temperature source and the views derived from it.
//!
//! The vendor reports *why* the current set-point is what it is. Two views
//! used by the climate entity are derived from that single value: whether the
//! thermostat is away (paused) and which HVAC mode it is in. Both views are
//! computed here and nowhere else, so full refreshes and webhook merges can
//! never disagree about them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Origin of the current target temperature.
///
/// # Examples
///
/// ```
/// use thermosmart_lib::types::{HvacMode, Source};
///
/// let source: Source = "schedule".parse().unwrap();
/// assert_eq!(source.hvac_mode(), Some(HvacMode::Auto));
/// assert!(!source.is_away());
///
/// assert!(Source::Pause.is_away());
/// assert_eq!(Source::Pause.hvac_mode(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Set through the API (this library or another client).
    Remote,
    /// Set by hand on the thermostat.
    Manual,
    /// Follows the weekly program.
    Schedule,
    /// An exception interval is active.
    Exception,
    /// The thermostat is paused.
    Pause,
}

impl Source {
    /// Returns the vendor string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Manual => "manual",
            Self::Schedule => "schedule",
            Self::Exception => "exception",
            Self::Pause => "pause",
        }
    }

    /// Returns `true` when the thermostat is in away (paused) mode.
    #[must_use]
    pub const fn is_away(&self) -> bool {
        matches!(self, Self::Pause)
    }

    /// Returns the HVAC mode implied by this source.
    ///
    /// A paused thermostat has no HVAC mode.
    #[must_use]
    pub const fn hvac_mode(&self) -> Option<HvacMode> {
        match self {
            Self::Remote | Self::Manual => Some(HvacMode::Heat),
            Self::Schedule | Self::Exception => Some(HvacMode::Auto),
            Self::Pause => None,
        }
    }

    /// Returns the preset implied by this source.
    #[must_use]
    pub const fn preset(&self) -> PresetMode {
        if self.is_away() {
            PresetMode::Away
        } else {
            PresetMode::None
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "manual" => Ok(Self::Manual),
            "schedule" => Ok(Self::Schedule),
            "exception" => Ok(Self::Exception),
            "pause" => Ok(Self::Pause),
            _ => Err(ValueError::InvalidSource(s.to_string())),
        }
    }
}

/// HVAC operating mode as exposed to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HvacMode {
    /// Follow the schedule.
    Auto,
    /// Hold a manual set-point.
    Heat,
    /// Hold a manual set-point in cooling mode.
    Cool,
}

impl HvacMode {
    /// Returns the platform string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Heat => "heat",
            Self::Cool => "cool",
        }
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the boiler is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HvacAction {
    /// Central heating is active.
    Heating,
    /// Cooling is active.
    Cooling,
    /// Neither heating nor cooling.
    Idle,
}

/// Climate preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetMode {
    /// Thermostat is paused.
    Away,
    /// Normal operation.
    None,
}

impl PresetMode {
    /// Returns the platform string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Away => "away",
            Self::None => "none",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hvac_mode_derivation() {
        assert_eq!(Source::Remote.hvac_mode(), Some(HvacMode::Heat));
        assert_eq!(Source::Manual.hvac_mode(), Some(HvacMode::Heat));
        assert_eq!(Source::Schedule.hvac_mode(), Some(HvacMode::Auto));
        assert_eq!(Source::Exception.hvac_mode(), Some(HvacMode::Auto));
        assert_eq!(Source::Pause.hvac_mode(), None);
    }

    #[test]
    fn only_pause_is_away() {
        for source in [
            Source::Remote,
            Source::Manual,
            Source::Schedule,
            Source::Exception,
        ] {
            assert!(!source.is_away());
            assert_eq!(source.preset(), PresetMode::None);
        }
        assert_eq!(Source::Pause.preset(), PresetMode::Away);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("PAUSE".parse::<Source>().unwrap(), Source::Pause);
        assert!("boost".parse::<Source>().is_err());
    }

    #[test]
    fn serde_uses_vendor_names() {
        let source: Source = serde_json::from_str("\"exception\"").unwrap();
        assert_eq!(source, Source::Exception);
        assert_eq!(serde_json::to_string(&Source::Manual).unwrap(), "\"manual\"");
    }
}
