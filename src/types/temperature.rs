// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Target temperature type.

use std::fmt;

use crate::error::ValueError;

/// A target temperature in degrees Celsius accepted by the thermostat.
///
/// # Examples
///
/// ```
/// use thermosmart_lib::types::TargetTemperature;
///
/// let t = TargetTemperature::new(20.5).unwrap();
/// assert_eq!(t.celsius(), 20.5);
///
/// assert!(TargetTemperature::new(45.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TargetTemperature(f64);

impl TargetTemperature {
    /// Lowest set-point the thermostat accepts.
    pub const MIN: f64 = 5.0;
    /// Highest set-point the thermostat accepts.
    pub const MAX: f64 = 30.0;

    /// Creates a target temperature.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::TemperatureOutOfRange` if the value is outside
    /// [`MIN`](Self::MIN)..=[`MAX`](Self::MAX) or not a finite number.
    pub fn new(celsius: f64) -> Result<Self, ValueError> {
        if !celsius.is_finite() || !(Self::MIN..=Self::MAX).contains(&celsius) {
            return Err(ValueError::TemperatureOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: celsius,
            });
        }
        Ok(Self(celsius))
    }

    /// Returns the value in degrees Celsius.
    #[must_use]
    pub const fn celsius(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for TargetTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}

impl TryFrom<f64> for TargetTemperature {
    type Error = ValueError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert!(TargetTemperature::new(5.0).is_ok());
        assert!(TargetTemperature::new(30.0).is_ok());
        assert!(TargetTemperature::new(4.9).is_err());
        assert!(TargetTemperature::new(f64::NAN).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(TargetTemperature::new(19.0).unwrap().to_string(), "19.0°C");
    }
}
