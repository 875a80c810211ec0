// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scheduling exceptions.
//!
//! An exception is an interval during which the weekly program is replaced
//! by a named program. The vendor encodes the interval bounds as
//! `[year, month - 1, day, hour, minute]` arrays and only accepts minutes on
//! a quarter-hour boundary.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Program applied while an exception is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionProgram {
    /// Frost protection only.
    AntiFreeze,
    /// Nobody home.
    NotHome,
    /// Regular home temperature.
    Home,
    /// Comfort temperature.
    Comfort,
}

impl ExceptionProgram {
    /// Returns the vendor string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AntiFreeze => "anti_freeze",
            Self::NotHome => "not_home",
            Self::Home => "home",
            Self::Comfort => "comfort",
        }
    }
}

impl fmt::Display for ExceptionProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExceptionProgram {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anti_freeze" => Ok(Self::AntiFreeze),
            "not_home" => Ok(Self::NotHome),
            "home" => Ok(Self::Home),
            "comfort" => Ok(Self::Comfort),
            _ => Err(ValueError::InvalidProgram(s.to_string())),
        }
    }
}

/// A scheduled override interval.
///
/// Entries built with [`ExceptionEntry::new`] have both bounds rounded down
/// to the previous quarter hour. Entries received from the vendor are kept
/// as reported.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use thermosmart_lib::types::{ExceptionEntry, ExceptionProgram};
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let entry = ExceptionEntry::new(
///     day.and_hms_opt(10, 7, 0).unwrap(),
///     day.and_hms_opt(11, 0, 0).unwrap(),
///     ExceptionProgram::Comfort,
/// )
/// .unwrap();
///
/// assert_eq!(entry.start(), day.and_hms_opt(10, 0, 0).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireException", into = "WireException")]
pub struct ExceptionEntry {
    start: NaiveDateTime,
    end: NaiveDateTime,
    program: ExceptionProgram,
}

impl ExceptionEntry {
    /// Minute granularity accepted by the vendor.
    pub const MINUTE_STEP: u32 = 15;

    /// Creates a new exception, rounding both bounds down to the quarter hour.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidInterval` if the rounded end is not after
    /// the rounded start.
    pub fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        program: ExceptionProgram,
    ) -> Result<Self, ValueError> {
        let start = round_to_quarter(start);
        let end = round_to_quarter(end);

        if end <= start {
            return Err(ValueError::InvalidInterval {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok(Self {
            start,
            end,
            program,
        })
    }

    /// Returns the start of the interval.
    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Returns the end of the interval.
    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Returns the program applied during the interval.
    #[must_use]
    pub fn program(&self) -> ExceptionProgram {
        self.program
    }

    /// Returns `true` if `at` falls inside the interval.
    #[must_use]
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at < self.end
    }
}

fn round_to_quarter(at: NaiveDateTime) -> NaiveDateTime {
    let minute = at.minute() - at.minute() % ExceptionEntry::MINUTE_STEP;
    at.date()
        .and_hms_opt(at.hour(), minute, 0)
        .unwrap_or(at)
}

/// Vendor wire representation of an exception.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireException {
    start: [i64; 5],
    end: [i64; 5],
    temperature: ExceptionProgram,
}

fn to_wire(at: NaiveDateTime) -> [i64; 5] {
    [
        i64::from(at.year()),
        i64::from(at.month0()),
        i64::from(at.day()),
        i64::from(at.hour()),
        i64::from(at.minute()),
    ]
}

fn from_wire(parts: [i64; 5]) -> Result<NaiveDateTime, String> {
    let [year, month0, day, hour, minute] = parts;
    let field = |v: i64| u32::try_from(v).map_err(|_| format!("invalid date part {v} in {parts:?}"));

    let year = i32::try_from(year).map_err(|_| format!("invalid year {year}"))?;
    NaiveDate::from_ymd_opt(year, field(month0)? + 1, field(day)?)
        .and_then(|d| d.and_hms_opt(field(hour).ok()?, field(minute).ok()?, 0))
        .ok_or_else(|| format!("invalid date {parts:?}"))
}

impl TryFrom<WireException> for ExceptionEntry {
    type Error = String;

    fn try_from(wire: WireException) -> Result<Self, Self::Error> {
        Ok(Self {
            start: from_wire(wire.start)?,
            end: from_wire(wire.end)?,
            program: wire.temperature,
        })
    }
}

impl From<ExceptionEntry> for WireException {
    fn from(entry: ExceptionEntry) -> Self {
        Self {
            start: to_wire(entry.start),
            end: to_wire(entry.end),
            temperature: entry.program,
        }
    }
}
