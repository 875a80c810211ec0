// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Thermosmart library.
//!
//! This module provides the error hierarchy used across the library: value
//! validation, communication with the vendor cloud, payload parsing,
//! configuration and coordinator lifecycle failures.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the vendor cloud.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The integration configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The coordinator could not be brought up.
    ///
    /// This is the only failure that is fatal to startup: no coordinator
    /// exists when it is returned.
    #[error("setup failed: {0}")]
    Setup(Box<Error>),

    /// The coordinator has been shut down.
    #[error("coordinator is stopped")]
    Stopped,
}

impl Error {
    /// Wraps an error that occurred during coordinator setup.
    #[must_use]
    pub fn setup(inner: impl Into<Error>) -> Self {
        Self::Setup(Box::new(inner.into()))
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A temperature is outside the range accepted by the thermostat.
    #[error("temperature {actual} is out of range [{min}, {max}]")]
    TemperatureOutOfRange {
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
        /// The actual value that was provided.
        actual: f64,
    },

    /// An unknown target temperature source was provided.
    #[error("invalid source: {0}")]
    InvalidSource(String),

    /// An unknown exception program was provided.
    #[error("invalid program: {0}")]
    InvalidProgram(String),

    /// An exception interval does not end after it starts.
    #[error("exception interval ends at {end} which is not after {start}")]
    InvalidInterval {
        /// Start of the interval.
        start: String,
        /// End of the interval.
        end: String,
    },

    /// A mode change needs the current target temperature, which is unknown.
    #[error("target temperature is not known yet")]
    UnknownTargetTemperature,
}

/// Errors related to communication with the vendor cloud.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote answered with a non-success status.
    #[error("HTTP {status} - {reason}")]
    Status {
        /// Status code returned by the remote.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
    },

    /// Authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// No access token is available.
    #[error("no access token available")]
    MissingToken,

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Connection to the remote failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
}

/// Errors related to parsing vendor payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the payload.
    #[error("missing field in payload: {0}")]
    MissingField(String),

    /// Unexpected payload format.
    #[error("unexpected payload format: {0}")]
    UnexpectedFormat(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors related to the integration configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required option is missing or empty.
    #[error("missing required option: {0}")]
    MissingOption(&'static str),

    /// An interval option is zero where a positive value is required.
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
