#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reverse geocoding against Gaode (`AMap`).
//!
//! The pipeline for a single lookup is:
//!
//! 1. **Throttle** ([`throttle`]) — one shared "time of last request"
//!    gate enforcing `rate_limit_ms` between outbound calls.
//! 2. **Coordinate correction** — the WGS-84 reading is shifted into
//!    GCJ-02 via [`gaode_regeo_coords`] before it is sent.
//! 3. **Request** ([`gaode`]) — `GET /v3/geocode/regeo` with the
//!    configured key and extensions.
//! 4. **Decode** ([`decode`]) — the JSON body is decoded into the raw
//!    provider fields, including the polymorphic `city` field.
//! 5. **Normalize** ([`normalize`]) — the raw fields are reconciled into
//!    a [`NormalizedLocation`], synthesizing a display name when the
//!    provider omits one.
//!
//! Steps 4 and 5 are pure and can be used on their own via
//! [`normalize::normalize_value`].

pub mod decode;
pub mod gaode;
pub mod municipality;
pub mod normalize;
pub mod service_registry;
pub mod throttle;

pub use gaode_regeo_geocoder_models::{NormalizedAddress, NormalizedLocation};
use thiserror::Error;

/// Errors from reverse geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success HTTP status.
    #[error("Unexpected HTTP status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Provider reported a request-level failure.
    #[error("Provider error: {info}")]
    Provider {
        /// Provider-supplied diagnostic text.
        info: String,
    },

    /// Response did not have the expected shape.
    #[error("Decode error: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },

    /// Missing API key or malformed service configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },
}
