//! Gaode (`AMap`) reverse geocoder client.
//!
//! Takes a WGS-84 reading, corrects it to GCJ-02, queries
//! `/v3/geocode/regeo` and normalizes the answer. Requests made through
//! one [`GaodeClient`] share a single [`Throttle`], so the client can be
//! shared behind an `Arc` and used from many tasks.
//!
//! See <https://lbs.amap.com/api/webservice/guide/api/georegeo>

use std::time::Duration;

use gaode_regeo_coords::{GeoPoint, wgs84_to_gcj02};
use gaode_regeo_geocoder_models::NormalizedLocation;

use crate::GeocodeError;
use crate::normalize::normalize_value;
use crate::service_registry::{GeocodingService, ProviderConfig};
use crate::throttle::Throttle;

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Reverse geocoding client bound to one service configuration.
pub struct GaodeClient {
    client: reqwest::Client,
    base_url: String,
    extensions: String,
    api_key: String,
    throttle: Throttle,
}

impl std::fmt::Debug for GaodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaodeClient")
            .field("base_url", &self.base_url)
            .field("extensions", &self.extensions)
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}

impl GaodeClient {
    /// Creates a client for `service` using `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Config`] if the key is empty, or
    /// [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn new(service: &GeocodingService, api_key: impl Into<String>) -> Result<Self, GeocodeError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(GeocodeError::Config {
                message: "Gaode API key is empty".to_string(),
            });
        }

        let ProviderConfig::Gaode {
            base_url,
            rate_limit_ms,
            extensions,
            ..
        } = &service.provider;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.clone(),
            extensions: extensions.clone(),
            api_key,
            throttle: Throttle::from_millis(*rate_limit_ms),
        })
    }

    /// Creates a client reading the key from the service's configured
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Config`] if the variable is unset, or
    /// [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn from_env(service: &GeocodingService) -> Result<Self, GeocodeError> {
        let api_key = service.api_key_from_env()?;
        Self::new(service, api_key)
    }

    /// Reverse geocodes a WGS-84 point.
    ///
    /// Waits on the shared throttle first, so concurrent callers are
    /// spaced by the configured rate limit. No retries are attempted.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the HTTP request fails, the provider
    /// reports failure, or the response cannot be decoded.
    pub async fn reverse_geocode(&self, point: GeoPoint) -> Result<NormalizedLocation, GeocodeError> {
        self.throttle.wait().await;

        let location = wgs84_to_gcj02(point).to_query_param();
        log::debug!(
            "Gaode regeo request: {}?key=***&location={location}&extensions={}",
            self.base_url,
            self.extensions
        );

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("location", location.as_str()),
                ("extensions", self.extensions.as_str()),
                ("batch", "false"),
                ("roadlevel", "0"),
                ("output", "JSON"),
            ])
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RateLimited);
        }

        if !resp.status().is_success() {
            return Err(GeocodeError::Status {
                status: resp.status().as_u16(),
            });
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| GeocodeError::Decode {
            message: format!("Gaode response is not JSON: {e}"),
        })?;

        normalize_value(&body)
    }
}
