//! Reverse geocoding service configuration.
//!
//! The default provider is defined in `services/gaode.toml` and embedded
//! at compile time. A different file can be loaded at runtime with
//! [`GeocodingService::from_path`] (e.g. to point at a proxy or change
//! the rate limit).

use std::path::Path;

use serde::Deserialize;

use crate::GeocodeError;

/// A reverse geocoding service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g., `"gaode"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Whether this service may be used.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Provider-specific configuration.
    pub provider: ProviderConfig,
}

/// Provider-specific configuration, tagged by `type` in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Gaode (`AMap`) web service reverse geocoder.
    Gaode {
        /// Endpoint URL (e.g., `"https://restapi.amap.com/v3/geocode/regeo"`).
        base_url: String,
        /// Minimum delay between requests in milliseconds.
        rate_limit_ms: u64,
        /// `extensions` query value: `"base"` or `"all"`.
        #[serde(default = "default_extensions")]
        extensions: String,
        /// Name of the environment variable holding the API key.
        #[serde(default = "default_api_key_env")]
        api_key_env: String,
    },
}

const fn default_true() -> bool {
    true
}

fn default_extensions() -> String {
    "all".to_string()
}

fn default_api_key_env() -> String {
    "GAODE_API_KEY".to_string()
}

impl GeocodingService {
    /// Parses a service definition from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Config`] if the TOML is malformed or
    /// missing required fields.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, GeocodeError> {
        toml::de::from_str(toml_str).map_err(|e| GeocodeError::Config {
            message: format!("Invalid geocoding service config: {e}"),
        })
    }

    /// Reads and parses a service definition file.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Config`] if the file cannot be read or
    /// parsed.
    pub fn from_path(path: &Path) -> Result<Self, GeocodeError> {
        let contents = std::fs::read_to_string(path).map_err(|e| GeocodeError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Returns the provider's endpoint URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        match &self.provider {
            ProviderConfig::Gaode { base_url, .. } => base_url,
        }
    }

    /// Returns the minimum delay between requests in milliseconds.
    #[must_use]
    pub const fn rate_limit_ms(&self) -> u64 {
        match &self.provider {
            ProviderConfig::Gaode { rate_limit_ms, .. } => *rate_limit_ms,
        }
    }

    /// Reads the API key from the configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Config`] if the variable is unset or empty.
    pub fn api_key_from_env(&self) -> Result<String, GeocodeError> {
        let ProviderConfig::Gaode { api_key_env, .. } = &self.provider;
        std::env::var(api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| GeocodeError::Config {
                message: format!("{api_key_env} is not set"),
            })
    }
}

// ── Compile-time embedded TOML file ─────────────────────────────────

const GAODE_TOML: &str = include_str!("../services/gaode.toml");

/// Returns the embedded Gaode service.
///
/// # Errors
///
/// Returns [`GeocodeError::Config`] if the embedded TOML is malformed or
/// the service is disabled.
pub fn default_service() -> Result<GeocodingService, GeocodeError> {
    let service = GeocodingService::from_toml_str(GAODE_TOML)?;
    if !service.enabled {
        return Err(GeocodeError::Config {
            message: format!("Geocoding service '{}' is disabled", service.id),
        });
    }
    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_service_is_gaode() {
        let svc = default_service().unwrap();
        assert_eq!(svc.id, "gaode");
        assert!(!svc.name.is_empty());
        assert_eq!(svc.base_url(), "https://restapi.amap.com/v3/geocode/regeo");
        assert_eq!(svc.rate_limit_ms(), 1000);
    }

    #[test]
    fn optional_fields_have_defaults() {
        let svc = GeocodingService::from_toml_str(
            r#"
            id = "proxy"
            name = "Proxy"

            [provider]
            type = "gaode"
            base_url = "http://localhost:8080/regeo"
            rate_limit_ms = 0
            "#,
        )
        .unwrap();
        assert!(svc.enabled);
        let ProviderConfig::Gaode {
            extensions,
            api_key_env,
            ..
        } = &svc.provider;
        assert_eq!(extensions, "all");
        assert_eq!(api_key_env, "GAODE_API_KEY");
    }

    #[test]
    fn malformed_config_is_config_error() {
        let err = GeocodingService::from_toml_str("id = \"x\"").unwrap_err();
        assert!(matches!(err, GeocodeError::Config { .. }), "{err:?}");

        let err = GeocodingService::from_toml_str(
            r#"
            id = "x"
            name = "X"
            [provider]
            type = "nominatim"
            base_url = "http://example.com"
            rate_limit_ms = 1
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, GeocodeError::Config { .. }), "{err:?}");
    }

    #[test]
    fn missing_api_key_is_config_error() {
        let svc = GeocodingService::from_toml_str(
            r#"
            id = "x"
            name = "X"
            [provider]
            type = "gaode"
            base_url = "http://example.com"
            rate_limit_ms = 1
            api_key_env = "GAODE_REGEO_TEST_KEY_THAT_IS_NEVER_SET"
            "#,
        )
        .unwrap();
        assert!(matches!(
            svc.api_key_from_env(),
            Err(GeocodeError::Config { .. })
        ));
    }
}
