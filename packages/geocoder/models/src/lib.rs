#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Gaode reverse-geocode types.
//!
//! The `Raw*` types mirror the provider's `regeo` response after wire
//! decoding, with every string field optional. [`NormalizedLocation`] is
//! the provider-agnostic record produced from them.

use serde::{Deserialize, Serialize};

/// Gaode's `status` value for a successful request.
pub const STATUS_OK: &str = "1";

/// The provider's polymorphic `city` field.
///
/// Gaode emits a string for most prefectures but an empty array for
/// municipalities and county-level areas with no prefecture city.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CityField {
    /// Field missing or `null`.
    #[default]
    Absent,
    /// A single string.
    Single(String),
    /// A list of strings (usually empty).
    Multiple(Vec<String>),
}

impl CityField {
    /// The first meaningful value carried by the field, if any.
    ///
    /// Empty strings are treated as no value.
    #[must_use]
    pub fn first_value(&self) -> Option<&str> {
        let value = match self {
            Self::Absent => None,
            Self::Single(s) => Some(s.as_str()),
            Self::Multiple(values) => values.first().map(String::as_str),
        };
        value.filter(|s| !s.is_empty())
    }
}

/// `regeocode.addressComponent` of a Gaode response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAddressComponent {
    /// Prefecture-level city.
    pub city: CityField,
    /// Province, or the full municipality name (e.g. "北京市").
    pub province: Option<String>,
    /// District / county.
    pub district: Option<String>,
    /// Township / street office.
    pub township: Option<String>,
    /// Country name.
    pub country: Option<String>,
    /// ISO country code.
    pub country_code: Option<String>,
}

/// `regeocode` object of a Gaode response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRegeocode {
    /// Provider-formatted full address.
    pub formatted_address: Option<String>,
    /// Structured breakdown.
    pub address_component: RawAddressComponent,
}

/// A decoded Gaode reverse-geocode response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRegeoResponse {
    /// `"1"` on success, `"0"` on failure.
    pub status: String,
    /// Human-readable status text (e.g. `"OK"`, `"INVALID_USER_KEY"`).
    pub info: String,
    /// Numeric status code as a string (e.g. `"10000"`).
    pub infocode: Option<String>,
    /// Present on success.
    pub regeocode: Option<RawRegeocode>,
}

impl RawRegeoResponse {
    /// Whether the provider reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Structured part of a [`NormalizedLocation`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAddress {
    /// Resolved city name.
    pub city: String,
    /// Province as reported by the provider.
    pub province: String,
    /// Township.
    pub neighbourhood: String,
    /// Country name.
    pub country: String,
    /// Country code.
    pub country_code: String,
}

/// Provider-agnostic reverse-geocode result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedLocation {
    /// Human-readable address; never empty on success.
    pub display_name: String,
    /// Structured address.
    pub address: NormalizedAddress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_of_each_variant() {
        assert_eq!(CityField::Absent.first_value(), None);
        assert_eq!(CityField::Single("深圳市".into()).first_value(), Some("深圳市"));
        assert_eq!(CityField::Single(String::new()).first_value(), None);
        assert_eq!(
            CityField::Multiple(vec!["上海".into(), "x".into()]).first_value(),
            Some("上海")
        );
        assert_eq!(CityField::Multiple(vec![]).first_value(), None);
        assert_eq!(CityField::Multiple(vec![String::new()]).first_value(), None);
    }

    #[test]
    fn success_sentinel() {
        let mut resp = RawRegeoResponse {
            status: "1".into(),
            ..Default::default()
        };
        assert!(resp.is_success());
        resp.status = "0".into();
        assert!(!resp.is_success());
    }

    #[test]
    fn normalized_location_uses_camel_case() {
        let loc = NormalizedLocation {
            display_name: "望京, 北京, 中国".into(),
            address: NormalizedAddress {
                city: "北京".into(),
                province: "北京市".into(),
                neighbourhood: "望京".into(),
                country: "中国".into(),
                country_code: "CN".into(),
            },
        };
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(json["displayName"], "望京, 北京, 中国");
        assert_eq!(json["address"]["countryCode"], "CN");
        assert_eq!(json["address"]["neighbourhood"], "望京");
    }
}
