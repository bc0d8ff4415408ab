//! Normalizes decoded Gaode responses into [`NormalizedLocation`] values.
//!
//! The interesting part is the `city` field. Gaode leaves it empty for
//! municipalities and for county-level areas without a prefecture city,
//! so [`resolve_city`] falls back in this order:
//!
//! 1. the provider's own `city` value (string, or first list element);
//! 2. the short name of a municipality (`"北京市"` → `"北京"`);
//! 3. the district;
//! 4. the province.

use gaode_regeo_geocoder_models::{
    NormalizedAddress, NormalizedLocation, RawAddressComponent, RawRegeoResponse, RawRegeocode,
    STATUS_OK,
};

use crate::GeocodeError;
use crate::decode::{parse_response, parse_status};
use crate::municipality::{is_municipality, municipality_short_name};

/// Separator between parts of a synthesized display name.
const DISPLAY_NAME_SEPARATOR: &str = ", ";

/// Normalizes a raw JSON response body.
///
/// The request-level status is checked before anything else is decoded,
/// so a failed request is always reported as [`GeocodeError::Provider`]
/// even if the rest of the body is malformed.
///
/// # Errors
///
/// Returns [`GeocodeError::Provider`] if the provider reported failure,
/// or [`GeocodeError::Decode`] if the body does not have the expected
/// shape.
pub fn normalize_value(body: &serde_json::Value) -> Result<NormalizedLocation, GeocodeError> {
    let status = parse_status(body)?;
    if status.status != STATUS_OK {
        log::warn!(
            "Gaode reported failure: status={} info={} infocode={:?}",
            status.status,
            status.info,
            status.infocode
        );
        return Err(GeocodeError::Provider { info: status.info });
    }

    normalize(&parse_response(body)?)
}

/// Normalizes a decoded response.
///
/// # Errors
///
/// Returns [`GeocodeError::Provider`] if the provider reported failure,
/// or [`GeocodeError::Decode`] if a successful response carries no
/// `regeocode` or no usable address parts.
pub fn normalize(response: &RawRegeoResponse) -> Result<NormalizedLocation, GeocodeError> {
    if !response.is_success() {
        log::warn!(
            "Gaode reported failure: status={} info={}",
            response.status,
            response.info
        );
        return Err(GeocodeError::Provider {
            info: response.info.clone(),
        });
    }

    let regeocode = response
        .regeocode
        .as_ref()
        .ok_or_else(|| GeocodeError::Decode {
            message: "Missing regeocode in successful Gaode response".to_string(),
        })?;

    normalize_regeocode(regeocode)
}

/// Builds the location record from a `regeocode` object.
///
/// # Errors
///
/// Returns [`GeocodeError::Decode`] if neither a formatted address nor
/// any address part is available to name the location.
pub fn normalize_regeocode(regeocode: &RawRegeocode) -> Result<NormalizedLocation, GeocodeError> {
    let component = &regeocode.address_component;

    let address = NormalizedAddress {
        city: resolve_city(component),
        province: component.province.clone().unwrap_or_default(),
        neighbourhood: component.township.clone().unwrap_or_default(),
        country: component.country.clone().unwrap_or_default(),
        country_code: component.country_code.clone().unwrap_or_default(),
    };

    let display_name = match regeocode.formatted_address.as_deref() {
        Some(formatted) if !formatted.is_empty() => formatted.to_string(),
        _ => synthesize_display_name(&address, component.district.as_deref().unwrap_or("")),
    };

    if display_name.is_empty() {
        return Err(GeocodeError::Decode {
            message: "Gaode response contained no address parts".to_string(),
        });
    }

    Ok(NormalizedLocation {
        display_name,
        address,
    })
}

/// Resolves the city name from an address component.
///
/// Returns an empty string only when `city`, `province` and `district`
/// are all empty.
#[must_use]
pub fn resolve_city(component: &RawAddressComponent) -> String {
    if let Some(city) = component.city.first_value() {
        log::trace!("city from provider: {city}");
        return city.to_string();
    }

    let province = component.province.as_deref().unwrap_or("");
    if let Some(short) = municipality_short_name(province) {
        log::trace!("city from municipality {province}: {short}");
        return short.to_string();
    }

    match component.district.as_deref() {
        Some(district) if !district.is_empty() => {
            log::trace!("city from district: {district}");
            district.to_string()
        }
        _ => {
            log::trace!("city from province: {province}");
            province.to_string()
        }
    }
}

/// Builds a display name from the non-empty address parts, most
/// specific first.
///
/// For municipalities the district and province are left out: the city
/// already carries the municipality name.
#[must_use]
pub fn synthesize_display_name(address: &NormalizedAddress, district: &str) -> String {
    let municipality = is_municipality(&address.province);

    let parts = [
        address.neighbourhood.as_str(),
        if municipality { "" } else { district },
        address.city.as_str(),
        if municipality { "" } else { address.province.as_str() },
        address.country.as_str(),
    ];

    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(DISPLAY_NAME_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use gaode_regeo_geocoder_models::CityField;
    use serde_json::json;

    use super::*;

    fn component(city: CityField, province: &str, district: &str) -> RawAddressComponent {
        RawAddressComponent {
            city,
            province: Some(province.to_string()).filter(|s| !s.is_empty()),
            district: Some(district.to_string()).filter(|s| !s.is_empty()),
            ..Default::default()
        }
    }

    fn ok_response(regeocode: RawRegeocode) -> RawRegeoResponse {
        RawRegeoResponse {
            status: STATUS_OK.to_string(),
            info: "OK".to_string(),
            infocode: Some("10000".to_string()),
            regeocode: Some(regeocode),
        }
    }

    #[test]
    fn city_from_list() {
        let c = component(CityField::Multiple(vec!["上海".into()]), "上海市", "");
        assert_eq!(resolve_city(&c), "上海");
    }

    #[test]
    fn city_from_string() {
        let c = component(CityField::Single("深圳市".into()), "广东省", "南山区");
        assert_eq!(resolve_city(&c), "深圳市");
    }

    #[test]
    fn empty_city_falls_back_to_municipality() {
        let c = component(CityField::Single(String::new()), "上海市", "");
        assert_eq!(resolve_city(&c), "上海");

        let c = component(CityField::Multiple(vec![]), "重庆市", "渝中区");
        assert_eq!(resolve_city(&c), "重庆");
    }

    #[test]
    fn absent_city_falls_back_to_district() {
        let c = component(CityField::Absent, "广东省", "南山区");
        assert_eq!(resolve_city(&c), "南山区");
    }

    #[test]
    fn absent_city_and_district_fall_back_to_province() {
        let c = component(CityField::Absent, "广东省", "");
        assert_eq!(resolve_city(&c), "广东省");
    }

    #[test]
    fn unlisted_municipality_rendering_falls_through_to_district() {
        let c = component(CityField::Absent, "北京", "朝阳区");
        assert_eq!(resolve_city(&c), "朝阳区");
    }

    #[test]
    fn synthesizes_municipality_display_name() {
        let address = NormalizedAddress {
            city: "北京".into(),
            province: "北京市".into(),
            neighbourhood: "望京".into(),
            country: "中国".into(),
            country_code: String::new(),
        };
        assert_eq!(synthesize_display_name(&address, "朝阳区"), "望京, 北京, 中国");
    }

    #[test]
    fn synthesizes_province_display_name() {
        let address = NormalizedAddress {
            city: "深圳".into(),
            province: "广东省".into(),
            neighbourhood: String::new(),
            country: "中国".into(),
            country_code: String::new(),
        };
        assert_eq!(
            synthesize_display_name(&address, "南山区"),
            "南山区, 深圳, 广东省, 中国"
        );
    }

    #[test]
    fn formatted_address_is_used_verbatim() {
        let regeocode = RawRegeocode {
            formatted_address: Some("北京市朝阳区望京街道阜通东大街6号".into()),
            address_component: RawAddressComponent {
                township: Some("望京街道".into()),
                country: Some("中国".into()),
                ..component(CityField::Multiple(vec![]), "北京市", "朝阳区")
            },
        };
        let location = normalize(&ok_response(regeocode)).unwrap();
        assert_eq!(location.display_name, "北京市朝阳区望京街道阜通东大街6号");
        assert_eq!(location.address.city, "北京");
        assert_eq!(location.address.province, "北京市");
        assert_eq!(location.address.neighbourhood, "望京街道");
    }

    #[test]
    fn missing_formatted_address_is_synthesized() {
        let regeocode = RawRegeocode {
            formatted_address: None,
            address_component: RawAddressComponent {
                township: Some("望京".into()),
                country: Some("中国".into()),
                country_code: Some("CN".into()),
                ..component(CityField::Absent, "北京市", "朝阳区")
            },
        };
        let location = normalize(&ok_response(regeocode)).unwrap();
        assert_eq!(location.display_name, "望京, 北京, 中国");
        assert_eq!(location.address.country_code, "CN");
    }

    #[test]
    fn provider_failure_carries_info() {
        let response = RawRegeoResponse {
            status: "0".into(),
            info: "INVALID_USER_KEY".into(),
            infocode: Some("10001".into()),
            regeocode: Some(RawRegeocode {
                formatted_address: Some("ignored".into()),
                ..Default::default()
            }),
        };
        match normalize(&response) {
            Err(GeocodeError::Provider { info }) => assert_eq!(info, "INVALID_USER_KEY"),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn provider_failure_wins_over_malformed_body() {
        let body = json!({
            "status": "0",
            "info": "DAILY_QUERY_OVER_LIMIT",
            "regeocode": {"addressComponent": {"city": 12}}
        });
        match normalize_value(&body) {
            Err(GeocodeError::Provider { info }) => assert_eq!(info, "DAILY_QUERY_OVER_LIMIT"),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn provider_failure_wins_over_odd_info_fields() {
        let body = json!({"status": "0", "info": "INVALID_USER_KEY", "infocode": {"x": 1}});
        match normalize_value(&body) {
            Err(GeocodeError::Provider { info }) => assert_eq!(info, "INVALID_USER_KEY"),
            other => panic!("expected provider error, got {other:?}"),
        }

        let body = json!({"status": "0", "info": [], "infocode": "10001"});
        match normalize_value(&body) {
            Err(GeocodeError::Provider { info }) => assert_eq!(info, ""),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_city_is_decode_error() {
        let body = json!({
            "status": "1",
            "info": "OK",
            "regeocode": {"addressComponent": {"city": {"name": "x"}, "province": "广东省"}}
        });
        assert!(matches!(
            normalize_value(&body),
            Err(GeocodeError::Decode { .. })
        ));
    }

    #[test]
    fn empty_result_is_not_a_success() {
        let body = json!({
            "status": "1",
            "info": "OK",
            "regeocode": {
                "formatted_address": [],
                "addressComponent": {"city": [], "province": [], "district": [], "country": []}
            }
        });
        assert!(matches!(
            normalize_value(&body),
            Err(GeocodeError::Decode { .. })
        ));
    }

    #[test]
    fn normalizes_full_body() {
        let body = json!({
            "status": "1",
            "info": "OK",
            "infocode": "10000",
            "regeocode": {
                "formatted_address": [],
                "addressComponent": {
                    "city": "深圳",
                    "province": "广东省",
                    "district": "南山区",
                    "township": [],
                    "country": "中国",
                    "country_code": "CN"
                }
            }
        });
        let location = normalize_value(&body).unwrap();
        assert_eq!(location.display_name, "南山区, 深圳, 广东省, 中国");
        assert_eq!(
            location.address,
            NormalizedAddress {
                city: "深圳".into(),
                province: "广东省".into(),
                neighbourhood: String::new(),
                country: "中国".into(),
                country_code: "CN".into(),
            }
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let body = json!({
            "status": "1",
            "info": "OK",
            "regeocode": {
                "addressComponent": {
                    "city": ["上海"],
                    "province": "上海市",
                    "district": "浦东新区",
                    "township": "陆家嘴街道",
                    "country": "中国"
                }
            }
        });
        let first = normalize_value(&body).unwrap();
        let second = normalize_value(&body).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.display_name, "陆家嘴街道, 上海, 中国");
    }
}
