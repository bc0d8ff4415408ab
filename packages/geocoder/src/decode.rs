//! Decodes Gaode `regeo` JSON bodies into the raw provider types.
//!
//! Gaode is loose with types: string fields that have no value come back
//! as an empty array (`[]`) instead of `""` or `null`, and `city` may be
//! a string or a list. Every field is decoded explicitly here so the
//! normalizer only ever sees [`CityField`] variants and `Option<String>`.
//!
//! See <https://lbs.amap.com/api/webservice/guide/api/georegeo>

use gaode_regeo_geocoder_models::{
    CityField, RawAddressComponent, RawRegeoResponse, RawRegeocode,
};
use serde_json::Value;

use crate::GeocodeError;

/// The request-level `status`/`info`/`infocode` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderStatus {
    /// `"1"` on success.
    pub status: String,
    /// Human-readable status text.
    pub info: String,
    /// Numeric status code.
    pub infocode: Option<String>,
}

/// Reads only the request-level status fields.
///
/// # Errors
///
/// Returns [`GeocodeError::Decode`] if the body is not an object or
/// `status` is missing. `info` and `infocode` never fail: odd values read
/// as empty so a failed request is still reported by its status.
pub fn parse_status(body: &Value) -> Result<ProviderStatus, GeocodeError> {
    let obj = body.as_object().ok_or_else(|| GeocodeError::Decode {
        message: "Gaode response is not an object".to_string(),
    })?;

    let status = scalar_string(obj.get("status"), "status")?.ok_or_else(|| {
        GeocodeError::Decode {
            message: "Missing status in Gaode response".to_string(),
        }
    })?;
    let info = lenient_text(obj.get("info")).unwrap_or_default();
    let infocode = lenient_text(obj.get("infocode"));

    Ok(ProviderStatus {
        status,
        info,
        infocode,
    })
}

/// Decodes a full Gaode reverse-geocode response.
///
/// `regeocode` is only required when the status is the success sentinel.
///
/// # Errors
///
/// Returns [`GeocodeError::Decode`] if any field has an unexpected JSON
/// type, or a successful response has no `regeocode` object.
pub fn parse_response(body: &Value) -> Result<RawRegeoResponse, GeocodeError> {
    let ProviderStatus {
        status,
        info,
        infocode,
    } = parse_status(body)?;

    let mut response = RawRegeoResponse {
        status,
        info,
        infocode,
        regeocode: None,
    };

    match body.get("regeocode") {
        Some(regeocode @ Value::Object(_)) => {
            response.regeocode = Some(parse_regeocode(regeocode)?);
        }
        None | Some(Value::Null) => {}
        Some(Value::Array(values)) if values.is_empty() => {}
        Some(other) if response.is_success() => {
            return Err(GeocodeError::Decode {
                message: format!("regeocode has unexpected type: {other}"),
            });
        }
        // Failed responses are reported by status alone.
        Some(_) => {}
    }

    if response.is_success() && response.regeocode.is_none() {
        return Err(GeocodeError::Decode {
            message: "Missing regeocode in successful Gaode response".to_string(),
        });
    }

    Ok(response)
}

/// Decodes the `regeocode` object.
///
/// # Errors
///
/// Returns [`GeocodeError::Decode`] on unexpected field types.
pub fn parse_regeocode(regeocode: &Value) -> Result<RawRegeocode, GeocodeError> {
    let formatted_address = optional_string(regeocode.get("formatted_address"), "formatted_address")?;

    let address_component = match regeocode.get("addressComponent") {
        Some(component @ Value::Object(_)) => parse_address_component(component)?,
        Some(Value::Null) | None => RawAddressComponent::default(),
        Some(Value::Array(values)) if values.is_empty() => RawAddressComponent::default(),
        Some(other) => {
            return Err(GeocodeError::Decode {
                message: format!("addressComponent has unexpected type: {other}"),
            });
        }
    };

    Ok(RawRegeocode {
        formatted_address,
        address_component,
    })
}

/// Decodes `regeocode.addressComponent`.
///
/// # Errors
///
/// Returns [`GeocodeError::Decode`] on unexpected field types.
pub fn parse_address_component(component: &Value) -> Result<RawAddressComponent, GeocodeError> {
    Ok(RawAddressComponent {
        city: city_field(component.get("city"))?,
        province: optional_string(component.get("province"), "province")?,
        district: optional_string(component.get("district"), "district")?,
        township: optional_string(component.get("township"), "township")?,
        country: optional_string(component.get("country"), "country")?,
        country_code: optional_string(component.get("country_code"), "country_code")?,
    })
}

/// Decodes the polymorphic `city` field.
///
/// # Errors
///
/// Returns [`GeocodeError::Decode`] if the field is neither absent, a
/// string, nor an array of strings.
pub fn city_field(value: Option<&Value>) -> Result<CityField, GeocodeError> {
    match value {
        None | Some(Value::Null) => Ok(CityField::Absent),
        Some(Value::String(s)) => Ok(CityField::Single(s.clone())),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| {
                v.as_str().map(String::from).ok_or_else(|| GeocodeError::Decode {
                    message: format!("city list contains a non-string element: {v}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(CityField::Multiple),
        Some(other) => Err(GeocodeError::Decode {
            message: format!("city has unexpected type: {other}"),
        }),
    }
}

/// Decodes a field Gaode emits as a string, or as `[]` when empty.
///
/// Empty strings decode to `None`.
fn optional_string(value: Option<&Value>, field: &str) -> Result<Option<String>, GeocodeError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Array(values)) if values.is_empty() => Ok(None),
        Some(other) => Err(GeocodeError::Decode {
            message: format!("{field} has unexpected type: {other}"),
        }),
    }
}

/// Decodes a status-like field that may be a string or an integer.
fn scalar_string(value: Option<&Value>, field: &str) -> Result<Option<String>, GeocodeError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(GeocodeError::Decode {
            message: format!("{field} has unexpected type: {other}"),
        }),
    }
}

/// Reads a diagnostic field as text, ignoring anything that is not a
/// string or number.
fn lenient_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
