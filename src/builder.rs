//! Transaction builder
//!
//! Turns the raw registration form into the entry-function payload the
//! `PropertyRegistry` module expects. Pure and deterministic.

use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;

/// Module name hosting the entry function
pub const MODULE_NAME: &str = "PropertyRegistry";
/// Entry function invoked for every registration
pub const REGISTER_FUNCTION: &str = "register_property";
/// Fixed-point scale for property values (two decimals)
pub const VALUE_SCALE: u64 = 100;
const VALUE_DECIMALS: usize = 2;

/// Raw, unvalidated registration form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDraft {
    pub property_id: String,
    pub value: f64,
    pub address: String,
}

impl PropertyDraft {
    pub fn new(property_id: impl Into<String>, value: f64, address: impl Into<String>) -> Self {
        Self {
            property_id: property_id.into(),
            value,
            address: address.into(),
        }
    }

    /// True when every field holds its empty default
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Entry-function payload handed to the wallet for signing
///
/// Serializes to the wire shape the ledger program's call convention requires:
/// `{"function": "...", "type_arguments": [], "arguments": [id, scaled_value]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPayload {
    #[serde(rename = "function")]
    function_path: String,
    type_arguments: Vec<String>,
    arguments: [u64; 2],
}

impl TransactionPayload {
    /// Fully qualified `<address>::PropertyRegistry::register_property`
    pub fn function_path(&self) -> &str {
        &self.function_path
    }

    /// Always empty, the entry function is not generic
    pub fn type_arguments(&self) -> &[String] {
        &self.type_arguments
    }

    pub fn property_id(&self) -> u64 {
        self.arguments[0]
    }

    /// Value in hundredths
    pub fn scaled_value(&self) -> u64 {
        self.arguments[1]
    }

    pub fn arguments(&self) -> &[u64; 2] {
        &self.arguments
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "function": self.function_path,
            "type_arguments": self.type_arguments,
            "arguments": self.arguments,
        })
    }
}

/// Validate a draft and build the registration payload
///
/// The value is truncated to hundredths, never rounded: `12.345` encodes as
/// `1234`. The truncation applies to the decimal the user entered, so
/// `19.99` encodes as `1999` even though `19.99 * 100.0` is `1998.999...` in
/// binary floating point.
pub fn build(
    draft: &PropertyDraft,
    module_address: Option<&str>,
) -> Result<TransactionPayload, RegistrationError> {
    let module_address = module_address
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .ok_or(RegistrationError::ConfigMissing)?;

    let property_id = parse_property_id(&draft.property_id)?;
    let scaled_value = scale_value(draft.value)?;

    let payload = TransactionPayload {
        function_path: format!("{}::{}::{}", module_address, MODULE_NAME, REGISTER_FUNCTION),
        type_arguments: Vec::new(),
        arguments: [property_id, scaled_value],
    };
    log::debug!("   📝 Built payload: {}", payload.to_json());

    Ok(payload)
}

fn parse_property_id(raw: &str) -> Result<u64, RegistrationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RegistrationError::invalid_input("property ID is required"));
    }
    let invalid = || {
        RegistrationError::invalid_input(format!(
            "property ID must be a non-negative integer, got {:?}",
            raw
        ))
    };
    // `u64::from_str` accepts a leading '+', digits only here
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    trimmed.parse::<u64>().map_err(|_| invalid())
}

/// Encode a display value as hundredths, truncating extra decimals
pub fn scale_value(value: f64) -> Result<u64, RegistrationError> {
    if !value.is_finite() {
        return Err(RegistrationError::invalid_input(format!(
            "value must be a finite number, got {}",
            value
        )));
    }
    if value < 0.0 {
        return Err(RegistrationError::invalid_input(format!(
            "value must not be negative, got {}",
            value
        )));
    }

    if value == 0.0 {
        return Ok(0);
    }

    // `Display` for f64 is the shortest decimal that round-trips and never
    // uses exponent notation.
    let rendered = value.to_string();
    let (whole, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let cents: String = fraction
        .chars()
        .chain(std::iter::repeat('0'))
        .take(VALUE_DECIMALS)
        .collect();

    let out_of_range =
        || RegistrationError::invalid_input(format!("value {} is too large to encode", value));
    let whole: u64 = whole.parse().map_err(|_| out_of_range())?;
    let cents: u64 = cents.parse().map_err(|_| out_of_range())?;

    whole
        .checked_mul(VALUE_SCALE)
        .and_then(|scaled| scaled.checked_add(cents))
        .ok_or_else(out_of_range)
}
