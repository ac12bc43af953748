//! `abikit encode`

use abikit_codec::encode_abi;
use serde_json::Value as Json;

use super::parse_type_list;
use crate::values::{format_hex, from_json};
use crate::{config::Config, output::Output, CliError};

/// Encode a JSON array of values against a comma-separated type list
pub fn execute(types: &str, values: &str, config: &Config, json: bool) -> Result<(), CliError> {
    let types = parse_type_list(types)?;
    let values: Json = serde_json::from_str(values)?;
    let values = values
        .as_array()
        .ok_or_else(|| CliError::InvalidInput("Values must be a JSON array".to_string()))?;
    if values.len() != types.len() {
        return Err(CliError::InvalidInput(format!(
            "Expected {} values, got {}",
            types.len(),
            values.len()
        )));
    }

    let values = types
        .iter()
        .zip(values)
        .map(|(ty, value)| from_json(ty, value))
        .collect::<Result<Vec<_>, _>>()?;
    let encoded = encode_abi(&types, &values)?;
    tracing::debug!("Encoded {} arguments into {} bytes", values.len(), encoded.len());

    let hex = format_hex(&encoded, config.hex_prefix);
    Output::new(json)
        .field("data", &hex)
        .field_value("length", Json::from(encoded.len()))
        .message(&hex)
        .print();

    Ok(())
}
