//! `abikit decode`

use abikit_codec::{decode_abi, utils::decode_hex};
use serde_json::Value as Json;

use super::parse_type_list;
use crate::values::to_json;
use crate::{config::Config, output::Output, CliError};

/// Decode hex data against a comma-separated type list
pub fn execute(types: &str, data: &str, config: &Config, json: bool) -> Result<(), CliError> {
    let types = parse_type_list(types)?;
    let data = decode_hex(data.trim()).map_err(|e| CliError::InvalidHex(e.to_string()))?;
    tracing::debug!("Decoding {} types from {} bytes", types.len(), data.len());

    let values = decode_abi(&types, &data)?;
    let values = Json::Array(
        values
            .iter()
            .map(|value| to_json(value, config.hex_prefix))
            .collect(),
    );

    Output::new(json)
        .message(&values.to_string())
        .field_value("values", values)
        .print();

    Ok(())
}
