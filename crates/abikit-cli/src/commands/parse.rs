//! `abikit parse`

use abikit_codec::Type;
use serde_json::Value as Json;

use crate::{output::Output, CliError};

/// Print the parsed descriptor of `signature`
pub fn execute(signature: &str, json: bool) -> Result<(), CliError> {
    let ty = Type::parse(signature)?;
    tracing::debug!("Parsed {} as {:?}", signature, ty);

    let dims: Vec<Json> = ty.dims().iter().map(|&d| Json::from(d)).collect();
    let size = ty.size().map_or(Json::Null, Json::from);
    let sub = ty.sub().to_string();

    Output::new(json)
        .field("type", &ty.to_string())
        .field("base", ty.base().name())
        .field("sub", &sub)
        .field_value("dims", Json::Array(dims))
        .field_value("size", size)
        .field_bool("dynamic", ty.is_dynamic())
        .message(&format!(
            "Type:    {}\nBase:    {}\nSub:     {}\nDims:    {:?}\nSize:    {}\nDynamic: {}",
            ty,
            ty.base().name(),
            sub,
            ty.dims(),
            ty.size()
                .map_or_else(|| "dynamic".to_string(), |s| s.to_string()),
            ty.is_dynamic()
        ))
        .print();

    Ok(())
}
