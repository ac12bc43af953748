//! Subcommand implementations

pub mod decode;
pub mod encode;
pub mod parse;

use abikit_codec::Type;

use crate::CliError;

/// Split a comma-separated type list and parse each signature
pub(crate) fn parse_type_list(list: &str) -> Result<Vec<Type>, CliError> {
    list.split(',')
        .map(str::trim)
        .filter(|sig| !sig.is_empty())
        .map(|sig| Type::parse(sig).map_err(CliError::from))
        .collect()
}
