use binplan::core::models::plate::PlateDimensions;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid plate size '{0}'. Expected '96', '384' or 'ROWSxCOLUMNS' (e.g., '16x24').")]
    InvalidPlateSize(String),

    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),

    #[error("Invalid sample flag '{0}'. Expected true/false, yes/no, y/n or 1/0.")]
    InvalidFlag(String),
}

/// Parses a destination plate size such as `96`, `384` or `16x24`.
pub fn parse_plate_size(input: &str) -> Result<PlateDimensions, ParseError> {
    let trimmed = input.trim();
    match trimmed {
        "96" => return Ok(PlateDimensions::PLATE_96),
        "384" => return Ok(PlateDimensions::PLATE_384),
        _ => {}
    }

    let invalid = || ParseError::InvalidPlateSize(input.to_string());
    let (rows, columns) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(invalid)?;
    let rows: usize = rows.trim().parse().map_err(|_| invalid())?;
    let columns: usize = columns.trim().parse().map_err(|_| invalid())?;
    PlateDimensions::new(rows, columns).map_err(|_| invalid())
}

pub fn parse_key_value(input: &str) -> Result<(&str, &str), ParseError> {
    input
        .split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| ParseError::InvalidKeyValue(input.to_string()))
}

/// Parses a sample-presence flag as found in plate-reader exports.
pub fn parse_flag(input: &str) -> Result<bool, ParseError> {
    match input.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(ParseError::InvalidFlag(input.to_string())),
    }
}
