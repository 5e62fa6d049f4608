use husk_shaker::{IdentifierError, check_identifier};

/// Parse and validate a marker function name.
///
/// Marker names are matched against callee identifiers, so they must be
/// valid JavaScript identifiers as checked by
/// [`husk_shaker::check_identifier`], the same check `ShakerConfig::validate`
/// applies to config files and environment variables.
///
/// # Errors
///
/// Returns an error message if the identifier is invalid.
pub fn parse_marker(s: &str) -> Result<String, String> {
    match check_identifier(s) {
        Ok(()) => Ok(s.to_string()),
        Err(IdentifierError::Empty) => Err("Marker name cannot be empty".to_string()),
        Err(IdentifierError::InvalidStart(_)) => Err(format!(
            "Marker name must start with a letter, underscore, or dollar sign: '{}'",
            s
        )),
        Err(IdentifierError::InvalidChar(c)) => Err(format!(
            "Marker name can only contain letters, numbers, underscores, or dollar signs: '{}' contains '{}'",
            s, c
        )),
    }
}
