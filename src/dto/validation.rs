//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a team name contains something other than whitespace.
///
/// # Examples
///
/// ```ignore
/// validate_team_name("Hawks") // Ok
/// validate_team_name("   ")   // Err - blank
/// ```
pub fn validate_team_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("team_name_blank");
        err.message = Some("Team name must not be blank".into());
        return Err(err);
    }

    if name.chars().any(char::is_control) {
        let mut err = ValidationError::new("team_name_format");
        err.message = Some("Team name must not contain control characters".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_team_name_valid() {
        assert!(validate_team_name("Hawks").is_ok());
        assert!(validate_team_name(" Night Owls ").is_ok());
    }

    #[test]
    fn test_validate_team_name_invalid() {
        assert!(validate_team_name("").is_err());
        assert!(validate_team_name(" \t ").is_err());
        assert!(validate_team_name("Ha\nwks").is_err());
    }
}
