use crate::error::{ApiError, Result};

/// Validates a login username.
///
/// The SSO frontend only accepts full institutional addresses, so anything
/// without an `@` and a `.` would just burn a round trip.
///
/// # Arguments
///
/// * `username` - The username to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the username is valid.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() || !username.contains('@') || !username.contains('.') {
        return Err(ApiError::BadRequest(
            "Please provide a valid email / username".to_string(),
        ));
    }

    Ok(())
}

/// Validates a login password.
///
/// # Arguments
///
/// * `password` - The password to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the password is valid.
pub fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(ApiError::BadRequest(
            "Please provide a valid password".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_institutional_addresses() {
        assert!(validate_username("jane.doe42@login.cuny.edu").is_ok());
    }

    #[test]
    fn rejects_bare_usernames() {
        assert!(validate_username("janedoe").is_err());
        assert!(validate_username("jane@nodot").is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn rejects_empty_passwords() {
        assert!(validate_password("").is_err());
        assert!(validate_password("hunter2").is_ok());
    }
}
