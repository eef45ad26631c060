use regex::Regex;

use crate::errors::ValidationError;

const EMAIL_RE: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const NAME_MIN_LENGTH: usize = 2;
const NAME_MAX_LENGTH: usize = 100;
const PASSWORD_MIN_LENGTH: usize = 8;
const PASSWORD_SPECIAL_CHARS: &str = "@$!%*#?&";

pub fn validate_first_name(first_name: &str) -> Result<(), ValidationError> {
    let length = first_name.chars().count();
    if length < NAME_MIN_LENGTH {
        return Err(ValidationError("first name must be at least 2 characters long"));
    };
    if length > NAME_MAX_LENGTH {
        return Err(ValidationError("first name is too long"));
    };
    Ok(())
}

pub fn validate_last_name(last_name: &str) -> Result<(), ValidationError> {
    let length = last_name.chars().count();
    if length < NAME_MIN_LENGTH {
        return Err(ValidationError("last name must be at least 2 characters long"));
    };
    if length > NAME_MAX_LENGTH {
        return Err(ValidationError("last name is too long"));
    };
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email_regexp = Regex::new(EMAIL_RE).expect("regexp should be valid");
    if !email_regexp.is_match(email) {
        return Err(ValidationError("please provide a valid email address"));
    };
    Ok(())
}

/// At least 8 characters: a letter, a digit and one of `@$!%*#?&`,
/// no other characters allowed
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let is_allowed = |char: char| {
        char.is_ascii_alphanumeric() || PASSWORD_SPECIAL_CHARS.contains(char)
    };
    if password.chars().count() < PASSWORD_MIN_LENGTH
        || !password.chars().all(is_allowed)
        || !password.chars().any(|char| char.is_ascii_alphabetic())
        || !password.chars().any(|char| char.is_ascii_digit())
        || !password.chars().any(|char| PASSWORD_SPECIAL_CHARS.contains(char))
    {
        return Err(ValidationError(
            "password must be at least 8 characters long and contain a letter, a number and a special character (@$!%*#?&)",
        ));
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_names() {
        assert!(validate_first_name("Al").is_ok());
        assert!(validate_first_name("A").is_err());
        assert!(validate_last_name("Ng").is_ok());
        assert!(validate_last_name("").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("user@example").is_err());
        assert!(validate_email("user example@test.com").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret1!").is_ok());
        assert!(validate_password("Passw0rd#2024").is_ok());
        // Too short
        assert!(validate_password("ab1!").is_err());
        // No digit
        assert!(validate_password("password!").is_err());
        // No special character
        assert!(validate_password("password1").is_err());
        // Character outside of the allowed set
        assert!(validate_password("pass word1!").is_err());
    }
}
