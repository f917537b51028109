//! Signup form validation.
//!
//! Per-field errors are collected but the form is re-rendered with a single
//! generic message; the individual errors only reach the server log.

use std::sync::LazyLock;

use regex::Regex;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s-]+$").expect("valid name regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

const PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// A signup payload that passed every field rule, fields trimmed.
#[derive(Debug)]
pub struct ValidSignup {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
}

pub fn validate_first_name(name: &str) -> Result<String, String> {
    validate_name(name, "First name", 50)
}

pub fn validate_last_name(name: &str) -> Result<String, String> {
    validate_name(name, "Last name", 100)
}

fn validate_name(name: &str, field: &str, max_len: usize) -> Result<String, String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }
    if trimmed.len() > max_len {
        return Err(format!("{field} cannot exceed {max_len} characters"));
    }
    if !NAME_RE.is_match(trimmed) {
        return Err(format!(
            "{field} can only contain letters, spaces, and hyphens"
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_username(username: &str) -> Result<String, String> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err("Username/Email is required".to_string());
    }
    if trimmed.len() > 255 {
        return Err("Username/Email cannot exceed 255 characters".to_string());
    }
    if !EMAIL_RE.is_match(trimmed) {
        return Err("Invalid email format".to_string());
    }
    Ok(trimmed.to_string())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one number".to_string());
    }
    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        return Err("Password must contain at least one special character".to_string());
    }
    Ok(())
}

pub fn validate_confirmation(password: &str, confirmation: &str) -> Result<(), String> {
    if password == confirmation {
        Ok(())
    } else {
        Err("Passwords do not match".to_string())
    }
}

/// Run every field rule; the store is never touched when any rule fails.
pub fn validate_signup(
    first_name: &str,
    last_name: &str,
    username: &str,
    password: &str,
    confirmation: &str,
) -> Result<ValidSignup, Vec<String>> {
    let mut errors = Vec::new();

    let first_name = validate_first_name(first_name).map_err(|e| errors.push(e)).ok();
    let last_name = validate_last_name(last_name).map_err(|e| errors.push(e)).ok();
    let username = validate_username(username).map_err(|e| errors.push(e)).ok();

    if let Err(e) = validate_password(password) {
        errors.push(e);
    }
    if let Err(e) = validate_confirmation(password, confirmation) {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(ValidSignup {
            first_name: first_name.unwrap_or_default(),
            last_name: last_name.unwrap_or_default(),
            username: username.unwrap_or_default(),
            password: password.to_string(),
        })
    } else {
        Err(errors)
    }
}

pub fn validate_message_id(id: i32) -> Result<i32, String> {
    if id <= 0 {
        return Err(format!(
            "Invalid message ID: {}. ID must be a positive integer",
            id
        ));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_names() {
        assert_eq!(validate_first_name("  Jane ").unwrap(), "Jane");
        assert!(validate_first_name("Mary-Jane").is_ok());
        assert!(validate_first_name("").is_err());
        assert!(validate_first_name("   ").is_err());
        assert!(validate_first_name("J4ne").is_err());
        assert!(validate_first_name(&"a".repeat(51)).is_err());
        assert!(validate_last_name(&"a".repeat(100)).is_ok());
        assert!(validate_last_name(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username(" jane@x.com ").unwrap(), "jane@x.com");
        assert!(validate_username("").is_err());
        assert!(validate_username("not-an-email").is_err());
        assert!(validate_username("two@@x.com").is_err());
        let long = format!("{}@x.com", "a".repeat(255));
        assert!(validate_username(&long).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("Abc12345!").is_ok());
        assert!(validate_password("Abc1234!").is_ok());
        assert!(validate_password("Ab1!").is_err()); // too short
        assert!(validate_password("abc12345!").is_err()); // no uppercase
        assert!(validate_password("ABC12345!").is_err()); // no lowercase
        assert!(validate_password("Abcdefgh!").is_err()); // no digit
        assert!(validate_password("Abc123456").is_err()); // no symbol
        assert!(validate_password("Abc12345#").is_err()); // symbol outside the fixed set
    }

    #[test]
    fn test_validate_confirmation() {
        assert!(validate_confirmation("Abc12345!", "Abc12345!").is_ok());
        assert!(validate_confirmation("Abc12345!", "Abc12345?").is_err());
    }

    #[test]
    fn test_validate_signup_collects_all_errors() {
        let errors = validate_signup("", "Doe", "nope", "short", "different").unwrap_err();
        assert_eq!(errors.len(), 4);

        let valid = validate_signup("Jane", "Doe", "jane@x.com", "Abc12345!", "Abc12345!").unwrap();
        assert_eq!(valid.first_name, "Jane");
        assert_eq!(valid.username, "jane@x.com");
    }

    #[test]
    fn test_validate_message_id() {
        assert!(validate_message_id(1).is_ok());
        assert!(validate_message_id(0).is_err());
        assert!(validate_message_id(-3).is_err());
    }
}
