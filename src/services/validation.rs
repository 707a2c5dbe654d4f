use std::sync::LazyLock;

use regex::Regex;

use crate::errors::internal::ValidationErrors;
use crate::types::internal::Role;

pub const DEFAULT_DEPARTMENT: &str = "Health";

const NAME_MAX_LEN: usize = 30;
const DEPARTMENT_MAX_LEN: usize = 100;
const PHONE_MAX_LEN: usize = 15;
const PASSWORD_MIN_LEN: usize = 8;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email regex is valid")
});

static PHONE_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+254|254|07|01)").expect("phone prefix regex is valid"));

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+254|254|07|01)\d+$").expect("phone regex is valid"));

/// Trim and lower-case an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Remove the spaces and hyphens people type into phone numbers
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| *c != ' ' && *c != '-').collect()
}

/// Blank department falls back to the default
pub fn normalize_department(department: Option<&str>) -> String {
    match department.map(str::trim) {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => DEFAULT_DEPARTMENT.to_string(),
    }
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("This field is required.".to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Enter a valid email address.".to_string());
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("This field is required.".to_string());
    }
    let len = name.chars().count();
    if len > NAME_MAX_LEN {
        return Err(format!(
            "Ensure this value has at most {} characters (it has {}).",
            NAME_MAX_LEN, len
        ));
    }
    Ok(())
}

pub fn validate_department(department: &str) -> Result<(), String> {
    let len = department.chars().count();
    if len > DEPARTMENT_MAX_LEN {
        return Err(format!(
            "Ensure this value has at most {} characters (it has {}).",
            DEPARTMENT_MAX_LEN, len
        ));
    }
    Ok(())
}

/// Format rules only; uniqueness is checked against the store first
pub fn validate_national_id_format(national_id: &str) -> Result<(), String> {
    if national_id.is_empty() {
        return Err("This field is required.".to_string());
    }
    if !national_id.chars().all(|c| c.is_ascii_digit()) {
        return Err("National ID must contain only digits.".to_string());
    }
    if !(7..=8).contains(&national_id.len()) {
        return Err("National ID must be 7 or 8 digits long.".to_string());
    }
    Ok(())
}

/// Validate an already-normalized phone number
pub fn validate_phone(phone: &str) -> Result<(), String> {
    if phone.is_empty() {
        return Err("This field is required.".to_string());
    }
    if phone.len() > PHONE_MAX_LEN {
        return Err(format!(
            "Ensure this value has at most {} characters (it has {}).",
            PHONE_MAX_LEN,
            phone.len()
        ));
    }
    if !PHONE_PREFIX_REGEX.is_match(phone) {
        return Err(
            "Phone number must be in Kenyan format (e.g., +254712345678, 0712345678)".to_string(),
        );
    }
    if !PHONE_REGEX.is_match(phone) {
        return Err("Phone number may only contain digits after the country prefix".to_string());
    }
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if !(9..=12).contains(&digits) {
        return Err("Phone number must have between 9 and 12 digits".to_string());
    }
    Ok(())
}

pub fn parse_role(role: &str) -> Result<Role, String> {
    role.parse::<Role>().map_err(|_| {
        format!(
            "Select a valid choice. {} is not one of the available choices.",
            role
        )
    })
}

/// Password rules, reported against `password2` when the two differ
pub fn validate_passwords(errors: &mut ValidationErrors, password1: &str, password2: &str) {
    if password1 != password2 {
        errors.add("password2", "The two password fields didn't match.");
        return;
    }
    if password1.chars().count() < PASSWORD_MIN_LEN {
        errors.add(
            "password2",
            format!(
                "This password is too short. It must contain at least {} characters.",
                PASSWORD_MIN_LEN
            ),
        );
    }
    if !password1.is_empty() && password1.chars().all(|c| c.is_ascii_digit()) {
        errors.add("password2", "This password is entirely numeric.");
    }
}
