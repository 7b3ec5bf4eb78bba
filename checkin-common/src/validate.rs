//! Field validation helpers
//!
//! Pure, deterministic checks that gate intake stage transitions. None of
//! these mutate state; they only decide whether a form may advance.

use crate::error::FieldError;
use crate::model::{InstallerForm, LocationForm, ProjectForm};

/// Accepts `local@domain.tld`-shaped addresses with no embedded
/// whitespace and at least one `.` after the `@`.
pub fn validate_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Accepts international-capable phone numbers: after stripping
/// whitespace, an optional leading `+` followed by 1-16 digits with no
/// leading zero.
pub fn validate_phone(phone: &str) -> bool {
    let stripped: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = stripped.strip_prefix('+').unwrap_or(&stripped);
    let mut chars = digits.chars();
    match chars.next() {
        Some(c) if ('1'..='9').contains(&c) => {}
        _ => return false,
    }
    let rest: Vec<char> = chars.collect();
    rest.len() <= 15 && rest.iter().all(|c| c.is_ascii_digit())
}

/// Accepts 5-digit ZIP codes and ZIP+4 (`NNNNN` or `NNNNN-NNNN`)
pub fn validate_zip(zip: &str) -> bool {
    let bytes = zip.as_bytes();
    match bytes.len() {
        5 => bytes.iter().all(u8::is_ascii_digit),
        10 => {
            bytes[..5].iter().all(u8::is_ascii_digit)
                && bytes[5] == b'-'
                && bytes[6..].iter().all(u8::is_ascii_digit)
        }
        _ => false,
    }
}

impl InstallerForm {
    /// Field-level validation for the installer intake step
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        } else if self.name.trim().chars().count() < 2 {
            errors.push(FieldError::new(
                "name",
                "Name must be at least 2 characters",
            ));
        }
        if self.email.trim().is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        } else if !validate_email(self.email.trim()) {
            errors.push(FieldError::new("email", "Please enter a valid email"));
        }
        if self.phone.trim().is_empty() {
            errors.push(FieldError::new("phone", "Phone number is required"));
        } else if !validate_phone(&self.phone) {
            errors.push(FieldError::new(
                "phone",
                "Please enter a valid phone number",
            ));
        }
        if self.company.trim().is_empty() {
            errors.push(FieldError::new("company", "Company name is required"));
        }
        errors
    }
}

impl LocationForm {
    /// Field-level validation for the location intake step
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.address.trim().is_empty() {
            errors.push(FieldError::new("address", "Address is required"));
        }
        if self.city.trim().is_empty() {
            errors.push(FieldError::new("city", "City is required"));
        }
        if self.state.trim().is_empty() {
            errors.push(FieldError::new("state", "State is required"));
        }
        if self.zip.trim().is_empty() {
            errors.push(FieldError::new("zip", "ZIP code is required"));
        } else if !validate_zip(self.zip.trim()) {
            errors.push(FieldError::new("zip", "Please enter a valid ZIP code"));
        }
        errors
    }
}

impl ProjectForm {
    /// Field-level validation for the project intake step; the
    /// description is optional.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Project name is required"));
        }
        if self.client.trim().is_empty() {
            errors.push(FieldError::new("client", "Client name is required"));
        }
        errors
    }
}
