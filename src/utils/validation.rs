use lazy_static::lazy_static;
use regex::Regex;

use crate::utils::FieldError;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("email regex is valid");
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Collects field errors while reading request fields, so every failing
/// field is reported in one response.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the trimmed value, or records `message` when missing or blank.
    pub fn required(&mut self, field: &str, value: Option<&str>, message: &str) -> String {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => {
                self.errors.push(FieldError::new(field, message));
                String::new()
            }
        }
    }

    /// Returns the trimmed address with its case untouched.
    pub fn email(&mut self, field: &str, value: Option<&str>, message: &str) -> String {
        match value.map(str::trim) {
            Some(v) if is_valid_email(v) => v.to_string(),
            _ => {
                self.errors.push(FieldError::new(field, message));
                String::new()
            }
        }
    }

    pub fn min_len(&mut self, field: &str, value: Option<&str>, min: usize, message: &str) -> String {
        match value {
            Some(v) if v.chars().count() >= min => v.to_string(),
            _ => {
                self.errors.push(FieldError::new(field, message));
                String::new()
            }
        }
    }

    pub fn push(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("j.doe+tag@mail.uni.edu"));
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane doe@example.com"));
    }

    #[test]
    fn test_required_trims_and_reports() {
        let mut v = Validator::new();
        assert_eq!(v.required("name", Some("  Jane  "), "Name is required"), "Jane");
        assert_eq!(v.required("contact", Some("   "), "Contact is required"), "");
        assert_eq!(v.required("description", None, "Description is required"), "");

        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "contact");
        assert_eq!(errors[1].field, "description");
    }

    #[test]
    fn test_email_is_trimmed_not_lowercased() {
        let mut v = Validator::new();
        assert_eq!(v.email("email", Some(" Jane@Example.COM "), "bad"), "Jane@Example.COM");
        assert!(v.finish().is_ok());
    }
}
