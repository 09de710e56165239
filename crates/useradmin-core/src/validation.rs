//! Client-side validation of the create/edit user form.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Inputs of the user form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Username,
    Password,
    ConfirmPassword,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Username => "username",
            FormField::Password => "password",
            FormField::ConfirmPassword => "confirmPassword",
        }
    }

    /// Map a backend field key onto a form field, accepting both spellings
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "username" => Some(FormField::Username),
            "password" => Some(FormField::Password),
            "confirmPassword" | "confirm_password" => Some(FormField::ConfirmPassword),
            _ => None,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw values as typed into the dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl FormValues {
    pub fn username(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }
}

/// Field-scoped validation messages, at most one per field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `message` to `field` unless it already has one
    pub fn add(&mut self, field: FormField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// Build from backend-provided `field -> message` pairs, dropping
    /// fields the form does not show
    pub fn from_backend(fields: &BTreeMap<String, String>) -> Self {
        let mut errors = Self::new();
        for (key, message) in fields {
            if let Some(field) = FormField::from_key(key) {
                errors.add(field, message.clone());
            }
        }
        errors
    }
}

/// Which schema applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSchema {
    Create,
    Edit,
}

fn too_short(field: &str, min: usize) -> String {
    format!("{} must be at least {} characters", field, min)
}

/// Validate `values` against `schema`.
///
/// The password/confirmation mismatch is only checked once both passwords
/// satisfy the length rule, and is always reported on the confirmation
/// field.
pub fn validate(schema: FormSchema, values: &FormValues) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if values.username.chars().count() < MIN_USERNAME_LEN {
        errors.add(FormField::Username, too_short("Username", MIN_USERNAME_LEN));
    }

    if schema == FormSchema::Create {
        let password_ok = values.password.chars().count() >= MIN_PASSWORD_LEN;
        let confirm_ok = values.confirm_password.chars().count() >= MIN_PASSWORD_LEN;

        if !password_ok {
            errors.add(FormField::Password, too_short("Password", MIN_PASSWORD_LEN));
        }
        if !confirm_ok {
            errors.add(
                FormField::ConfirmPassword,
                too_short("Password confirmation", MIN_PASSWORD_LEN),
            );
        }
        if password_ok && confirm_ok && values.password != values.confirm_password {
            errors.add(FormField::ConfirmPassword, "Passwords do not match");
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_values(username: &str, password: &str, confirm: &str) -> FormValues {
        FormValues {
            username: username.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn create_rejects_short_username() {
        let errors = validate(
            FormSchema::Create,
            &create_values("ab", "123456", "123456"),
        )
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(errors.get(FormField::Username).is_some());
    }

    #[test]
    fn create_mismatch_is_reported_on_confirmation() {
        let errors = validate(
            FormSchema::Create,
            &create_values("alice", "123456", "654321"),
        )
        .unwrap_err();

        assert_eq!(
            errors.get(FormField::ConfirmPassword),
            Some("Passwords do not match")
        );
        assert_eq!(errors.get(FormField::Password), None);
    }

    #[test]
    fn create_short_passwords_flag_both_fields() {
        let errors = validate(FormSchema::Create, &create_values("alice", "123", "12")).unwrap_err();

        assert!(errors.get(FormField::Password).is_some());
        assert!(errors
            .get(FormField::ConfirmPassword)
            .unwrap()
            .contains("at least 6"));
    }

    #[test]
    fn create_accepts_valid_values() {
        assert!(validate(
            FormSchema::Create,
            &create_values("alice", "secret1", "secret1")
        )
        .is_ok());
    }

    #[test]
    fn edit_ignores_password_fields() {
        assert!(validate(FormSchema::Edit, &FormValues::username("alice")).is_ok());
        assert!(validate(FormSchema::Edit, &FormValues::username("al")).is_err());
    }

    #[test]
    fn length_counts_characters() {
        // three characters, six bytes
        assert!(validate(FormSchema::Edit, &FormValues::username("ñáé")).is_ok());
    }

    #[test]
    fn backend_fields_map_onto_form_fields() {
        let mut raw = BTreeMap::new();
        raw.insert("username".to_string(), "already taken".to_string());
        raw.insert("confirm_password".to_string(), "mismatch".to_string());
        raw.insert("role".to_string(), "ignored".to_string());

        let errors = FieldErrors::from_backend(&raw);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(FormField::Username), Some("already taken"));
        assert_eq!(errors.get(FormField::ConfirmPassword), Some("mismatch"));
    }
}
