// ── Form validation ──
//
// Pure checks run before any request is made. Each validator returns a
// field -> message map; an empty map means the form may be submitted.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Map, Value};

/// Minimum password length accepted anywhere in the client.
pub const MIN_PASSWORD_LEN: usize = 6;
/// Minimum display-name length on registration.
pub const MIN_NAME_LEN: usize = 3;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message per field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_insert_with(|| message.into());
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ── Forms ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub accept_terms: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub preferences: Option<Map<String, Value>>,
}

#[derive(Debug, Clone)]
pub struct PasswordChangeForm {
    pub current: SecretString,
    pub new_password: SecretString,
    pub confirm: SecretString,
}

// ── Field rules ──────────────────────────────────────────────────────

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if email.trim().is_empty() {
        errors.add("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.add("email", "Email is invalid");
    }
}

fn check_password(errors: &mut ValidationErrors, field: &str, password: &SecretString) {
    let password = password.expose_secret();
    if password.is_empty() {
        errors.add(field, "Password is required");
    } else if !is_valid_password(password) {
        errors.add(field, format!("Password must be at least {MIN_PASSWORD_LEN} characters"));
    }
}

fn check_confirmation(
    errors: &mut ValidationErrors,
    field: &str,
    password: &SecretString,
    confirm: &SecretString,
) {
    if confirm.expose_secret().is_empty() {
        errors.add(field, "Please confirm the password");
    } else if password.expose_secret() != confirm.expose_secret() {
        errors.add(field, "Passwords do not match");
    }
}

// ── Validators ───────────────────────────────────────────────────────

pub fn validate_login(form: &LoginForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_email(&mut errors, &form.email);
    // Length rules apply to new passwords only.
    if form.password.expose_secret().is_empty() {
        errors.add("password", "Password is required");
    }
    errors.into_result()
}

pub fn validate_registration(form: &RegistrationForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let name = form.name.trim();
    if name.is_empty() {
        errors.add("name", "Name is required");
    } else if name.chars().count() < MIN_NAME_LEN {
        errors.add("name", format!("Name must be at least {MIN_NAME_LEN} characters"));
    }
    check_email(&mut errors, &form.email);
    check_password(&mut errors, "password", &form.password);
    check_confirmation(
        &mut errors,
        "confirm_password",
        &form.password,
        &form.confirm_password,
    );
    if !form.accept_terms {
        errors.add("accept_terms", "You must accept the terms of use");
    }
    errors.into_result()
}

pub fn validate_profile(form: &ProfileForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if form.name.trim().is_empty() {
        errors.add("name", "Name is required");
    }
    check_email(&mut errors, &form.email);
    errors.into_result()
}

pub fn validate_password_change(form: &PasswordChangeForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if form.current.expose_secret().is_empty() {
        errors.add("current", "Current password is required");
    }
    check_password(&mut errors, "new_password", &form.new_password);
    check_confirmation(&mut errors, "confirm", &form.new_password, &form.confirm);
    errors.into_result()
}
