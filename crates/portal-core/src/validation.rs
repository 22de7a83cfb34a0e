//! Client-side validation for the sign-in, sign-up and forgot-password forms.
//!
//! Validators collect every failing field instead of stopping at the first,
//! so a form can show all messages inline at once. Only the first failing
//! rule per field is reported.

use std::collections::BTreeMap;
use std::fmt;

pub const INVALID_EMAIL: &str = "Please enter a valid email";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
pub const PASSWORD_TOO_WEAK: &str =
    "Password must include uppercase, lowercase, number and special character";
pub const NAME_TOO_SHORT: &str = "Name must be at least 2 characters";
pub const NAME_TOO_LONG: &str = "Name must be less than 50 characters";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";

const MIN_PASSWORD_LENGTH: usize = 8;
const MIN_NAME_LENGTH: usize = 2;
const MAX_NAME_LENGTH: usize = 50;

/// Special characters a sign-up password may (and must) use.
const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Field name to message, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    fn add(&mut self, field: &'static str, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().map(|(f, m)| (*f, *m))
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(field, msg)| format!("{}: {}", field, msg)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// Loose structural email check: `local@domain.tld`, no whitespace, no
/// empty domain labels, and none of the characters that would break a URL
/// path segment.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(|c| c.is_whitespace() || "/?#%\\".contains(c)) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}

fn is_strong_password(password: &str) -> bool {
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c));
    allowed
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if !is_valid_email(email.trim()) {
        errors.add("email", INVALID_EMAIL);
    }
}

pub fn validate_login(form: &LoginForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    check_email(&mut errors, &form.email);
    if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add("password", PASSWORD_TOO_SHORT);
    }
    errors.into_result()
}

pub fn validate_signup(form: &SignupForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    let name_len = form.name.trim().chars().count();
    if name_len < MIN_NAME_LENGTH {
        errors.add("name", NAME_TOO_SHORT);
    } else if name_len > MAX_NAME_LENGTH {
        errors.add("name", NAME_TOO_LONG);
    }

    check_email(&mut errors, &form.email);

    if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add("password", PASSWORD_TOO_SHORT);
    } else if !is_strong_password(&form.password) {
        errors.add("password", PASSWORD_TOO_WEAK);
    }

    if form.password != form.confirm_password {
        errors.add("confirmPassword", PASSWORDS_DO_NOT_MATCH);
    }

    errors.into_result()
}

pub fn validate_forgot_password(form: &ForgotPasswordForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    check_email(&mut errors, &form.email);
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("asha@campus.edu"));
        assert!(is_valid_email("first.last+mess@dept.campus.edu"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("asha"));
        assert!(!is_valid_email("@campus.edu"));
        assert!(!is_valid_email("asha@campus"));
        assert!(!is_valid_email("asha@campus..edu"));
        assert!(!is_valid_email("asha@@campus.edu"));
        assert!(!is_valid_email("as ha@campus.edu"));
        assert!(!is_valid_email("asha/x@campus.edu"));
    }

    #[test]
    fn test_validate_login() {
        let ok = LoginForm {
            email: "asha@campus.edu".into(),
            password: "whatever1".into(),
        };
        assert!(validate_login(&ok).is_ok());

        let bad = LoginForm {
            email: "nope".into(),
            password: "short".into(),
        };
        let errors = validate_login(&bad).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email"), Some(INVALID_EMAIL));
        assert_eq!(errors.get("password"), Some(PASSWORD_TOO_SHORT));
    }

    #[test]
    fn test_validate_signup() {
        let mut form = SignupForm {
            name: "Asha Rao".into(),
            email: "asha@campus.edu".into(),
            password: "Mess@2025".into(),
            confirm_password: "Mess@2025".into(),
        };
        assert!(validate_signup(&form).is_ok());

        form.password = "messpass1".into();
        form.confirm_password = "messpass1".into();
        assert_eq!(
            validate_signup(&form).unwrap_err().get("password"),
            Some(PASSWORD_TOO_WEAK)
        );

        // Characters outside the allowed set are rejected too
        form.password = "Mess#2025@".into();
        form.confirm_password = form.password.clone();
        assert_eq!(
            validate_signup(&form).unwrap_err().get("password"),
            Some(PASSWORD_TOO_WEAK)
        );

        form.password = "Mess@2025".into();
        form.confirm_password = "Mess@2026".into();
        let errors = validate_signup(&form).unwrap_err();
        assert_eq!(errors.get("confirmPassword"), Some(PASSWORDS_DO_NOT_MATCH));
        assert_eq!(errors.get("password"), None);
    }

    #[test]
    fn test_signup_name_bounds() {
        let form = |name: &str| SignupForm {
            name: name.into(),
            email: "a@b.co".into(),
            password: "Mess@2025".into(),
            confirm_password: "Mess@2025".into(),
        };
        assert_eq!(validate_signup(&form("A")).unwrap_err().get("name"), Some(NAME_TOO_SHORT));
        assert_eq!(
            validate_signup(&form(&"x".repeat(51))).unwrap_err().get("name"),
            Some(NAME_TOO_LONG)
        );
        assert!(validate_signup(&form(&"x".repeat(50))).is_ok());
    }

    #[test]
    fn test_forgot_password_and_display() {
        let errors = validate_forgot_password(&ForgotPasswordForm { email: "x".into() }).unwrap_err();
        assert_eq!(errors.to_string(), "email: Please enter a valid email");
        assert!(validate_forgot_password(&ForgotPasswordForm {
            email: " asha@campus.edu ".into()
        })
        .is_ok());
    }
}
