use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated staff member behind a request.
///
/// Handlers obtain this from the session and pass it explicitly into every
/// mutating operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub employee_id: String,
    pub display_name: String,
    pub authenticated_at: DateTime<Utc>,
}

/// A server-side session created by a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub identity: Identity,
    pub expires_at: DateTime<Utc>,
}

/// Employee ids are interpolated into directory queries, so only a plain
/// alphanumeric alphabet is accepted.
pub fn is_valid_employee_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Compare the last four digits of a directory phone number with the
/// credential supplied at login. Non-digit characters in the phone number
/// are ignored.
pub fn phone_suffix_matches(phone_number: &str, supplied: &str) -> bool {
    if supplied.len() != 4 || !supplied.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let digits: String = phone_number
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    digits.len() >= 4 && digits.ends_with(supplied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_suffix_ignores_formatting() {
        assert!(phone_suffix_matches("+91 98450-12345", "2345"));
        assert!(phone_suffix_matches("(080) 4123 9876", "9876"));
    }

    #[test]
    fn test_phone_suffix_mismatch() {
        assert!(!phone_suffix_matches("+91 98450 12345", "1234"));
    }

    #[test]
    fn test_phone_suffix_rejects_malformed_credential() {
        assert!(!phone_suffix_matches("9845012345", "345"));
        assert!(!phone_suffix_matches("9845012345", "12345"));
        assert!(!phone_suffix_matches("9845012345", "ab45"));
        assert!(!phone_suffix_matches("123", "0123"));
    }

    #[test]
    fn test_employee_id_alphabet() {
        assert!(is_valid_employee_id("9025857"));
        assert!(is_valid_employee_id("emp_42-a"));
        assert!(!is_valid_employee_id(""));
        assert!(!is_valid_employee_id("1' or userId ne '"));
        assert!(!is_valid_employee_id(&"9".repeat(65)));
    }
}
