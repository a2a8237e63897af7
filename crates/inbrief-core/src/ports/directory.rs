//! Employee directory port.

use async_trait::async_trait;

/// What the directory knows about an employee.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub employee_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_numbers: Vec<String>,
}

impl EmployeeRecord {
    /// "First Last", falling back to the employee id.
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if name.is_empty() {
            self.employee_id.clone()
        } else {
            name
        }
    }

    pub fn primary_phone(&self) -> Option<&str> {
        self.phone_numbers
            .first()
            .map(String::as_str)
            .filter(|p| !p.trim().is_empty())
    }
}

/// External directory used to verify staff identities.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Look up an employee with name and phone details.
    async fn find_employee(
        &self,
        employee_id: &str,
    ) -> Result<Option<EmployeeRecord>, DirectoryError>;

    /// Check that an employee exists.
    async fn employee_exists(&self, employee_id: &str) -> Result<bool, DirectoryError> {
        Ok(self.find_employee(employee_id).await?.is_some())
    }
}

/// Directory lookup errors.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Directory request timed out")]
    Timeout,

    #[error("Directory unreachable: {0}")]
    Transport(String),

    #[error("Directory returned status {0}")]
    Status(u16),

    #[error("Malformed directory response: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_id() {
        let record = EmployeeRecord {
            employee_id: "9025857".to_string(),
            first_name: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(record.display_name(), "9025857");
    }

    #[test]
    fn test_display_name_joins_parts() {
        let record = EmployeeRecord {
            employee_id: "9025857".to_string(),
            first_name: Some("Asha".to_string()),
            last_name: Some("Rao".to_string()),
            ..Default::default()
        };
        assert_eq!(record.display_name(), "Asha Rao");
    }
}
