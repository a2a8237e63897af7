//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to login with an employee id and the last four digits of the
/// phone number on record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub phone_last_four: String,
}

/// The signed-in staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub employee_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Request to grant admin access to another employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignAdminRequest {
    #[serde(rename = "empId", default)]
    pub emp_id: String,
}

/// Storage status shown to admins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbInfoResponse {
    pub database_connected: bool,
    /// `postgres` or `memory`
    pub backend: String,
    pub total_posts: u64,
}
