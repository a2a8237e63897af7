//! Access guard: directory-verified login, server-side sessions and the
//! admin allow-list.

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use uuid::Uuid;

use crate::domain::{Identity, Session, is_valid_employee_id, phone_suffix_matches};
use crate::error::DomainError;
use crate::ports::{AdminAllowList, AuthError, Cache, Clock, DirectoryError, DirectoryService};

const SESSION_KEY_PREFIX: &str = "session:";

pub struct AccessService {
    directory: Arc<dyn DirectoryService>,
    allow_list: Arc<dyn AdminAllowList>,
    sessions: Arc<dyn Cache>,
    clock: Arc<dyn Clock>,
    session_ttl: Duration,
}

impl AccessService {
    pub fn new(
        directory: Arc<dyn DirectoryService>,
        allow_list: Arc<dyn AdminAllowList>,
        sessions: Arc<dyn Cache>,
        clock: Arc<dyn Clock>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            directory,
            allow_list,
            sessions,
            clock,
            session_ttl,
        }
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Verify an employee against the allow-list and the directory and open a
    /// session.
    ///
    /// Every failure returns the same [`AuthError::InvalidCredentials`].
    pub async fn login(
        &self,
        employee_id: &str,
        phone_last_four: &str,
    ) -> Result<Session, DomainError> {
        let employee_id = employee_id.trim();
        let phone_last_four = phone_last_four.trim();

        if employee_id.is_empty() || phone_last_four.is_empty() {
            return Err(DomainError::validation(
                "Employee ID and password are required",
            ));
        }

        let identity = match self.verify(employee_id, phone_last_four).await {
            Ok(identity) => identity,
            Err(reason) => {
                tracing::warn!(employee_id = %employee_id, reason = %reason, "Login rejected");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let session = Session {
            id: Uuid::new_v4(),
            expires_at: identity.authenticated_at
                + TimeDelta::from_std(self.session_ttl).unwrap_or(TimeDelta::hours(12)),
            identity,
        };

        let payload = serde_json::to_string(&session.identity)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        self.sessions
            .set(&session_key(session.id), &payload, Some(self.session_ttl))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to store session");
                DomainError::Internal(e.to_string())
            })?;

        tracing::info!(employee_id = %employee_id, "Login succeeded");
        Ok(session)
    }

    /// Resolve a session id to its identity.
    pub async fn authenticate(&self, session_id: Uuid) -> Result<Identity, DomainError> {
        let payload = self
            .sessions
            .get(&session_key(session_id))
            .await
            .ok_or(AuthError::NotAuthenticated)?;

        serde_json::from_str(&payload).map_err(|e| {
            tracing::warn!(error = %e, "Discarding unreadable session");
            DomainError::from(AuthError::NotAuthenticated)
        })
    }

    /// End a session. Unknown ids are ignored.
    pub async fn logout(&self, session_id: Uuid) -> Result<(), DomainError> {
        self.sessions
            .delete(&session_key(session_id))
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))
    }

    /// Grant admin access to another employee after confirming they exist in
    /// the directory.
    pub async fn assign_admin(&self, caller: &Identity, target: &str) -> Result<(), DomainError> {
        let target = target.trim();
        if target.is_empty() {
            return Err(DomainError::validation("Employee ID is required"));
        }

        if !self.allow_list.contains(&caller.employee_id).await? {
            tracing::warn!(caller = %caller.employee_id, "Admin assignment by non-admin refused");
            return Err(AuthError::NotAllowed.into());
        }

        if !is_valid_employee_id(target) {
            return Err(DomainError::validation("Invalid employee ID"));
        }

        let exists = self
            .directory
            .employee_exists(target)
            .await
            .map_err(|e| {
                tracing::error!(target_id = %target, error = %e, "Directory lookup failed");
                match e {
                    DirectoryError::Timeout => {
                        DomainError::UpstreamTimeout("Request timed out".to_string())
                    }
                    DirectoryError::Status(_) => {
                        DomainError::validation("Failed to verify employee")
                    }
                    DirectoryError::Transport(_) | DirectoryError::Malformed(_) => {
                        DomainError::UpstreamFailure("Failed to connect to directory".to_string())
                    }
                }
            })?;

        if !exists {
            return Err(DomainError::not_found("Employee", target));
        }

        let added = self.allow_list.add(target).await?;
        tracing::info!(
            target_id = %target,
            granted_by = %caller.employee_id,
            newly_added = added,
            at = %self.clock.now(),
            "Admin access granted"
        );

        Ok(())
    }

    /// The detailed reason is returned for logging only.
    async fn verify(&self, employee_id: &str, phone_last_four: &str) -> Result<Identity, String> {
        if !is_valid_employee_id(employee_id) {
            return Err("malformed employee id".to_string());
        }

        let allowed = self
            .allow_list
            .contains(employee_id)
            .await
            .map_err(|e| format!("allow-list unavailable: {e}"))?;
        if !allowed {
            return Err("employee not in allow-list".to_string());
        }

        let record = self
            .directory
            .find_employee(employee_id)
            .await
            .map_err(|e| e.to_string())?
            .ok_or_else(|| "employee not found in directory".to_string())?;

        let phone = record
            .primary_phone()
            .ok_or_else(|| "no phone number on record".to_string())?;

        if !phone_suffix_matches(phone, phone_last_four) {
            return Err("phone suffix mismatch".to_string());
        }

        Ok(Identity {
            employee_id: employee_id.to_string(),
            display_name: record.display_name(),
            authenticated_at: self.clock.now(),
        })
    }
}

fn session_key(id: Uuid) -> String {
    format!("{SESSION_KEY_PREFIX}{id}")
}
