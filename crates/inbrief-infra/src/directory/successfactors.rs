//! SAP SuccessFactors directory over the OData v2 `EmpJob` entity.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::IgnoredAny;

use inbrief_core::ports::{DirectoryError, DirectoryService, EmployeeRecord};

const PROFILE_EXPAND: &str =
    "employmentNav/personNav/phoneNav,employmentNav/personNav/personalInfoNav";
const PROFILE_SELECT: &str = "userId,employmentNav/personNav/phoneNav/phoneNumber,\
employmentNav/personNav/personalInfoNav/firstName,\
employmentNav/personNav/personalInfoNav/lastName";

/// SuccessFactors API settings.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// OData root, e.g. `https://api44.sapsf.com/odata/v2`
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

impl DirectoryConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api44.sapsf.com/odata/v2";

    /// Load configuration from environment variables.
    ///
    /// Returns `None` unless `SAP_API_USERNAME` and `SAP_API_PASSWORD` are set.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Some(Self {
            base_url: var("SAP_API_BASE_URL")
                .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            username: var("SAP_API_USERNAME")?,
            password: var("SAP_API_PASSWORD")?,
            timeout: var("SAP_API_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(30)),
        })
    }

    fn emp_job_url(&self) -> String {
        format!("{}/EmpJob", self.base_url.trim_end_matches('/'))
    }
}

/// Directory client authenticating with HTTP basic auth.
pub struct SuccessFactorsDirectory {
    client: reqwest::Client,
    config: DirectoryConfig,
}

// OData v2 wraps collections as {"d": {"results": [...]}}
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    d: Results<T>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Results<T> {
    #[serde(default)]
    results: Vec<T>,
}

impl<T> Default for Results<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmpJob {
    user_id: String,
    #[serde(default)]
    employment_nav: Option<EmploymentNav>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmploymentNav {
    #[serde(default)]
    person_nav: Option<PersonNav>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonNav {
    #[serde(default)]
    phone_nav: Option<Results<Phone>>,
    #[serde(default)]
    personal_info_nav: Option<Results<PersonalInfo>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Phone {
    #[serde(default)]
    phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonalInfo {
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

impl SuccessFactorsDirectory {
    pub fn new(config: DirectoryConfig) -> Result<Self, DirectoryError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        tracing::info!(base_url = %config.base_url, "SuccessFactors directory configured");
        Ok(Self { client, config })
    }

    async fn query(
        &self,
        employee_id: &str,
        extra: &[(&str, &str)],
    ) -> Result<String, DirectoryError> {
        let filter = user_filter(employee_id);
        let mut params: Vec<(&str, &str)> =
            vec![("$filter", filter.as_str()), ("$format", "json")];
        params.extend_from_slice(extra);

        let response = self
            .client
            .get(self.config.emp_job_url())
            .basic_auth(&self.config.username, Some(&self.config.password))
            .query(&params)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Directory request rejected");
            return Err(DirectoryError::Status(status.as_u16()));
        }

        response.text().await.map_err(transport_error)
    }
}

#[async_trait]
impl DirectoryService for SuccessFactorsDirectory {
    async fn find_employee(
        &self,
        employee_id: &str,
    ) -> Result<Option<EmployeeRecord>, DirectoryError> {
        let body = self
            .query(
                employee_id,
                &[("$expand", PROFILE_EXPAND), ("$select", PROFILE_SELECT)],
            )
            .await?;
        parse_employee(&body)
    }

    async fn employee_exists(&self, employee_id: &str) -> Result<bool, DirectoryError> {
        let body = self.query(employee_id, &[("$select", "userId")]).await?;
        parse_exists(&body)
    }
}

/// OData filter on `userId` with quotes escaped.
fn user_filter(employee_id: &str) -> String {
    format!("userId eq '{}'", employee_id.replace('\'', "''"))
}

fn transport_error(e: reqwest::Error) -> DirectoryError {
    if e.is_timeout() {
        DirectoryError::Timeout
    } else {
        DirectoryError::Transport(e.to_string())
    }
}

fn parse_employee(body: &str) -> Result<Option<EmployeeRecord>, DirectoryError> {
    let envelope: Envelope<EmpJob> =
        serde_json::from_str(body).map_err(|e| DirectoryError::Malformed(e.to_string()))?;

    let Some(job) = envelope.d.results.into_iter().next() else {
        return Ok(None);
    };

    let person = job.employment_nav.and_then(|nav| nav.person_nav);
    let (phones, info) = match person {
        Some(person) => (
            person.phone_nav.unwrap_or_default().results,
            person
                .personal_info_nav
                .unwrap_or_default()
                .results
                .into_iter()
                .next(),
        ),
        None => (Vec::new(), None),
    };

    let (first_name, last_name) = info
        .map(|info| (info.first_name, info.last_name))
        .unwrap_or_default();

    Ok(Some(EmployeeRecord {
        employee_id: job.user_id,
        first_name,
        last_name,
        phone_numbers: phones.into_iter().filter_map(|p| p.phone_number).collect(),
    }))
}

fn parse_exists(body: &str) -> Result<bool, DirectoryError> {
    let envelope: Envelope<IgnoredAny> =
        serde_json::from_str(body).map_err(|e| DirectoryError::Malformed(e.to_string()))?;
    Ok(!envelope.d.results.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "d": {
            "results": [{
                "__metadata": {"uri": "EmpJob"},
                "userId": "9025857",
                "employmentNav": {
                    "personNav": {
                        "phoneNav": {"results": [
                            {"phoneNumber": "+91 98450 12345"},
                            {"phoneNumber": "080 4123 9876"}
                        ]},
                        "personalInfoNav": {"results": [
                            {"firstName": "Asha", "lastName": "Rao"}
                        ]}
                    }
                }
            }]
        }
    }"#;

    #[test]
    fn test_parse_employee_with_profile() {
        let record = parse_employee(FULL).unwrap().expect("employee");

        assert_eq!(record.employee_id, "9025857");
        assert_eq!(record.display_name(), "Asha Rao");
        assert_eq!(record.primary_phone(), Some("+91 98450 12345"));
        assert_eq!(record.phone_numbers.len(), 2);
    }

    #[test]
    fn test_parse_employee_without_navigation() {
        let body = r#"{"d": {"results": [{"userId": "9025676", "employmentNav": null}]}}"#;
        let record = parse_employee(body).unwrap().expect("employee");

        assert_eq!(record.display_name(), "9025676");
        assert!(record.primary_phone().is_none());
    }

    #[test]
    fn test_parse_employee_empty_results() {
        let body = r#"{"d": {"results": []}}"#;
        assert!(parse_employee(body).unwrap().is_none());
    }

    #[test]
    fn test_parse_malformed_body() {
        let err = parse_employee("<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, DirectoryError::Malformed(_)));
    }

    #[test]
    fn test_parse_exists() {
        assert!(parse_exists(r#"{"d": {"results": [{"userId": "9023422"}]}}"#).unwrap());
        assert!(!parse_exists(r#"{"d": {"results": []}}"#).unwrap());
    }

    #[test]
    fn test_missing_results_are_empty() {
        assert!(!parse_exists(r#"{"d": {}}"#).unwrap());

        let body = r#"{"d": {"results": [{
            "userId": "9025676",
            "employmentNav": {"personNav": {"phoneNav": {}, "personalInfoNav": {}}}
        }]}}"#;
        let record = parse_employee(body).unwrap().expect("employee");
        assert!(record.phone_numbers.is_empty());
        assert_eq!(record.display_name(), "9025676");
    }

    #[test]
    fn test_user_filter_escapes_quotes() {
        assert_eq!(user_filter("90'25"), "userId eq '90''25'");
    }
}
