//! Health check endpoints for Kubernetes

use std::future::Future;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::warn;

use crate::api::types::Json;
use crate::domain::DomainError;

use super::state::AppState;

/// Detailed health response with component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Health check status
#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Simple health check - returns 200 if the service is running
/// Used for basic liveness checks
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check with dependency verification
/// Pings the user and course stores
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let mut checks = Vec::new();

    let user_check = timed_check("user_store", state.user_service.ping()).await;
    checks.push(user_check);

    let course_check = timed_check("course_store", state.course_service.ping()).await;
    checks.push(course_check);

    let overall_status = overall_status(&checks);
    let latency = start.elapsed().as_millis() as u64;
    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
        latency_ms: Some(latency),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness check - simple check to verify the service is running
/// Used for Kubernetes liveness checks to detect crashes
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn timed_check<T, F>(name: &str, check: F) -> HealthCheck
where
    F: Future<Output = Result<T, DomainError>>,
{
    let start = Instant::now();
    let result = check.await;
    let latency_ms = Some(start.elapsed().as_millis() as u64);

    match result {
        Ok(_) => HealthCheck {
            name: name.to_string(),
            status: HealthStatus::Healthy,
            message: None,
            latency_ms,
        },
        Err(e) => {
            warn!(check = name, error = %e, "Readiness check failed");
            HealthCheck {
                name: name.to_string(),
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
                latency_ms,
            }
        }
    }
}

/// Unhealthy when every check fails, degraded when only some do
fn overall_status(checks: &[HealthCheck]) -> HealthStatus {
    let failed = checks
        .iter()
        .filter(|c| c.status != HealthStatus::Healthy)
        .count();

    match failed {
        0 => HealthStatus::Healthy,
        n if n == checks.len() => HealthStatus::Unhealthy,
        _ => HealthStatus::Degraded,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{DuplicatePolicy, NewUser, User, UserId, UserRepository};
    use crate::infrastructure::storage::InMemoryStore;

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Degraded).unwrap(),
            "\"degraded\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            version: "1.0.0".to_string(),
            checks: None,
            latency_ms: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"version\":\"1.0.0\""));
        assert!(!json.contains("checks"));
    }

    fn check(name: &str, status: HealthStatus) -> HealthCheck {
        HealthCheck {
            name: name.to_string(),
            status,
            message: None,
            latency_ms: None,
        }
    }

    #[test]
    fn test_overall_status() {
        let all_ok = [check("a", HealthStatus::Healthy), check("b", HealthStatus::Healthy)];
        assert!(overall_status(&all_ok) == HealthStatus::Healthy);

        let partial = [check("a", HealthStatus::Healthy), check("b", HealthStatus::Unhealthy)];
        assert!(overall_status(&partial) == HealthStatus::Degraded);

        let all_failed = [check("a", HealthStatus::Unhealthy), check("b", HealthStatus::Unhealthy)];
        assert!(overall_status(&all_failed) == HealthStatus::Unhealthy);
    }

    /// User store that answers pings but fails every data query
    #[derive(Debug)]
    struct PingOnlyStore {
        reachable: bool,
    }

    #[async_trait::async_trait]
    impl UserRepository for PingOnlyStore {
        async fn get(&self, _id: UserId) -> Result<Option<User>, DomainError> {
            Err(DomainError::storage("data queries disabled"))
        }

        async fn list(&self) -> Result<Vec<User>, DomainError> {
            Err(DomainError::storage("data queries disabled"))
        }

        async fn create(&self, _user: NewUser) -> Result<User, DomainError> {
            Err(DomainError::storage("data queries disabled"))
        }

        async fn update(&self, _user: &User) -> Result<User, DomainError> {
            Err(DomainError::storage("data queries disabled"))
        }

        async fn delete(&self, _id: UserId) -> Result<bool, DomainError> {
            Err(DomainError::storage("data queries disabled"))
        }

        async fn ping(&self) -> Result<(), DomainError> {
            if self.reachable {
                Ok(())
            } else {
                Err(DomainError::storage("connection refused"))
            }
        }
    }

    async fn ready_body(reachable: bool) -> (StatusCode, serde_json::Value) {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(
            Arc::new(PingOnlyStore { reachable }),
            store.clone(),
            store,
            DuplicatePolicy::Replace,
        );

        let response = ready_check(State(state)).await.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ready_pings_instead_of_listing() {
        let (status, body) = ready_body(true).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready_reports_unreachable_store() {
        let (status, body) = ready_body(false).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["checks"][0]["name"], "user_store");
        assert_eq!(body["checks"][0]["status"], "unhealthy");
        assert_eq!(body["checks"][1]["status"], "healthy");
    }

    #[tokio::test]
    async fn test_timed_check_reports_failure_message() {
        let result = timed_check("user_store", async {
            Err::<(), _>(DomainError::timeout("no response within 5000ms"))
        })
        .await;

        assert!(result.status == HealthStatus::Unhealthy);
        assert_eq!(result.name, "user_store");
        assert!(result.message.unwrap().contains("5000ms"));
    }

    #[test]
    fn test_health_response_with_checks() {
        let response = HealthResponse {
            status: HealthStatus::Degraded,
            version: "1.0.0".to_string(),
            checks: Some(vec![
                HealthCheck {
                    name: "user_store".to_string(),
                    status: HealthStatus::Healthy,
                    message: None,
                    latency_ms: Some(5),
                },
                HealthCheck {
                    name: "course_store".to_string(),
                    status: HealthStatus::Unhealthy,
                    message: Some("Connection refused".to_string()),
                    latency_ms: Some(100),
                },
            ]),
            latency_ms: Some(105),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"degraded\""));
        assert!(json.contains("\"user_store\""));
        assert!(json.contains("\"course_store\""));
        assert!(json.contains("\"Connection refused\""));
    }
}
