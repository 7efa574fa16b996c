//! Directory API client helpers.
//!
//! This module is part of the business layer: it performs network IO against
//! the hosted directory service and is intended to be used by Commands.
//!
//! The service splits one account across two stores with separate endpoint
//! families:
//! - identity store under `/auth/v1/admin/users/*`
//! - profile store under `/rest/v1/profiles/*`
//!
//! All helpers attach the service key as a bearer token when one is
//! configured. Callers map results into state/compute updates; nothing here
//! touches the `StateCtx`.

use serde::Deserialize;

use crate::http::{Client, Response};

use super::types::{IdentityUpdateRequest, ProfileUpdateRequest, UserRecord};

/// Error from a directory API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryApiError {
    #[error("{0}")]
    Transport(String),
    #[error("API returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("failed to serialize {what}: {detail}")]
    Encode { what: &'static str, detail: String },
    #[error("failed to parse {what}: {detail}")]
    Decode { what: &'static str, detail: String },
}

/// A typed API result.
pub type ApiResult<T> = Result<T, DirectoryApiError>;

/// Error payload shape used by both stores. The key differs by endpoint
/// family, hence the aliases.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "msg", alias = "error")]
    message: String,
}

fn status_error(response: &Response) -> DirectoryApiError {
    let message = response
        .json::<ErrorBody>()
        .map(|body| body.message)
        .ok()
        .or_else(|| response.text().ok().filter(|text| !text.trim().is_empty()))
        .unwrap_or_else(|| "no error detail".to_string());
    DirectoryApiError::Status {
        status: response.status,
        message,
    }
}

fn transport(err: crate::http::HttpError) -> DirectoryApiError {
    DirectoryApiError::Transport(err.to_string())
}

/// GET `{base}/rest/v1/profiles?order=createdAt.desc`
///
/// Returns every profile row. Ordering is requested newest-first, but
/// callers re-sort locally rather than trusting the store.
pub async fn list_users(
    api_base_url: &str,
    service_key: Option<&str>,
) -> ApiResult<Vec<UserRecord>> {
    let url = format!("{api_base_url}/rest/v1/profiles?order=createdAt.desc");

    let response = Client::get(&url)
        .bearer(service_key)
        .send()
        .await
        .map_err(transport)?;

    if !response.is_success() {
        return Err(status_error(&response));
    }

    response.json().map_err(|e| DirectoryApiError::Decode {
        what: "user list",
        detail: e.to_string(),
    })
}

/// PUT `{base}/auth/v1/admin/users/{id}` (identity store).
pub async fn update_identity(
    api_base_url: &str,
    service_key: Option<&str>,
    user_id: &str,
    body: &IdentityUpdateRequest,
) -> ApiResult<()> {
    let url = format!("{api_base_url}/auth/v1/admin/users/{user_id}");

    let request = Client::put(&url)
        .bearer(service_key)
        .json(body)
        .map_err(|e| DirectoryApiError::Encode {
            what: "identity update body",
            detail: e.to_string(),
        })?;

    let response = request.send().await.map_err(transport)?;

    if !response.is_success() {
        return Err(status_error(&response));
    }

    Ok(())
}

/// PUT `{base}/rest/v1/profiles/{id}` (profile store).
pub async fn update_profile(
    api_base_url: &str,
    service_key: Option<&str>,
    user_id: &str,
    body: &ProfileUpdateRequest,
) -> ApiResult<()> {
    let url = format!("{api_base_url}/rest/v1/profiles/{user_id}");

    let request = Client::put(&url)
        .bearer(service_key)
        .json(body)
        .map_err(|e| DirectoryApiError::Encode {
            what: "profile update body",
            detail: e.to_string(),
        })?;

    let response = request.send().await.map_err(transport)?;

    if !response.is_success() {
        return Err(status_error(&response));
    }

    Ok(())
}

/// DELETE `{base}/auth/v1/admin/users/{id}` (identity store).
///
/// A 404 counts as success: an identity already removed by an earlier,
/// partially-failed delete must not block the retry.
pub async fn delete_identity(
    api_base_url: &str,
    service_key: Option<&str>,
    user_id: &str,
) -> ApiResult<()> {
    let url = format!("{api_base_url}/auth/v1/admin/users/{user_id}");

    let response = Client::delete(&url)
        .bearer(service_key)
        .send()
        .await
        .map_err(transport)?;

    if response.status == 404 {
        return Ok(());
    }
    if !response.is_success() {
        return Err(status_error(&response));
    }

    Ok(())
}

/// DELETE `{base}/rest/v1/profiles/{id}` (profile store).
///
/// 404 is tolerated for the same reason as [`delete_identity`].
pub async fn delete_profile(
    api_base_url: &str,
    service_key: Option<&str>,
    user_id: &str,
) -> ApiResult<()> {
    let url = format!("{api_base_url}/rest/v1/profiles/{user_id}");

    let response = Client::delete(&url)
        .bearer(service_key)
        .send()
        .await
        .map_err(transport)?;

    if response.status == 404 {
        return Ok(());
    }
    if !response.is_success() {
        return Err(status_error(&response));
    }

    Ok(())
}

/// GET `{base}/health`
pub async fn check_health(api_base_url: &str, service_key: Option<&str>) -> ApiResult<()> {
    let url = format!("{api_base_url}/health");

    let response = Client::get(&url)
        .bearer(service_key)
        .send()
        .await
        .map_err(transport)?;

    if !response.is_success() {
        return Err(status_error(&response));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response_with_body(status: u16, body: &str) -> Response {
        Response {
            status,
            headers: HashMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_status_error_prefers_message_key() {
        let err = status_error(&response_with_body(500, r#"{"message":"boom"}"#));
        assert_eq!(
            err,
            DirectoryApiError::Status {
                status: 500,
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_status_error_reads_msg_and_error_aliases() {
        let err = status_error(&response_with_body(401, r#"{"msg":"bad key"}"#));
        assert!(matches!(err, DirectoryApiError::Status { message, .. } if message == "bad key"));

        let err = status_error(&response_with_body(403, r#"{"error":"forbidden"}"#));
        assert!(matches!(err, DirectoryApiError::Status { message, .. } if message == "forbidden"));
    }

    #[test]
    fn test_status_error_falls_back_to_text() {
        let err = status_error(&response_with_body(502, "bad gateway"));
        assert!(matches!(err, DirectoryApiError::Status { message, .. } if message == "bad gateway"));
    }

    #[test]
    fn test_status_error_without_detail() {
        let err = status_error(&response_with_body(500, ""));
        assert_eq!(
            err.to_string(),
            "API returned status 500: no error detail"
        );
    }
}
