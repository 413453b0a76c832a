//! HTTP client for the remote authentication endpoints
//!
//! - `POST /api/auth/login` with credentials
//! - `POST /api/auth/register` with registration data
//!
//! Both answer `{ "token": .., "user": { .. } }` on success and a body with a
//! `message` field on failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::session::UserRecord;

const LOGIN_PATH: &str = "api/auth/login";
const REGISTER_PATH: &str = "api/auth/register";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationData {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Any further fields the backend accepts, sent as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RegistrationData {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            extra: Map::new(),
        }
    }
}

/// Successful answer of both auth endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserRecord,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request rejected with status {status}")]
    Rejected { status: u16, message: Option<String> },

    #[error("Unexpected response body: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Message supplied by the server, if it sent one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Remote authentication backend.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;

    async fn register(&self, data: &RegistrationData) -> Result<AuthResponse, ApiError>;
}

pub struct HttpAuthApi {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpAuthApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        // Keep a trailing slash so joins append instead of replacing the last segment
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(url = %url, "Sending auth request");

        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .filter(|m| !m.trim().is_empty());

            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ApiError::InvalidResponse)
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.post(LOGIN_PATH, credentials).await
    }

    async fn register(&self, data: &RegistrationData) -> Result<AuthResponse, ApiError> {
        self.post(REGISTER_PATH, data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HttpAuthApi {
        HttpAuthApi::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = HttpAuthApi::new("http://localhost:3000/v2", Duration::from_secs(1)).unwrap();
        assert_eq!(
            api.endpoint(LOGIN_PATH).unwrap().as_str(),
            "http://localhost:3000/v2/api/auth/login"
        );

        let api = HttpAuthApi::new("http://localhost:3000", Duration::from_secs(1)).unwrap();
        assert_eq!(
            api.endpoint(REGISTER_PATH).unwrap().as_str(),
            "http://localhost:3000/api/auth/register"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpAuthApi::new("not a url", Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_registration_extra_fields_are_flattened() {
        let mut data = RegistrationData::new("Ana", "ana@example.com", "secret");
        data.extra.insert("role".to_string(), json!("manager"));

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["role"], "manager");
        assert_eq!(value["email"], "ana@example.com");
    }

    #[tokio::test]
    async fn test_login_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({ "email": "ana@example.com", "password": "secret" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "tok-1",
                "user": { "id": 1, "name": "Ana" }
            })))
            .mount(&server)
            .await;

        let response = client(&server)
            .login(&Credentials::new("ana@example.com", "secret"))
            .await
            .unwrap();

        assert_eq!(response.token, "tok-1");
        assert_eq!(response.user["name"], "Ana");
    }

    #[tokio::test]
    async fn test_login_rejected_carries_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Senha inválida" })),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .login(&Credentials::new("ana@example.com", "wrong"))
            .await
            .unwrap_err();

        match &err {
            ApiError::Rejected { status, .. } => assert_eq!(*status, 401),
            other => panic!("Expected Rejected, got {other:?}"),
        }
        assert_eq!(err.server_message(), Some("Senha inválida"));
    }

    #[tokio::test]
    async fn test_rejection_without_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client(&server)
            .register(&RegistrationData::new("Ana", "ana@example.com", "secret"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Rejected { status: 500, .. }));
        assert_eq!(err.server_message(), None);
    }

    #[tokio::test]
    async fn test_success_with_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok" })))
            .mount(&server)
            .await;

        let err = client(&server)
            .login(&Credentials::new("ana@example.com", "secret"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }
}
