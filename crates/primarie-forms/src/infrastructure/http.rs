//! REST gateway to the city hall backend
//!
//! Talks to the `/api/v1` form endpoints. Requests are never retried here;
//! a timeout or connection failure surfaces as a retryable error and the
//! citizen decides whether to try again.

use async_trait::async_trait;
use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::domain::aggregates::{FormType, Submission};
use crate::domain::value_objects::ValidationErrors;
use crate::ports::{FormsGateway, GatewayError, SubmissionCreate};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const API_PREFIX: [&str; 2] = ["api", "v1"];
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub api_token: Option<String>,
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_token: None,
        }
    }
}

impl HttpGatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }
}

#[derive(Clone)]
pub struct HttpFormsGateway {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpFormsGateway {
    pub fn new(config: HttpGatewayConfig) -> Result<Self, GatewayError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| GatewayError::Transport(format!("invalid base url {}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Transport(format!("invalid base url {}", config.base_url)));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(token) = &config.api_token {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| GatewayError::Transport("api token is not a valid header value".into()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(format!("primarie-forms/{}", VERSION))
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/api/v1/{segments...}`, each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(API_PREFIX).extend(segments);
        }
        url
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, GatewayError> {
        self.request(Method::GET, url, None::<&()>).await
    }

    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T, GatewayError> {
        tracing::debug!(%method, %url, "Backend request");

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if status.is_success() {
            return serde_json::from_slice(&body).map_err(|e| GatewayError::Decode(e.to_string()));
        }

        let err = error_from_response(status, &body);
        tracing::warn!(status = status.as_u16(), error = %err, "Backend returned an error");
        Err(err)
    }
}

#[async_trait]
impl FormsGateway for HttpFormsGateway {
    /// Entries that fail to decode are skipped so one bad schema does not
    /// hide the rest of the catalogue.
    async fn list_form_types(&self) -> Result<Vec<FormType>, GatewayError> {
        let mut url = self.endpoint(&["form-types"]);
        url.query_pairs_mut().append_pair("active_only", "true");
        let entries: Vec<serde_json::Value> = self.get(url).await?;
        Ok(decode_each(entries))
    }

    async fn get_form_type(&self, id: i64) -> Result<FormType, GatewayError> {
        self.get(self.endpoint(&["form-types", &id.to_string()])).await
    }

    /// The backend has no slug route; the lookup goes through the active list.
    async fn get_form_type_by_slug(&self, slug: &str) -> Result<FormType, GatewayError> {
        self.list_form_types()
            .await?
            .into_iter()
            .find(|t| t.slug == slug)
            .ok_or_else(|| GatewayError::NotFound(format!("form type {}", slug)))
    }

    async fn create_submission(&self, payload: SubmissionCreate) -> Result<Submission, GatewayError> {
        let url = self.endpoint(&["form-submissions"]);
        self.request(Method::POST, url, Some(&payload)).await
    }

    async fn get_submission_by_reference(&self, reference: &str) -> Result<Submission, GatewayError> {
        self.get(self.endpoint(&["form-submissions", "ref", reference])).await
    }
}

fn decode_each(entries: Vec<serde_json::Value>) -> Vec<FormType> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let slug = entry.get("slug").and_then(|s| s.as_str()).map(str::to_string);
            match serde_json::from_value::<FormType>(entry) {
                Ok(form_type) => Some(form_type),
                Err(e) => {
                    tracing::warn!(slug = slug.as_deref().unwrap_or("?"), error = %e, "Skipping undecodable form type");
                    None
                }
            }
        })
        .collect()
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(err.to_string())
    }
}

/// `{"detail": ...}` error body
#[derive(Deserialize)]
struct ErrorResponse {
    detail: ErrorDetail,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message(String),
    Fields(Vec<FieldDetail>),
    Other(serde_json::Value),
}

/// One entry of a request validation failure
#[derive(Deserialize)]
struct FieldDetail {
    #[serde(default)]
    loc: Vec<serde_json::Value>,
    msg: String,
}

impl FieldDetail {
    /// Innermost named location, e.g. `["body", "citizen_email"]`
    fn field(&self) -> Option<&str> {
        self.loc.iter().rev().find_map(serde_json::Value::as_str)
    }
}

pub(crate) fn error_from_response(status: StatusCode, body: &[u8]) -> GatewayError {
    let detail = serde_json::from_slice::<ErrorResponse>(body).ok().map(|r| r.detail);
    let code = status.as_u16();

    if status == StatusCode::UNPROCESSABLE_ENTITY {
        if let Some(ErrorDetail::Fields(items)) = &detail {
            let mut fields = ValidationErrors::default();
            for item in items {
                if let Some(name) = item.field() {
                    if !fields.contains(name) {
                        fields.insert(name, item.msg.as_str());
                    }
                }
            }
            let message = items
                .iter()
                .map(|i| i.msg.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return GatewayError::Validation { message, fields };
        }
    }

    let message = match detail {
        Some(ErrorDetail::Message(message)) => message,
        Some(ErrorDetail::Fields(items)) => items
            .into_iter()
            .map(|i| i.msg)
            .collect::<Vec<_>>()
            .join("; "),
        Some(ErrorDetail::Other(value)) => value.to_string(),
        None => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                text
            }
        }
    };

    match status {
        StatusCode::NOT_FOUND => GatewayError::NotFound(message),
        StatusCode::UNPROCESSABLE_ENTITY => GatewayError::Validation {
            message,
            fields: ValidationErrors::default(),
        },
        s if s.is_server_error() => GatewayError::Server { status: code, message },
        _ => GatewayError::Rejected { status: code, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(base: &str) -> HttpFormsGateway {
        HttpFormsGateway::new(HttpGatewayConfig::new(base)).unwrap()
    }

    #[test]
    fn test_endpoint_joining() {
        let gw = gateway("http://primarie.local:8000");
        assert_eq!(
            gw.endpoint(&["form-types", "3"]).as_str(),
            "http://primarie.local:8000/api/v1/form-types/3"
        );

        let gw = gateway("https://primarie.ro/backend/");
        assert_eq!(
            gw.endpoint(&["form-submissions", "ref", "CERERE-20240301-AB12CD34"]).as_str(),
            "https://primarie.ro/backend/api/v1/form-submissions/ref/CERERE-20240301-AB12CD34"
        );
    }

    #[test]
    fn test_reference_is_encoded_as_one_segment() {
        let gw = gateway("http://localhost:8000");
        assert_eq!(
            gw.endpoint(&["form-submissions", "ref", "a/b"]).path(),
            "/api/v1/form-submissions/ref/a%2Fb"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpFormsGateway::new(HttpGatewayConfig::new("not a url")).is_err());
        assert!(HttpFormsGateway::new(HttpGatewayConfig::new("mailto:office@primarie.ro")).is_err());
    }

    #[test]
    fn test_validation_detail_list() {
        let body = br#"{"detail": [
            {"loc": ["body", "citizen_email"], "msg": "value is not a valid email address", "type": "value_error"},
            {"loc": ["body", "submission_data", "cnp"], "msg": "field required", "type": "missing"},
            {"loc": ["body"], "msg": "body malformed"}
        ]}"#;

        match error_from_response(StatusCode::UNPROCESSABLE_ENTITY, body) {
            GatewayError::Validation { message, fields } => {
                assert_eq!(fields.get("citizen_email"), Some("value is not a valid email address"));
                assert_eq!(fields.get("cnp"), Some("field required"));
                assert_eq!(fields.get("body"), Some("body malformed"));
                assert!(message.starts_with("value is not a valid email address; "));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_status_classification() {
        let not_found = br#"{"detail": "Tipul de formular nu a fost gasit sau nu este activ"}"#;
        assert_eq!(
            error_from_response(StatusCode::NOT_FOUND, not_found),
            GatewayError::NotFound("Tipul de formular nu a fost gasit sau nu este activ".into())
        );

        assert_eq!(
            error_from_response(StatusCode::TOO_MANY_REQUESTS, br#"{"detail": "limit reached"}"#),
            GatewayError::Rejected { status: 429, message: "limit reached".into() }
        );

        assert_eq!(
            error_from_response(StatusCode::BAD_GATEWAY, b""),
            GatewayError::Server { status: 502, message: "Bad Gateway".into() }
        );

        assert_eq!(
            error_from_response(StatusCode::INTERNAL_SERVER_ERROR, b"boom"),
            GatewayError::Server { status: 500, message: "boom".into() }
        );
    }
}
