//! HTTP client for the lead backend.
//!
//! Wraps reqwest with bearer auth, CSRF cookie handling, and uniform error
//! classification. The backend issues an `XSRF-TOKEN` cookie (URL-encoded)
//! that must be echoed back, percent-decoded, in the `X-XSRF-TOKEN` header.

use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use reqwest::Method;
use reqwest::cookie::{CookieStore, Jar};
use serde::de::DeserializeOwned;

use crate::api::types::{
    Lead, LeadDraft, LeadPage, LeadStatus, LoginRequest, LoginResponse, RegisterRequest, User,
};
use crate::leads::ListQuery;

pub mod error;
pub mod types;

pub use error::{ApiError, ApiErrorKind, ApiResult};

/// Name of the CSRF cookie issued by the backend.
const CSRF_COOKIE: &str = "XSRF-TOKEN";
/// Header the backend expects the decoded CSRF token in.
const CSRF_HEADER: &str = "X-XSRF-TOKEN";

/// Client for the lead backend API.
///
/// Cheap to share behind an `Arc`; the bearer token can be swapped at any
/// time without rebuilding the client.
pub struct ApiClient {
    base_url: String,
    origin: url::Url,
    http: reqwest::Client,
    jar: Arc<Jar>,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Creates a client for the given base URL (no trailing slash required).
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let origin = url::Url::parse(&base_url)
            .with_context(|| format!("Invalid base URL: {base_url}"))?;

        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url,
            origin,
            http,
            jar,
            token: RwLock::new(None),
        })
    }

    /// Returns the base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Installs (or clears) the bearer token used on subsequent requests.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().expect("token lock poisoned") = token;
    }

    /// Returns true if a bearer token is currently installed.
    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    fn bearer_token(&self) -> Option<String> {
        self.token.read().expect("token lock poisoned").clone()
    }

    /// Returns the decoded CSRF token from the cookie jar, if the backend
    /// has issued one.
    fn csrf_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.origin)?;
        csrf_from_cookie_header(header.to_str().ok()?)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{path}", self.base_url))
            .header("Accept", "application/json");

        if let Some(token) = self.bearer_token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(csrf) = self.csrf_token() {
            builder = builder.header(CSRF_HEADER, csrf);
        }

        builder
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        let response = builder.send().await.map_err(classify_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::http_status(status.as_u16(), &body));
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        response
            .json()
            .await
            .map_err(|e| ApiError::new(ApiErrorKind::Unknown, format!("Failed to parse response: {e}")))
    }

    /// Primes the CSRF cookie. Called before login and register; afterwards
    /// every request echoes the decoded cookie automatically.
    pub async fn csrf_cookie(&self) -> ApiResult<()> {
        self.send(self.request(Method::GET, "/sanctum/csrf-cookie"))
            .await?;
        Ok(())
    }

    /// Exchanges credentials for a bearer token and the account profile.
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<LoginResponse> {
        self.csrf_cookie().await?;
        let response = self
            .send(self.request(Method::POST, "/api/login").json(credentials))
            .await?;
        Self::decode(response).await
    }

    /// Creates a new account. Does not log in.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<()> {
        self.csrf_cookie().await?;
        self.send(self.request(Method::POST, "/api/register").json(request))
            .await?;
        Ok(())
    }

    /// Revokes the current token server-side.
    pub async fn logout(&self) -> ApiResult<()> {
        self.send(self.request(Method::POST, "/api/logout")).await?;
        Ok(())
    }

    /// Fetches the account behind the current bearer token.
    pub async fn current_user(&self) -> ApiResult<User> {
        let response = self.send(self.request(Method::GET, "/api/user")).await?;
        Self::decode(response).await
    }

    /// Fetches one page of leads for the given query.
    pub async fn list_leads(&self, query: &ListQuery) -> ApiResult<LeadPage> {
        let builder = self
            .request(Method::GET, "/api/leads")
            .query(&query.to_query_pairs());
        let response = self.send(builder).await?;
        Self::decode(response).await
    }

    /// Fetches all configured lead statuses.
    pub async fn list_statuses(&self) -> ApiResult<Vec<LeadStatus>> {
        let response = self
            .send(self.request(Method::GET, "/api/lead-statuses"))
            .await?;
        Self::decode(response).await
    }

    /// Creates a lead and returns the stored record.
    pub async fn create_lead(&self, draft: &LeadDraft) -> ApiResult<Lead> {
        let response = self
            .send(self.request(Method::POST, "/api/leads").json(draft))
            .await?;
        Self::decode(response).await
    }

    /// Updates a lead and returns the stored record.
    pub async fn update_lead(&self, id: u64, draft: &LeadDraft) -> ApiResult<Lead> {
        let response = self
            .send(
                self.request(Method::PUT, &format!("/api/leads/{id}"))
                    .json(draft),
            )
            .await?;
        Self::decode(response).await
    }
}

/// Extracts the percent-decoded CSRF cookie value from a `Cookie` header
/// string of the form `name=value; name2=value2`.
fn csrf_from_cookie_header(header: &str) -> Option<String> {
    header.split("; ").find_map(|pair| {
        url::form_urlencoded::parse(pair.as_bytes())
            .find(|(name, _)| name == CSRF_COOKIE)
            .map(|(_, value)| value.into_owned())
    })
}

fn classify_reqwest_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::new(ApiErrorKind::Network, format!("Request timed out: {e}"))
    } else if e.is_connect() {
        ApiError::new(ApiErrorKind::Network, format!("Connection failed: {e}"))
    } else if e.is_request() {
        ApiError::new(ApiErrorKind::Network, format!("Request error: {e}"))
    } else {
        ApiError::new(ApiErrorKind::Network, format!("Network error: {e}"))
    }
}
