//! Freehub Marketplace API Service
//!
//! Provides access to the remote marketplace REST API with support for:
//! - HTTP client (reqwest) for production use
//! - In-memory mock API for testing and offline development
//! - Bearer authentication on every request that has a session

pub mod client;
pub mod mock;
pub mod wire;

use std::time::Duration;

use freehub_common::ClientConfig;
use freehub_domain::{BearerToken, Gig, GigFields, Order, PendingFile, UserProfile};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("API configuration error: {0}")]
    Configuration(String),

    /// No response was received
    #[error("API request error: {0}")]
    Request(String),

    /// Non-2xx response, with the server's message when it sent one
    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// 2xx response carrying `success: false`
    #[error("API rejected request: {0}")]
    Rejected(String),

    #[error("API response error: {0}")]
    Response(String),

    /// Refused before sending
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<ApiError> for freehub_common::Error {
    fn from(err: ApiError) -> Self {
        use freehub_common::Error;
        match err {
            ApiError::Configuration(msg) => Error::Configuration(msg),
            ApiError::Request(msg) => Error::Network(msg),
            ApiError::Status { status, message } => Error::from_status(status, message),
            ApiError::Rejected(message) => Error::Server {
                status: 200,
                message,
            },
            ApiError::Response(msg) => Error::Internal(msg),
            ApiError::InvalidRequest(msg) => Error::Validation(msg),
        }
    }
}

/// Login credentials for `POST /auth/login`
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: BearerToken,
    pub user: UserProfile,
}

/// Multipart payload for `POST /gigs`
#[derive(Debug, Clone)]
pub struct CreateGigRequest {
    pub fields: GigFields,
    pub images: Vec<PendingFile>,
}

/// How the image list changes on `PUT /gigs/:id`
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlan {
    /// When true, `kept` is authoritative for the surviving remote images.
    /// When false, the uploads replace every existing image.
    pub keep_existing: bool,
    /// Remote references to keep, in display order
    pub kept: Vec<String>,
    /// New files appended after the kept references
    pub uploads: Vec<PendingFile>,
}

impl ImagePlan {
    /// Keep `kept`, drop every other remote image, append `uploads`
    pub fn keep(kept: Vec<String>, uploads: Vec<PendingFile>) -> Self {
        Self {
            keep_existing: true,
            kept,
            uploads,
        }
    }

    /// Discard all remote images and use `uploads` only
    pub fn replace_all(uploads: Vec<PendingFile>) -> Self {
        Self {
            keep_existing: false,
            kept: Vec::new(),
            uploads,
        }
    }
}

/// Multipart payload for `PUT /gigs/:id`
#[derive(Debug, Clone)]
pub struct UpdateGigRequest {
    pub fields: GigFields,
    pub images: ImagePlan,
}

/// Response of `POST /orders/create-checkout-session`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSessionResponse {
    #[serde(default)]
    pub url: Option<String>,
}

/// API service configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API provider (http, mock)
    pub provider: String,
    /// Base URL including the `/api` prefix
    pub base_url: String,
    /// Request timeout; `None` keeps reqwest's default
    pub timeout: Option<Duration>,
}

impl From<&ClientConfig> for ApiConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            provider: config.provider.clone(),
            base_url: config.api_url.clone(),
            timeout: config.request_timeout,
        }
    }
}

/// Remote marketplace API.
///
/// `auth` is attached as `Authorization: Bearer <token>` when present; callers
/// decide whether an operation needs a session at all.
#[async_trait::async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError>;

    /// `POST /gigs`
    async fn create_gig(
        &self,
        auth: Option<&BearerToken>,
        request: CreateGigRequest,
    ) -> Result<Gig, ApiError>;

    /// `GET /gigs`
    async fn list_gigs(&self, auth: Option<&BearerToken>) -> Result<Vec<Gig>, ApiError>;

    /// `GET /gigs/:id`
    async fn get_gig(&self, auth: Option<&BearerToken>, id: &str) -> Result<Gig, ApiError>;

    /// `PUT /gigs/:id`
    async fn update_gig(
        &self,
        auth: Option<&BearerToken>,
        id: &str,
        request: UpdateGigRequest,
    ) -> Result<Gig, ApiError>;

    /// `DELETE /gigs/:id`
    async fn delete_gig(&self, auth: Option<&BearerToken>, id: &str) -> Result<(), ApiError>;

    /// `POST /orders`
    async fn create_order(
        &self,
        auth: Option<&BearerToken>,
        gig_id: &str,
    ) -> Result<Order, ApiError>;

    /// `POST /orders/create-checkout-session`
    async fn create_checkout_session(
        &self,
        auth: Option<&BearerToken>,
        gig_id: &str,
    ) -> Result<CheckoutSessionResponse, ApiError>;

    /// `GET /favorites`
    async fn list_favorites(&self, auth: Option<&BearerToken>) -> Result<Vec<Gig>, ApiError>;
}

/// Factory for creating MarketplaceApi implementations
pub struct MarketplaceApiFactory;

impl MarketplaceApiFactory {
    /// Create a MarketplaceApi based on configuration
    pub fn create(config: ApiConfig) -> Result<Box<dyn MarketplaceApi>, ApiError> {
        match config.provider.as_str() {
            "http" => {
                tracing::info!(base_url = %config.base_url, "Creating HTTP marketplace client");
                Ok(Box::new(client::HttpMarketplaceClient::new(config)?))
            }
            "mock" => {
                tracing::info!("Creating mock marketplace API");
                Ok(Box::new(mock::MockMarketplaceApi::new()))
            }
            provider => Err(ApiError::Configuration(format!(
                "Unknown API provider: {}. Supported providers: http, mock",
                provider
            ))),
        }
    }
}
