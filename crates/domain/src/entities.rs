//! Domain entities for the Freehub client
//!
//! Wire-compatible views of the marketplace resources. Field names follow the
//! API's JSON (`_id`, `desc`, `reviewCount`, ...). Derived fields are read-only:
//! the client deserializes them but never sends them back.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use freehub_common::{Error, Result};

use crate::state::{GigEvent, GigState, GigStateMachine};

// ============================================================================
// Accounts
// ============================================================================

/// Account category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Freelancer,
    /// Any role this client does not know about
    #[serde(other)]
    Other,
}

impl Role {
    /// Whether this role may create, edit, or delete gigs
    pub fn can_manage_gigs(&self) -> bool {
        !matches!(self, Role::Client)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Client => write!(f, "client"),
            Role::Freelancer => write!(f, "freelancer"),
            Role::Other => write!(f, "other"),
        }
    }
}

/// Logged-in user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Opaque bearer credential.
///
/// `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::Authentication("Empty bearer token".to_string()));
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BearerToken {
    type Error = Error;

    fn try_from(token: String) -> Result<Self> {
        Self::new(token)
    }
}

impl From<BearerToken> for String {
    fn from(token: BearerToken) -> Self {
        token.0
    }
}

impl std::fmt::Debug for BearerToken {
    #[mutants::skip] // Redaction only, no behavior to mutate
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// Authenticated session: credential plus profile. Replaced wholesale, never
/// edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: BearerToken,
    pub user: UserProfile,
}

impl Session {
    pub fn new(token: BearerToken, user: UserProfile) -> Self {
        Self { token, user }
    }

    pub fn role(&self) -> Role {
        self.user.role
    }
}

// ============================================================================
// Gigs
// ============================================================================

/// Gig status, decided by the server except for the client-side "mark complete"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GigStatus {
    #[default]
    Active,
    Pending,
    Paused,
    Rejected,
    Completed,
}

impl GigStatus {
    pub fn is_terminal(&self) -> bool {
        self.to_state().is_terminal()
    }

    /// Convert to state machine state
    pub fn to_state(&self) -> GigState {
        match self {
            GigStatus::Active => GigState::Active,
            GigStatus::Pending => GigState::Pending,
            GigStatus::Paused => GigState::Paused,
            GigStatus::Rejected => GigState::Rejected,
            GigStatus::Completed => GigState::Completed,
        }
    }

    /// Create from state machine state
    pub fn from_state(state: GigState) -> Self {
        match state {
            GigState::Active => GigStatus::Active,
            GigState::Pending => GigStatus::Pending,
            GigState::Paused => GigStatus::Paused,
            GigState::Rejected => GigStatus::Rejected,
            GigState::Completed => GigStatus::Completed,
        }
    }

    /// Status after a "mark complete" action
    pub fn mark_complete(&self) -> Result<GigStatus> {
        let next = GigStateMachine::transition(self.to_state(), GigEvent::MarkComplete)?;
        Ok(GigStatus::from_state(next))
    }
}

impl std::fmt::Display for GigStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_state())
    }
}

/// Gig entity as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gig {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "desc", alias = "description", default)]
    pub desc: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    /// Remote image references in display order
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: GigStatus,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub delivery_time: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Gig {
    /// Absolute URLs for this gig's images
    pub fn image_urls(&self, asset_base: &str) -> Vec<String> {
        self.images
            .iter()
            .map(|path| resolve_image_url(asset_base, path))
            .collect()
    }
}

/// Resolve a stored image path against the asset host.
///
/// Absolute `http(s)` URLs pass through untouched.
pub fn resolve_image_url(asset_base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        asset_base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Validated scalar fields of a gig submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GigFields {
    pub title: String,
    pub desc: String,
    pub price: Decimal,
    pub category: String,
}

impl GigFields {
    /// Build fields, enforcing the submission invariants
    pub fn new(title: String, desc: String, price: Decimal, category: String) -> Result<Self> {
        if title.trim().is_empty() {
            return Err(Error::Validation("Title is required".to_string()));
        }
        if desc.trim().is_empty() {
            return Err(Error::Validation("Description is required".to_string()));
        }
        if price <= Decimal::ZERO {
            return Err(Error::Validation("Price must be positive".to_string()));
        }
        if category.trim().is_empty() {
            return Err(Error::Validation("Category is required".to_string()));
        }
        Ok(Self {
            title,
            desc,
            price,
            category,
        })
    }
}

/// A locally selected file that has not been uploaded yet
#[derive(Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PendingFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk
    pub async fn from_path(path: &std::path::Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::Validation(format!("Cannot read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self::new(file_name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for PendingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

// ============================================================================
// Cart & Orders
// ============================================================================

/// Client-side snapshot of a gig selected for purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
}

impl From<&Gig> for CartItem {
    fn from(gig: &Gig) -> Self {
        Self {
            id: gig.id.clone(),
            title: gig.title.clone(),
            price: gig.price,
        }
    }
}

/// Order acknowledgment returned by `POST /orders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub gig_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// External redirect target for a checkout session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRedirect {
    pub url: String,
}
