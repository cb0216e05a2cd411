//! Mock Marketplace API Implementation
//!
//! In-memory marketplace for tests and offline development:
//! - Gigs, orders and accounts live in shared maps
//! - Every call is recorded with whether it carried a bearer token
//! - Failures and latency are programmable per operation

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;

use freehub_domain::{BearerToken, Gig, GigFields, GigStatus, Order, PendingFile, UserProfile};

use crate::{
    ApiError, CheckoutSessionResponse, CreateGigRequest, LoginRequest, LoginResponse,
    MarketplaceApi, UpdateGigRequest,
};

/// Operation names used for recording and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    Login,
    CreateGig,
    ListGigs,
    GetGig,
    UpdateGig,
    DeleteGig,
    CreateOrder,
    CreateCheckoutSession,
    ListFavorites,
}

/// A call the mock received
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: MockOperation,
    /// Gig id or login email, when the operation has one
    pub target: Option<String>,
    /// Whether a bearer token was attached
    pub authorized: bool,
}

/// Injected failure
#[derive(Debug, Clone, PartialEq)]
pub enum MockFailure {
    /// Non-2xx response
    Status { status: u16, message: String },
    /// 2xx response carrying `success: false`
    Rejected(String),
    /// No response at all
    Network,
}

impl MockFailure {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        MockFailure::Status {
            status,
            message: message.into(),
        }
    }

    fn into_error(self) -> ApiError {
        match self {
            MockFailure::Status { status, message } => ApiError::Status { status, message },
            MockFailure::Rejected(message) => ApiError::Rejected(message),
            MockFailure::Network => ApiError::Request("connection refused".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
struct FailureRule {
    operation: MockOperation,
    /// `None` matches every target
    target: Option<String>,
    failure: MockFailure,
}

#[derive(Debug, Clone)]
struct Account {
    password: String,
    profile: UserProfile,
}

#[derive(Debug, Default)]
struct MockState {
    gigs: BTreeMap<String, Gig>,
    orders: Vec<Order>,
    favorites: Vec<String>,
    accounts: BTreeMap<String, Account>,
    next_gig: u64,
    next_upload: u64,
}

/// Mock marketplace API for testing
#[derive(Debug, Clone, Default)]
pub struct MockMarketplaceApi {
    state: Arc<Mutex<MockState>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    failures: Arc<RwLock<Vec<FailureRule>>>,
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockMarketplaceApi {
    /// Create a new, empty mock marketplace
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account that `login` accepts
    pub fn with_user(self, email: &str, password: &str, profile: UserProfile) -> Self {
        self.state.lock().unwrap().accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                profile,
            },
        );
        self
    }

    /// Seed a gig as if the server already had it
    pub fn insert_gig(&self, gig: Gig) {
        self.state.lock().unwrap().gigs.insert(gig.id.clone(), gig);
    }

    /// Overwrite the server-side status of a gig
    pub fn set_status(&self, gig_id: &str, status: GigStatus) {
        if let Some(gig) = self.state.lock().unwrap().gigs.get_mut(gig_id) {
            gig.status = status;
        }
    }

    /// Mark a gig as a favorite of the current user
    pub fn add_favorite(&self, gig_id: &str) {
        self.state
            .lock()
            .unwrap()
            .favorites
            .push(gig_id.to_string());
    }

    /// Fail every call of `operation`, or only those for `target`
    pub fn fail_on(&self, operation: MockOperation, target: Option<&str>, failure: MockFailure) {
        self.failures.write().unwrap().push(FailureRule {
            operation,
            target: target.map(str::to_string),
            failure,
        });
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) {
        self.failures.write().unwrap().clear();
    }

    /// Delay every response
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write().unwrap() = Some(delay);
    }

    /// Snapshot of the server-side gigs, ordered by id
    pub fn gigs(&self) -> Vec<Gig> {
        self.state.lock().unwrap().gigs.values().cloned().collect()
    }

    pub fn gig(&self, id: &str) -> Option<Gig> {
        self.state.lock().unwrap().gigs.get(id).cloned()
    }

    /// Orders created so far, in creation order
    pub fn orders(&self) -> Vec<Order> {
        self.state.lock().unwrap().orders.clone()
    }

    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, operation: MockOperation) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.operation == operation)
            .cloned()
            .collect()
    }

    /// Forget recorded calls, failures and delay. Stored data is kept.
    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
        self.failures.write().unwrap().clear();
        *self.delay.write().unwrap() = None;
    }

    /// Record the call, wait out the delay, then apply any injected failure
    async fn enter(
        &self,
        operation: MockOperation,
        target: Option<&str>,
        auth: Option<&BearerToken>,
    ) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(RecordedCall {
            operation,
            target: target.map(str::to_string),
            authorized: auth.is_some(),
        });

        let delay = *self.delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self
            .failures
            .read()
            .unwrap()
            .iter()
            .find(|rule| {
                rule.operation == operation
                    && (rule.target.is_none() || rule.target.as_deref() == target)
            })
            .map(|rule| rule.failure.clone());
        match failure {
            Some(failure) => Err(failure.into_error()),
            None => Ok(()),
        }
    }

    fn require_auth(auth: Option<&BearerToken>) -> Result<(), ApiError> {
        match auth {
            Some(_) => Ok(()),
            None => Err(ApiError::Status {
                status: 401,
                message: "No token, authorization denied".to_string(),
            }),
        }
    }

    fn not_found() -> ApiError {
        ApiError::Status {
            status: 404,
            message: "Gig not found".to_string(),
        }
    }

    fn store_uploads(state: &mut MockState, uploads: Vec<PendingFile>) -> Vec<String> {
        uploads
            .into_iter()
            .map(|file| {
                state.next_upload += 1;
                format!("/uploads/{}-{}", state.next_upload, file.file_name)
            })
            .collect()
    }

    fn apply_fields(gig: &mut Gig, fields: GigFields) {
        gig.title = fields.title;
        gig.desc = fields.desc;
        gig.price = fields.price;
        gig.category = fields.category;
    }
}

#[async_trait::async_trait]
impl MarketplaceApi for MockMarketplaceApi {
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        self.enter(MockOperation::Login, Some(&request.email), None)
            .await?;

        let state = self.state.lock().unwrap();
        let account = state
            .accounts
            .get(&request.email)
            .filter(|account| account.password == request.password)
            .ok_or_else(|| ApiError::Status {
                status: 400,
                message: "Invalid credentials".to_string(),
            })?;

        let token = BearerToken::new(format!("mock-token-{}", account.profile.id))
            .map_err(|e| ApiError::Response(e.to_string()))?;
        Ok(LoginResponse {
            token,
            user: account.profile.clone(),
        })
    }

    async fn create_gig(
        &self,
        auth: Option<&BearerToken>,
        request: CreateGigRequest,
    ) -> Result<Gig, ApiError> {
        self.enter(MockOperation::CreateGig, None, auth).await?;
        Self::require_auth(auth)?;

        let mut state = self.state.lock().unwrap();
        state.next_gig += 1;
        let id = format!("gig-{}", state.next_gig);
        let images = Self::store_uploads(&mut state, request.images);
        let now = Utc::now();

        let mut gig = Gig {
            id: id.clone(),
            title: String::new(),
            desc: String::new(),
            price: Decimal::ZERO,
            category: String::new(),
            images,
            status: GigStatus::Active,
            views: 0,
            rating: None,
            review_count: 0,
            delivery_time: None,
            created_at: Some(now),
            updated_at: Some(now),
        };
        Self::apply_fields(&mut gig, request.fields);
        state.gigs.insert(id, gig.clone());
        Ok(gig)
    }

    async fn list_gigs(&self, auth: Option<&BearerToken>) -> Result<Vec<Gig>, ApiError> {
        self.enter(MockOperation::ListGigs, None, auth).await?;
        Self::require_auth(auth)?;
        Ok(self.gigs())
    }

    async fn get_gig(&self, auth: Option<&BearerToken>, id: &str) -> Result<Gig, ApiError> {
        self.enter(MockOperation::GetGig, Some(id), auth).await?;
        Self::require_auth(auth)?;
        self.gig(id).ok_or_else(Self::not_found)
    }

    async fn update_gig(
        &self,
        auth: Option<&BearerToken>,
        id: &str,
        request: UpdateGigRequest,
    ) -> Result<Gig, ApiError> {
        self.enter(MockOperation::UpdateGig, Some(id), auth).await?;
        Self::require_auth(auth)?;

        let mut state = self.state.lock().unwrap();
        let current = state.gigs.get(id).cloned().ok_or_else(Self::not_found)?;

        let mut images: Vec<String> = if request.images.keep_existing {
            // The kept set can only narrow what is already stored
            request
                .images
                .kept
                .into_iter()
                .filter(|reference| current.images.contains(reference))
                .collect()
        } else {
            Vec::new()
        };
        images.extend(Self::store_uploads(&mut state, request.images.uploads));

        let mut gig = current;
        Self::apply_fields(&mut gig, request.fields);
        gig.images = images;
        gig.updated_at = Some(Utc::now());
        state.gigs.insert(id.to_string(), gig.clone());
        Ok(gig)
    }

    async fn delete_gig(&self, auth: Option<&BearerToken>, id: &str) -> Result<(), ApiError> {
        self.enter(MockOperation::DeleteGig, Some(id), auth).await?;
        Self::require_auth(auth)?;

        let mut state = self.state.lock().unwrap();
        state.gigs.remove(id).ok_or_else(Self::not_found)?;
        state.favorites.retain(|fav| fav != id);
        Ok(())
    }

    async fn create_order(
        &self,
        auth: Option<&BearerToken>,
        gig_id: &str,
    ) -> Result<Order, ApiError> {
        self.enter(MockOperation::CreateOrder, Some(gig_id), auth)
            .await?;
        Self::require_auth(auth)?;

        let mut state = self.state.lock().unwrap();
        if !state.gigs.contains_key(gig_id) {
            return Err(Self::not_found());
        }
        let order = Order {
            id: Some(format!("order-{}", state.orders.len() + 1)),
            gig_id: Some(gig_id.to_string()),
            status: Some("pending".to_string()),
        };
        state.orders.push(order.clone());
        Ok(order)
    }

    async fn create_checkout_session(
        &self,
        auth: Option<&BearerToken>,
        gig_id: &str,
    ) -> Result<CheckoutSessionResponse, ApiError> {
        self.enter(MockOperation::CreateCheckoutSession, Some(gig_id), auth)
            .await?;
        Self::require_auth(auth)?;

        if self.gig(gig_id).is_none() {
            return Err(Self::not_found());
        }
        Ok(CheckoutSessionResponse {
            url: Some(format!("https://checkout.mock/session/{}", gig_id)),
        })
    }

    async fn list_favorites(&self, auth: Option<&BearerToken>) -> Result<Vec<Gig>, ApiError> {
        self.enter(MockOperation::ListFavorites, None, auth).await?;
        Self::require_auth(auth)?;

        let state = self.state.lock().unwrap();
        Ok(state
            .favorites
            .iter()
            .filter_map(|id| state.gigs.get(id).cloned())
            .collect())
    }
}
