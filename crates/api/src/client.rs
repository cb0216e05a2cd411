//! Marketplace HTTP Client Implementation
//!
//! Real HTTP client for the marketplace REST API at `{base_url}`.
//! Gig writes are sent as `multipart/form-data`, everything else as JSON.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::json;

use freehub_domain::{BearerToken, Gig, GigFields, Order, PendingFile};

use crate::wire::{decode_body, status_error};
use crate::{
    ApiConfig, ApiError, CheckoutSessionResponse, CreateGigRequest, ImagePlan, LoginRequest,
    LoginResponse, MarketplaceApi, UpdateGigRequest,
};

/// Real marketplace client backed by reqwest.
pub struct HttpMarketplaceClient {
    http: Client,
    base_url: String,
}

impl HttpMarketplaceClient {
    /// Create a new client from configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `{base_url}/gigs/{id}` with `id` percent-encoded as one path segment
    fn gig_url(&self, id: &str) -> Result<Url, ApiError> {
        if matches!(id.trim(), "" | "." | "..") {
            return Err(ApiError::InvalidRequest(format!("Invalid gig id {:?}", id)));
        }
        let mut url = Url::parse(&self.url("/gigs"))
            .map_err(|e| ApiError::Configuration(format!("Invalid API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Configuration("API base URL cannot hold a path".to_string()))?
            .push(id);
        Ok(url)
    }

    fn authorize(builder: RequestBuilder, auth: Option<&BearerToken>) -> RequestBuilder {
        match auth {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    /// Send a request and return the raw body of a 2xx response.
    async fn send(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Response(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            tracing::debug!(status = %status, "Marketplace API returned an error");
            return Err(status_error(status.as_u16(), &body));
        }

        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(builder).await?;
        decode_body(&body)
    }

    fn fields_form(fields: &GigFields) -> Form {
        Form::new()
            .text("title", fields.title.clone())
            .text("desc", fields.desc.clone())
            .text("price", fields.price.normalize().to_string())
            .text("category", fields.category.clone())
    }

    fn attach_images(mut form: Form, images: Vec<PendingFile>) -> Result<Form, ApiError> {
        for file in images {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)
                .map_err(|e| ApiError::Configuration(format!("Invalid content type: {}", e)))?;
            form = form.part("images", part);
        }
        Ok(form)
    }

    fn update_form(request: UpdateGigRequest) -> Result<Form, ApiError> {
        let ImagePlan {
            keep_existing,
            kept,
            uploads,
        } = request.images;

        let mut form = Self::fields_form(&request.fields)
            .text("keepExistingImages", keep_existing.to_string());
        if keep_existing {
            // JSON-encoded so an empty kept set is distinguishable from "not sent"
            form = form.text("existingImages", json!(kept).to_string());
        }
        Self::attach_images(form, uploads)
    }
}

#[async_trait::async_trait]
impl MarketplaceApi for HttpMarketplaceClient {
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        tracing::debug!(email = %request.email, "Sending login request");
        self.send_json(self.http.post(self.url("/auth/login")).json(&request))
            .await
    }

    async fn create_gig(
        &self,
        auth: Option<&BearerToken>,
        request: CreateGigRequest,
    ) -> Result<Gig, ApiError> {
        tracing::debug!(images = request.images.len(), "Creating gig");
        let form = Self::attach_images(Self::fields_form(&request.fields), request.images)?;
        let builder = Self::authorize(self.http.post(self.url("/gigs")), auth).multipart(form);
        self.send_json(builder).await
    }

    async fn list_gigs(&self, auth: Option<&BearerToken>) -> Result<Vec<Gig>, ApiError> {
        let builder = Self::authorize(self.http.get(self.url("/gigs")), auth);
        self.send_json(builder).await
    }

    async fn get_gig(&self, auth: Option<&BearerToken>, id: &str) -> Result<Gig, ApiError> {
        let builder = Self::authorize(self.http.get(self.gig_url(id)?), auth);
        self.send_json(builder).await
    }

    async fn update_gig(
        &self,
        auth: Option<&BearerToken>,
        id: &str,
        request: UpdateGigRequest,
    ) -> Result<Gig, ApiError> {
        tracing::debug!(
            gig_id = %id,
            keep_existing = request.images.keep_existing,
            kept = request.images.kept.len(),
            uploads = request.images.uploads.len(),
            "Updating gig"
        );
        let form = Self::update_form(request)?;
        let builder =
            Self::authorize(self.http.put(self.gig_url(id)?), auth).multipart(form);
        self.send_json(builder).await
    }

    async fn delete_gig(&self, auth: Option<&BearerToken>, id: &str) -> Result<(), ApiError> {
        let builder = Self::authorize(self.http.delete(self.gig_url(id)?), auth);
        self.send(builder).await.map(|_| ())
    }

    async fn create_order(
        &self,
        auth: Option<&BearerToken>,
        gig_id: &str,
    ) -> Result<Order, ApiError> {
        let builder = Self::authorize(self.http.post(self.url("/orders")), auth)
            .json(&json!({ "gigId": gig_id }));
        let body = self.send(builder).await?;
        if body.trim().is_empty() {
            return Ok(Order {
                gig_id: Some(gig_id.to_string()),
                ..Order::default()
            });
        }
        decode_body(&body)
    }

    async fn create_checkout_session(
        &self,
        auth: Option<&BearerToken>,
        gig_id: &str,
    ) -> Result<CheckoutSessionResponse, ApiError> {
        let builder = Self::authorize(
            self.http.post(self.url("/orders/create-checkout-session")),
            auth,
        )
        .json(&json!({ "gigId": gig_id }));
        self.send_json(builder).await
    }

    async fn list_favorites(&self, auth: Option<&BearerToken>) -> Result<Vec<Gig>, ApiError> {
        let builder = Self::authorize(self.http.get(self.url("/favorites")), auth);
        self.send_json(builder).await
    }
}
