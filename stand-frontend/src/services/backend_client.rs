//! REST backend client.
//!
//! One typed wrapper around the backend's JSON collections. Every call forwards
//! the caller's bearer token, carries trace headers, and is made exactly once:
//! failures are mapped to [`AppError`] and handed back without retrying.

use super::metrics::{BACKEND_CALL_DURATION, BACKEND_ERRORS_TOTAL};
use crate::config::BackendSettings;
use crate::models::{ContactFilter, InvoiceStatusPayload, PurchaseStatusPayload, StandValidation, User};
use reqwest::{Client, Response};
use secrecy::Secret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use stand_core::error::AppError;
use stand_core::observability::{TracedClientExt, TracedRequest};
use std::time::{Duration, Instant};
use tracing::{error, info, instrument, warn};

/// Credentials and correlation data of the inbound request.
#[derive(Clone)]
pub struct CallContext {
    pub token: Secret<String>,
    pub request_id: Option<String>,
}

impl CallContext {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Secret::new(token.into()),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}

impl std::fmt::Debug for CallContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallContext")
            .field("token", &"[REDACTED]")
            .field("request_id", &self.request_id)
            .finish()
    }
}

/// Acknowledgement of a write: `{ "message": ..., <ids> }`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BackendAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl BackendAck {
    pub fn id(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(serde_json::Value::as_i64)
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
    }
}

/// Error body of the backend.
#[derive(Debug, Default, Deserialize)]
struct BackendErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Collections exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Contacts,
    Categories,
    Products,
    Suppliers,
    Clients,
    Stands,
    Purchases,
    Invoices,
}

impl Collection {
    pub fn path(&self) -> &'static str {
        match self {
            Collection::Contacts => "/contacts",
            Collection::Categories => "/categories",
            Collection::Products => "/products",
            Collection::Suppliers => "/suppliers",
            Collection::Clients => "/clients",
            Collection::Stands => "/stands",
            Collection::Purchases => "/purchases",
            Collection::Invoices => "/invoices",
        }
    }

    pub fn name(&self) -> &'static str {
        &self.path()[1..]
    }
}

pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;

        info!(base_url = %settings.base_url, "REST backend client configured");

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(request: TracedRequest, ctx: &CallContext) -> TracedRequest {
        request
            .bearer_auth(&ctx.token)
            .request_id(ctx.request_id.as_deref())
    }

    /// Send once, time it, and turn non-success answers into errors.
    async fn dispatch(&self, operation: &str, request: TracedRequest) -> Result<Response, AppError> {
        let start = Instant::now();
        let result = request.send().await;
        BACKEND_CALL_DURATION
            .with_label_values(&[operation])
            .observe(start.elapsed().as_secs_f64());

        let response = result.map_err(|e| {
            error!(operation, error = %e, "Backend request failed");
            BACKEND_ERRORS_TOTAL
                .with_label_values(&[operation, "network"])
                .inc();
            AppError::from(e)
        })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let parsed: BackendErrorBody = serde_json::from_str(&body).unwrap_or_default();
        let message = parsed
            .message
            .or(parsed.error)
            .unwrap_or_else(|| format!("Backend request failed with status {}", status));

        warn!(operation, status, message = %message, "Backend rejected request");
        BACKEND_ERRORS_TOTAL
            .with_label_values(&[operation, "status"])
            .inc();

        Err(AppError::Backend { status, message })
    }

    async fn decode<T: DeserializeOwned>(operation: &str, response: Response) -> Result<T, AppError> {
        response.json::<T>().await.map_err(|e| {
            error!(operation, error = %e, "Backend answered with an unexpected body");
            BACKEND_ERRORS_TOTAL
                .with_label_values(&[operation, "decode"])
                .inc();
            AppError::BadGateway(format!("Unexpected response from backend: {}", e))
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        operation: &str,
        path: &str,
    ) -> Result<T, AppError> {
        let request = Self::authorize(self.client.traced_get(&self.url(path)), ctx);
        let response = self.dispatch(operation, request).await?;
        Self::decode(operation, response).await
    }

    /// `GET /auth/me`
    #[instrument(skip(self, ctx))]
    pub async fn current_user(&self, ctx: &CallContext) -> Result<User, AppError> {
        self.get_json(ctx, "auth_me", "/auth/me").await
    }

    /// List a whole collection.
    #[instrument(skip(self, ctx), fields(collection = collection.name()))]
    pub async fn list<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        collection: Collection,
    ) -> Result<Vec<T>, AppError> {
        self.get_json(ctx, collection.name(), collection.path()).await
    }

    #[instrument(skip(self, ctx))]
    pub async fn list_contacts<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        filter: &ContactFilter,
    ) -> Result<Vec<T>, AppError> {
        let request = Self::authorize(self.client.traced_get(&self.url("/contacts")), ctx).query(filter);
        let response = self.dispatch("contacts", request).await?;
        Self::decode("contacts", response).await
    }

    #[instrument(skip(self, ctx))]
    pub async fn list_enterprises<T: DeserializeOwned>(&self, ctx: &CallContext) -> Result<Vec<T>, AppError> {
        self.get_json(ctx, "enterprises", "/contacts/enterprises").await
    }

    #[instrument(skip(self, ctx))]
    pub async fn enterprise_employees<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        enterprise_id: i64,
    ) -> Result<Vec<T>, AppError> {
        self.get_json(
            ctx,
            "enterprise_employees",
            &format!("/contacts/enterprises/{}/employees", enterprise_id),
        )
        .await
    }

    /// Fetch one document of a collection.
    #[instrument(skip(self, ctx), fields(collection = collection.name()))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        collection: Collection,
        id: i64,
    ) -> Result<T, AppError> {
        self.get_json(ctx, collection.name(), &format!("{}/{}", collection.path(), id))
            .await
    }

    /// Items of a stand or an invoice.
    #[instrument(skip(self, ctx), fields(collection = collection.name()))]
    pub async fn items<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        collection: Collection,
        id: i64,
    ) -> Result<Vec<T>, AppError> {
        self.get_json(
            ctx,
            "document_items",
            &format!("{}/{}/items", collection.path(), id),
        )
        .await
    }

    #[instrument(skip(self, ctx, body), fields(collection = collection.name()))]
    pub async fn create<B: Serialize + ?Sized>(
        &self,
        ctx: &CallContext,
        collection: Collection,
        body: &B,
    ) -> Result<BackendAck, AppError> {
        let request = Self::authorize(self.client.traced_post(&self.url(collection.path())), ctx).json(body);
        let response = self.dispatch(collection.name(), request).await?;
        let ack: BackendAck = Self::decode(collection.name(), response).await?;
        info!(message = ?ack.message, "Backend created document");
        Ok(ack)
    }

    #[instrument(skip(self, ctx, body), fields(collection = collection.name()))]
    pub async fn update<B: Serialize + ?Sized>(
        &self,
        ctx: &CallContext,
        collection: Collection,
        id: i64,
        body: &B,
    ) -> Result<BackendAck, AppError> {
        let url = self.url(&format!("{}/{}", collection.path(), id));
        let request = Self::authorize(self.client.traced_put(&url), ctx).json(body);
        let response = self.dispatch(collection.name(), request).await?;
        Self::decode(collection.name(), response).await
    }

    #[instrument(skip(self, ctx), fields(collection = collection.name()))]
    pub async fn delete(
        &self,
        ctx: &CallContext,
        collection: Collection,
        id: i64,
    ) -> Result<BackendAck, AppError> {
        let url = self.url(&format!("{}/{}", collection.path(), id));
        let request = Self::authorize(self.client.traced_delete(&url), ctx);
        let response = self.dispatch(collection.name(), request).await?;
        let ack: BackendAck = Self::decode(collection.name(), response).await?;
        info!(message = ?ack.message, "Backend deleted document");
        Ok(ack)
    }

    /// `PUT /stands/{id}/items`
    #[instrument(skip(self, ctx, body))]
    pub async fn replace_stand_items<B: Serialize + ?Sized>(
        &self,
        ctx: &CallContext,
        stand_id: i64,
        body: &B,
    ) -> Result<BackendAck, AppError> {
        let url = self.url(&format!("/stands/{}/items", stand_id));
        let request = Self::authorize(self.client.traced_put(&url), ctx).json(body);
        let response = self.dispatch("stand_items", request).await?;
        Self::decode("stand_items", response).await
    }

    /// `POST /stands/{id}/validate-logistics` or `validate-finance`.
    #[instrument(skip(self, ctx), fields(validation = validation.as_str()))]
    pub async fn validate_stand(
        &self,
        ctx: &CallContext,
        stand_id: i64,
        validation: StandValidation,
    ) -> Result<BackendAck, AppError> {
        let action = match validation {
            StandValidation::Logistics => "validate-logistics",
            StandValidation::Finance => "validate-finance",
        };
        let url = self.url(&format!("/stands/{}/{}", stand_id, action));
        let request = Self::authorize(self.client.traced_post(&url), ctx);
        let response = self.dispatch("stand_validation", request).await?;
        Self::decode("stand_validation", response).await
    }

    #[instrument(skip(self, ctx))]
    pub async fn update_purchase_status(
        &self,
        ctx: &CallContext,
        purchase_id: i64,
        payload: &PurchaseStatusPayload,
    ) -> Result<BackendAck, AppError> {
        self.update(ctx, Collection::Purchases, purchase_id, payload)
            .await
    }

    #[instrument(skip(self, ctx))]
    pub async fn update_invoice_status(
        &self,
        ctx: &CallContext,
        invoice_id: i64,
        payload: &InvoiceStatusPayload,
    ) -> Result<BackendAck, AppError> {
        self.update(ctx, Collection::Invoices, invoice_id, payload)
            .await
    }

    /// Raw PDF export of a purchase order or invoice.
    #[instrument(skip(self, ctx), fields(collection = collection.name()))]
    pub async fn download_pdf(
        &self,
        ctx: &CallContext,
        collection: Collection,
        id: i64,
    ) -> Result<Vec<u8>, AppError> {
        let url = self.url(&format!("{}/{}/pdf", collection.path(), id));
        let request = Self::authorize(self.client.traced_get(&url), ctx);
        let response = self.dispatch("pdf", request).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_exposes_ids() {
        let ack: BackendAck = serde_json::from_value(serde_json::json!({
            "message": "Devis created successfully",
            "invoice_id": 12,
            "invoice_number": "DEV-2024-0012"
        }))
        .unwrap();
        assert_eq!(ack.id("invoice_id"), Some(12));
        assert_eq!(ack.text("invoice_number").as_deref(), Some("DEV-2024-0012"));
        assert_eq!(ack.id("stand_id"), None);
    }

    #[test]
    fn test_collection_paths() {
        assert_eq!(Collection::Purchases.path(), "/purchases");
        assert_eq!(Collection::Invoices.name(), "invoices");
    }

    #[test]
    fn test_base_url_loses_trailing_slash() {
        let client = BackendClient::new(&BackendSettings {
            base_url: "http://localhost:5000/api/".to_string(),
            timeout_seconds: 5,
        })
        .unwrap();
        assert_eq!(client.url("/stands"), "http://localhost:5000/api/stands");
    }

    #[test]
    fn test_call_context_hides_token() {
        let ctx = CallContext::new("s3cr3t");
        assert!(!format!("{:?}", ctx).contains("s3cr3t"));
    }
}
