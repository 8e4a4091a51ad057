use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::error::AppError;

/// Typed storage failures. `Conflict` is surfaced separately so the
/// booking path can turn a unique-index violation into `SlotTaken`.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Record conflicts with an existing row: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Storage rejected credentials: {0}")]
    Unauthorized(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict(msg) => AppError::Validation(msg),
            DbError::NotFound(msg) => AppError::NotFound(msg),
            DbError::Unauthorized(msg) | DbError::Unavailable(msg) => AppError::Storage(msg),
        }
    }
}

/// Thin client over the Supabase PostgREST surface. The core contract is
/// insert record, select by filter, update by filter.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.clone(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn get_headers(&self, return_representation: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(key) = HeaderValue::from_str(&self.anon_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.anon_key)) {
            headers.insert(AUTHORIZATION, bearer);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if return_representation {
            headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        }

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        return_representation: bool,
    ) -> Result<T, DbError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.get_headers(return_representation));

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req
            .send()
            .await
            .map_err(|e| DbError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Storage error ({}): {}", status, error_text);

            return Err(match status {
                StatusCode::CONFLICT => DbError::Conflict(error_text),
                StatusCode::NOT_FOUND => DbError::NotFound(error_text),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    DbError::Unauthorized(error_text)
                }
                _ => DbError::Unavailable(format!("storage error ({}): {}", status, error_text)),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DbError::Unavailable(format!("failed to decode storage response: {}", e)))
    }

    /// Insert a record, returning the created representation.
    pub async fn insert(&self, table: &str, data: Value) -> Result<Vec<Value>, DbError> {
        let path = format!("/rest/v1/{}", table);
        self.request(Method::POST, &path, Some(data), true).await
    }

    /// Select rows matching a PostgREST filter string, e.g. `email=eq.a@b.com`.
    pub async fn select(&self, table: &str, filters: &str) -> Result<Vec<Value>, DbError> {
        let path = if filters.is_empty() {
            format!("/rest/v1/{}", table)
        } else {
            format!("/rest/v1/{}?{}", table, filters)
        };
        self.request(Method::GET, &path, None, false).await
    }

    /// Update rows matching a filter, returning the updated representation.
    pub async fn update(
        &self,
        table: &str,
        filters: &str,
        data: Value,
    ) -> Result<Vec<Value>, DbError> {
        let path = format!("/rest/v1/{}?{}", table, filters);
        self.request(Method::PATCH, &path, Some(data), true).await
    }
}
