//! Reqwest-backed directory source.
//!
//! Owns transport details only: URL building, status mapping and JSON
//! decoding into `RemoteUser` values.

use crate::domain::RemoteUser;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Why a directory fetch did not produce data. The display string is what the
/// view shows in place of its content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("Error al cargar (HTTP {0})")]
    CollectionStatus(u16),
    #[error("No encontrado (HTTP {0})")]
    ItemStatus(u16),
    #[error("Error de red: {0}")]
    Network(String),
    #[error("Respuesta inválida: {0}")]
    Decode(String),
}

/// Read-only source of remote users.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    async fn fetch_users(&self) -> Result<Vec<RemoteUser>, DirectoryError>;
    async fn fetch_user(&self, id: u64) -> Result<RemoteUser, DirectoryError>;
}

/// Directory source that performs `GET` requests against a JSON REST API.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: Client,
    base_url: String,
}

impl HttpDirectory {
    /// Builds a source for `base_url`, with an optional per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: u64) -> String {
        format!("{}/users/{}", self.base_url, id)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        on_status: fn(StatusCode) -> DirectoryError,
    ) -> Result<T, DirectoryError> {
        tracing::debug!(%url, "fetching");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| DirectoryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "directory request rejected");
            return Err(on_status(status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DirectoryError::Network(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| DirectoryError::Decode(e.to_string()))
    }
}

fn collection_status(status: StatusCode) -> DirectoryError {
    DirectoryError::CollectionStatus(status.as_u16())
}

fn item_status(status: StatusCode) -> DirectoryError {
    DirectoryError::ItemStatus(status.as_u16())
}

#[async_trait]
impl DirectorySource for HttpDirectory {
    async fn fetch_users(&self) -> Result<Vec<RemoteUser>, DirectoryError> {
        self.get_json(&self.users_url(), collection_status).await
    }

    async fn fetch_user(&self, id: u64) -> Result<RemoteUser, DirectoryError> {
        self.get_json(&self.user_url(id), item_status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_urls_strip_trailing_slash() {
        let source = HttpDirectory::new("http://localhost:8080/", None).unwrap();
        assert_eq!(source.base_url, "http://localhost:8080");
        assert_eq!(source.users_url(), "http://localhost:8080/users");
        assert_eq!(source.user_url(7), "http://localhost:8080/users/7");
    }

    #[rstest]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Error al cargar (HTTP 500)")]
    #[case::unavailable(StatusCode::SERVICE_UNAVAILABLE, "Error al cargar (HTTP 503)")]
    fn test_collection_status_messages(#[case] status: StatusCode, #[case] expected: &str) {
        assert_eq!(collection_status(status).to_string(), expected);
    }

    #[rstest]
    #[case::missing(StatusCode::NOT_FOUND, "No encontrado (HTTP 404)")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "No encontrado (HTTP 500)")]
    fn test_item_status_messages(#[case] status: StatusCode, #[case] expected: &str) {
        assert_eq!(item_status(status).to_string(), expected);
    }
}
