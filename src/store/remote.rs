//! HttpRecordStore - REST client for the record store API.
//!
//! Requires the `http` feature. Uses a blocking reqwest client.
//!
//! ## Routes consumed
//!
//! - `GET /{resource}?skip=N&take=M` → `{ "data": [...], "total": n }` or a bare array
//! - `GET /{resource}/{id}` → the record
//! - `POST /{resource}` → the created record
//! - `PATCH /{resource}/{id}` → the updated record
//! - `DELETE /{resource}/{id}`
//!
//! Error bodies may carry `{ "message": "..." }` or `{ "message": ["...", "..."] }`.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use super::{ListWindow, Listing, RecordStore, StoreError};
use crate::config::ApiConfig;
use crate::record::{Record, RecordPatch};

/// Record store backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    client: Client,
    base_url: Url,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<R> {
    Paged { data: Vec<R>, total: usize },
    Bare(Vec<R>),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<ErrorMessage>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl HttpRecordStore {
    /// Build a store for `base_url` (e.g. `"http://localhost:3000/api"`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StoreError::Storage(format!("invalid base url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Storage(format!(
                "base url {base_url} cannot hold resource paths"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Storage(format!("http client: {e}")))?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self, StoreError> {
        Self::new(&api.base_url, api.timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn send<R: Record>(
        &self,
        request: reqwest::blocking::RequestBuilder,
        id: Option<&str>,
    ) -> Result<Response, StoreError> {
        let response = request.send().map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let message = error_message(&body, status);
        debug!(resource = R::RESOURCE, status = status.as_u16(), %message, "request failed");

        Err(match status {
            StatusCode::NOT_FOUND => StoreError::NotFound {
                resource: R::RESOURCE.to_string(),
                id: id.unwrap_or_default().to_string(),
            },
            StatusCode::CONFLICT => StoreError::conflict::<R>(message),
            StatusCode::REQUEST_TIMEOUT
            | StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => StoreError::Transient(message),
            other => StoreError::Server {
                status: other.as_u16(),
                message,
            },
        })
    }
}

impl RecordStore for HttpRecordStore {
    fn list<R: Record>(&self, window: ListWindow) -> Result<Listing<R>, StoreError> {
        let mut url = self.url(&[R::RESOURCE]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("skip", &window.skip.to_string());
            if let Some(take) = window.take {
                query.append_pair("take", &take.to_string());
            }
        }
        debug!(resource = R::RESOURCE, %url, "GET list");

        let response = self.send::<R>(self.client.get(url), None)?;
        let body: ListBody<R> = response.json().map_err(transport_error)?;
        Ok(match body {
            ListBody::Paged { data, total } => Listing { items: data, total },
            ListBody::Bare(items) => Listing {
                total: items.len(),
                items,
            },
        })
    }

    fn get<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        let url = self.url(&[R::RESOURCE, id]);
        debug!(resource = R::RESOURCE, id, "GET");

        match self.send::<R>(self.client.get(url), Some(id)) {
            Ok(response) => Ok(Some(response.json().map_err(transport_error)?)),
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn create<R: Record>(&self, record: &R) -> Result<R, StoreError> {
        let url = self.url(&[R::RESOURCE]);
        debug!(resource = R::RESOURCE, "POST");

        let response = self.send::<R>(self.client.post(url).json(record), None)?;
        response.json().map_err(transport_error)
    }

    fn update<R: Record>(&self, id: &str, patch: &RecordPatch) -> Result<R, StoreError> {
        let url = self.url(&[R::RESOURCE, id]);
        debug!(resource = R::RESOURCE, id, fields = patch.len(), "PATCH");

        let response = self.send::<R>(self.client.patch(url).json(patch), Some(id))?;
        response.json().map_err(transport_error)
    }

    fn delete<R: Record>(&self, id: &str) -> Result<(), StoreError> {
        let url = self.url(&[R::RESOURCE, id]);
        debug!(resource = R::RESOURCE, id, "DELETE");

        self.send::<R>(self.client.delete(url), Some(id))?;
        Ok(())
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_decode() {
        StoreError::Serde(err.to_string())
    } else if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
        StoreError::Transient(err.to_string())
    } else {
        StoreError::Server {
            status: err.status().map(|s| s.as_u16()).unwrap_or_default(),
            message: err.to_string(),
        }
    }
}

fn error_message(body: &str, status: StatusCode) -> String {
    let parsed = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| match m {
            ErrorMessage::One(message) => message,
            ErrorMessage::Many(messages) => messages.join(", "),
        })
        .filter(|m| !m.is_empty());

    parsed.unwrap_or_else(|| match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => format!("request failed with status {}", status.as_u16()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_accepts_string_or_list() {
        assert_eq!(
            error_message(r#"{"message":"Email already exists"}"#, StatusCode::CONFLICT),
            "Email already exists"
        );
        assert_eq!(
            error_message(
                r#"{"message":["email must be an email","name is required"]}"#,
                StatusCode::BAD_REQUEST
            ),
            "email must be an email, name is required"
        );
    }

    #[test]
    fn error_message_falls_back_to_reason() {
        assert_eq!(error_message("", StatusCode::NOT_FOUND), "Not Found");
        assert_eq!(error_message("<html>", StatusCode::BAD_GATEWAY), "Bad Gateway");
    }

    #[test]
    fn urls_are_joined_by_segment() {
        let store = HttpRecordStore::new("http://localhost:3000/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            store.url(&["customers", "7"]).as_str(),
            "http://localhost:3000/api/customers/7"
        );

        let bare = HttpRecordStore::new("http://localhost:3000", Duration::from_secs(1)).unwrap();
        assert_eq!(bare.url(&["customers"]).as_str(), "http://localhost:3000/customers");
    }

    #[test]
    fn ids_are_percent_encoded() {
        let store = HttpRecordStore::new("http://localhost:3000", Duration::from_secs(1)).unwrap();
        assert_eq!(
            store.url(&["assets", "a/b"]).as_str(),
            "http://localhost:3000/assets/a%2Fb"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(HttpRecordStore::new("not a url", Duration::from_secs(1)).is_err());
        assert!(HttpRecordStore::new("mailto:a@b.c", Duration::from_secs(1)).is_err());
    }
}
