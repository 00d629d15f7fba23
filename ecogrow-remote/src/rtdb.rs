use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{Span, field, instrument, trace};

use crate::util::http::Uri;
use crate::util::types::AuthToken;

use super::config::{BufferSizes, RemoteConfig};
use super::store::{RemoteStore, StoreError};

/// Remote store backed by the REST interface of a realtime database.
///
/// Paths map to `{host}{path}.json`, writes use `PUT`, appends use `POST`
/// and reads use `GET`. The auth token travels as the `auth` query
/// parameter.
#[derive(Clone, Debug)]
pub struct RtdbStore {
    client: Client,
    host: Uri,
    auth_token: AuthToken,
    buffer_sizes: BufferSizes,
}

#[derive(Deserialize)]
struct PushResponse {
    name: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

impl RtdbStore {
    pub fn new(config: &RemoteConfig) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(config.request.timeout).build()?;
        Ok(Self {
            client,
            host: config.host.clone(),
            auth_token: config.auth_token.clone(),
            buffer_sizes: config.buffer_sizes.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<String, StoreError> {
        let path = format!("/{}.json", path.trim_matches('/'));
        Ok(Uri::from_parts(self.host.clone(), &path, None)?.to_string())
    }

    #[instrument(level = "trace", skip(self, body), fields(status = field::Empty), err)]
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<String, StoreError> {
        let tx_limit = self.buffer_sizes.tx;
        if let Some(size) = body.as_ref().map(String::len).filter(|len| *len > tx_limit) {
            return Err(StoreError::PayloadTooLarge {
                size,
                limit: tx_limit,
            });
        }

        let mut query = Vec::with_capacity(2);
        if !self.auth_token.expose().is_empty() {
            query.push(("auth", self.auth_token.expose()));
        }
        // Do not echo written values back, they would count against the
        // receive buffer
        if method == Method::PUT {
            query.push(("print", "silent"));
        }

        let mut request = self
            .client
            .request(method, self.endpoint(path)?)
            .query(&query);
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let mut response = request.send().await?;
        let status = response.status();
        Span::current().record("status", field::display(status));

        if !status.is_success() {
            let body = read_body(&mut response, self.buffer_sizes.rx)
                .await
                .unwrap_or_default();
            let reason = serde_json::from_str::<ErrorResponse>(&body)
                .map(|res| res.error)
                .unwrap_or_else(|_| body.trim().to_owned());
            let reason = if reason.is_empty() {
                status.canonical_reason().unwrap_or("unknown").to_owned()
            } else {
                reason
            };
            return Err(StoreError::Status(status, reason));
        }

        read_body(&mut response, self.buffer_sizes.rx).await
    }
}

async fn read_body(response: &mut Response, limit: usize) -> Result<String, StoreError> {
    if response
        .content_length()
        .is_some_and(|len| len > limit as u64)
    {
        return Err(StoreError::ResponseTooLarge(limit));
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > limit {
            return Err(StoreError::ResponseTooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8(body)?)
}

impl RemoteStore for RtdbStore {
    async fn set_string(&self, path: &str, value: &str) -> Result<(), StoreError> {
        let body = serde_json::to_string(value)?;
        self.send(Method::PUT, path, Some(body)).await?;
        Ok(())
    }

    async fn get_string(&self, path: &str) -> Result<String, StoreError> {
        let body = self.send(Method::GET, path, None).await?;
        let value = match serde_json::from_str(&body)? {
            Value::String(value) => value,
            Value::Null => String::new(),
            document => document.to_string(),
        };

        if value.len() > self.buffer_sizes.response {
            return Err(StoreError::ResponseTooLarge(self.buffer_sizes.response));
        }

        trace!(len = value.len(), "read value");
        Ok(value)
    }

    async fn set_json<T: Serialize + Sync>(
        &self,
        path: &str,
        document: &T,
    ) -> Result<(), StoreError> {
        let body = serde_json::to_string(document)?;
        self.send(Method::PUT, path, Some(body)).await?;
        Ok(())
    }

    async fn push_json<T: Serialize + Sync>(
        &self,
        path: &str,
        document: &T,
    ) -> Result<String, StoreError> {
        let body = serde_json::to_string(document)?;
        let response = self.send(Method::POST, path, Some(body)).await?;
        let PushResponse { name } = serde_json::from_str(&response)?;
        Ok(name)
    }
}
