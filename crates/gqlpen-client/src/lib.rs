//! Transport for the playground: the introspection request and ad-hoc queries.
//!
//! Both are a single `POST` of `{"query": ...}` to the endpoint. GraphQL-level errors in the
//! response body are not interpreted here, only transport failures and non-JSON answers are.

mod config;
mod error;
mod headers;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use url::Url;

pub use config::ClientConfig;
pub use error::ClientError;
pub use headers::{merge_headers, Header, RequestHeaders};

#[derive(Debug, serde::Serialize)]
struct Request<'a> {
    query: &'a str,
}

#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
}

impl Client {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(ClientError::Build)?;

        Ok(Client { http })
    }

    /// Run the standard introspection query and return the `data` field of the response.
    pub async fn fetch_introspection(&self, endpoint: &str, headers: &RequestHeaders) -> Result<Value, ClientError> {
        let response = self
            .post(endpoint, gqlpen_schema::INTROSPECTION_QUERY, headers)
            .await
            .inspect_err(|error| tracing::error!("introspection of {endpoint} failed: {error}"))?;

        extract_data(response).inspect_err(|error| tracing::error!("introspection of {endpoint} failed: {error}"))
    }

    /// Send a query and return the decoded response body untouched, `errors` included.
    pub async fn execute_query(&self, endpoint: &str, query: &str, headers: &RequestHeaders) -> Result<Value, ClientError> {
        self.post(endpoint, query, headers)
            .await
            .inspect_err(|error| tracing::error!("query to {endpoint} failed: {error}"))
    }

    async fn post(&self, endpoint: &str, query: &str, headers: &RequestHeaders) -> Result<Value, ClientError> {
        let url = Url::parse(endpoint).map_err(|source| ClientError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            source,
        })?;

        let headers = header_map(headers)?;

        tracing::debug!(%url, headers = headers.len(), "sending GraphQL request");

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .headers(headers)
            .json(&Request { query })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        tracing::debug!(%status, bytes = body.len(), "received GraphQL response");

        Ok(serde_json::from_slice(&body)?)
    }
}

fn header_map(headers: &RequestHeaders) -> Result<HeaderMap, ClientError> {
    let mut map = HeaderMap::with_capacity(headers.len());

    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| ClientError::InvalidHeader(key.clone()))?;
        let value = HeaderValue::from_str(value).map_err(|_| ClientError::InvalidHeader(key.clone()))?;

        map.insert(name, value);
    }

    Ok(map)
}

fn extract_data(mut response: Value) -> Result<Value, ClientError> {
    match response.get_mut("data").map(Value::take) {
        Some(data) if !data.is_null() => Ok(data),
        _ => {
            let messages = response
                .get("errors")
                .and_then(Value::as_array)
                .map(|errors| {
                    errors
                        .iter()
                        .filter_map(|error| error.get("message").and_then(Value::as_str))
                        .map(ToOwned::to_owned)
                        .collect()
                })
                .unwrap_or_default();

            Err(ClientError::MissingData(messages))
        }
    }
}
