// MasPatas HTTP client
//
// Stateless request execution against a configured base URL. Every method
// maps to one backend call; nothing is cached or retried, and the bearer
// credential is supplied per call rather than stored on the client.

use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{
    Client, Collection, CollectionKind, Health, InventoryItem, NewEntity, Product, Sale,
    TokenResponse,
};
use crate::transport::TransportConfig;

/// Async client for the MasPatas inventory and sales API.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference-counted.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` (e.g. `http://127.0.0.1:8000/api`).
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Parse the base URL and strip any trailing slash so resource paths
    /// are appended as segments.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw.trim())?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl {
                url: raw.to_owned(),
            });
        }
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&path);
        Ok(url)
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // normalize_base_url rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let url = self.url(segments);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
        credential: Option<&SecretString>,
    ) -> Result<T, Error> {
        let url = self.url(segments);
        debug!("POST {url}");

        let mut req = self.http.post(url).json(body);
        if let Some(token) = credential {
            req = req.bearer_auth(token.expose_secret());
        }
        let resp = req.send().await?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let is_json = is_json_response(&resp);
        let body = resp.text().await?;
        trace!(status = status.as_u16(), body_len = body.len(), "response received");

        if !status.is_success() {
            return Err(Self::parse_error(status, is_json, body));
        }

        if !is_json {
            return Err(Error::Decode {
                message: format!("expected a JSON response (HTTP {status})"),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Decode {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    fn parse_error(status: reqwest::StatusCode, is_json: bool, body: String) -> Error {
        let detail = is_json
            .then(|| serde_json::from_str::<Value>(&body).ok())
            .flatten()
            .and_then(|payload| payload.get("detail").and_then(detail_message));

        match detail {
            Some(detail) => Error::Remote {
                status: status.as_u16(),
                detail,
            },
            None => Error::UnexpectedStatus {
                status: status.as_u16(),
                body,
            },
        }
    }

    // ── Collections ──────────────────────────────────────────────────

    /// Fetch one read collection.
    pub async fn fetch_collection(&self, kind: CollectionKind) -> Result<Collection, Error> {
        Ok(match kind {
            CollectionKind::Products => Collection::Products(self.list_products().await?),
            CollectionKind::Clients => Collection::Clients(self.list_clients().await?),
            CollectionKind::Inventory => Collection::Inventory(self.list_inventory().await?),
            CollectionKind::Sales => Collection::Sales(self.list_sales().await?),
        })
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, Error> {
        self.get(&[CollectionKind::Products.path()]).await
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>, Error> {
        self.get(&[CollectionKind::Clients.path()]).await
    }

    pub async fn list_inventory(&self) -> Result<Vec<InventoryItem>, Error> {
        self.get(&[CollectionKind::Inventory.path()]).await
    }

    pub async fn list_sales(&self) -> Result<Vec<Sale>, Error> {
        self.get(&[CollectionKind::Sales.path()]).await
    }

    // ── Single records ───────────────────────────────────────────────

    pub async fn get_product(&self, id: &str) -> Result<Product, Error> {
        self.get(&[CollectionKind::Products.path(), id]).await
    }

    pub async fn get_client(&self, id: &str) -> Result<Client, Error> {
        self.get(&[CollectionKind::Clients.path(), id]).await
    }

    pub async fn get_sale(&self, id: &str) -> Result<Sale, Error> {
        self.get(&[CollectionKind::Sales.path(), id]).await
    }

    // ── Auth ─────────────────────────────────────────────────────────

    /// Exchange a username and password for a bearer credential.
    pub async fn obtain_credential(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SecretString, Error> {
        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let token: TokenResponse = self.post(&["auth", "token"], &body, None).await?;
        if token.access_token.trim().is_empty() {
            return Err(Error::Decode {
                message: "token response carried an empty access_token".into(),
                body: String::new(),
            });
        }

        debug!("credential obtained for {username}");
        Ok(SecretString::from(token.access_token))
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a product, client or sale on behalf of `credential`.
    ///
    /// Returns the backend's record as-is; its shape differs per entity.
    pub async fn create_entity(
        &self,
        credential: &SecretString,
        entity: &NewEntity,
    ) -> Result<Value, Error> {
        self.post(&[entity.kind().path()], entity, Some(credential))
            .await
    }

    // ── Health ───────────────────────────────────────────────────────

    pub async fn health(&self) -> Result<Health, Error> {
        self.get(&["health"]).await
    }
}

fn is_json_response(resp: &reqwest::Response) -> bool {
    resp.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"))
}

/// Flatten a `detail` payload into one line.
///
/// Strings pass through; lists are joined with `", "`. Validation objects
/// (`{loc, msg}`) contribute their message prefixed with the field name.
fn detail_message(detail: &Value) -> Option<String> {
    let message = match detail {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) => match obj.get("msg").and_then(Value::as_str) {
                    Some(msg) => Some(match obj.get("loc").and_then(validation_field) {
                        Some(field) => format!("{field}: {msg}"),
                        None => msg.to_owned(),
                    }),
                    None => Some(item.to_string()),
                },
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    };

    (!message.trim().is_empty()).then_some(message)
}

fn validation_field(loc: &Value) -> Option<String> {
    match loc.as_array()?.last()? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
