use std::marker::PhantomData;

use async_trait::async_trait;
use percent_encoding::{
    utf8_percent_encode,
    AsciiSet,
    CONTROLS,
};
use reqwest::{
    Client,
    Method,
    RequestBuilder,
    StatusCode,
};
use serde::{
    de::DeserializeOwned,
    Deserialize,
    Serialize,
};
use serde_json::Value;

use super::{
    config::Config,
    errors::{
        ApiError,
        HortasError,
    },
    models::{
        Entity,
        EntityId,
    },
    session::SessionManager,
};
use crate::list::CollectionApi;

pub const LOGIN_PATH: &str = "auth/login";

/// Escaped when an id becomes a single path segment.
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// 2xx passes, 401/403 is an auth failure, anything else is a plain error.
pub fn classify_status(status: StatusCode, url: &str) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ApiError::Unauthorized { status: status.as_u16() });
    }

    Err(ApiError::Status { status: status.as_u16(), url: url.to_string() })
}

fn decode<T: DeserializeOwned>(url: &str, body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::Decode { url: url.to_string(), message: e.to_string() })
}

/// Every request to the API goes through here: the bearer token is read
/// from the session per request and every response is classified once.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionManager,
}

impl ApiClient {
    pub fn new(config: &Config, session: SessionManager) -> Result<Self, HortasError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("hortas/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let body = self.dispatch(self.client.get(&url), &url, true).await?;
        decode(&url, &body)
    }

    /// Sends a request whose successful response may have an empty body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Option<T>, ApiError> {
        self.send(method, path, query, body, true).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<Option<T>, ApiError> {
        let url = self.url(path);

        let mut request = self.client.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let bytes = self.dispatch(request, &url, authenticated).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        decode(&url, &bytes).map(Some)
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<(), HortasError> {
        let body = serde_json::to_value(credentials)?;
        let response: Option<LoginResponse> =
            self.send(Method::POST, LOGIN_PATH, &[], Some(&body), false).await?;

        let token = response.map(|r| r.token).filter(|token| !token.is_empty()).ok_or_else(|| {
            ApiError::Decode { url: self.url(LOGIN_PATH), message: "missing token".to_string() }
        })?;

        self.session.set_token(&token)?;
        tracing::info!(email = %credentials.email, "signed in");
        Ok(())
    }

    /// Unauthenticated requests (login) never carry nor expire the token.
    /// A 401/403 only expires the session if the rejected token is still
    /// the stored one.
    async fn dispatch(
        &self,
        request: RequestBuilder,
        url: &str,
        authenticated: bool,
    ) -> Result<Vec<u8>, ApiError> {
        let sent_token = if authenticated { self.session.token() } else { None };
        let request = match &sent_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport { url: url.to_string(), message: e.to_string() })?;

        if let Err(error) = classify_status(response.status(), url) {
            if let ApiError::Unauthorized { status } = error {
                if authenticated {
                    self.session.expire_if_current(sent_token.as_deref(), status);
                }
            }
            tracing::debug!(%url, %error, "request rejected");
            return Err(error);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport { url: url.to_string(), message: e.to_string() })?;

        Ok(bytes.to_vec())
    }
}

/// How a resource accepts a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRoute {
    /// `PATCH <collection>/<id>/status` with `{field: value}`
    Patch { field: &'static str },
    /// `PUT <collection>/<id>/status?<param>=<value>`
    PutQuery { param: &'static str },
}

pub trait Resource: Entity + DeserializeOwned {
    const COLLECTION: &'static str;
    const STATUS_ROUTE: StatusRoute;

    fn status_value(status: &Self::Status) -> Value;
}

pub struct RestCollection<E> {
    client: ApiClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Resource> RestCollection<E> {
    pub fn new(client: ApiClient) -> Self {
        Self { client, _entity: PhantomData }
    }

    fn status_path(id: &EntityId) -> String {
        let segment = id.to_string();
        format!("{}/{}/status", E::COLLECTION, utf8_percent_encode(&segment, SEGMENT_ENCODE_SET))
    }
}

#[async_trait]
impl<E: Resource> CollectionApi<E> for RestCollection<E> {
    fn resource_name(&self) -> &str {
        E::COLLECTION
    }

    async fn fetch_all(&self) -> Result<Vec<E>, ApiError> {
        self.client.get_json(E::COLLECTION).await
    }

    async fn update_status(&self, id: &EntityId, status: &E::Status) -> Result<Option<E>, ApiError> {
        let path = Self::status_path(id);
        let value = E::status_value(status);

        match E::STATUS_ROUTE {
            StatusRoute::Patch { field } => {
                let mut body = serde_json::Map::new();
                body.insert(field.to_string(), value);
                self.client.send_json(Method::PATCH, &path, &[], Some(&Value::Object(body))).await
            }
            StatusRoute::PutQuery { param } => {
                let value = match value {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                self.client.send_json(Method::PUT, &path, &[(param, value)], None).await
            }
        }
    }
}
