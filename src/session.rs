use std::fmt;

use reqwest::Url;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::endpoints::{self, TOKEN};
use crate::response::{read_json, validate};
use crate::{Config, ConnectorError};

/// Header carrying the session token on every fulfillment call.
pub const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// Token and fulfillment base URL obtained from one token exchange.
///
/// Never refreshed; build a new [`crate::Connector`] to authenticate again.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    fulfillment_base_url: Url,
}

impl Session {
    /// Builds a session from an already issued token.
    pub fn new(token: impl Into<String>, fulfillment_base_url: Url) -> Self {
        Self {
            token: token.into(),
            fulfillment_base_url,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn fulfillment_base_url(&self) -> &Url {
        &self.fulfillment_base_url
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("fulfillment_base_url", &self.fulfillment_base_url.as_str())
            .finish()
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    auth: AuthBody<'a>,
}

#[derive(Serialize)]
struct AuthBody<'a> {
    #[serde(rename = "apiKeyCredentials")]
    api_key_credentials: ApiKeyCredentials<'a>,
}

#[derive(Serialize)]
struct ApiKeyCredentials<'a> {
    username: &'a str,
    #[serde(rename = "apiKey")]
    api_key: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Deserialize)]
struct TokenBody {
    token_id: String,
}

/// Exchanges the configured credentials for a session token.
///
/// Issues exactly one `POST {api_url}/identity/token`. Every failure,
/// including a malformed 2xx body, is wrapped in
/// [`ConnectorError::Authentication`].
pub fn authenticate(http: &Client, config: &Config) -> Result<Session, ConnectorError> {
    let api_url = config.validate()?;
    exchange_token(http, config, &api_url)
        .map_err(|error| ConnectorError::Authentication(Box::new(error)))
}

fn exchange_token(
    http: &Client,
    config: &Config,
    api_url: &Url,
) -> Result<Session, ConnectorError> {
    let url = TOKEN.url(api_url, &[])?;
    let body = TokenRequest {
        auth: AuthBody {
            api_key_credentials: ApiKeyCredentials {
                username: &config.username,
                api_key: &config.api_key,
            },
        },
    };

    debug!(method = %TOKEN.method, %url, username = %config.username, "requesting session token");
    let response = http
        .request(TOKEN.method, url)
        .header(reqwest::header::ACCEPT, "application/json")
        .json(&body)
        .send()?;
    let payload = read_json(validate(response)?)?;

    let token = serde_json::from_value::<TokenResponse>(payload)
        .map_err(|_| ConnectorError::MissingToken)?
        .token
        .token_id;
    let fulfillment_base_url = endpoints::fulfillment_url(api_url)?;

    debug!(fulfillment = %fulfillment_base_url, "session established");
    Ok(Session::new(token, fulfillment_base_url))
}
