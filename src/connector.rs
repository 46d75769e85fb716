use std::fmt;

use reqwest::blocking::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::endpoints::{Endpoint, GET_ORDER, PUT_ORDER, STOCK_ALLOCATION};
use crate::response::{next_link, read_json, validate};
use crate::session::{self, SUBJECT_TOKEN_HEADER, Session};
use crate::{Config, ConnectorError, OrderStatusQuery};

/// Message returned by [`Connector::create_order`] for every 2xx answer.
pub const ORDER_CREATED_MESSAGE: &str = "Order has been successfully created";

/// One page of sales order statuses.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderStatusPage {
    pub orders: Value,
    /// Target of the server's `rel="next"` link, verbatim.
    pub next_url: Option<String>,
}

/// Outcome of [`Connector::create_order`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateOrderResponse {
    pub code: u16,
    pub message: String,
}

/// Stock allocations of one merchant on one channel.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Stocks {
    pub data: Value,
    /// The URL that was requested, present only when the server announced a
    /// next page. It is not the next-page URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Authenticated blocking client for the CPMS fulfillment API.
///
/// Construction performs the token exchange; a `Connector` only exists once
/// a session token has been obtained. The session is immutable afterwards, so
/// a `Connector` can be shared across threads for concurrent calls.
#[derive(Clone)]
pub struct Connector {
    session: Session,
    http: Client,
}

impl Connector {
    /// Authenticates with a default HTTP client.
    pub fn new(config: &Config) -> Result<Self, ConnectorError> {
        Self::with_http_client(config, Client::new())
    }

    /// Authenticates using a caller-configured HTTP client.
    ///
    /// Timeouts, proxies and DNS overrides are taken from `http` as is.
    pub fn with_http_client(config: &Config, http: Client) -> Result<Self, ConnectorError> {
        let session = session::authenticate(&http, config)?;
        Ok(Self { session, http })
    }

    /// Wraps an existing session without contacting the identity service.
    pub fn from_session(session: Session, http: Client) -> Self {
        Self { session, http }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Token sent in the `X-Subject-Token` header.
    pub fn token(&self) -> &str {
        self.session.token()
    }

    /// Fetches one sales order.
    pub fn get_order(&self, channel_id: &str, order_id: &str) -> Result<Value, ConnectorError> {
        let response = self.send(
            &GET_ORDER,
            &[("channel_id", channel_id), ("order_id", order_id)],
            &[],
            None::<&Value>,
        )?;
        read_json(response)
    }

    /// Lists sales order statuses for a channel or a partner.
    ///
    /// Arguments are checked before any request is sent.
    pub fn get_orders_status(
        &self,
        query: &OrderStatusQuery,
    ) -> Result<OrderStatusPage, ConnectorError> {
        let resolved = query.resolve()?;
        let (scope_name, scope_value) = &resolved.scope;
        let pairs: Vec<(&str, &str)> = resolved
            .query
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .collect();

        let response = self.send(
            &resolved.endpoint,
            &[(*scope_name, scope_value.as_str())],
            &pairs,
            None::<&Value>,
        )?;
        let next_url = next_link(response.headers());
        let orders = read_json(response)?;
        Ok(OrderStatusPage { orders, next_url })
    }

    /// Creates or replaces a sales order.
    ///
    /// The response body is ignored; any 2xx yields the same message.
    pub fn create_order<T>(
        &self,
        channel_id: &str,
        order_id: &str,
        payload: &T,
    ) -> Result<CreateOrderResponse, ConnectorError>
    where
        T: Serialize + ?Sized,
    {
        let response = self.send(
            &PUT_ORDER,
            &[("channel_id", channel_id), ("order_id", order_id)],
            &[],
            Some(payload),
        )?;
        Ok(CreateOrderResponse {
            code: response.status().as_u16(),
            message: ORDER_CREATED_MESSAGE.to_owned(),
        })
    }

    /// Fetches stock allocated to `partner_id` on `channel_id` since a timestamp.
    pub fn get_stocks(
        &self,
        channel_id: &str,
        partner_id: &str,
        since: &str,
    ) -> Result<Stocks, ConnectorError> {
        let response = self.send(
            &STOCK_ALLOCATION,
            &[("channel_id", channel_id), ("partner_id", partner_id)],
            &[("since", since)],
            None::<&Value>,
        )?;
        let url = next_link(response.headers()).map(|_| response.url().to_string());
        let data = read_json(response)?;
        Ok(Stocks { data, url })
    }

    fn send<T>(
        &self,
        endpoint: &Endpoint,
        path_params: &[(&str, &str)],
        query: &[(&str, &str)],
        body: Option<&T>,
    ) -> Result<Response, ConnectorError>
    where
        T: Serialize + ?Sized,
    {
        let url = endpoint.url(self.session.fulfillment_base_url(), path_params)?;
        debug!(endpoint = endpoint.name, method = %endpoint.method, %url, "sending request");

        let mut request = self
            .http
            .request(endpoint.method.clone(), url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(SUBJECT_TOKEN_HEADER, self.session.token());

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(json_body) = body {
            request = request.json(json_body);
        }

        validate(request.send()?)
    }
}

impl fmt::Debug for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connector")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
