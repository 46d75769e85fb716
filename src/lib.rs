//! Blocking client library for the CPMS order-management REST API.
//!
//! Public API layers:
//! - [`Config`]: credentials and identity URL, loadable from `config.json`.
//! - [`Connector`]: authenticates once, then fetches orders, order statuses and
//!   stock allocations from the derived `fulfillment.` host.
//! - [`ConnectorError`]: unified error type used by every operation.
//!
//! The library emits `tracing` events and never installs a subscriber.

mod config;
mod connector;
mod endpoints;
mod error;
mod order_status;
mod response;
mod session;

/// Connection settings supplied at construction.
pub use config::Config;
/// Authenticated client and its result types.
pub use connector::{
    Connector, CreateOrderResponse, ORDER_CREATED_MESSAGE, OrderStatusPage, Stocks,
};
/// Host derivation for the fulfillment API.
pub use endpoints::fulfillment_url;
/// Error type returned by all operations.
pub use error::{ConnectorError, ErrorBody};
/// Order status lookup arguments.
pub use order_status::{MAX_ORDER_IDS, OrderStatus, OrderStatusQuery};
/// Shared response handling.
pub use response::{next_link, validate};
/// Session token state.
pub use session::{SUBJECT_TOKEN_HEADER, Session, authenticate};
