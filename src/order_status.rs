use std::fmt;
use std::str::FromStr;

use crate::ConnectorError;
use crate::endpoints::{
    CHANNEL_ORDER_STATUS, CHANNEL_ORDER_STATUS_BY_ID, Endpoint, PARTNER_ORDER_STATUS,
    PARTNER_ORDER_STATUS_BY_ID,
};

/// Largest number of order ids accepted by one status lookup.
pub const MAX_ORDER_IDS: usize = 10;

/// Sales order states understood by the status endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    New,
    InProgress,
    Completed,
    Canceled,
    Error,
}

impl OrderStatus {
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::InProgress,
        Self::Completed,
        Self::Canceled,
        Self::Error,
    ];

    /// Wire spelling, as sent in the `orderStatus` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Canceled => "CANCELED",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ConnectorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ConnectorError::InvalidOrderStatus(value.to_owned()))
    }
}

/// Arguments of a sales order status lookup.
///
/// Exactly one scope (`channel_id` or `partner_id`) and exactly one filter
/// (`list_id` or `since`) must be set. Empty strings and empty lists count as
/// unset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderStatusQuery {
    pub channel_id: Option<String>,
    pub partner_id: Option<String>,
    pub list_id: Option<Vec<String>>,
    pub since: Option<String>,
    pub order_status: Option<String>,
}

impl OrderStatusQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a lookup scoped to a sales channel.
    pub fn for_channel(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: Some(channel_id.into()),
            ..Self::default()
        }
    }

    /// Starts a lookup scoped to a partner.
    pub fn for_partner(partner_id: impl Into<String>) -> Self {
        Self {
            partner_id: Some(partner_id.into()),
            ..Self::default()
        }
    }

    /// Filters by explicit order ids (at most [`MAX_ORDER_IDS`]).
    #[must_use]
    pub fn with_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.list_id = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Filters by last-update timestamp (ISO 8601).
    #[must_use]
    pub fn since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    /// Narrows a `since` lookup to one order state.
    #[must_use]
    pub fn order_status(mut self, status: impl fmt::Display) -> Self {
        self.order_status = Some(status.to_string());
        self
    }

    /// Checks the arguments and resolves the endpoint and query to call.
    ///
    /// Checks run in a fixed order: status, scope, filter, list length.
    pub(crate) fn resolve(&self) -> Result<ResolvedStatusQuery, ConnectorError> {
        let status = non_empty(self.order_status.as_deref())
            .map(OrderStatus::from_str)
            .transpose()?;

        let scope = match (
            non_empty(self.channel_id.as_deref()),
            non_empty(self.partner_id.as_deref()),
        ) {
            (Some(channel_id), None) => Scope::Channel(channel_id),
            (None, Some(partner_id)) => Scope::Partner(partner_id),
            _ => return Err(ConnectorError::MissingScope),
        };

        let ids = self.list_id.as_deref().filter(|ids| !ids.is_empty());
        let since = non_empty(self.since.as_deref());

        match (ids, since) {
            (Some(ids), None) => {
                if ids.len() > MAX_ORDER_IDS {
                    return Err(ConnectorError::ListTooLong {
                        len: ids.len(),
                        max: MAX_ORDER_IDS,
                    });
                }
                Ok(ResolvedStatusQuery {
                    endpoint: scope.by_id_endpoint(),
                    scope: scope.param(),
                    query: ids.iter().map(|id| ("id", id.clone())).collect(),
                })
            }
            (None, Some(_since)) => {
                // TODO: confirm with the CPMS owners whether `since` belongs in
                // this query; the service has only ever received `orderStatus` here.
                let query = status
                    .map(|status| ("orderStatus", status.as_str().to_owned()))
                    .into_iter()
                    .collect();
                Ok(ResolvedStatusQuery {
                    endpoint: scope.endpoint(),
                    scope: scope.param(),
                    query,
                })
            }
            _ => Err(ConnectorError::MissingFilter),
        }
    }
}

/// Endpoint, path parameter and query pairs for one status lookup.
#[derive(Debug)]
pub(crate) struct ResolvedStatusQuery {
    pub endpoint: Endpoint,
    pub scope: (&'static str, String),
    pub query: Vec<(&'static str, String)>,
}

enum Scope<'a> {
    Channel(&'a str),
    Partner(&'a str),
}

impl Scope<'_> {
    fn endpoint(&self) -> Endpoint {
        match self {
            Self::Channel(_) => CHANNEL_ORDER_STATUS,
            Self::Partner(_) => PARTNER_ORDER_STATUS,
        }
    }

    fn by_id_endpoint(&self) -> Endpoint {
        match self {
            Self::Channel(_) => CHANNEL_ORDER_STATUS_BY_ID,
            Self::Partner(_) => PARTNER_ORDER_STATUS_BY_ID,
        }
    }

    fn param(&self) -> (&'static str, String) {
        match self {
            Self::Channel(id) => ("channel_id", (*id).to_owned()),
            Self::Partner(id) => ("partner_id", (*id).to_owned()),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{MAX_ORDER_IDS, OrderStatus, OrderStatusQuery};
    use crate::ConnectorError;

    #[test]
    fn parses_wire_spelling_only() {
        assert_eq!("IN_PROGRESS".parse::<OrderStatus>().ok(), Some(OrderStatus::InProgress));
        assert!(matches!(
            "in_progress".parse::<OrderStatus>(),
            Err(ConnectorError::InvalidOrderStatus(value)) if value == "in_progress"
        ));
    }

    #[test]
    fn invalid_status_is_reported_before_scope_and_filter() {
        let query = OrderStatusQuery::new().order_status("BOGUS");
        assert!(matches!(
            query.resolve(),
            Err(ConnectorError::InvalidOrderStatus(_))
        ));
    }

    #[test]
    fn requires_exactly_one_scope() {
        let neither = OrderStatusQuery::new().since("2024-01-01T00:00:00Z");
        assert!(matches!(neither.resolve(), Err(ConnectorError::MissingScope)));

        let mut both = OrderStatusQuery::for_channel("web").since("2024-01-01T00:00:00Z");
        both.partner_id = Some("p-1".to_owned());
        assert!(matches!(both.resolve(), Err(ConnectorError::MissingScope)));
    }

    #[test]
    fn requires_exactly_one_filter() {
        let neither = OrderStatusQuery::for_channel("web");
        assert!(matches!(neither.resolve(), Err(ConnectorError::MissingFilter)));

        let both = OrderStatusQuery::for_channel("web")
            .with_ids(["SO-1"])
            .since("2024-01-01T00:00:00Z");
        assert!(matches!(both.resolve(), Err(ConnectorError::MissingFilter)));

        let empty_list = OrderStatusQuery::for_channel("web").with_ids(Vec::<String>::new());
        assert!(matches!(empty_list.resolve(), Err(ConnectorError::MissingFilter)));
    }

    #[test]
    fn rejects_more_than_ten_ids() {
        let ids = (0..=MAX_ORDER_IDS).map(|n| format!("SO-{n}"));
        let query = OrderStatusQuery::for_partner("p-1").with_ids(ids);
        assert!(matches!(
            query.resolve(),
            Err(ConnectorError::ListTooLong { len: 11, max: 10 })
        ));
    }

    #[test]
    fn id_lookup_uses_id_endpoint_and_repeated_ids() {
        let resolved = OrderStatusQuery::for_channel("web")
            .with_ids(["SO-1", "SO-2"])
            .resolve()
            .expect("valid query");
        assert_eq!(resolved.endpoint.name, "getChannelOrderStatusById");
        assert_eq!(resolved.scope, ("channel_id", "web".to_owned()));
        assert_eq!(
            resolved.query,
            vec![("id", "SO-1".to_owned()), ("id", "SO-2".to_owned())]
        );
    }

    #[test]
    fn since_lookup_sends_only_the_status_filter() {
        let resolved = OrderStatusQuery::for_partner("p-1")
            .since("2024-01-01T00:00:00Z")
            .order_status(OrderStatus::Completed)
            .resolve()
            .expect("valid query");
        assert_eq!(resolved.endpoint.name, "getPartnerOrderStatus");
        assert_eq!(resolved.query, vec![("orderStatus", "COMPLETED".to_owned())]);

        let unfiltered = OrderStatusQuery::for_partner("p-1")
            .since("2024-01-01T00:00:00Z")
            .resolve()
            .expect("valid query");
        assert!(unfiltered.query.is_empty());
    }
}
