use reqwest::Method;
use url::Url;

use crate::ConnectorError;

/// One fixed REST endpoint of the CPMS API.
#[derive(Clone, Debug)]
pub(crate) struct Endpoint {
    /// Stable identifier used in logs and errors.
    pub name: &'static str,
    pub method: Method,
    /// Path template relative to the base URL. A segment written `{param}`
    /// is filled from the caller's parameters.
    pub path_template: &'static str,
}

/// Token exchange, served by the identity host.
pub(crate) const TOKEN: Endpoint = Endpoint {
    name: "token",
    method: Method::POST,
    path_template: "/identity/token",
};

pub(crate) const GET_ORDER: Endpoint = Endpoint {
    name: "getOrder",
    method: Method::GET,
    path_template: "/channel/{channel_id}/order/{order_id}",
};

pub(crate) const PUT_ORDER: Endpoint = Endpoint {
    name: "putOrder",
    method: Method::PUT,
    path_template: "/channel/{channel_id}/order/{order_id}",
};

pub(crate) const CHANNEL_ORDER_STATUS: Endpoint = Endpoint {
    name: "getChannelOrderStatus",
    method: Method::GET,
    path_template: "/channel/{channel_id}/sales-order-status",
};

pub(crate) const CHANNEL_ORDER_STATUS_BY_ID: Endpoint = Endpoint {
    name: "getChannelOrderStatusById",
    method: Method::GET,
    path_template: "/channel/{channel_id}/sales-order-status/id",
};

pub(crate) const PARTNER_ORDER_STATUS: Endpoint = Endpoint {
    name: "getPartnerOrderStatus",
    method: Method::GET,
    path_template: "/partner/{partner_id}/sales-order-status",
};

pub(crate) const PARTNER_ORDER_STATUS_BY_ID: Endpoint = Endpoint {
    name: "getPartnerOrderStatusById",
    method: Method::GET,
    path_template: "/partner/{partner_id}/sales-order-status/id",
};

pub(crate) const STOCK_ALLOCATION: Endpoint = Endpoint {
    name: "getStockAllocation",
    method: Method::GET,
    path_template: "/channel/{channel_id}/allocation/merchant/{partner_id}",
};

impl Endpoint {
    /// Builds the absolute URL of this endpoint under `base`.
    ///
    /// Template segments are appended after the path of `base`; each
    /// `{param}` segment is replaced by its value, percent-encoded as a single
    /// path segment (`/` becomes `%2F`, space becomes `%20`). The query of
    /// `base` is kept.
    pub(crate) fn url(&self, base: &Url, params: &[(&str, &str)]) -> Result<Url, ConnectorError> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ConnectorError::InvalidBaseUrl(base.to_string()))?;
            segments.pop_if_empty();

            for segment in self.path_template.split('/').filter(|s| !s.is_empty()) {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => {
                        let value = params
                            .iter()
                            .find(|(candidate, _)| *candidate == name)
                            .map(|(_, value)| *value)
                            .ok_or(ConnectorError::MissingPathParameter {
                                endpoint: self.name,
                                parameter: name,
                            })?;
                        segments.push(value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }
        Ok(url)
    }
}

/// Derives the fulfillment base URL: host `h` becomes `fulfillment.h`,
/// everything else is unchanged.
pub fn fulfillment_url(api_url: &Url) -> Result<Url, ConnectorError> {
    let host = api_url
        .host_str()
        .ok_or_else(|| ConnectorError::InvalidBaseUrl(api_url.to_string()))?;

    let mut derived = api_url.clone();
    derived
        .set_host(Some(&format!("fulfillment.{host}")))
        .map_err(|_| ConnectorError::InvalidBaseUrl(api_url.to_string()))?;
    Ok(derived)
}
