use reqwest::blocking::Response;
use reqwest::header::{HeaderMap, LINK};
use serde_json::Value;
use tracing::warn;

use crate::{ConnectorError, ErrorBody};

/// Passes 2xx responses through and turns anything else into
/// [`ConnectorError::Api`].
///
/// The error body is the parsed JSON payload when the server sent JSON, the
/// raw bytes otherwise. A body that cannot be read is reported as empty; the
/// status is never lost.
pub fn validate(response: Response) -> Result<Response, ConnectorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let source = response.error_for_status_ref().err();
    let url = response.url().clone();
    let body = match response.bytes() {
        Ok(bytes) => ErrorBody::from_bytes(&bytes),
        Err(error) => {
            warn!(%status, %url, %error, "failed to read error body");
            ErrorBody::Raw(Vec::new())
        }
    };

    warn!(%status, %url, "request rejected by server");
    Err(ConnectorError::Api {
        status,
        body,
        source,
    })
}

/// Reads a successful response body as JSON.
///
/// Returns [`Value::Null`] for an empty body.
pub(crate) fn read_json(response: Response) -> Result<Value, ConnectorError> {
    let payload = response.text()?;
    if payload.trim().is_empty() {
        Ok(Value::Null)
    } else {
        Ok(serde_json::from_str(&payload)?)
    }
}

/// Target of the `rel="next"` entry in the `Link` headers, if any.
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(split_link_values)
        .find_map(|entry| {
            let (target, params) = parse_link_entry(entry)?;
            params
                .iter()
                .any(|(name, value)| {
                    name.eq_ignore_ascii_case("rel")
                        && value
                            .split_ascii_whitespace()
                            .any(|rel| rel.eq_ignore_ascii_case("next"))
                })
                .then(|| target.to_owned())
        })
}

// Splits on commas that sit outside `<...>` and quoted strings.
fn split_link_values(header: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut in_target = false;
    let mut in_quotes = false;
    let mut start = 0;

    for (index, ch) in header.char_indices() {
        match ch {
            '<' if !in_quotes => in_target = true,
            '>' if !in_quotes => in_target = false,
            '"' if !in_target => in_quotes = !in_quotes,
            ',' if !in_target && !in_quotes => {
                entries.push(&header[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    entries.push(&header[start..]);
    entries
}

fn parse_link_entry(entry: &str) -> Option<(&str, Vec<(&str, &str)>)> {
    let entry = entry.trim();
    let rest = entry.strip_prefix('<')?;
    let (target, params) = rest.split_once('>')?;

    let params = params
        .split(';')
        .filter_map(|param| {
            let (name, value) = param.split_once('=')?;
            Some((name.trim(), value.trim().trim_matches('"')))
        })
        .collect();

    Some((target.trim(), params))
}
