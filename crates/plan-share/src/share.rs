//! URL sharing: whole plan state ⇄ one compressed query-parameter value.

use plan_share_codec::{decode, decompress, encode, try_compress};
use plan_share_util::graph::{Document, Graph, Value};

use crate::error::ShareError;

/// Query parameter carrying the shared plan token.
pub const PLAN_DATA_PARAM: &str = "planData";

/// Serializes and compresses `value` into a URL-safe token.
///
/// # Example
///
/// ```
/// use plan_share::share::{from_shareable_token, to_shareable_token};
/// use plan_share_util::graph::{Graph, Value};
///
/// let mut graph = Graph::new();
/// let plan = graph.object([("name", Value::from("Lisbon move"))]);
///
/// let token = to_shareable_token(&graph, &plan).unwrap();
/// let doc = from_shareable_token(&token).unwrap();
/// assert_eq!(doc.get("name"), Some(&Value::from("Lisbon move")));
/// ```
pub fn to_shareable_token(graph: &Graph, value: &Value) -> Result<String, ShareError> {
    let text = encode(graph, value)?;
    Ok(try_compress(&text)?)
}

/// Reverses [`to_shareable_token`]. Any failure is logged and yields `None`.
pub fn from_shareable_token(token: &str) -> Option<Document> {
    let text = match decompress(token) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "Shared plan token could not be decompressed");
            return None;
        }
    };
    match decode(&text) {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::warn!(error = %e, "Shared plan token holds malformed state");
            None
        }
    }
}

/// Returns `base` with its `planData` parameter set to `token`, keeping other
/// parameters and any fragment.
pub fn share_url(base: &str, token: &str) -> String {
    let (without_fragment, fragment) = match base.find('#') {
        Some(i) => base.split_at(i),
        None => (base, ""),
    };
    let (path, query) = without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""));
    let param = format!("{PLAN_DATA_PARAM}={token}");
    let mut pairs: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty() && param_name(pair) != PLAN_DATA_PARAM)
        .collect();
    pairs.push(&param);
    format!("{path}?{}{fragment}", pairs.join("&"))
}

/// Extracts the `planData` value from a URL or a bare query string. Absent or
/// empty parameters yield `None`.
pub fn token_from_query(url: &str) -> Option<&str> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let query = without_fragment
        .split_once('?')
        .map_or(without_fragment, |(_, query)| query);
    query.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name == PLAN_DATA_PARAM && !value.is_empty()).then_some(value)
    })
}

/// The shared state carried by `url`, if any decodes.
pub fn state_from_url(url: &str) -> Option<Document> {
    from_shareable_token(token_from_query(url)?)
}

fn param_name(pair: &str) -> &str {
    pair.split_once('=').map_or(pair, |(name, _)| name)
}
