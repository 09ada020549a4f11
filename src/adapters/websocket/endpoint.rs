//! Push endpoint derivation from the REST base URL.

use reqwest::Url;
use secrecy::{ExposeSecret, Secret};

use crate::ports::TransportError;

/// Default path of the notification socket.
pub const DEFAULT_PUSH_PATH: &str = "/ws/notifications";

/// Builds `{ws|wss}://<api host><path>?token=<token>` from the API root.
///
/// `http` maps to `ws` and `https` to `wss`; any other scheme is refused.
pub fn push_endpoint(
    base_url: &str,
    path: &str,
    token: &Secret<String>,
) -> Result<Url, TransportError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| TransportError::InvalidEndpoint(format!("{base_url}: {e}")))?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(TransportError::InvalidEndpoint(format!(
                "unsupported scheme '{other}'"
            )))
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| TransportError::InvalidEndpoint(format!("cannot switch to {scheme}")))?;

    url.set_path(path);
    url.set_query(None);
    url.set_fragment(None);
    url.query_pairs_mut()
        .append_pair("token", token.expose_secret());
    Ok(url)
}

/// The endpoint without its query, for logging.
pub fn redacted(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}
