//! Stream endpoint resolution.

use reqwest::Url;

use crate::error::ResolveError;

/// Build the streaming URL for an instance.
///
/// `https://host[:port]/any/path` becomes `wss://host[:port]/streaming?i=<token>`.
/// Only the authority of the base URL is kept; the token is percent-encoded.
pub fn resolve_stream_url(base_url: &str, access_token: &str) -> Result<String, ResolveError> {
    if access_token.trim().is_empty() {
        return Err(ResolveError::MissingToken);
    }

    let url = Url::parse(base_url.trim()).map_err(|e| ResolveError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" | "ws" | "wss" => {}
        other => {
            return Err(ResolveError::UnsupportedScheme {
                scheme: other.to_string(),
            })
        }
    }

    let host = url.host().ok_or_else(|| ResolveError::MissingHost {
        url: base_url.to_string(),
    })?;
    let authority = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    Ok(format!(
        "wss://{}/streaming?i={}",
        authority,
        urlencoding::encode(access_token)
    ))
}
