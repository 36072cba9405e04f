//! Host header validation.
//!
//! The raw header is parsed as the authority of an `http://` URL. It is only
//! accepted when the parsed host (hostname plus any non-default port) is
//! byte-for-byte the raw value, so values that parse but normalize to
//! something else are rejected:
//!
//! | raw header                  | parsed host          | result   |
//! |-----------------------------|----------------------|----------|
//! | `example.com`               | `example.com`        | accepted |
//! | `example.com:8080`          | `example.com:8080`   | accepted |
//! | `example.com:80`            | `example.com`        | rejected |
//! | `Example.com`               | `example.com`        | rejected |
//! | `invalid.host.header/path`  | `invalid.host.header`| rejected |
//! | `invalid host header`       | parse error          | rejected |

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

/// Why a Host header was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("not a visible ASCII string")]
    NotAscii,

    #[error("invalid URL: {0}")]
    Parse(#[from] url::ParseError),

    #[error("a valid URL but an invalid host: {0}")]
    Mismatch(String),
}

/// A Host header that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidHost {
    host: String,
    hostname: String,
}

impl ValidHost {
    /// The header value as received (hostname and optional port).
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Hostname without port; the Host Record store key.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }
}

/// Validate a raw Host header value.
pub fn validate_host(raw: &HeaderValue) -> Result<ValidHost, HostError> {
    let raw = raw.to_str().map_err(|_| HostError::NotAscii)?;
    let url = Url::parse(&format!("http://{}", raw))?;

    // http URLs always carry a host once parsed.
    let hostname = url
        .host_str()
        .ok_or_else(|| HostError::Mismatch(raw.to_string()))?;
    let host = match url.port() {
        Some(port) => format!("{}:{}", hostname, port),
        None => hostname.to_string(),
    };

    if host != raw {
        return Err(HostError::Mismatch(raw.to_string()));
    }

    Ok(ValidHost {
        hostname: hostname.to_string(),
        host,
    })
}
