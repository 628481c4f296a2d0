use rivulet::constants::RPC_REQUEST_PATH;
use std::fmt;
use tokio_tungstenite::tungstenite::http::Uri;

/// Errors raised while deriving an endpoint from a page origin.
#[derive(Debug, PartialEq, Eq)]
pub enum EndpointError {
    InvalidOrigin(String),
    UnsupportedScheme(String),
    MissingHost,
}

impl fmt::Display for EndpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointError::InvalidOrigin(origin) => write!(f, "Invalid origin: {}", origin),
            EndpointError::UnsupportedScheme(scheme) => {
                write!(f, "Unsupported origin scheme: {}", scheme)
            }
            EndpointError::MissingHost => write!(f, "Origin has no host"),
        }
    }
}

impl std::error::Error for EndpointError {}

/// Where RPC connections are opened: the host and port of the page that
/// serves the UI, with the fixed `/rpc` path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcEndpoint {
    secure: bool,
    host: String,
    port: u16,
}

impl RpcEndpoint {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            secure: false,
            host: host.to_string(),
            port,
        }
    }

    /// Uses `wss://` instead of `ws://`.
    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    /// Derives the endpoint from a page origin such as
    /// `http://localhost:8080`. `https` origins map to `wss`; a missing port
    /// falls back to the scheme's default.
    pub fn from_origin(origin: &str) -> Result<Self, EndpointError> {
        let uri: Uri = origin
            .parse()
            .map_err(|_| EndpointError::InvalidOrigin(origin.to_string()))?;

        let secure = match uri.scheme_str() {
            Some("http") | Some("ws") => false,
            Some("https") | Some("wss") => true,
            Some(other) => return Err(EndpointError::UnsupportedScheme(other.to_string())),
            None => return Err(EndpointError::InvalidOrigin(origin.to_string())),
        };
        let host = uri.host().ok_or(EndpointError::MissingHost)?;
        let port = uri.port_u16().unwrap_or(if secure { 443 } else { 80 });

        Ok(Self {
            secure,
            host: host.to_string(),
            port,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!("{}://{}:{}/{}", scheme, self.host, self.port, RPC_REQUEST_PATH)
    }
}

impl fmt::Display for RpcEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}
