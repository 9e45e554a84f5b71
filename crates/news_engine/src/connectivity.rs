use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use news_logging::news_debug;
use tokio::net::TcpStream;
use url::Host;

#[async_trait::async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_connected(&self) -> bool;
}

/// Reports a fixed answer that can be flipped at runtime.
#[derive(Debug)]
pub struct StaticConnectivity {
    online: AtomicBool,
}

impl StaticConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn online() -> Self {
        Self::new(true)
    }

    pub fn offline() -> Self {
        Self::new(false)
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Relaxed);
    }
}

#[async_trait::async_trait]
impl ConnectivityProbe for StaticConnectivity {
    async fn is_connected(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }
}

/// Considers the network up when a TCP connection to the API host succeeds.
#[derive(Debug, Clone)]
pub struct TcpConnectivityProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpConnectivityProbe {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Probe the host and port `endpoint` points at. `None` when the endpoint
    /// has no host or no known port.
    pub fn for_endpoint(endpoint: &str, timeout: Duration) -> Option<Self> {
        let url = url::Url::parse(endpoint).ok()?;
        // `host_str` keeps the brackets of an IPv6 literal, which cannot be resolved.
        let host = match url.host()? {
            Host::Domain(domain) => domain.to_string(),
            Host::Ipv4(addr) => addr.to_string(),
            Host::Ipv6(addr) => addr.to_string(),
        };
        let port = url.port_or_known_default()?;
        Some(Self::new(host, port, timeout))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

#[async_trait::async_trait]
impl ConnectivityProbe for TcpConnectivityProbe {
    async fn is_connected(&self) -> bool {
        let attempt = TcpStream::connect((self.host.as_str(), self.port));
        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(err)) => {
                news_debug!("Connectivity probe to {}:{} failed: {}", self.host, self.port, err);
                false
            }
            Err(_) => {
                news_debug!(
                    "Connectivity probe to {}:{} timed out after {:?}",
                    self.host,
                    self.port,
                    self.timeout
                );
                false
            }
        }
    }
}
