//! TCP Connect Scanner implementation.
//!
//! Performs a full TCP handshake using the operating system's socket API,
//! optionally reads a banner, and closes the connection. Hostnames are
//! resolved by the connect call itself.

use crate::banner::read_banner;
use crate::config::ScanConfig;
use crate::error::{ProbeResult, ScanError};
use crate::scanner::rate_limiter::RateLimiter;
use crate::scanner::task::ScanTask;
use crate::scanner::traits::Scanner;
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// TCP Connect Scanner.
///
/// Does not require elevated privileges.
#[derive(Debug, Clone)]
pub struct TcpConnectScanner {
    connect_timeout: Option<Duration>,
    grab_banners: bool,
    banner_timeout: Duration,
    rate_limiter: Option<RateLimiter>,
}

impl TcpConnectScanner {
    /// Create a new TCP connect scanner.
    ///
    /// # Arguments
    /// * `connect_timeout` - Per-attempt connect timeout, `None` for no limit
    /// * `grab_banners` - Whether to attempt a banner read on open ports
    pub fn new(connect_timeout: Option<Duration>, grab_banners: bool) -> Self {
        Self {
            connect_timeout,
            grab_banners,
            banner_timeout: crate::config::BANNER_TIMEOUT,
            rate_limiter: None,
        }
    }

    /// Build a scanner from a scan configuration.
    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.connect_timeout, config.grab_banners)
            .with_banner_timeout(config.banner_timeout)
            .with_rate_limiter(RateLimiter::new(config.rate_limit))
    }

    /// Set the banner read deadline.
    pub fn with_banner_timeout(mut self, deadline: Duration) -> Self {
        self.banner_timeout = deadline;
        self
    }

    /// Share a rate limiter across attempts.
    pub fn with_rate_limiter(mut self, limiter: Option<RateLimiter>) -> Self {
        self.rate_limiter = limiter;
        self
    }

    /// Attempt to connect to the task's address.
    async fn attempt_connect(&self, task: &ScanTask) -> ProbeResult<TcpStream> {
        let addr = task.address();
        let connect = TcpStream::connect(addr.as_str());

        let result = match self.connect_timeout {
            Some(limit) => timeout(limit, connect).await.map_err(|_| ScanError::Timeout)?,
            None => connect.await,
        };

        result.map_err(|e| {
            ScanError::from_connect_error(e, task.target().as_str(), task.port().as_u16())
        })
    }
}

#[async_trait]
impl Scanner for TcpConnectScanner {
    async fn probe(&self, task: &ScanTask) -> ProbeResult<Option<String>> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.wait().await;
        }

        let mut stream = self.attempt_connect(task).await?;

        if !self.grab_banners {
            return Ok(None);
        }

        match read_banner(&mut stream, self.banner_timeout).await {
            Ok(banner) => Ok(banner),
            Err(e) => {
                tracing::debug!(address = %task, error = %e, "no banner");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Port, ScanTarget};
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    fn task(port: u16) -> ScanTask {
        ScanTask::new(ScanTarget::new("127.0.0.1"), Port::new(port))
    }

    #[tokio::test]
    async fn test_probe_open_port_with_banner() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"hello\n").await.unwrap();
        });

        let scanner = TcpConnectScanner::new(Some(Duration::from_secs(1)), true);
        let banner = scanner.probe(&task(port)).await.unwrap();
        assert_eq!(banner.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_probe_silent_service() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(1)).await;
            drop(socket);
        });

        let scanner = TcpConnectScanner::new(Some(Duration::from_secs(1)), true)
            .with_banner_timeout(Duration::from_millis(100));
        assert_eq!(scanner.probe(&task(port)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_probe_without_banner_grab() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let scanner = TcpConnectScanner::new(Some(Duration::from_secs(1)), false);
        assert_eq!(scanner.probe(&task(port)).await.unwrap(), None);
        drop(listener);
    }

    #[tokio::test]
    async fn test_probe_closed_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let scanner = TcpConnectScanner::new(Some(Duration::from_millis(500)), false);
        assert!(scanner.probe(&task(port)).await.is_err());
    }
}
