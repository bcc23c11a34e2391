//! Banner grabbing for open TCP ports.
//!
//! A banner is whatever the service sends on its own right after the
//! handshake. One read is attempted under a short deadline; nothing is
//! sent to the peer.

use crate::error::{ProbeResult, ScanError};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;

/// Maximum bytes to read for a banner.
const MAX_BANNER_SIZE: usize = 1024;

/// Read a banner from a freshly connected stream.
///
/// Returns `Ok(None)` when the peer closed without sending anything and an
/// error when the read failed or the deadline passed.
pub async fn read_banner<S>(stream: &mut S, deadline: Duration) -> ProbeResult<Option<String>>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = vec![0u8; MAX_BANNER_SIZE];

    match timeout(deadline, stream.read(&mut buffer)).await {
        Ok(Ok(0)) => Ok(None),
        Ok(Ok(n)) => Ok(Some(normalize_banner(&buffer[..n]))),
        Ok(Err(e)) => Err(ScanError::BannerRead(e.to_string())),
        Err(_) => Err(ScanError::BannerRead(format!(
            "no data within {}ms",
            deadline.as_millis()
        ))),
    }
}

/// Decode banner bytes as text and trim surrounding whitespace.
fn normalize_banner(data: &[u8]) -> String {
    String::from_utf8_lossy(data).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[test]
    fn test_normalize_banner() {
        assert_eq!(normalize_banner(b"SSH-2.0-OpenSSH_8.9\r\n"), "SSH-2.0-OpenSSH_8.9");
        assert_eq!(normalize_banner(b"  hello\n"), "hello");
        assert_eq!(normalize_banner(b"\xffok"), "\u{fffd}ok");
    }

    #[tokio::test]
    async fn test_read_banner() {
        let (mut client, mut server) = tokio::io::duplex(64);
        server.write_all(b"hello\n").await.unwrap();

        let banner = read_banner(&mut client, Duration::from_secs(1)).await.unwrap();
        assert_eq!(banner.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_read_banner_peer_closed() {
        let (mut client, server) = tokio::io::duplex(64);
        drop(server);

        let banner = read_banner(&mut client, Duration::from_secs(1)).await.unwrap();
        assert_eq!(banner, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_banner_deadline() {
        let (mut client, _server) = tokio::io::duplex(64);

        let result = read_banner(&mut client, Duration::from_secs(2)).await;
        assert!(matches!(result, Err(ScanError::BannerRead(_))));
    }
}
