use portsweep::config::{RetryPolicy, ScanConfig};
use portsweep::scanner::{targets, PortStatus, ScanCoordinator, ScanSummary};
use portsweep::types::{Port, PortRange, PortSpec};
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

/// Listener that greets every connection with `banner`.
async fn greeting_listener(banner: &'static [u8]) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = socket.write_all(banner).await;
            });
        }
    });
    port
}

/// A port nothing listens on: bind, note the port, release it.
async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    listener.local_addr().expect("local addr").port()
}

fn single(port: u16) -> PortRange {
    PortRange::new(Port::new(port), Port::new(port)).unwrap()
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(10))
}

fn open_ports(summary: &ScanSummary) -> BTreeSet<u16> {
    summary.results.iter().map(|r| r.port.as_u16()).collect()
}

async fn scan(config: ScanConfig) -> ScanSummary {
    ScanCoordinator::new(config)
        .expect("valid config")
        .run()
        .await
        .expect("scan completes")
}

#[tokio::test]
async fn test_end_to_end_single_listener() {
    let open = greeting_listener(b"hello\n").await;
    let (closed_a, closed_b) = (closed_port().await, closed_port().await);

    let ports = PortSpec::from_range(single(open))
        .with_ports([Port::new(closed_a), Port::new(closed_b)]);
    let config = ScanConfig::new(targets(["127.0.0.1"]), ports).with_timeout(Duration::from_secs(1));

    let summary = scan(config).await;

    assert_eq!(summary.progress.total, 3);
    assert_eq!(summary.total_ports_scanned(), 3);
    assert_eq!(summary.results.len(), 1);

    let result = &summary.results[0];
    assert_eq!(result.target.as_str(), "127.0.0.1");
    assert_eq!(result.port, Port::new(open));
    assert_eq!(result.status, PortStatus::Open);
    assert_eq!(result.banner.as_deref(), Some("hello"));

    assert_eq!(summary.status_of("127.0.0.1", closed_a), PortStatus::Closed);
    // Two refused ports, each waiting 1s + 2s, in parallel.
    assert!(summary.elapsed >= Duration::from_secs(3));
}

#[tokio::test]
async fn test_port_zero_boundary() {
    let config = ScanConfig::new(targets(["127.0.0.1"]), PortSpec::from_range(single(0)))
        .with_timeout(Duration::from_secs(1))
        .with_retry(fast_retry());

    let summary = scan(config).await;

    assert_eq!(summary.progress.total, 1);
    assert_eq!(summary.total_ports_scanned(), 1);
    assert!(summary.results.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_worker_count_does_not_change_membership() {
    let banners: [&'static [u8]; 3] = [b"one\r\n", b"two", b""];
    let mut listening = Vec::new();
    for banner in banners {
        listening.push(greeting_listener(banner).await);
    }
    let mut closed = Vec::new();
    for _ in 0..5 {
        closed.push(closed_port().await);
    }

    let ports = PortSpec::new().with_ports(
        listening
            .iter()
            .chain(closed.iter())
            .copied()
            .map(Port::new),
    );
    let config = ScanConfig::new(targets(["127.0.0.1"]), ports)
        .with_timeout(Duration::from_secs(1))
        .with_banner_timeout(Duration::from_millis(200))
        .with_retry(fast_retry());

    let one = scan(config.clone().with_workers(1)).await;
    let many = scan(config.with_workers(100)).await;

    let expected: BTreeSet<u16> = listening.iter().copied().collect();
    assert_eq!(open_ports(&one), expected);
    assert_eq!(open_ports(&many), expected);
    assert_eq!(one.total_ports_scanned(), 8);
    assert_eq!(many.total_ports_scanned(), 8);
}

#[tokio::test]
async fn test_repeated_runs_agree() {
    let open = greeting_listener(b"SSH-2.0-stub\r\n").await;
    let closed = closed_port().await;

    let ports = PortSpec::new().with_ports([Port::new(open), Port::new(closed)]);
    let config = ScanConfig::new(targets(["127.0.0.1", "localhost"]), ports)
        .with_timeout(Duration::from_secs(1))
        .with_retry(fast_retry());

    let first = scan(config.clone()).await;
    let second = scan(config).await;

    for summary in [&first, &second] {
        assert_eq!(summary.total_ports_scanned(), 4);
        assert_eq!(summary.status_of("127.0.0.1", open), PortStatus::Open);
        assert_eq!(summary.status_of("127.0.0.1", closed), PortStatus::Closed);
    }
    assert_eq!(open_ports(&first), open_ports(&second));
}

#[test]
fn test_invalid_config_rejected_before_scan() {
    let config = ScanConfig::new(targets(["127.0.0.1"]), PortSpec::new());
    assert!(ScanCoordinator::new(config).is_err());

    let ports = PortSpec::new().with_ports([Port::new(80)]);
    let config = ScanConfig::new(targets(["127.0.0.1"]), ports).with_workers(0);
    assert!(ScanCoordinator::new(config).is_err());
}
