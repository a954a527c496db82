use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use lff_scrape::fetch::{fetch_with_retry_attempts, http_client};

/// Tiny single-purpose HTTP server: answer every connection with the given
/// head and body, counting hits.
fn spawn_server(response: &'static str, hits: Arc<AtomicUsize>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            hits.fetch_add(1, Ordering::SeqCst);
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{addr}")
}

#[test]
fn persistent_500_exhausts_retries_with_linear_backoff() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_server(
        "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        hits.clone(),
    );
    let url = format!("{base}/standings");

    let client = http_client().expect("client");
    let started = Instant::now();
    let err = fetch_with_retry_attempts(client, &url, 3).expect_err("all attempts fail");

    // Exactly three attempts, spaced 1s then 2s.
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert!(started.elapsed() >= Duration::from_secs(3));

    let message = format!("{err:#}");
    assert!(message.contains("3 attempts"), "{message}");
    assert!(message.contains(&url), "{message}");
}

#[test]
fn successful_fetch_returns_body_without_retrying() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_server(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 15\r\nConnection: close\r\n\r\n<html>ok</html>",
        hits.clone(),
    );

    let client = http_client().expect("client");
    let body = fetch_with_retry_attempts(client, &base, 3).expect("fetch succeeds");

    assert_eq!(body, "<html>ok</html>");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
