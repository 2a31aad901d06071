//! Shared utilities for integration testing: programmable mock cluster nodes.
//!
//! Every node of a registry shares one port, so mock nodes listen on distinct
//! loopback addresses (127.0.0.1, 127.0.0.2, ...) bound to the same port.

#![allow(dead_code)]

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Bind one listener per host, all on the same ephemeral port.
pub async fn bind_nodes(hosts: &[&str]) -> (u16, Vec<TcpListener>) {
    let first = TcpListener::bind((hosts[0], 0)).await.unwrap();
    let port = first.local_addr().unwrap().port();

    let mut listeners = vec![first];
    for host in &hosts[1..] {
        listeners.push(TcpListener::bind((*host, port)).await.unwrap());
    }
    (port, listeners)
}

/// Serve every request on `listener` with the `(status, body)` produced by `f`.
/// Returns a counter of requests received.
pub fn serve<F, Fut>(listener: TcpListener, f: F) -> Arc<AtomicU32>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let f = f.clone();
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;
                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    hits
}

/// Answer every request with `response` written verbatim, then close the connection.
pub fn serve_raw(listener: TcpListener, response: String) -> Arc<AtomicU32> {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let response = response.clone();
            tokio::spawn(async move {
                read_request_head(&mut socket).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    hits
}

/// Serve a fixed discovery body.
pub fn serve_list(listener: TcpListener, body: &str) -> Arc<AtomicU32> {
    let body = body.to_string();
    serve(listener, move || {
        let body = body.clone();
        async move { (200, body) }
    })
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

/// Poll `cond` every few milliseconds until it holds or `timeout` passes.
pub async fn wait_until<F: FnMut() -> bool>(timeout: Duration, mut cond: F) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}

pub fn hosts(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
