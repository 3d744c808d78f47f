//! Minimal fixture HTTP server for exercising transfers without network
//! access.
//!
//! Serves configured routes over HTTP/1.1 with `Connection: close`
//! semantics. Supports HEAD probes, byte-range requests (Content-Range /
//! 206), routes that refuse ranges, routes without a Content-Length, and
//! fixed error statuses.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Clone)]
pub struct Route {
    body: Vec<u8>,
    resumable: bool,
    status: u16,
    content_length: bool,
}

impl Route {
    /// A 200 route serving `body` with Content-Length and range support.
    pub fn bytes(body: Vec<u8>) -> Self {
        Self {
            body,
            resumable: true,
            status: 200,
            content_length: true,
        }
    }

    /// Refuse byte-range requests (no Accept-Ranges, ranges ignored).
    pub fn not_resumable(mut self) -> Self {
        self.resumable = false;
        self
    }

    /// Respond with a fixed error status and no body.
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Omit Content-Length: the body is delimited by connection close and
    /// the client never learns the total upfront.
    pub fn unknown_length(mut self) -> Self {
        self.content_length = false;
        self
    }
}

pub struct TestServer {
    addr: SocketAddr,
}

impl TestServer {
    /// Binds an ephemeral port and serves `routes` until dropped.
    pub async fn spawn(routes: HashMap<String, Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fixture server");
        let addr = listener.local_addr().expect("local addr");
        let routes = Arc::new(routes);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(handle(stream, routes.clone()));
            }
        });
        Self { addr }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

async fn handle(mut stream: TcpStream, routes: Arc<HashMap<String, Route>>) {
    let Some(request) = read_head(&mut stream).await else {
        return;
    };
    let mut lines = request.lines();
    let Some(request_line) = lines.next() else {
        return;
    };
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");
    let range_start = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("range"))
        .and_then(|(_, value)| parse_range_start(value.trim()));

    let Some(route) = routes.get(path) else {
        respond_empty(&mut stream, 404, "Not Found").await;
        return;
    };
    if route.status != 200 {
        respond_empty(&mut stream, route.status, "Error").await;
        return;
    }

    let total = route.body.len() as u64;
    let start = match range_start {
        Some(start) if route.resumable && start <= total => start,
        _ => 0,
    };

    let mut head = String::new();
    if start > 0 {
        head.push_str("HTTP/1.1 206 Partial Content\r\n");
        head.push_str(&format!(
            "Content-Range: bytes {}-{}/{}\r\n",
            start,
            total.saturating_sub(1),
            total
        ));
    } else {
        head.push_str("HTTP/1.1 200 OK\r\n");
    }
    if route.resumable {
        head.push_str("Accept-Ranges: bytes\r\n");
    }
    let slice = &route.body[start as usize..];
    if route.content_length {
        head.push_str(&format!("Content-Length: {}\r\n", slice.len()));
    }
    head.push_str("Connection: close\r\n\r\n");

    let _ = stream.write_all(head.as_bytes()).await;
    if method != "HEAD" {
        let _ = stream.write_all(slice).await;
    }
    let _ = stream.shutdown().await;
}

async fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") || buf.len() > 64 * 1024 {
            break;
        }
    }
    Some(String::from_utf8_lossy(&buf).into_owned())
}

fn parse_range_start(value: &str) -> Option<u64> {
    value
        .strip_prefix("bytes=")?
        .split('-')
        .next()?
        .parse()
        .ok()
}

async fn respond_empty(stream: &mut TcpStream, status: u16, reason: &str) {
    let head = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    );
    let _ = stream.write_all(head.as_bytes()).await;
    let _ = stream.shutdown().await;
}
