//! Minimal HTTP/1.1 server with a fixed route table for probe integration tests.
//!
//! Each path answers with a canned status: content, a redirect, an error
//! status, or nothing at all (to provoke client timeouts).

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Route {
    /// 200 with a small body.
    Content(&'static str),
    /// 302 with the given Location (absolute or relative).
    Redirect(String),
    /// 302 without a Location header.
    RedirectNowhere,
    /// Bare status line, empty body.
    Status(u16, &'static str),
    /// Read the request, then hold the connection open without answering.
    Silent,
    /// HEAD answers 405; GET answers 200 with the body.
    NoHead(&'static str),
    /// 200 announcing a large body that is then sent a little at a time,
    /// far slower than any test timeout allows.
    Trickle,
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Unknown paths answer 404.
/// The server runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), r))
            .collect(),
    );
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

/// A base URL on which nothing listens (bind, note the port, drop the listener).
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, path) = parse_request_line(request);
    let head_only = method.eq_ignore_ascii_case("HEAD");

    let response = match routes.get(path) {
        Some(Route::Content(body)) => {
            let body = if head_only { "" } else { *body };
            format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            )
        }
        Some(Route::Redirect(location)) => format!(
            "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            location
        ),
        Some(Route::RedirectNowhere) => {
            "HTTP/1.1 302 Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string()
        }
        Some(Route::Status(code, reason)) => format!(
            "HTTP/1.1 {} {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            code, reason
        ),
        Some(Route::Silent) => {
            thread::sleep(Duration::from_secs(10));
            return;
        }
        Some(Route::NoHead(_)) if head_only => {
            "HTTP/1.1 405 Method Not Allowed\r\nAllow: GET\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                .to_string()
        }
        Some(Route::NoHead(body)) => format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        ),
        Some(Route::Trickle) => {
            trickle(&mut stream, head_only);
            return;
        }
        None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            .to_string(),
    };
    let _ = stream.write_all(response.as_bytes());
}

const TRICKLE_CHUNK: usize = 4096;
const TRICKLE_TOTAL: usize = 64 * 1024 * 1024;

fn trickle(stream: &mut TcpStream, head_only: bool) {
    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        TRICKLE_TOTAL
    );
    if stream.write_all(head.as_bytes()).is_err() || head_only {
        return;
    }
    let chunk = [b'x'; TRICKLE_CHUNK];
    for _ in 0..TRICKLE_TOTAL / TRICKLE_CHUNK {
        if stream.write_all(&chunk).is_err() {
            return;
        }
        thread::sleep(Duration::from_millis(100));
    }
}

/// Returns (method, path without query) from the request line.
fn parse_request_line(request: &str) -> (&str, &str) {
    let line = request.lines().next().unwrap_or("");
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("/");
    let path = target.split('?').next().unwrap_or("/");
    (method, path)
}
