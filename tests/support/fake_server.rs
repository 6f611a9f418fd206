//! Scripted loopback HTTP server standing in for the analysis backend.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub delay: Duration,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
            delay: Duration::ZERO,
        }
    }

    pub fn bytes(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type,
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

struct Route {
    method: &'static str,
    path: &'static str,
    body_contains: Option<String>,
    query_contains: Option<String>,
    /// Served in order; the last reply repeats.
    replies: Vec<Reply>,
    served: usize,
}

#[derive(Default)]
struct ServerState {
    routes: Vec<Route>,
    requests: Vec<RecordedRequest>,
}

pub struct FakeServer {
    base_url: String,
    state: Arc<Mutex<ServerState>>,
}

impl FakeServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(ServerState::default()));
        let accept_state = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let state = Arc::clone(&accept_state);
                thread::spawn(move || handle(stream, state));
            }
        });
        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn route(&self, method: &'static str, path: &'static str, replies: Vec<Reply>) {
        self.add_route(method, path, None, None, replies);
    }

    /// Route that only matches requests whose body contains `needle`.
    pub fn route_body(
        &self,
        method: &'static str,
        path: &'static str,
        needle: &str,
        replies: Vec<Reply>,
    ) {
        self.add_route(method, path, Some(needle.to_string()), None, replies);
    }

    /// Route that only matches requests whose query string contains `needle`.
    pub fn route_query(
        &self,
        method: &'static str,
        path: &'static str,
        needle: &str,
        replies: Vec<Reply>,
    ) {
        self.add_route(method, path, None, Some(needle.to_string()), replies);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }

    fn add_route(
        &self,
        method: &'static str,
        path: &'static str,
        body_contains: Option<String>,
        query_contains: Option<String>,
        replies: Vec<Reply>,
    ) {
        assert!(!replies.is_empty());
        self.state.lock().unwrap().routes.push(Route {
            method,
            path,
            body_contains,
            query_contains,
            replies,
            served: 0,
        });
    }
}

fn handle(mut stream: TcpStream, state: Arc<Mutex<ServerState>>) {
    let Some(request) = read_request(&stream) else {
        return;
    };
    let reply = {
        let mut state = state.lock().unwrap();
        state.requests.push(request.clone());
        let body = request.body_text();
        state
            .routes
            .iter_mut()
            .find(|route| {
                route.method == request.method
                    && route.path == request.path
                    && route
                        .body_contains
                        .as_deref()
                        .is_none_or(|needle| body.contains(needle))
                    && route
                        .query_contains
                        .as_deref()
                        .is_none_or(|needle| request.query.contains(needle))
            })
            .map(|route| {
                let index = route.served.min(route.replies.len() - 1);
                route.served += 1;
                route.replies[index].clone()
            })
            .unwrap_or_else(|| Reply::json(404, r#"{"detail":"Not Found"}"#))
    };
    if !reply.delay.is_zero() {
        thread::sleep(reply.delay);
    }
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        reason(reply.status),
        reply.content_type,
        reply.body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&reply.body);
    let _ = stream.flush();
}

fn read_request(stream: &TcpStream) -> Option<RecordedRequest> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line).ok()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_string(), query.to_string()),
        None => (target, String::new()),
    };

    let mut content_length = 0usize;
    let mut content_type = None;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).ok()?;
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().ok()?;
            } else if name.eq_ignore_ascii_case("content-type") {
                content_type = Some(value.to_string());
            }
        }
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).ok()?;
    Some(RecordedRequest {
        method,
        path,
        query,
        content_type,
        body,
    })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
