//! Minimal HTTP/1.1 server for integration tests.
//!
//! Every GET is answered by a caller-supplied responder that sees the request
//! target and the 0-based request count, so tests can script transient
//! failures (503 a few times, then 200) and count how many requests arrived.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Scripted reply: status, extra header lines, body.
pub struct Reply {
    pub status: u16,
    pub headers: Vec<String>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn ok(body: &[u8]) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.to_vec(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }
}

pub struct TileServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    targets: Arc<std::sync::Mutex<Vec<String>>>,
}

impl TileServer {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start<F>(responder: F) -> TileServer
where
    F: Fn(&str, usize) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let targets = Arc::new(std::sync::Mutex::new(Vec::new()));
    let responder = Arc::new(responder);
    {
        let hits = Arc::clone(&hits);
        let targets = Arc::clone(&targets);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let hits = Arc::clone(&hits);
                let targets = Arc::clone(&targets);
                let responder = Arc::clone(&responder);
                thread::spawn(move || handle(stream, &*responder, &hits, &targets));
            }
        });
    }
    TileServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        hits,
        targets,
    }
}

fn handle<F>(
    mut stream: std::net::TcpStream,
    responder: &F,
    hits: &AtomicUsize,
    targets: &std::sync::Mutex<Vec<String>>,
) where
    F: Fn(&str, usize) -> Reply,
{
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
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
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("/").to_string();
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }

    let count = hits.fetch_add(1, Ordering::SeqCst);
    targets.lock().unwrap().push(target.clone());
    let reply = responder(&target, count);

    let mut head = format!(
        "HTTP/1.1 {} Scripted\r\nContent-Length: {}\r\nConnection: close\r\n",
        reply.status,
        reply.body.len()
    );
    for h in &reply.headers {
        head.push_str(h);
        head.push_str("\r\n");
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&reply.body);
}
