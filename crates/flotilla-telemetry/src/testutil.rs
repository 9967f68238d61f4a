//! In-process HTTP server for client tests: canned responses per path,
//! captured requests for wire-shape assertions.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl CapturedRequest {
    /// Decode one field out of a form-urlencoded body.
    pub fn form_field(&self, name: &str) -> Option<String> {
        self.body.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then(|| urldecode(value))
        })
    }
}

fn urldecode(input: &str) -> String {
    let mut out = Vec::with_capacity(input.len());
    let mut bytes = input.bytes();
    while let Some(b) = bytes.next() {
        match b {
            b'+' => out.push(b' '),
            b'%' => {
                let hi = bytes.next().unwrap_or(b'0');
                let lo = bytes.next().unwrap_or(b'0');
                let hex = [hi, lo];
                let hex = std::str::from_utf8(&hex).unwrap_or("00");
                out.push(u8::from_str_radix(hex, 16).unwrap_or(b'?'));
            }
            other => out.push(other),
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

pub struct MockServer {
    addr: String,
    _handle: std::thread::JoinHandle<()>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockServer {
    /// Health endpoint answers `200 OK`; every other path answers `200 {}`.
    pub fn healthy() -> Self {
        Self::start(HashMap::new())
    }

    /// Health endpoint answers as given; every other path answers `200 {}`.
    pub fn with_health(status: u16, body: &str) -> Self {
        let mut routes = HashMap::new();
        routes.insert("/health".to_owned(), (status, body.to_owned()));
        Self::start(routes)
    }

    /// Healthy server with one path answering as given.
    pub fn healthy_with_route(path: &str, status: u16, body: &str) -> Self {
        let mut routes = HashMap::new();
        routes.insert(path.to_owned(), (status, body.to_owned()));
        Self::start(routes)
    }

    /// Healthy server whose root path answers as given, for discovery tests.
    pub fn with_root(status: u16, body: &str) -> Self {
        Self::healthy_with_route("/", status, body)
    }

    fn start(routes: HashMap<String, (u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());
        let requests: Arc<Mutex<Vec<CapturedRequest>>> = Arc::new(Mutex::new(Vec::new()));

        let requests_clone = Arc::clone(&requests);
        let handle = std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let routes = routes.clone();
                let reqs = Arc::clone(&requests_clone);

                std::thread::spawn(move || {
                    let mut reader = BufReader::new(stream.try_clone().unwrap());
                    let mut request_line = String::new();
                    if reader.read_line(&mut request_line).is_err() {
                        return;
                    }
                    let parts: Vec<&str> = request_line.trim().splitn(3, ' ').collect();
                    if parts.len() < 2 {
                        return;
                    }
                    let method = parts[0].to_owned();
                    let path = parts[1].to_owned();

                    let mut content_length: usize = 0;
                    loop {
                        let mut line = String::new();
                        if reader.read_line(&mut line).is_err() || line.trim().is_empty() {
                            break;
                        }
                        let lower = line.to_lowercase();
                        if let Some(val) = lower.strip_prefix("content-length: ") {
                            content_length = val.trim().parse().unwrap_or(0);
                        }
                    }

                    let mut body = vec![0u8; content_length];
                    if content_length > 0 {
                        let _ = reader.read_exact(&mut body);
                    }

                    reqs.lock().unwrap().push(CapturedRequest {
                        method,
                        path: path.clone(),
                        body: String::from_utf8_lossy(&body).into_owned(),
                    });

                    let (status, response_body) = routes.get(&path).cloned().unwrap_or_else(|| {
                        if path == "/health" {
                            (200, "OK".to_owned())
                        } else {
                            (200, "{}".to_owned())
                        }
                    });
                    let reason = if status == 200 { "OK" } else { "Error" };
                    let response = format!(
                        "HTTP/1.1 {status} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{response_body}",
                        response_body.len()
                    );
                    let _ = stream.write_all(response.as_bytes());
                    let _ = stream.flush();
                });
            }
        });

        MockServer {
            addr,
            _handle: handle,
            requests,
        }
    }

    pub fn url(&self) -> String {
        self.addr.clone()
    }

    pub fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request_to(&self, path: &str) -> Option<CapturedRequest> {
        self.captured_requests()
            .into_iter()
            .rev()
            .find(|req| req.path == path)
    }

    pub fn requests_to(&self, path: &str) -> usize {
        self.captured_requests()
            .iter()
            .filter(|req| req.path == path)
            .count()
    }
}
