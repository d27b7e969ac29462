//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves one static body for every GET, closing the connection after each
//! response so bodies without `Content-Length` are delimited by EOF.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy)]
pub enum ContentLength {
    /// Send the real body length.
    Exact,
    /// Send no `Content-Length` header.
    Omit,
    /// Claim this many bytes regardless of the body.
    Declared(u64),
}

#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub status: &'static str,
    pub content_length: ContentLength,
    /// If set, answer every request with a 302 to this URL instead.
    pub redirect_to: Option<String>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            status: "200 OK",
            content_length: ContentLength::Exact,
            redirect_to: None,
        }
    }
}

/// Starts a server in a background thread serving `body`. Returns the base URL
/// without trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start(body: Vec<u8>) -> String {
    start_with_options(body, ServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: ServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let opts = Arc::new(opts);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let opts = Arc::clone(&opts);
            thread::spawn(move || handle(stream, &body, &opts));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, body: &[u8], opts: &ServerOptions) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(5)));
    let mut buf = [0u8; 8192];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }

    if let Some(target) = &opts.redirect_to {
        let response = format!(
            "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            target
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let length_header = match opts.content_length {
        ContentLength::Exact => format!("Content-Length: {}\r\n", body.len()),
        ContentLength::Omit => String::new(),
        ContentLength::Declared(n) => format!("Content-Length: {}\r\n", n),
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: video/mp4\r\n{}Connection: close\r\n\r\n",
        opts.status, length_header
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}
