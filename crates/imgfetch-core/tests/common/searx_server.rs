//! Minimal HTTP/1.1 server standing in for a SearXNG instance and image hosts.
//!
//! `GET /search?...&pageno=1` answers with a JSON page listing every image
//! path; later pages are empty. `GET /img/<name>` serves the registered body,
//! anything else is a 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

/// Starts the server in a background thread. `images` maps file names under
/// `/img/` to bodies; `listed` is the order names appear in search results
/// (names missing from `images` produce 404s). Returns the base URL without a
/// trailing slash, e.g. `http://127.0.0.1:12345`.
pub fn start(images: Vec<(&str, Vec<u8>)>, listed: &[&str]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base = format!("http://127.0.0.1:{}", port);

    let results: Vec<String> = listed
        .iter()
        .map(|name| {
            format!(
                r#"{{"url":"{base}/page/{name}","title":"{name}","img_src":"{base}/img/{name}"}}"#,
                base = base,
                name = name
            )
        })
        .collect();
    let first_page = format!(r#"{{"query":"q","results":[{}]}}"#, results.join(","));
    let images: HashMap<String, Vec<u8>> = images
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    let state = Arc::new((first_page, images));

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&state);
            thread::spawn(move || handle(stream, &state.0, &state.1));
        }
    });
    base
}

fn handle(mut stream: std::net::TcpStream, first_page: &str, images: &HashMap<String, Vec<u8>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let target = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/");

    let (status, content_type, body): (&str, &str, Vec<u8>) = if target.starts_with("/search") {
        if page_is_first(target) {
            ("200 OK", "application/json", first_page.as_bytes().to_vec())
        } else {
            ("200 OK", "application/json", br#"{"results":[]}"#.to_vec())
        }
    } else if let Some(name) = target.strip_prefix("/img/") {
        match images.get(name) {
            Some(b) => ("200 OK", "application/octet-stream", b.clone()),
            None => ("404 Not Found", "text/plain", b"not found".to_vec()),
        }
    } else {
        ("404 Not Found", "text/plain", b"not found".to_vec())
    };

    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
}

fn page_is_first(target: &str) -> bool {
    target
        .split(['?', '&'])
        .any(|kv| kv == "pageno=1")
}
