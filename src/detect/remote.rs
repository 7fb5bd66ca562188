//! Remote detection backend.
//!
//! Posts the raw frame to a remote inference service and parses a JSON
//! label list from the reply. The HTTP agent carries a hard timeout so a
//! slow service costs at most one cycle; the orchestrator treats any error
//! from this backend as "zero detections this cycle".

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::backend::{DetectionSet, InferenceBackend};
use super::labels::normalize_label;
use crate::frame::Frame;

/// Configuration for the remote inference service.
#[derive(Clone, Debug)]
pub struct RemoteConfig {
    /// Detection endpoint, e.g. "http://inference.local:8080/detect".
    pub url: String,
    /// Hard bound on one detect call (connect + response).
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080/detect".to_string(),
            timeout: Duration::from_millis(2000),
        }
    }
}

/// Expected response body: `{"objects": ["car", "person"]}` with raw
/// (untranslated) vocabulary labels.
#[derive(Debug, Deserialize)]
struct RemoteDetections {
    objects: Vec<String>,
}

/// Remote inference backend.
pub struct RemoteBackend {
    agent: ureq::Agent,
    url: String,
}

impl RemoteBackend {
    pub fn new(config: RemoteConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.timeout)
            .timeout(config.timeout)
            .build();
        Self {
            agent,
            url: config.url,
        }
    }
}

impl InferenceBackend for RemoteBackend {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn detect(&mut self, frame: &Frame) -> Result<DetectionSet> {
        let response = self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/octet-stream")
            .set("X-Frame-Width", &frame.width.to_string())
            .set("X-Frame-Height", &frame.height.to_string())
            .send_bytes(&frame.pixels)
            .context("remote detect request")?;

        let body: RemoteDetections = response.into_json().context("remote detect response")?;

        let mut labels = DetectionSet::new();
        for label in body.objects {
            if let Some(published) = normalize_label(&label) {
                labels.insert(published.to_string());
            }
        }
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Answer one request on the listener with a canned JSON body and hand
    /// back the raw request text, lowercased for header assertions.
    fn serve_one(listener: TcpListener, body: &'static str) -> thread::JoinHandle<String> {
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).expect("read request");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_ascii_lowercase();
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }
            let reply = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(reply.as_bytes()).expect("write reply");
            String::from_utf8_lossy(&request).to_ascii_lowercase()
        })
    }

    fn backend_for(addr: std::net::SocketAddr) -> RemoteBackend {
        RemoteBackend::new(RemoteConfig {
            url: format!("http://{}/detect", addr),
            timeout: Duration::from_secs(5),
        })
    }

    #[test]
    fn posts_frame_dimensions_and_translates_the_reply() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let server = serve_one(listener, r#"{"objects": ["person", "car", "zebra"]}"#);

        let mut backend = backend_for(addr);
        let frame = Frame::new(vec![7u8; 12], 2, 2, 1);
        let labels = backend.detect(&frame).expect("detect");

        // Vocabulary filter drops "zebra"; the rest come back translated.
        let expected: DetectionSet = ["pessoa", "carro"].iter().map(|s| s.to_string()).collect();
        assert_eq!(labels, expected);

        let request = server.join().expect("server thread");
        assert!(request.contains("x-frame-width: 2"));
        assert!(request.contains("x-frame-height: 2"));
        assert!(request.contains("content-length: 12"));
    }

    #[test]
    fn reply_without_an_objects_field_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let server = serve_one(listener, r#"{"labels": ["car"]}"#);

        let mut backend = backend_for(addr);
        let frame = Frame::new(vec![0u8; 12], 2, 2, 1);
        assert!(backend.detect(&frame).is_err());
        server.join().expect("server thread");
    }
}
