use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread::{self, JoinHandle};

use modscope::server::{Server, ServerConfig, ShutdownHandle};
use modscope::{ModulationResult, Synthesizer};
use pretty_assertions::assert_eq;

struct Running {
    addr: SocketAddr,
    handle: ShutdownHandle,
    thread: JoinHandle<()>,
}

impl Running {
    fn start() -> Self {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            workers: 2,
            ..ServerConfig::default()
        };
        let server = Server::bind(config, Synthesizer::default()).unwrap();
        let addr = server.local_addr().unwrap();
        let handle = server.shutdown_handle();
        let thread = thread::spawn(move || server.run().unwrap());
        Self {
            addr,
            handle,
            thread,
        }
    }

    /// Send raw bytes, return (status, headers, body)
    fn send(&self, raw: &str) -> (u16, String, Vec<u8>) {
        let mut stream = TcpStream::connect(self.addr).unwrap();
        stream.write_all(raw.as_bytes()).unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).unwrap();

        let split = response
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("header terminator");
        let head = String::from_utf8(response[..split].to_vec()).unwrap();
        let body = response[split + 4..].to_vec();
        let status = head
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap();
        (status, head, body)
    }

    fn post(&self, path: &str, origin: &str, body: &str) -> (u16, String, Vec<u8>) {
        self.send(&format!(
            "POST {path} HTTP/1.1\r\nHost: test\r\nOrigin: {origin}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        ))
    }

    fn stop(self) {
        self.handle.shutdown();
        self.thread.join().unwrap();
    }
}

#[test]
fn modulate_over_http() {
    let server = Running::start();

    let (status, head, body) = server.post(
        "/modulate",
        "https://dso-one.vercel.app",
        r#"{"amplitude":"5","frequency":"5","bitstream":"10110","type":"PSK"}"#,
    );
    assert_eq!(status, 200);
    assert!(head.contains("Access-Control-Allow-Origin: https://dso-one.vercel.app"));
    let result: ModulationResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(result.len(), 500);

    let (status, _, body) = server.post("/modulate", "http://localhost:3000", r#"{"bitstream":"102"}"#);
    assert_eq!(status, 400);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "invalid_bitstream");

    let (status, _, body) = server.post("/modulate", "http://localhost:3000", "not json");
    assert_eq!(status, 400);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "malformed_request");

    server.stop();
}

#[test]
fn preflight_and_unknown_routes() {
    let server = Running::start();

    let (status, head, body) = server.send(
        "OPTIONS /modulate HTTP/1.1\r\nOrigin: http://127.0.0.1:3000\r\nAccess-Control-Request-Method: POST\r\n\r\n",
    );
    assert_eq!(status, 204);
    assert!(head.contains("Access-Control-Allow-Methods: GET, POST, OPTIONS"));
    assert!(body.is_empty());

    let (status, head, _) = server.send("GET /modulate HTTP/1.1\r\n\r\n");
    assert_eq!(status, 405);
    assert!(head.contains("Allow: POST, OPTIONS"));

    let (status, _, _) = server.send("GET /missing HTTP/1.1\r\n\r\n");
    assert_eq!(status, 404);

    let (status, _, body) = server.send("GET /schemes HTTP/1.1\r\n\r\n");
    assert_eq!(status, 200);
    let schemes: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(schemes.as_array().unwrap().len(), 6);

    let (status, _, _) = server.send("BROKEN\r\n");
    assert_eq!(status, 400);

    server.stop();
}

#[test]
fn disallowed_origin_gets_no_cors_headers() {
    let server = Running::start();
    let (status, head, _) = server.post("/modulate", "https://elsewhere.example", "{}");
    assert_eq!(status, 200);
    assert!(!head.contains("Access-Control-Allow-Origin"));
    server.stop();
}
