//! `OpenAiProvider` against a one-shot local HTTP server.

use s2r_core::config::{LlmConfig, S2rConfig};
use s2r_gen::provider::OpenAiProvider;
use s2r_gen::{CompletionError, LlmProvider};
use serde_json::Value;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread::{self, JoinHandle};

/// Captured request: header block and body.
struct Captured {
    head: String,
    body: String,
}

/// Serve exactly one request with `status` and `body`, returning what was sent.
fn serve_once(status: u16, body: &'static str) -> (SocketAddr, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut head = String::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
            head.push_str(&line);
        }

        let length = head
            .lines()
            .find_map(|l| {
                let (name, value) = l.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().unwrap())
            })
            .unwrap_or(0);
        let mut raw = vec![0; length];
        reader.read_exact(&mut raw).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        stream.flush().unwrap();

        Captured {
            head,
            body: String::from_utf8(raw).unwrap(),
        }
    });

    (addr, handle)
}

fn config_for(addr: SocketAddr) -> LlmConfig {
    LlmConfig {
        base_url: format!("http://{addr}"),
        timeout_secs: 10,
        ..S2rConfig::default().llm
    }
}

#[test]
fn test_request_shape_and_success() {
    let (addr, server) = serve_once(
        200,
        r##"{"choices":[{"message":{"content":"# Demo\n"}}],"usage":{"prompt_tokens":12,"completion_tokens":3}}"##,
    );
    let provider = OpenAiProvider::new("sk-local".to_string(), &config_for(addr));

    let response = provider.complete("system text", "user \"quoted\"\n<<<").unwrap();
    assert_eq!(response.text, "# Demo\n");
    assert_eq!(response.input_tokens, Some(12));
    assert_eq!(response.output_tokens, Some(3));

    let captured = server.join().unwrap();
    assert!(captured.head.starts_with("POST /v1/chat/completions "));
    assert!(
        captured
            .head
            .lines()
            .any(|l| l.eq_ignore_ascii_case("authorization: Bearer sk-local"))
    );

    let json: Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(json["model"], "gpt-4o-mini");
    let messages = json["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[0]["content"], "system text");
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["content"], "user \"quoted\"\n<<<");
    assert!((json["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
    assert_eq!(json["max_tokens"], 2000);
}

#[test]
fn test_error_statuses_are_classified() {
    let (addr, server) = serve_once(401, r#"{"error":{"message":"nope"}}"#);
    let err = OpenAiProvider::new("sk".into(), &config_for(addr))
        .complete("s", "u")
        .unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, CompletionError::Authentication(ref m) if m == "nope"));

    let (addr, server) = serve_once(429, r#"{"error":{"message":"slow down"}}"#);
    let err = OpenAiProvider::new("sk".into(), &config_for(addr))
        .complete("s", "u")
        .unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, CompletionError::RateLimit(ref m) if m == "slow down"));

    let (addr, server) = serve_once(500, "");
    let err = OpenAiProvider::new("sk".into(), &config_for(addr))
        .complete("s", "u")
        .unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, CompletionError::Api { status: 500, .. }));
}

#[test]
fn test_refused_connection_is_network_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let err = OpenAiProvider::new("sk".into(), &config_for(addr))
        .complete("s", "u")
        .unwrap_err();
    assert!(matches!(err, CompletionError::Network(_)));
}
