use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread;

use topwords::config::ServeConfig;
use topwords::http::{Envelope, Status, MAX_LINE_BYTES};
use topwords::{Analysis, Server};

fn start(analysis: Analysis) -> SocketAddr {
    let config = ServeConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        workers: 2,
        max_body_bytes: 4096,
        analysis,
        ..ServeConfig::default()
    };
    let server = Server::bind(&config).expect("server should bind");
    let addr = server.local_addr().unwrap();
    thread::spawn(move || server.run());
    addr
}

fn send(addr: SocketAddr, raw: &str) -> (u16, Envelope) {
    send_bytes(addr, raw.as_bytes())
}

fn send_bytes(addr: SocketAddr, raw: &[u8]) -> (u16, Envelope) {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(raw).unwrap();

    let mut reply = String::new();
    stream.read_to_string(&mut reply).unwrap();

    let (head, body) = reply.split_once("\r\n\r\n").expect("response has a body");
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .expect("status line");
    assert!(head.contains("Content-Type: application/json"));
    (status, serde_json::from_str(body).expect("JSON envelope"))
}

fn post(addr: SocketAddr, body: &str) -> (u16, Envelope) {
    let raw = format!(
        "POST / HTTP/1.1\r\n\
         Host: localhost\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\r\n{}",
        body.len(),
        body
    );
    send(addr, &raw)
}

#[test]
fn top_ten_over_http() {
    let addr = start(Analysis::default());
    let text = "the cat sat on the mat. The cat ran. the dog sat. the fox ran. \
                the bird sat. cat dog fox bird mat ran zebra yak";
    let body = serde_json::to_string(text).unwrap();

    let (status, envelope) = post(addr, &body);
    assert_eq!(status, 200);
    assert_eq!(envelope.status, Status::Success);

    let words = envelope.word_counts.expect("word counts on success");
    assert_eq!(words.len(), 10);
    assert_eq!(words[0].word, "the");
    assert_eq!(words[0].count, 6);
    for pair in words.windows(2) {
        assert!(pair[0].count >= pair[1].count);
    }
}

#[test]
fn any_path_is_served() {
    let addr = start(Analysis::default());
    let body = "\"a b c d e f g h i j\"";
    let raw = format!(
        "POST /anything/else HTTP/1.1\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    );
    let (status, _) = send(addr, &raw);
    assert_eq!(status, 200);
}

#[test]
fn get_is_rejected() {
    let addr = start(Analysis::default());
    let (status, envelope) = send(addr, "GET / HTTP/1.1\r\nHost: localhost\r\n\r\n");
    assert_eq!(status, 400);
    assert_eq!(envelope.status, Status::Error);
    assert_eq!(envelope.message, "only POST request accepted");
    assert!(envelope.word_counts.is_none());
}

#[test]
fn malformed_json_is_rejected() {
    let addr = start(Analysis::default());
    let (status, envelope) = post(addr, "{\"text\": 1}");
    assert_eq!(status, 400);
    assert_eq!(envelope.status, Status::Error);
    assert!(!envelope.message.is_empty());
}

#[test]
fn small_vocabulary_is_rejected() {
    let addr = start(Analysis::default());
    let (status, envelope) = post(addr, "\"to be or not to be\"");
    assert_eq!(status, 400);
    assert_eq!(envelope.message, "text does not contain upto 10 unique words");
}

#[test]
fn oversized_body_is_rejected() {
    let addr = start(Analysis::default());
    let (status, envelope) = send(addr, "POST / HTTP/1.1\r\nContent-Length: 100000\r\n\r\n");
    assert_eq!(status, 413);
    assert_eq!(envelope.status, Status::Error);
}

#[test]
fn invalid_utf8_header_gets_an_answer() {
    let addr = start(Analysis::default());
    let (status, envelope) = send_bytes(
        addr,
        b"POST / HTTP/1.1\r\nX: \xff\xfe\r\nContent-Length: 2\r\n\r\n\"\"",
    );
    assert_eq!(status, 400);
    assert_eq!(envelope.status, Status::Error);
}

#[test]
fn long_header_line_is_rejected() {
    let addr = start(Analysis::default());
    let raw = format!(
        "POST / HTTP/1.1\r\nX-Padding: {}\r\nContent-Length: 2\r\n\r\n\"\"",
        "x".repeat(MAX_LINE_BYTES + 1)
    );
    let (status, envelope) = send(addr, &raw);
    assert_eq!(status, 431);
    assert_eq!(envelope.status, Status::Error);
}

#[test]
fn compat_server_counts_superseded_entries() {
    let addr = start(Analysis::compat());
    // 3 distinct words, 10 tokens
    let (status, envelope) = post(addr, "\"a a a a b b b c c c\"");
    assert_eq!(status, 200);

    let words = envelope.word_counts.unwrap();
    assert_eq!(words.len(), 10);
    assert_eq!(words[0].word, "a");
    assert_eq!(words[0].count, 4);
    assert_eq!(words.iter().filter(|wc| wc.word == "a").count(), 4);
}

#[test]
fn concurrent_requests_do_not_share_counts() {
    let addr = start(Analysis::default());
    let handles: Vec<_> = (0..8)
        .map(|n| {
            thread::spawn(move || {
                let text = format!("w{n} w{n} a b c d e f g h i");
                post(addr, &serde_json::to_string(&text).unwrap())
            })
        })
        .collect();

    for (n, handle) in handles.into_iter().enumerate() {
        let (status, envelope) = handle.join().unwrap();
        assert_eq!(status, 200);
        let words = envelope.word_counts.unwrap();
        assert_eq!(words[0].word, format!("w{n}"));
        assert_eq!(words[0].count, 2);
    }
}
