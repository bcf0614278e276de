//! End-to-end tests of the Gemini client against a local one-shot HTTP
//! server. No external network access.

use dice_commentary::{
    interpret_or_fallback, CommentaryConfig, CommentaryError, Commentator, GeminiCommentator,
    FALLBACK_SILENT, FALLBACK_UNAVAILABLE,
};
use dice_core::face::FaceValue;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve exactly one request with `status` and `body`, returning the raw
/// request text.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if request_complete(&buf) {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&buf).into_owned()
    });

    (format!("http://{addr}/v1beta"), handle)
}

fn request_complete(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    buf.len() >= header_end + 4 + content_length
}

fn oracle(endpoint: String) -> GeminiCommentator {
    let config = CommentaryConfig {
        endpoint,
        ..Default::default()
    }
    .with_api_key(Some("test-key".to_owned()));
    GeminiCommentator::new(config).unwrap()
}

#[tokio::test]
async fn successful_response_returns_text() {
    let (endpoint, server) = serve_once(
        "200 OK",
        r#"{"candidates":[{"content":{"parts":[{"text":"六六大顺，今天手气爆棚！"}]}}]}"#,
    )
    .await;

    let text = oracle(endpoint).interpret(FaceValue::SIX).await.unwrap();
    assert_eq!(text, "六六大顺，今天手气爆棚！");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent"));
    assert!(request.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
    assert!(request.contains("rolled a 6"));
}

#[tokio::test]
async fn server_error_maps_to_status() {
    let (endpoint, server) = serve_once("503 Service Unavailable", r#"{"error":"overloaded"}"#).await;

    let result = oracle(endpoint).interpret(FaceValue::ONE).await;
    match result {
        Err(CommentaryError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert!(body.contains("overloaded"));
        }
        other => panic!("expected Status error, got {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn garbage_body_is_malformed_and_falls_back() {
    let (endpoint, server) = serve_once("200 OK", "not json at all").await;

    let oracle = oracle(endpoint);
    let line = interpret_or_fallback(&oracle, FaceValue::THREE).await;
    assert_eq!(line, FALLBACK_UNAVAILABLE);
    server.await.unwrap();
}

#[tokio::test]
async fn empty_candidates_fall_back_to_silence() {
    let (endpoint, server) = serve_once("200 OK", r#"{"candidates":[]}"#).await;

    let oracle = oracle(endpoint);
    let line = interpret_or_fallback(&oracle, FaceValue::FIVE).await;
    assert_eq!(line, FALLBACK_SILENT);
    server.await.unwrap();
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = oracle(format!("http://{addr}/v1beta"))
        .interpret(FaceValue::TWO)
        .await;
    assert!(matches!(result, Err(CommentaryError::Transport(_))), "{result:?}");
}
