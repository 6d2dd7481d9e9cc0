//! HTTP Transport Tests
//!
//! A fake HTTP/1.1 server answers one request with a canned status and body.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use imagewire::{
    AsyncImageTransport, CancellationToken, HttpConfig, HttpImageTransport, ImageTransport,
    ImageWireError,
};

/// Request as seen by the fake server
#[derive(Debug)]
struct Captured {
    request_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn http_server(status: &'static str, body: Vec<u8>) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((k, v)) = line.split_once(':') {
                headers.push((k.trim().to_string(), v.trim().to_string()));
            }
        }

        let mut captured = Captured {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: Vec::new(),
        };

        if let Some(len) = captured.header("content-length") {
            let mut req_body = vec![0u8; len.parse().unwrap()];
            reader.read_exact(&mut req_body).unwrap();
            captured.body = req_body;
        } else if captured
            .header("transfer-encoding")
            .is_some_and(|v| v.eq_ignore_ascii_case("chunked"))
        {
            loop {
                let mut size = String::new();
                reader.read_line(&mut size).unwrap();
                let size = usize::from_str_radix(size.trim(), 16).unwrap();
                let mut chunk = vec![0u8; size + 2];
                reader.read_exact(&mut chunk).unwrap();
                if size == 0 {
                    break;
                }
                captured.body.extend_from_slice(&chunk[..size]);
            }
        }

        let mut writer = stream;
        let head = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            body.len()
        );
        writer.write_all(head.as_bytes()).unwrap();
        writer.write_all(&body).unwrap();
        writer.flush().unwrap();

        captured
    });

    (url, handle)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

const PNG_LIKE: [u8; 10] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x01];

// =============================================================================
// Push Tests
// =============================================================================

#[test]
fn test_push_posts_multipart() {
    let (url, server) = http_server("200 OK", b"i42".to_vec());
    let transport =
        HttpImageTransport::new(HttpConfig::new(url).with_response_manager("shots")).unwrap();

    assert_eq!(transport.push(&PNG_LIKE).unwrap(), "i42");

    let captured = server.join().unwrap();
    assert_eq!(captured.request_line, "POST /push/shots HTTP/1.1");
    let content_type = captured.header("content-type").unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
    assert!(content_type.contains("acebdf13572468"));
    assert!(contains(&captured.body, &PNG_LIKE));
    assert!(contains(&captured.body, b"filename=screenshot.png"));
}

#[test]
fn test_push_bad_request_is_bad_image_format() {
    let (url, _server) = http_server("400 Bad Request", b"nope".to_vec());
    let transport = HttpImageTransport::new(HttpConfig::new(url)).unwrap();

    assert!(matches!(
        transport.push(b"not an image"),
        Err(ImageWireError::BadImageFormat(_))
    ));
}

#[test]
fn test_push_server_error_is_push_error() {
    let (url, _server) = http_server("500 Internal Server Error", b"boom".to_vec());
    let transport = HttpImageTransport::new(HttpConfig::new(url)).unwrap();

    match transport.push(&PNG_LIKE) {
        Err(ImageWireError::Push(msg)) => assert_eq!(msg, "boom"),
        other => panic!("Expected Push, got {:?}", other),
    }
}

// =============================================================================
// Pull Tests
// =============================================================================

#[test]
fn test_pull_adds_prefix_and_sniffs_jpeg() {
    let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    let (url, server) = http_server("200 OK", jpeg.clone());
    let transport = HttpImageTransport::new(HttpConfig::new(url)).unwrap();

    let image = transport.pull("42", true).unwrap();
    assert!(image.is_jpg);
    assert_eq!(image.data.as_ref(), jpeg.as_slice());

    let captured = server.join().unwrap();
    assert_eq!(captured.request_line, "GET /i42 HTTP/1.1");
}

#[test]
fn test_pull_prefixed_name_not_doubled() {
    let (url, server) = http_server("200 OK", PNG_LIKE.to_vec());
    let transport =
        HttpImageTransport::new(HttpConfig::new(url).with_response_manager("shots")).unwrap();

    let image = transport.pull("i42", false).unwrap();
    assert!(!image.is_jpg);

    let captured = server.join().unwrap();
    assert_eq!(captured.request_line, "GET /i42shots HTTP/1.1");
}

#[test]
fn test_pull_not_found() {
    let (url, _server) = http_server("404 Not Found", b"no such image".to_vec());
    let transport = HttpImageTransport::new(HttpConfig::new(url)).unwrap();

    match transport.pull("i999", false) {
        Err(ImageWireError::ImageNotFound { name, message }) => {
            assert_eq!(name, "i999");
            assert_eq!(message, "no such image");
        }
        other => panic!("Expected ImageNotFound, got {:?}", other),
    }
}

#[test]
fn test_unreachable_server_is_http_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let transport = HttpImageTransport::new(HttpConfig::new(format!("http://127.0.0.1:{}", port))).unwrap();

    assert!(matches!(transport.pull("1", false), Err(ImageWireError::Http(_))));
}

// =============================================================================
// Async Tests
// =============================================================================

#[tokio::test]
async fn test_push_async() {
    let (url, _server) = http_server("200 OK", b"i7".to_vec());
    let transport = HttpImageTransport::new(HttpConfig::new(url)).unwrap();
    let cancel = CancellationToken::new();

    assert_eq!(transport.push_async(&PNG_LIKE, &cancel).await.unwrap(), "i7");
}

#[tokio::test]
async fn test_pull_async_cancelled_before_start() {
    let (url, _server) = http_server("200 OK", PNG_LIKE.to_vec());
    let transport = HttpImageTransport::new(HttpConfig::new(url)).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert!(matches!(
        transport.pull_async("1", false, &cancel).await,
        Err(ImageWireError::Cancelled)
    ));
}
