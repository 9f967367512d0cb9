//! Tests for the HTTP parser.

#[cfg(test)]
mod tests {
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::{AsyncRead, BufReader, ReadBuf};

    use crate::parser::{Error, Headers, HttpRequest, Method, parse_request};

    async fn parse(input: &[u8]) -> Result<Option<HttpRequest>, Error> {
        let mut reader = input;
        parse_request(&mut reader).await
    }

    async fn parse_ok(input: &[u8]) -> HttpRequest {
        parse(input).await.unwrap().expect("expected a request")
    }

    // A reader that fails on every read
    struct BrokenStream;

    impl AsyncRead for BrokenStream {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")))
        }
    }

    #[tokio::test]
    async fn test_parse_simple_get_request() {
        let request = parse_ok(b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n").await;
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/index.html");
        assert_eq!(request.version, "HTTP/1.1");
        assert_eq!(request.get_header("Host"), Some("example.com"));
        assert!(request.body.is_empty());
    }

    #[tokio::test]
    async fn test_request_line_reconstructed_verbatim() {
        let triples = [
            ("GET", "/", "HTTP/1.1"),
            ("POST", "/files/a/b.txt", "HTTP/1.0"),
            ("BREW", "/echo/%20coffee?x=1", "HTTP/1.1"),
            ("delete", "/user-agent", "HTCPCP/1.0"),
        ];

        for (method, path, version) in triples {
            let wire = format!("{method} {path} {version}\r\n\r\n");
            let request = parse_ok(wire.as_bytes()).await;
            assert_eq!(request.method.as_str(), method);
            assert_eq!(request.path, path);
            assert_eq!(request.version, version);
        }
    }

    #[tokio::test]
    async fn test_unknown_method_is_kept() {
        let request = parse_ok(b"BREW /pot HTTP/1.1\r\n\r\n").await;
        assert_eq!(request.method, Method::Extension("BREW".to_string()));
        assert_eq!(request.method.to_string(), "BREW");
    }

    #[tokio::test]
    async fn test_case_insensitive_headers() {
        let request = parse_ok(b"GET / HTTP/1.1\r\nUser-Agent: curl/8.0\r\n\r\n").await;
        for name in ["User-Agent", "user-agent", "USER-AGENT", "uSeR-aGeNt"] {
            assert_eq!(request.get_header(name), Some("curl/8.0"));
            assert!(request.has_header(name));
        }
        assert!(!request.has_header("Accept"));
    }

    #[tokio::test]
    async fn test_duplicate_headers_last_write_wins() {
        let request = parse_ok(b"GET / HTTP/1.1\r\nX-Token: first\r\nx-token: second\r\n\r\n").await;
        assert_eq!(request.get_header("X-Token"), Some("second"));
        assert_eq!(request.headers.len(), 1);
    }

    #[tokio::test]
    async fn test_header_split_on_first_colon_and_trimmed() {
        let request = parse_ok(b"GET / HTTP/1.1\r\n  Host  :   localhost:4221  \r\n\r\n").await;
        assert_eq!(request.get_header("Host"), Some("localhost:4221"));
    }

    #[tokio::test]
    async fn test_header_without_colon_is_skipped() {
        let request = parse_ok(b"GET / HTTP/1.1\r\nInvalidHeader\r\nAccept: */*\r\n\r\n").await;
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.get_header("Accept"), Some("*/*"));
    }

    #[tokio::test]
    async fn test_body_with_content_length() {
        let request = parse_ok(b"POST /files/test.txt HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello").await;
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body, b"hello");
    }

    #[tokio::test]
    async fn test_content_length_header_name_is_case_insensitive() {
        let request = parse_ok(b"POST /x HTTP/1.1\r\ncontent-length: 3\r\n\r\nabc").await;
        assert_eq!(request.body, b"abc");
    }

    #[tokio::test]
    async fn test_zero_content_length_has_empty_body() {
        let request = parse_ok(b"POST /x HTTP/1.1\r\nContent-Length: 0\r\n\r\n").await;
        assert!(request.body.is_empty());
    }

    #[tokio::test]
    async fn test_sequential_requests_on_one_stream() {
        let mut wire: &[u8] = b"POST /a HTTP/1.1\r\nContent-Length: 2\r\n\r\nhiGET /b HTTP/1.1\r\n\r\n";

        let first = parse_request(&mut wire).await.unwrap().unwrap();
        assert_eq!(first.path, "/a");
        assert_eq!(first.body, b"hi");

        let second = parse_request(&mut wire).await.unwrap().unwrap();
        assert_eq!(second.path, "/b");
        assert!(second.body.is_empty());

        assert!(parse_request(&mut wire).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_content_length() {
        for value in ["abc", "-1", "1.5", ""] {
            let wire = format!("POST /x HTTP/1.1\r\nContent-Length: {value}\r\n\r\n");
            let result = parse(wire.as_bytes()).await;
            assert!(
                matches!(result, Err(Error::InvalidContentLength(ref v)) if v == value),
                "Content-Length {value:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_incomplete_body() {
        let result = parse(b"POST /x HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello").await;
        assert!(matches!(result, Err(Error::IncompleteBody { expected: 10, received: 5 })));
    }

    #[tokio::test]
    async fn test_stream_ends_inside_headers() {
        let result = parse(b"GET / HTTP/1.1\r\nHost: example.com\r\n").await;
        assert!(matches!(result, Err(Error::IncompleteHeaders)));
    }

    #[tokio::test]
    async fn test_empty_stream_ends_session() {
        assert!(parse(b"").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unterminated_request_line_ends_session() {
        assert!(parse(b"GET / HTTP/1.1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_io_error_on_request_line_ends_session() {
        let mut reader = BufReader::new(BrokenStream);
        assert!(parse_request(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_request_lines() {
        let lines: [&[u8]; 6] = [
            b"GET\r\n\r\n",
            b"GET /\r\n\r\n",
            b"GET / HTTP/1.1 extra\r\n\r\n",
            b"GET  / HTTP/1.1\r\n\r\n",
            b"GET / \r\n\r\n",
            b"\r\n",
        ];

        for line in lines {
            let result = parse(line).await;
            assert!(
                matches!(result, Err(Error::MalformedRequestLine(_))),
                "{:?} should be malformed",
                String::from_utf8_lossy(line)
            );
        }
    }

    #[tokio::test]
    async fn test_request_line_surrounding_whitespace_is_trimmed() {
        let lines: [&[u8]; 4] = [
            b"GET /echo/x HTTP/1.1 \r\n\r\n",
            b"GET /echo/x HTTP/1.1\t\r\n\r\n",
            b" GET /echo/x HTTP/1.1\r\n\r\n",
            b"\t GET /echo/x HTTP/1.1  \r\n\r\n",
        ];

        for line in lines {
            let request = parse_ok(line).await;
            assert_eq!(request.method, Method::GET);
            assert_eq!(request.path, "/echo/x");
            assert_eq!(request.version, "HTTP/1.1");
        }
    }

    #[tokio::test]
    async fn test_invalid_utf8_request_line() {
        let result = parse(b"GET /\xff\xfe HTTP/1.1\r\n\r\n").await;
        assert!(matches!(result, Err(Error::MalformedRequestLine(ref m)) if m == "Invalid UTF-8"));
    }

    #[tokio::test]
    async fn test_bare_lf_line_endings() {
        let request = parse_ok(b"GET /echo/x HTTP/1.1\nHost: a\n\n").await;
        assert_eq!(request.path, "/echo/x");
        assert_eq!(request.get_header("Host"), Some("a"));
    }

    #[tokio::test]
    async fn test_accepted_encodings() {
        let request = parse_ok(b"GET / HTTP/1.1\r\nAccept-Encoding: gzip;q=0.8, deflate , br\r\n\r\n").await;
        assert_eq!(request.accepted_encodings(), vec!["gzip", "deflate", "br"]);

        let request = parse_ok(b"GET / HTTP/1.1\r\n\r\n").await;
        assert!(request.accepted_encodings().is_empty());
    }

    #[tokio::test]
    async fn test_keep_alive() {
        let request = parse_ok(b"GET / HTTP/1.1\r\n\r\n").await;
        assert!(request.keep_alive());

        let request = parse_ok(b"GET / HTTP/1.1\r\nConnection: keep-alive\r\n\r\n").await;
        assert!(request.keep_alive());

        let request = parse_ok(b"GET / HTTP/1.1\r\nconnection: Close\r\n\r\n").await;
        assert!(!request.keep_alive());
    }

    #[test]
    fn test_headers_replace_in_place() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/plain");
        headers.insert("Content-Length", "3");
        headers.insert("content-type", "application/octet-stream");

        let entries: Vec<(&str, &str)> = headers.iter().collect();
        assert_eq!(entries, vec![("Content-Type", "application/octet-stream"), ("Content-Length", "3")]);

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/octet-stream"));
    }

    #[test]
    fn test_headers_from_iterator() {
        let headers: Headers = [("Host", "a"), ("HOST", "b")].into_iter().collect();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("host"), Some("b"));
        assert!(!headers.is_empty());
    }

    #[test]
    fn test_request_constructors() {
        let headers: Headers = [("Content-Length", "2")].into_iter().collect();
        let request = HttpRequest::with_body(Method::POST, "/files/x", "HTTP/1.1", headers, b"ok".to_vec());
        assert_eq!(request.body, b"ok");
        assert_eq!(request.get_header("content-length"), Some("2"));
    }
}
