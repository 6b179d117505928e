use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;

use serde_json::{Value, json};

use forms_api::{FormsService, GoogleFormsClient, ServiceError, StaticToken};
use forms_spec::Request;

struct Captured {
    request_line: String,
    headers: Vec<String>,
    body: Value,
}

/// Serve one HTTP exchange on an ephemeral port and hand back what was sent.
fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base = format!("http://{}/v1", listener.local_addr().expect("addr"));
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(&stream);

        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("request line");

        let mut headers = Vec::new();
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("header");
            let line = line.trim_end().to_string();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':')
                && name.eq_ignore_ascii_case("content-length")
            {
                content_length = value.trim().parse().expect("length");
            }
            headers.push(line.to_ascii_lowercase());
        }

        let mut raw = vec![0; content_length];
        reader.read_exact(&mut raw).expect("body");
        let received = if raw.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&raw).expect("json body")
        };

        let mut stream = &stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .expect("respond");

        Captured {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: received,
        }
    });
    (base, handle)
}

#[test]
fn create_form_posts_title_with_bearer_token() {
    let (base, server) = serve_once("200 OK", r#"{"formId":"abc","responderUri":"https://r"}"#);
    let client = GoogleFormsClient::with_base_url(StaticToken::new("tok"), base).expect("client");

    let form = client.create_form("My quiz").expect("create");
    assert_eq!(form.form_id.as_deref(), Some("abc"));

    let captured = server.join().expect("server");
    assert_eq!(captured.request_line, "POST /v1/forms HTTP/1.1");
    assert!(captured.headers.iter().any(|h| h == "authorization: bearer tok"));
    assert_eq!(captured.body, json!({ "info": { "title": "My quiz" } }));
}

#[test]
fn batch_update_wraps_requests() {
    let (base, server) = serve_once("200 OK", r#"{"replies":[{}]}"#);
    let client = GoogleFormsClient::with_base_url(StaticToken::new("tok"), base).expect("client");

    client
        .batch_update("abc", &[Request::enable_quiz()])
        .expect("batch");

    let captured = server.join().expect("server");
    assert_eq!(captured.request_line, "POST /v1/forms/abc:batchUpdate HTTP/1.1");
    assert_eq!(
        captured.body["requests"][0]["updateSettings"]["settings"]["quizSettings"]["isQuiz"],
        true
    );
}

#[test]
fn error_status_is_reported_with_body() {
    let (base, server) = serve_once("403 Forbidden", r#"{"error":{"message":"denied"}}"#);
    let client = GoogleFormsClient::with_base_url(StaticToken::new("tok"), base).expect("client");

    let err = client.get_form("abc").expect_err("forbidden");
    match err {
        ServiceError::Status {
            operation,
            status,
            body,
        } => {
            assert_eq!(operation, "forms.get");
            assert_eq!(status, 403);
            assert!(body.contains("denied"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    let captured = server.join().expect("server");
    assert_eq!(captured.request_line, "GET /v1/forms/abc HTTP/1.1");
}

#[test]
fn form_id_is_encoded_as_a_single_path_segment() {
    let (base, server) = serve_once("200 OK", r#"{"formId":"a/b c"}"#);
    let client = GoogleFormsClient::with_base_url(StaticToken::new("tok"), format!("{base}/"))
        .expect("client");

    client.get_form("a/b c").expect("get");

    let captured = server.join().expect("server");
    assert_eq!(captured.request_line, "GET /v1/forms/a%2Fb%20c HTTP/1.1");
}

#[test]
fn unusable_base_url_is_rejected() {
    for base in ["not a url", "mailto:forms@example.com"] {
        let err = GoogleFormsClient::with_base_url(StaticToken::new("tok"), base)
            .err()
            .expect("invalid base");
        assert!(matches!(err, ServiceError::InvalidBaseUrl(ref url) if url == base));
    }
}
