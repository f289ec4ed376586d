use repo_digest::config::ApiConfig;
use repo_digest::contract::{ApiError, RepoHost};
use repo_digest::github::GitHubClient;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned reply served for one incoming request.
struct Reply {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

impl Reply {
    fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![],
            body: body.to_string(),
        }
    }

    fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Local HTTP server answering requests in order, one connection each.
/// Each request head is recorded in `seen`, lowercased.
async fn serve(listener: TcpListener, replies: Vec<Reply>, seen: Arc<Mutex<Vec<String>>>) {
    for reply in replies {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => head.extend_from_slice(&buf[..n]),
            }
        }
        seen.lock().unwrap().push(String::from_utf8_lossy(&head).to_lowercase());

        let mut response = format!(
            "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
            reply.status,
            reply.body.len()
        );
        for (name, value) in &reply.headers {
            response.push_str(&format!("{name}: {value}\r\n"));
        }
        response.push_str("\r\n");
        response.push_str(&reply.body);

        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    }
}

async fn start_stub(
    replies: impl FnOnce(&str) -> Vec<Reply>,
) -> (GitHubClient, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));
    tokio::spawn(serve(listener, replies(&base_url), seen.clone()));

    let config = ApiConfig {
        base_url,
        timeout_secs: 5,
        ..ApiConfig::default()
    };
    let client = GitHubClient::new("tok-123".to_string(), &config).unwrap();
    (client, seen)
}

#[tokio::test]
async fn listing_follows_next_links_in_order() {
    let (client, seen) = start_stub(|base| {
        vec![
            Reply::json(200, r#"[{"name":"a"}]"#).with_header(
                "Link",
                &format!(
                    "<{base}/user/repos?per_page=100&page=2>; rel=\"next\", \
                     <{base}/user/repos?per_page=100&page=2>; rel=\"last\""
                ),
            ),
            Reply::json(200, r#"[{"name":"b","fork":true}]"#),
        ]
    })
    .await;

    let repos = client.list_repos().await.expect("listing should succeed");
    let names: Vec<_> = repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(repos[1].fork);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].starts_with("get /user/repos?per_page=100&sort=updated&affiliation=owner "));
    assert!(seen[1].starts_with("get /user/repos?per_page=100&page=2 "));
    for head in seen.iter() {
        assert!(head.contains("authorization: bearer tok-123"), "head: {head}");
        assert!(head.contains("user-agent: repo-digest"), "head: {head}");
        assert!(head.contains("accept: application/vnd.github.v3+json"), "head: {head}");
    }
}

#[tokio::test]
async fn not_found_means_absent() {
    let (client, seen) = start_stub(|_| {
        vec![
            Reply::json(404, r#"{"message":"Not Found"}"#),
            Reply::json(404, r#"{"message":"Not Found"}"#),
            Reply::json(404, r#"{"message":"Not Found"}"#),
        ]
    })
    .await;

    assert_eq!(client.pages_url("octo", "site").await.unwrap(), None);
    assert!(client.languages("octo", "site").await.unwrap().is_empty());
    assert_eq!(client.readme("octo", "site").await.unwrap(), None);

    let seen = seen.lock().unwrap();
    assert!(seen[0].starts_with("get /repos/octo/site/pages "));
    assert!(seen[1].starts_with("get /repos/octo/site/languages "));
    assert!(seen[2].starts_with("get /repos/octo/site/readme "));
}

#[tokio::test]
async fn server_error_is_fatal() {
    let (client, _) = start_stub(|_| vec![Reply::json(500, "boom")]).await;

    let err = client.languages("octo", "broken").await.unwrap_err();
    match &err {
        ApiError::Status { status, url, body } => {
            assert_eq!(*status, 500);
            assert!(url.ends_with("/repos/octo/broken/languages"));
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert!(err.to_string().starts_with("API error (500) for "));
}

#[tokio::test]
async fn enabled_pages_and_readme_are_decoded() {
    let (client, _) = start_stub(|_| {
        vec![
            Reply::json(200, r#"{"html_url":"https://octo.github.io/site/"}"#),
            Reply::json(200, r#"{"content":"SGVsbG8s\nIFdvcmxkIQ==\n","encoding":"base64"}"#),
            Reply::json(200, r#"{"Rust":1200,"Shell":30}"#),
        ]
    })
    .await;

    assert_eq!(
        client.pages_url("octo", "site").await.unwrap().as_deref(),
        Some("https://octo.github.io/site/")
    );
    assert_eq!(
        client.readme("octo", "site").await.unwrap().as_deref(),
        Some("Hello, World!")
    );
    let bytes = client.languages("octo", "site").await.unwrap();
    assert_eq!(bytes.get("Rust"), Some(&1200));
    assert_eq!(bytes.get("Shell"), Some(&30));
}
