/// End-to-end tests across the workspace crates: config → block source →
/// renderer / extractor, over fixtures and over a mock Notion API.
use notion_md_client::{page_id_from_url, FixtureSource, NotionClient};
use notion_md_render::{extract_text, MarkdownRenderer, RenderOptions};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

const POST_FIXTURE: &str = r#"
blocks:
  post:
    - id: h
      type: heading_1
      heading_1: { rich_text: [ { plain_text: "Release notes" } ] }
    - id: intro
      type: paragraph
      paragraph:
        rich_text:
          - plain_text: "Now with "
          - plain_text: "pagination"
            annotations: { bold: true }
    - id: b1
      type: bulleted_list_item
      has_children: true
      bulleted_list_item: { rich_text: [ { plain_text: "one" } ] }
    - id: b2
      type: bulleted_list_item
      bulleted_list_item: { rich_text: [ { plain_text: "two" } ] }
    - id: c
      type: code
      code: { language: rust, rich_text: [ { plain_text: "fn main() {}" } ] }
    - id: d
      type: divider
      divider: {}
    - id: img
      type: image
      image: { type: external, external: { url: "https://img.example/x.png" } }
    - id: t
      type: toggle
      has_children: true
      toggle: { rich_text: [ { plain_text: "More" } ] }
  b1:
    - id: b1-detail
      type: paragraph
      paragraph: { rich_text: [ { plain_text: "detail" } ] }
  t:
    - id: hidden
      type: paragraph
      paragraph: { rich_text: [ { plain_text: "hidden" } ] }
"#;

#[tokio::test]
async fn fixture_post_renders_with_default_options() {
    let source = FixtureSource::load(POST_FIXTURE).unwrap();
    let md = MarkdownRenderer::new(&source).render("post").await.unwrap();
    assert_eq!(
        md,
        "# Release notes\n\n\
         Now with pagination\n\n\
         - one\n\n\
         detail\n\
         - two\n\n\
         ```rust\nfn main() {}\n```\n\n\
         ---\n\n\
         ![Image](https://img.example/x.png)\n\n\
         hidden"
    );
}

#[tokio::test]
async fn config_file_drives_render_options() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notion-md.toml");
    std::fs::write(
        &path,
        "[render]\nrich_text = \"markdown\"\nnumbering = \"sequential\"\n",
    )
    .unwrap();
    let config = notion_md_config::load(Some(path.as_path())).unwrap();

    let source = FixtureSource::load(
        r#"
blocks:
  root:
    - id: p
      type: paragraph
      paragraph:
        rich_text:
          - plain_text: "see "
          - plain_text: "docs"
            href: "https://example.com"
            annotations: { italic: true }
    - id: n1
      type: numbered_list_item
      numbered_list_item: { rich_text: [ { plain_text: "first" } ] }
    - id: n2
      type: numbered_list_item
      numbered_list_item: { rich_text: [ { plain_text: "second" } ] }
"#,
    )
    .unwrap();

    let md = MarkdownRenderer::new(&source)
        .with_options(RenderOptions::from(&config.render))
        .render("root")
        .await
        .unwrap();
    assert_eq!(md, "see [*docs*](https://example.com)\n\n1. first\n2. second");
}

#[tokio::test]
async fn fixture_review_text_follows_document_order() {
    let source = FixtureSource::load(POST_FIXTURE).unwrap();
    let texts = extract_text(&source, "post").await.unwrap();
    let pairs: Vec<(&str, &str)> = texts.iter().map(|t| (t.id.as_str(), t.text.as_str())).collect();
    assert_eq!(
        pairs,
        [
            ("h", "Release notes"),
            ("intro", "Now with pagination"),
            ("b1", "one"),
            ("b1-detail", "detail"),
            ("b2", "two"),
            ("hidden", "hidden"),
        ]
    );
}

#[tokio::test]
async fn missing_fixture_key_fails_the_render() {
    let source = FixtureSource::load(POST_FIXTURE).unwrap();
    assert!(MarkdownRenderer::new(&source).render("nope").await.is_err());
}

// ── Mock Notion API ───────────────────────────────────────────────────────────

/// Answer one connection per scripted JSON body with `200 OK`, reporting each
/// request path.  GET requests only, so bodies are never read.
async fn mock_api(bodies: Vec<Value>) -> (u16, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for body in bodies {
            let (stream, _) = listener.accept().await.expect("accept");
            let (read_half, mut write_half) = stream.into_split();
            let mut reader = BufReader::new(read_half);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).await.unwrap();
            let path = request_line.split(' ').nth(1).unwrap_or("").to_string();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).await.unwrap();
                if line.trim().is_empty() {
                    break;
                }
            }
            let _ = tx.send(path);

            let body = body.to_string();
            let resp = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body,
            );
            let _ = write_half.write_all(resp.as_bytes()).await;
        }
    });

    (port, rx)
}

fn paragraph(id: &str, text: &str) -> Value {
    json!({
        "object": "block",
        "id": id,
        "type": "paragraph",
        "has_children": false,
        "paragraph": { "rich_text": [ { "type": "text", "plain_text": text } ] }
    })
}

#[tokio::test]
async fn api_render_is_not_truncated_at_one_hundred_children() {
    let first: Vec<Value> = (0..100).map(|i| paragraph(&format!("p{i}"), &format!("para {i}"))).collect();
    let second: Vec<Value> = (100..150).map(|i| paragraph(&format!("p{i}"), &format!("para {i}"))).collect();
    let (port, mut paths) = mock_api(vec![
        json!({ "object": "list", "results": first, "has_more": true, "next_cursor": "c2" }),
        json!({ "object": "list", "results": second, "has_more": false, "next_cursor": null }),
    ])
    .await;

    let client = NotionClient::new(Some("secret_test".into()), Some(format!("http://127.0.0.1:{port}")));
    let id = page_id_from_url("https://www.notion.so/Long-Post-23b0cda410a68001b52ad66e1ead92e8?v=1");
    let md = MarkdownRenderer::new(&client).render(&id).await.unwrap();

    let expected: Vec<String> = (0..150).map(|i| format!("para {i}")).collect();
    assert_eq!(md, expected.join("\n\n"));

    assert_eq!(
        paths.recv().await.unwrap(),
        "/v1/blocks/23b0cda410a68001b52ad66e1ead92e8/children?page_size=100"
    );
    assert_eq!(
        paths.recv().await.unwrap(),
        "/v1/blocks/23b0cda410a68001b52ad66e1ead92e8/children?page_size=100&start_cursor=c2"
    );
}

#[tokio::test]
async fn api_render_descends_into_children() {
    let (port, mut paths) = mock_api(vec![
        json!({
            "results": [
                {
                    "id": "item",
                    "type": "numbered_list_item",
                    "has_children": true,
                    "numbered_list_item": { "rich_text": [ { "plain_text": "step" } ] }
                },
                paragraph("after", "done")
            ],
            "has_more": false
        }),
        json!({ "results": [ paragraph("sub", "sub-step") ], "has_more": false }),
    ])
    .await;

    let client = NotionClient::new(Some("secret_test".into()), Some(format!("http://127.0.0.1:{port}")));
    let md = MarkdownRenderer::new(&client).render("root").await.unwrap();
    assert_eq!(md, "1. step\n\nsub-step\n\ndone");

    assert_eq!(paths.recv().await.unwrap(), "/v1/blocks/root/children?page_size=100");
    assert_eq!(paths.recv().await.unwrap(), "/v1/blocks/item/children?page_size=100");
}
