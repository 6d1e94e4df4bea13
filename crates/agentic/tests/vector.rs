use anyhow::Result;
use mockito::{Matcher, Server};
use serde_json::json;

use agentic::vector::{PointId, QdrantClient, QdrantConfig};

fn client_for(server: &Server, api_key: Option<&str>) -> Result<QdrantClient> {
    QdrantClient::new(QdrantConfig {
        url: server.url(),
        api_key: api_key.map(str::to_string),
        ..QdrantConfig::default()
    })
}

fn ok(result: serde_json::Value) -> String {
    json!({"result": result, "status": "ok", "time": 0.001}).to_string()
}

#[test]
fn test_collection_exists_sends_api_key() -> Result<()> {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/collections/images/exists")
        .match_header("api-key", "secret")
        .with_status(200)
        .with_body(ok(json!({"exists": true})))
        .create();

    let client = client_for(&server, Some("secret"))?;
    assert!(client.collection_exists("images")?);
    mock.assert();
    Ok(())
}

#[test]
fn test_create_collection_when_missing() -> Result<()> {
    let mut server = Server::new();
    server
        .mock("GET", "/collections/faces/exists")
        .with_status(200)
        .with_body(ok(json!({"exists": false})))
        .create();
    let create = server
        .mock("PUT", "/collections/faces")
        .match_body(Matcher::Json(json!({
            "vectors": {"size": 4, "distance": "Cosine"}
        })))
        .with_status(200)
        .with_body(ok(json!(true)))
        .expect(1)
        .create();

    let client = client_for(&server, None)?;
    assert!(client.create_collection("faces", 4)?);
    create.assert();
    Ok(())
}

#[test]
fn test_create_collection_is_noop_when_present() -> Result<()> {
    let mut server = Server::new();
    server
        .mock("GET", "/collections/faces/exists")
        .with_status(200)
        .with_body(ok(json!({"exists": true})))
        .create();
    let create = server
        .mock("PUT", "/collections/faces")
        .expect(0)
        .create();

    let client = client_for(&server, None)?;
    assert!(!client.create_collection("faces", 4)?);
    create.assert();
    Ok(())
}

#[test]
fn test_create_default_collection_uses_config() -> Result<()> {
    let mut server = Server::new();
    server
        .mock("GET", "/collections/celebrities/exists")
        .with_status(200)
        .with_body(ok(json!({"exists": false})))
        .create();
    let create = server
        .mock("PUT", "/collections/celebrities")
        .match_body(Matcher::Json(json!({
            "vectors": {"size": 768, "distance": "Cosine"}
        })))
        .with_status(200)
        .with_body(ok(json!(true)))
        .create();

    let client = QdrantClient::new(QdrantConfig {
        url: server.url(),
        api_key: None,
        collection_name: "celebrities".to_string(),
        vector_dimensions: 768,
    })?;
    assert!(client.create_default_collection()?);
    create.assert();
    Ok(())
}

#[test]
fn test_insert_embedding() -> Result<()> {
    let mut server = Server::new();
    let mock = server
        .mock("PUT", Matcher::Regex(r"^/collections/images/points".to_string()))
        .match_query(Matcher::UrlEncoded("wait".to_string(), "true".to_string()))
        .match_body(Matcher::Json(json!({
            "points": [{
                "id": 7,
                "vector": [0.5, 0.25],
                "payload": {"label": "cat"}
            }]
        })))
        .with_status(200)
        .with_body(ok(json!({"operation_id": 1, "status": "completed"})))
        .create();

    let client = client_for(&server, None)?;
    client.insert_embedding("images", &[0.5, 0.25], 7u64, "cat")?;
    mock.assert();
    Ok(())
}

#[test]
fn test_insert_failure_is_returned() -> Result<()> {
    let mut server = Server::new();
    server
        .mock("PUT", Matcher::Regex(r"^/collections/images/points".to_string()))
        .with_status(400)
        .with_body(r#"{"status": {"error": "Wrong input: vector dimension error"}}"#)
        .create();

    let client = client_for(&server, None)?;
    let err = client
        .insert_embedding("images", &[0.5], "5f1b4c8e-0000-4000-8000-000000000000", "dog")
        .unwrap_err();
    assert!(err.to_string().contains("vector dimension error"));
    Ok(())
}

#[test]
fn test_top_k_similar() -> Result<()> {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/collections/images/points/query")
        .match_body(Matcher::PartialJson(json!({
            "limit": 2,
            "with_payload": true
        })))
        .with_status(200)
        .with_body(ok(json!({
            "points": [
                {"id": 3, "version": 0, "score": 0.98, "payload": {"label": "cat"}},
                {"id": "5f1b4c8e-0000-4000-8000-000000000000", "version": 0, "score": 0.71, "payload": {"label": "dog"}}
            ]
        })))
        .create();

    let client = client_for(&server, None)?;
    let points = client.top_k_similar("images", &[0.1, 0.2], 2)?;

    mock.assert();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].id, PointId::Num(3));
    assert_eq!(points[0].label(), Some("cat"));
    assert_eq!(
        points[1].id,
        PointId::from("5f1b4c8e-0000-4000-8000-000000000000")
    );
    assert!(points[0].score > points[1].score);
    Ok(())
}

#[test]
fn test_top_k_empty_collection() -> Result<()> {
    let mut server = Server::new();
    server
        .mock("POST", "/collections/images/points/query")
        .with_status(200)
        .with_body(ok(json!({"points": []})))
        .create();

    let client = client_for(&server, None)?;
    assert!(client.top_k_similar("images", &[0.1], 5)?.is_empty());
    Ok(())
}
