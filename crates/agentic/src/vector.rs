//! Embedding storage and similarity search over Qdrant's REST API
use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info};

use crate::config::FromEnv;

pub const QDRANT_URL: &str = "http://localhost:6333";
pub const QDRANT_COLLECTION_NAME: &str = "images";
pub const QDRANT_VECTOR_DIMENSIONS: usize = 512;

#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub collection_name: String,
    pub vector_dimensions: usize,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: QDRANT_URL.to_string(),
            api_key: None,
            collection_name: QDRANT_COLLECTION_NAME.to_string(),
            vector_dimensions: QDRANT_VECTOR_DIMENSIONS,
        }
    }
}

impl FromEnv for QdrantConfig {
    fn from_env() -> Result<Self> {
        let url = Self::get_env("QDRANT_URL", false, Some(QDRANT_URL.to_string()))?
            .unwrap_or_else(|| QDRANT_URL.to_string());

        let api_key = Self::get_env("QDRANT_API_KEY", false, None)?;

        let collection_name = Self::get_env(
            "QDRANT_COLLECTION_NAME",
            false,
            Some(QDRANT_COLLECTION_NAME.to_string()),
        )?
        .unwrap_or_else(|| QDRANT_COLLECTION_NAME.to_string());

        let vector_dimensions =
            Self::get_env_parsed("QDRANT_VECTOR_DIMENSIONS", QDRANT_VECTOR_DIMENSIONS)?;

        Ok(Self {
            url,
            api_key,
            collection_name,
            vector_dimensions,
        })
    }
}

/// Qdrant accepts unsigned integers or UUID strings as point ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointId {
    Num(u64),
    Uuid(String),
}

impl From<u64> for PointId {
    fn from(id: u64) -> Self {
        PointId::Num(id)
    }
}

impl From<&str> for PointId {
    fn from(id: &str) -> Self {
        PointId::Uuid(id.to_string())
    }
}

impl From<String> for PointId {
    fn from(id: String) -> Self {
        PointId::Uuid(id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoredPoint {
    pub id: PointId,
    pub score: f32,
    #[serde(default)]
    pub payload: Option<Map<String, Value>>,
}

impl ScoredPoint {
    pub fn label(&self) -> Option<&str> {
        self.payload.as_ref()?.get("label")?.as_str()
    }
}

pub struct QdrantClient {
    client: Client,
    config: QdrantConfig,
}

impl QdrantClient {
    pub fn new(config: QdrantConfig) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &QdrantConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.config.url.trim_end_matches('/'), path);
        let builder = self.client.request(method, url);
        match &self.config.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        }
    }

    /// Send a request and return the `result` field of the response
    fn send(&self, builder: RequestBuilder) -> Result<Value> {
        let response = builder.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("Qdrant request failed: {}\nResponse: {}", status, body));
        }

        let mut body: Value = response.json()?;
        Ok(body
            .get_mut("result")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }

    pub fn collection_exists(&self, collection_name: &str) -> Result<bool> {
        let result = self.send(self.request(
            Method::GET,
            &format!("collections/{collection_name}/exists"),
        ))?;

        result
            .get("exists")
            .and_then(Value::as_bool)
            .ok_or_else(|| anyhow!("Unexpected collection status: {}", result))
    }

    /// Create a cosine-distance collection unless it already exists.
    ///
    /// Returns whether a new collection was created.
    pub fn create_collection(&self, collection_name: &str, vector_dimensions: usize) -> Result<bool> {
        if self.collection_exists(collection_name)? {
            debug!(collection = collection_name, "collection already exists");
            return Ok(false);
        }

        self.send(
            self.request(Method::PUT, &format!("collections/{collection_name}"))
                .json(&json!({
                    "vectors": {
                        "size": vector_dimensions,
                        "distance": "Cosine"
                    }
                })),
        )?;
        info!(
            collection = collection_name,
            dimensions = vector_dimensions,
            "created collection"
        );
        Ok(true)
    }

    /// Create the configured collection with the configured dimensions
    pub fn create_default_collection(&self) -> Result<bool> {
        self.create_collection(&self.config.collection_name, self.config.vector_dimensions)
    }

    /// Upsert one embedding with its label as payload
    pub fn insert_embedding(
        &self,
        collection_name: &str,
        embedding: &[f32],
        id: impl Into<PointId>,
        label: &str,
    ) -> Result<()> {
        let point = json!({
            "id": id.into(),
            "vector": embedding,
            "payload": {"label": label}
        });

        self.send(
            self.request(
                Method::PUT,
                &format!("collections/{collection_name}/points?wait=true"),
            )
            .json(&json!({ "points": [point] })),
        )
        .map(|_| ())
        .map_err(|e| {
            error!(collection = collection_name, "error inserting embedding: {}", e);
            e
        })
    }

    /// The `k` stored points closest to `query`, best match first
    pub fn top_k_similar(
        &self,
        collection_name: &str,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredPoint>> {
        let result = self.send(
            self.request(
                Method::POST,
                &format!("collections/{collection_name}/points/query"),
            )
            .json(&json!({
                "query": query,
                "limit": k,
                "with_payload": true
            })),
        )?;

        let points = result.get("points").cloned().unwrap_or(Value::Array(Vec::new()));
        Ok(serde_json::from_value(points)?)
    }
}
