// Remote Catalog Fetcher
//
// Two-step fetch:
// 1. Index call returns `{ results: [{ name, url }] }` (fixed limit, no paging)
// 2. Every detail URL is fetched concurrently and projected to an Entity
//
// All-or-nothing: one failed detail request fails the whole fetch.

use crate::entity::{Entity, EntityId};
use crate::error::CatalogError;
use futures::future::try_join_all;
use serde::Deserialize;
use tracing::{debug, info};

/// Default index endpoint
pub const DEFAULT_API_URL: &str = "https://pokeapi.co/api/v2/pokemon";

/// Default number of entities fetched per session
pub const DEFAULT_LIMIT: usize = 30;

// ============================================================================
// WIRE TYPES (remote payload, extra fields ignored)
// ============================================================================

#[derive(Debug, Deserialize)]
struct IndexResponse {
    results: Vec<EntityRef>,
}

/// Name + detail URI pair from the index endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct EntityRef {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    id: EntityId,
    name: String,
    #[serde(default)]
    sprites: Sprites,
    base_experience: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct Sprites {
    front_default: Option<String>,
}

impl From<DetailResponse> for Entity {
    fn from(detail: DetailResponse) -> Self {
        Entity {
            id: detail.id,
            name: detail.name,
            image: detail.sprites.front_default,
            base_experience: detail.base_experience.unwrap_or(0),
        }
    }
}

// ============================================================================
// CLIENT
// ============================================================================

/// HTTP client for the remote catalog
pub struct CatalogClient {
    http: reqwest::Client,
    api_url: String,
    limit: usize,
}

impl CatalogClient {
    /// Create a client for `api_url`, requesting `limit` entities
    pub fn new(api_url: &str, limit: usize) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("pokedex-favorites/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            limit,
        })
    }

    /// Full index URL including the fixed limit
    pub fn index_url(&self) -> String {
        format!("{}?limit={}", self.api_url, self.limit)
    }

    /// Fetch the full catalog in original index order
    pub async fn fetch_catalog(&self) -> Result<Vec<Entity>, CatalogError> {
        info!(url = %self.index_url(), "fetching catalog index");
        let refs = self.fetch_index().await?;

        let details = try_join_all(refs.iter().map(|r| self.fetch_detail(r))).await?;

        info!(count = details.len(), "catalog fetched");
        Ok(details)
    }

    async fn fetch_index(&self) -> Result<Vec<EntityRef>, CatalogError> {
        let body = self.get_text(&self.index_url()).await?;
        parse_index(&body)
    }

    async fn fetch_detail(&self, entity_ref: &EntityRef) -> Result<Entity, CatalogError> {
        debug!(name = %entity_ref.name, url = %entity_ref.url, "fetching detail");
        let body = self.get_text(&entity_ref.url).await?;
        parse_detail(&body)
    }

    async fn get_text(&self, url: &str) -> Result<String, CatalogError> {
        let resp = check_response(url, self.http.get(url).send().await?).await?;
        Ok(resp.text().await?)
    }
}

/// Map non-success statuses to [`CatalogError::Api`]
async fn check_response(
    url: &str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, CatalogError> {
    if !resp.status().is_success() {
        return Err(CatalogError::Api {
            status: resp.status().as_u16(),
            url: url.to_string(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

fn parse_index(body: &str) -> Result<Vec<EntityRef>, CatalogError> {
    let index: IndexResponse = serde_json::from_str(body)?;
    Ok(index.results)
}

fn parse_detail(body: &str) -> Result<Entity, CatalogError> {
    let detail: DetailResponse = serde_json::from_str(body)?;
    Ok(detail.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INDEX_FIXTURE: &str = r#"{
        "count": 1302,
        "next": "https://pokeapi.co/api/v2/pokemon?offset=2&limit=2",
        "previous": null,
        "results": [
            { "name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/" },
            { "name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/" }
        ]
    }"#;

    const DETAIL_FIXTURE: &str = r#"{
        "id": 1,
        "name": "bulbasaur",
        "base_experience": 64,
        "height": 7,
        "weight": 69,
        "sprites": {
            "back_default": "https://img/back/1.png",
            "front_default": "https://img/1.png"
        },
        "types": [{ "slot": 1, "type": { "name": "grass" } }]
    }"#;

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[test]
    fn test_parse_index() {
        let refs = parse_index(INDEX_FIXTURE).unwrap();

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].name, "bulbasaur");
        assert_eq!(refs[1].url, "https://pokeapi.co/api/v2/pokemon/2/");
    }

    #[test]
    fn test_parse_detail_projects_minimal_shape() {
        let entity = parse_detail(DETAIL_FIXTURE).unwrap();

        assert_eq!(
            entity,
            Entity::new(1, "bulbasaur", 64).with_image("https://img/1.png")
        );
    }

    #[test]
    fn test_parse_detail_null_fields() {
        let body = r#"{"id": 10001, "name": "deoxys-attack", "base_experience": null, "sprites": {"front_default": null}}"#;
        let entity = parse_detail(body).unwrap();

        assert_eq!(entity.base_experience, 0);
        assert!(entity.image.is_none());
    }

    #[test]
    fn test_parse_index_rejects_wrong_shape() {
        let err = parse_index(r#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_index_url_carries_limit() {
        let client = CatalogClient::new("https://pokeapi.co/api/v2/pokemon/", 30).unwrap();
        assert_eq!(client.index_url(), "https://pokeapi.co/api/v2/pokemon?limit=30");
    }

    #[tokio::test]
    async fn test_check_response_api_error() {
        let resp = mock_response(500, "boom");
        let err = check_response("http://x/1", resp).await.unwrap_err();

        match err {
            CatalogError::Api { status, url, message } => {
                assert_eq!(status, 500);
                assert_eq!(url, "http://x/1");
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_check_response_success() {
        let resp = mock_response(200, "{}");
        assert!(check_response("http://x", resp).await.is_ok());
    }

    /// Local catalog server: `route` maps a request path to (status, body, delay)
    async fn serve_catalog(
        route: fn(&str, u16) -> (u16, String, u64),
    ) -> (u16, tokio::task::JoinHandle<()>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let mut read = 0;
                    while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf[read..]).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => read += n,
                        }
                    }
                    let head = String::from_utf8_lossy(&buf[..read]).to_string();
                    let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();

                    let (status, body, delay_ms) = route(&path, port);
                    tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;

                    let response = format!(
                        "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        (port, handle)
    }

    fn index_body(port: u16) -> String {
        format!(
            r#"{{"results": [
                {{"name": "bulbasaur", "url": "http://127.0.0.1:{port}/pokemon/1/"}},
                {{"name": "ivysaur", "url": "http://127.0.0.1:{port}/pokemon/2/"}}
            ]}}"#
        )
    }

    fn detail_body(id: u32, name: &str, exp: u32) -> String {
        format!(r#"{{"id": {id}, "name": "{name}", "base_experience": {exp}, "sprites": {{}}}}"#)
    }

    #[tokio::test]
    async fn test_fetch_keeps_index_order() {
        // The first detail answers last; the result still follows the index
        let (port, server) = serve_catalog(|path, port| match path {
            "/pokemon?limit=2" => (200, index_body(port), 0),
            "/pokemon/1/" => (200, detail_body(1, "bulbasaur", 64), 200),
            "/pokemon/2/" => (200, detail_body(2, "ivysaur", 142), 0),
            _ => (404, "{}".to_string(), 0),
        })
        .await;

        let client = CatalogClient::new(&format!("http://127.0.0.1:{port}/pokemon"), 2).unwrap();
        let catalog = client.fetch_catalog().await.unwrap();

        assert_eq!(
            catalog,
            vec![Entity::new(1, "bulbasaur", 64), Entity::new(2, "ivysaur", 142)]
        );
        server.abort();
    }

    #[tokio::test]
    async fn test_one_failed_detail_fails_whole_fetch() {
        let (port, server) = serve_catalog(|path, port| match path {
            "/pokemon?limit=2" => (200, index_body(port), 0),
            "/pokemon/1/" => (200, detail_body(1, "bulbasaur", 64), 0),
            "/pokemon/2/" => (500, r#"{"detail": "boom"}"#.to_string(), 0),
            _ => (404, "{}".to_string(), 0),
        })
        .await;

        let client = CatalogClient::new(&format!("http://127.0.0.1:{port}/pokemon"), 2).unwrap();
        let result = client.fetch_catalog().await;

        match result {
            Err(CatalogError::Api { status, url, .. }) => {
                assert_eq!(status, 500);
                assert!(url.ends_with("/pokemon/2/"));
            }
            other => panic!("expected api error, got {other:?}"),
        }
        server.abort();
    }

    #[tokio::test]
    async fn test_fetch_fails_when_unreachable() {
        // Nothing listens on port 9 locally; the whole fetch must fail
        let client = CatalogClient::new("http://127.0.0.1:9/api", 2).unwrap();
        let result = client.fetch_catalog().await;

        assert!(matches!(result, Err(CatalogError::Http(_))));
    }
}
