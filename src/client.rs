//! Concrete [`ContentRepository`] implementation over the repository's
//! public REST API, using `reqwest`.
//!
//! The server URL and bearer token come from configuration (or the
//! environment via [`RepoClient::new_from_env`]); the trait itself stays
//! agnostic of authentication and transport details.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::config::RepositoryConfig;
use crate::contract::{
    AssociationBody, ContentRepository, Node, NodeAssociation, NodeBody, NodeUpdate, RepoError,
};

/// Node fields requested on every read so rules and status mapping have the
/// path, properties, and aspects available.
const INCLUDE_FIELDS: &str = "path,properties,aspectNames";

pub struct RepoClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

// ---- wire envelopes ----

#[derive(Deserialize)]
struct EntryEnvelope {
    entry: NodeDto,
}

#[derive(Deserialize)]
struct ListEnvelope {
    list: EntryList,
}

#[derive(Deserialize)]
struct EntryList {
    entries: Vec<EntryEnvelope>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeDto {
    id: String,
    name: String,
    node_type: String,
    #[serde(default)]
    is_file: bool,
    #[serde(default)]
    is_folder: bool,
    #[serde(default)]
    parent_id: Option<String>,
    #[serde(default)]
    aspect_names: Option<Vec<String>>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    path: Option<PathDto>,
    #[serde(default)]
    association: Option<AssociationDto>,
}

#[derive(Deserialize)]
struct PathDto {
    name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssociationDto {
    assoc_type: String,
}

impl NodeDto {
    fn into_node(self) -> Node {
        Node {
            id: self.id,
            name: self.name,
            node_type: self.node_type,
            is_file: self.is_file,
            is_folder: self.is_folder,
            parent_id: self.parent_id,
            path_name: self.path.and_then(|p| p.name),
            aspect_names: self.aspect_names.unwrap_or_default(),
            properties: self.properties.unwrap_or_default(),
        }
    }
}

impl RepoClient {
    pub fn new(config: &RepositoryConfig) -> Self {
        RepoClient {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        }
    }

    /// Builds a client from `REPO_BASE_URL` and `REPO_AUTH_TOKEN`, loading a
    /// `.env` file when present.
    pub fn new_from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("REPO_BASE_URL")?;
        let auth_token = std::env::var("REPO_AUTH_TOKEN").ok();
        Ok(RepoClient::new(&RepositoryConfig {
            base_url,
            auth_token,
        }))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and checks the HTTP status, mapping failures into
    /// [`RepoError`].
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, RepoError> {
        let response = self
            .request(builder)
            .send()
            .await
            .map_err(|e| RepoError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(RepoError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_entry(&self, response: reqwest::Response) -> Result<Node, RepoError> {
        let envelope: EntryEnvelope = response
            .json()
            .await
            .map_err(|e| RepoError::InvalidResponse(e.to_string()))?;
        Ok(envelope.entry.into_node())
    }

    async fn list_associations(
        &self,
        url: String,
        assoc_type: &str,
    ) -> Result<Vec<NodeAssociation>, RepoError> {
        let response = self
            .send(self.http.get(url).query(&[
                ("where", format!("(assocType='{assoc_type}')")),
                ("include", INCLUDE_FIELDS.to_string()),
            ]))
            .await?;
        let envelope: ListEnvelope = response
            .json()
            .await
            .map_err(|e| RepoError::InvalidResponse(e.to_string()))?;
        Ok(envelope
            .list
            .entries
            .into_iter()
            .map(|e| {
                let assoc_type = e
                    .entry
                    .association
                    .as_ref()
                    .map(|a| a.assoc_type.clone())
                    .unwrap_or_else(|| assoc_type.to_string());
                NodeAssociation {
                    node: e.entry.into_node(),
                    assoc_type,
                }
            })
            .collect())
    }

    fn node_payload(body: &NodeBody) -> Value {
        json!({
            "name": body.name,
            "nodeType": body.node_type,
            "properties": body.properties,
        })
    }
}

#[async_trait]
impl ContentRepository for RepoClient {
    async fn get_node(&self, node_id: &str) -> Result<Node, RepoError> {
        let response = self
            .send(
                self.http
                    .get(self.url(&format!("/nodes/{node_id}")))
                    .query(&[("include", INCLUDE_FIELDS)]),
            )
            .await?;
        self.read_entry(response).await
    }

    async fn get_node_at_path(
        &self,
        node_id: &str,
        relative_path: &str,
    ) -> Result<Node, RepoError> {
        let response = self
            .send(
                self.http
                    .get(self.url(&format!("/nodes/{node_id}")))
                    .query(&[("include", INCLUDE_FIELDS), ("relativePath", relative_path)]),
            )
            .await?;
        self.read_entry(response).await
    }

    async fn get_node_children(&self, node_id: &str) -> Result<Vec<Node>, RepoError> {
        let response = self
            .send(
                self.http
                    .get(self.url(&format!("/nodes/{node_id}/children")))
                    .query(&[("include", INCLUDE_FIELDS)]),
            )
            .await?;
        let envelope: ListEnvelope = response
            .json()
            .await
            .map_err(|e| RepoError::InvalidResponse(e.to_string()))?;
        Ok(envelope
            .list
            .entries
            .into_iter()
            .map(|e| e.entry.into_node())
            .collect())
    }

    async fn create_node(&self, parent_id: &str, body: NodeBody) -> Result<Node, RepoError> {
        let response = self
            .send(
                self.http
                    .post(self.url(&format!("/nodes/{parent_id}/children")))
                    .json(&Self::node_payload(&body)),
            )
            .await?;
        self.read_entry(response).await
    }

    async fn create_folder(&self, parent_id: &str, body: NodeBody) -> Result<Node, RepoError> {
        // Folders are nodes; the server derives folder behavior from the type.
        self.create_node(parent_id, body).await
    }

    async fn update_node(&self, node_id: &str, update: NodeUpdate) -> Result<Node, RepoError> {
        let mut payload = Map::new();
        if let Some(name) = &update.name {
            payload.insert("name".into(), Value::from(name.as_str()));
        }
        payload.insert("properties".into(), Value::Object(update.properties));
        let response = self
            .send(
                self.http
                    .put(self.url(&format!("/nodes/{node_id}")))
                    .json(&Value::Object(payload)),
            )
            .await?;
        self.read_entry(response).await
    }

    async fn create_association(
        &self,
        source_id: &str,
        body: AssociationBody,
    ) -> Result<(), RepoError> {
        self.send(
            self.http
                .post(self.url(&format!("/nodes/{source_id}/targets")))
                .json(&json!({
                    "targetId": body.target_id,
                    "assocType": body.assoc_type,
                })),
        )
        .await?;
        Ok(())
    }

    async fn list_source_associations(
        &self,
        target_id: &str,
        assoc_type: &str,
    ) -> Result<Vec<NodeAssociation>, RepoError> {
        self.list_associations(self.url(&format!("/nodes/{target_id}/sources")), assoc_type)
            .await
    }

    async fn list_target_associations(
        &self,
        source_id: &str,
        assoc_type: &str,
    ) -> Result<Vec<NodeAssociation>, RepoError> {
        self.list_associations(self.url(&format!("/nodes/{source_id}/targets")), assoc_type)
            .await
    }
}
