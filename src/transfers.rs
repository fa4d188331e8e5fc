//! Transfer containers: resolving the transfers root folder and
//! creating/editing `vers:transfer` folders from validated form input.
//!
//! The lookup helper is idempotent but has no conflict handling of its own;
//! two concurrent callers racing on a missing folder are arbitrated by the
//! repository's uniqueness constraint. A conflict surfaces to the user only
//! through the create/edit path, via [`TransferError::user_message`].

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::TransfersConfig;
use crate::contract::{ContentRepository, Node, NodeBody, NodeUpdate, RepoError};
use crate::vocabulary::{
    PROP_CONSIGNMENT_ACCESS, PROP_CONSIGNMENT_ID, PROP_DESCRIPTION, PROP_TITLE, TYPE_FOLDER,
    TYPE_TRANSFER,
};

/// Alias the repository resolves to the root of the node hierarchy.
pub const ROOT_ALIAS: &str = "-root-";

/// Characters the repository rejects in folder names.
const FORBIDDEN_NAME_CHARS: &[char] = &['*', '"', '<', '>', '\\', '/', '?', ':', '|'];

/// Returns the child of `parent_id` matching `name` (case-insensitive) and
/// `node_type` (exact), creating it when absent. Calling this twice in
/// sequence with the same arguments returns the same node.
pub async fn get_or_create_folder<R>(
    repo: &R,
    name: &str,
    node_type: &str,
    parent_id: &str,
) -> Result<Node, RepoError>
where
    R: ContentRepository,
{
    debug!(name, node_type, parent_id, "Resolving folder");
    let children = repo.get_node_children(parent_id).await?;

    if let Some(existing) = children.into_iter().find(|child| {
        child.name.eq_ignore_ascii_case(name) && child.node_type == node_type
    }) {
        debug!(folder_id = %existing.id, "Folder already exists");
        return Ok(existing);
    }

    info!(name, node_type, parent_id, "Folder not found, creating it");
    repo.create_folder(
        parent_id,
        NodeBody {
            name: name.to_string(),
            node_type: node_type.to_string(),
            properties: Map::new(),
        },
    )
    .await
}

/// Resolves the root folder that holds all transfer containers: the site
/// document library by relative path, then the configured transfers folder
/// inside it (created on first use).
pub async fn transfers_root<R>(repo: &R, cfg: &TransfersConfig) -> Result<Node, RepoError>
where
    R: ContentRepository,
{
    let library = repo
        .get_node_at_path(ROOT_ALIAS, cfg.site_library_path.as_str())
        .await?;
    get_or_create_folder(repo, cfg.root_folder_name.as_str(), TYPE_FOLDER, &library.id).await
}

/// Validated metadata for creating or editing a transfer container.
/// Mirrors the original dialog form: all values are trimmed before use.
#[derive(Debug, Clone, Default)]
pub struct TransferForm {
    pub name: String,
    pub title: String,
    pub description: String,
    pub consignment_id: String,
    pub access: String,
}

/// Transfer-level failure: either the form input was rejected locally, or the
/// repository refused the call.
#[derive(Debug)]
pub enum TransferError {
    Invalid(String),
    Repo(RepoError),
}

impl TransferError {
    /// User-facing form-level message. A repository name conflict gets a
    /// dedicated message; any unrecognised error falls back to a generic one.
    pub fn user_message(&self) -> String {
        match self {
            TransferError::Invalid(reason) => reason.clone(),
            TransferError::Repo(e) if e.is_conflict() => {
                "A folder with this name already exists".to_string()
            }
            TransferError::Repo(_) => "Something went wrong, try again later".to_string(),
        }
    }
}

impl std::fmt::Display for TransferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferError::Invalid(reason) => write!(f, "invalid transfer form: {reason}"),
            TransferError::Repo(e) => write!(f, "transfer operation failed: {e}"),
        }
    }
}

impl std::error::Error for TransferError {}

impl From<RepoError> for TransferError {
    fn from(e: RepoError) -> Self {
        TransferError::Repo(e)
    }
}

impl TransferForm {
    /// Trims every field and checks the name and required fields, returning
    /// the cleaned form ready for submission.
    pub fn validated(&self) -> Result<TransferForm, TransferError> {
        let form = TransferForm {
            name: self.name.trim().to_string(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            consignment_id: self.consignment_id.trim().to_string(),
            access: self.access.trim().to_string(),
        };

        if form.name.is_empty() {
            return Err(TransferError::Invalid("Name is required".into()));
        }
        if form.name.contains(FORBIDDEN_NAME_CHARS) {
            return Err(TransferError::Invalid(
                "Name can't contain these characters * \" < > \\ / ? : |".into(),
            ));
        }
        if form.name.ends_with('.') {
            return Err(TransferError::Invalid("Name can't end with a period".into()));
        }
        if form.consignment_id.is_empty() {
            return Err(TransferError::Invalid("Consignment id is required".into()));
        }
        if form.access.is_empty() {
            return Err(TransferError::Invalid(
                "Consignment access is required".into(),
            ));
        }

        Ok(form)
    }

    fn properties(&self) -> Map<String, Value> {
        let mut properties = Map::new();
        properties.insert(PROP_TITLE.into(), Value::from(self.title.as_str()));
        properties.insert(
            PROP_DESCRIPTION.into(),
            Value::from(self.description.as_str()),
        );
        properties.insert(
            PROP_CONSIGNMENT_ID.into(),
            Value::from(self.consignment_id.as_str()),
        );
        properties.insert(
            PROP_CONSIGNMENT_ACCESS.into(),
            Value::from(self.access.as_str()),
        );
        properties
    }

    /// Creates a new transfer container under the given parent.
    pub async fn create<R>(&self, repo: &R, parent_id: &str) -> Result<Node, TransferError>
    where
        R: ContentRepository,
    {
        let form = self.validated()?;
        info!(name = %form.name, parent_id, "Creating transfer folder");
        let node = repo
            .create_folder(
                parent_id,
                NodeBody {
                    name: form.name.clone(),
                    node_type: TYPE_TRANSFER.into(),
                    properties: form.properties(),
                },
            )
            .await?;
        Ok(node)
    }

    /// Updates an existing transfer container's name and metadata.
    pub async fn edit<R>(&self, repo: &R, node_id: &str) -> Result<Node, TransferError>
    where
        R: ContentRepository,
    {
        let form = self.validated()?;
        info!(name = %form.name, node_id, "Editing transfer folder");
        let node = repo
            .update_node(
                node_id,
                NodeUpdate {
                    name: Some(form.name.clone()),
                    properties: form.properties(),
                },
            )
            .await?;
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str) -> TransferForm {
        TransferForm {
            name: name.into(),
            title: "Title".into(),
            description: "".into(),
            consignment_id: "VPRS-123".into(),
            access: "open".into(),
        }
    }

    #[test]
    fn validation_trims_fields() {
        let validated = form("  Consignment A  ").validated().unwrap();
        assert_eq!(validated.name, "Consignment A");
    }

    #[test]
    fn validation_rejects_special_characters() {
        assert!(form("a/b").validated().is_err());
        assert!(form("a:b").validated().is_err());
        assert!(form("a?").validated().is_err());
    }

    #[test]
    fn validation_rejects_trailing_dot_and_blank_names() {
        assert!(form("archive.").validated().is_err());
        assert!(form("   ").validated().is_err());
    }

    #[test]
    fn validation_requires_consignment_fields() {
        let mut missing_id = form("Consignment A");
        missing_id.consignment_id = "".into();
        assert!(missing_id.validated().is_err());

        let mut missing_access = form("Consignment A");
        missing_access.access = " ".into();
        assert!(missing_access.validated().is_err());
    }

    #[test]
    fn conflict_maps_to_existing_folder_message() {
        let err = TransferError::Repo(RepoError::Http {
            status: 409,
            message: "Duplicate child name".into(),
        });
        assert_eq!(err.user_message(), "A folder with this name already exists");

        let generic = TransferError::Repo(RepoError::Transport("reset".into()));
        assert_eq!(generic.user_message(), "Something went wrong, try again later");
    }
}
