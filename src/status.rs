//! Status presentation: maps the VEO status property to icon keys, tooltip
//! labels, and a click outcome, independent of any rendering layer.

use tracing::debug;

use crate::contract::{ContentRepository, Node, RepoError};
use crate::vocabulary::{
    VeoStatus, ASPECT_CUT_OFF, ASPECT_DISPOSITION_LIFECYCLE, PROP_DESTINATION,
    PROP_SEARCH_HAS_DISPOSITION, PROP_VEO_ERROR_MESSAGE, TYPE_FILELINK,
};

/// Icon key for a node's VEO status. Unknown or missing status yields an
/// empty string (no icon).
pub fn status_icon(node: &Node) -> &'static str {
    match VeoStatus::from_node(node) {
        Some(VeoStatus::Success) => "vers:veo-status-success",
        Some(VeoStatus::Pending) => "vers:veo-status-pending",
        Some(VeoStatus::Failed) => "vers:veo-status-failed",
        None => "",
    }
}

/// Tooltip label for a node's VEO status; empty when the status is unknown.
pub fn status_tooltip(node: &Node) -> &'static str {
    match VeoStatus::from_node(node) {
        Some(VeoStatus::Success) => "VEO generated successfully",
        Some(VeoStatus::Pending) => "VEO creation is pending",
        Some(VeoStatus::Failed) => "VEO creation failed",
        None => "",
    }
}

/// What clicking a status cell should do, resolved from the VEO's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Open the preview of this node.
    Preview { node_id: String },
    /// Show the message as a warning notification.
    Warning(String),
    /// Show the message as an info notification.
    Info(String),
}

/// Identifier to preview for a node; file links indirect through their
/// destination property.
pub fn preview_id(node: &Node) -> String {
    if node.node_type == TYPE_FILELINK {
        if let Some(destination) = node.property_str(PROP_DESTINATION) {
            return destination.to_string();
        }
    }
    node.id.clone()
}

/// Resolves a click on a record's status cell given the VEO looked up for it
/// (or `None` when no VEO exists).
pub fn resolve_click(veo: Option<&Node>) -> ClickOutcome {
    let Some(veo) = veo else {
        return ClickOutcome::Warning("Could not find VEO for this record".to_string());
    };

    match VeoStatus::from_node(veo) {
        Some(VeoStatus::Success) => ClickOutcome::Preview {
            node_id: preview_id(veo),
        },
        Some(VeoStatus::Failed) => {
            let reason = veo.property_str(PROP_VEO_ERROR_MESSAGE).unwrap_or("unknown");
            ClickOutcome::Warning(format!("Error creating VEO: {reason}"))
        }
        Some(VeoStatus::Pending) => {
            ClickOutcome::Info("VEO creation is pending creation.".to_string())
        }
        None => ClickOutcome::Warning("Could not find VEO for this record".to_string()),
    }
}

/// A status row ready for display: the node whose status should be shown,
/// and whether that status was derived from the parent rather than the node
/// itself.
#[derive(Debug, Clone)]
pub struct StatusRow {
    pub node: Node,
    pub derived_from_parent: bool,
}

impl StatusRow {
    /// Visual marker annotating rows whose status came from the parent.
    pub fn badge(&self) -> Option<&'static str> {
        self.derived_from_parent.then_some("📎")
    }
}

/// Parent-status fallback rule: a cut-off file record that carries neither
/// the disposition-lifecycle aspect nor the search projection flag cannot
/// show its own status; it is approximated from the containing record
/// folder instead.
///
/// Precedence: the node's own status always wins; the parent is consulted
/// only when this rule fires.
pub fn needs_parent_status_fallback(node: &Node) -> bool {
    node.is_file
        && node.has_aspect(ASPECT_CUT_OFF)
        && !node.has_aspect(ASPECT_DISPOSITION_LIFECYCLE)
        && node.property_bool(PROP_SEARCH_HAS_DISPOSITION) == Some(false)
}

/// Resolves the node a status row should render from, applying the parent
/// fallback rule where it fires. Records without a parent keep their own
/// (absent) status.
pub async fn resolve_status_row<R>(repo: &R, node: &Node) -> Result<StatusRow, RepoError>
where
    R: ContentRepository,
{
    if needs_parent_status_fallback(node) {
        if let Some(parent_id) = node.parent_id.as_deref() {
            debug!(node_id = %node.id, parent_id, "Deriving VEO status from parent record folder");
            let parent = repo.get_node(parent_id).await?;
            return Ok(StatusRow {
                node: parent,
                derived_from_parent: true,
            });
        }
    }
    Ok(StatusRow {
        node: node.clone(),
        derived_from_parent: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::{PROP_VEO_STATUS, TYPE_VEO};
    use serde_json::Value;

    fn veo(status: &str) -> Node {
        let mut node = Node {
            id: "veo-1".into(),
            name: "record.veo.zip".into(),
            node_type: TYPE_VEO.into(),
            is_file: true,
            ..Node::default()
        };
        node.properties
            .insert(PROP_VEO_STATUS.into(), Value::from(status));
        node
    }

    #[test]
    fn icon_and_tooltip_cover_the_three_states() {
        assert_eq!(status_icon(&veo("success")), "vers:veo-status-success");
        assert_eq!(status_icon(&veo("pending")), "vers:veo-status-pending");
        assert_eq!(status_icon(&veo("failed")), "vers:veo-status-failed");
        assert_eq!(status_tooltip(&veo("failed")), "VEO creation failed");
    }

    #[test]
    fn unknown_status_yields_no_icon() {
        assert_eq!(status_icon(&veo("archived")), "");
        assert_eq!(status_tooltip(&veo("archived")), "");
        let mut bare = veo("pending");
        bare.properties.remove(PROP_VEO_STATUS);
        assert_eq!(status_icon(&bare), "");
    }

    #[test]
    fn click_resolution_follows_status() {
        assert_eq!(
            resolve_click(Some(&veo("success"))),
            ClickOutcome::Preview {
                node_id: "veo-1".into()
            }
        );
        assert_eq!(
            resolve_click(Some(&veo("pending"))),
            ClickOutcome::Info("VEO creation is pending creation.".into())
        );
        assert_eq!(
            resolve_click(None),
            ClickOutcome::Warning("Could not find VEO for this record".into())
        );
    }

    #[test]
    fn failed_click_carries_stored_error_message() {
        let mut failed = veo("failed");
        failed.properties.insert(
            PROP_VEO_ERROR_MESSAGE.into(),
            Value::from("association refused"),
        );
        assert_eq!(
            resolve_click(Some(&failed)),
            ClickOutcome::Warning("Error creating VEO: association refused".into())
        );
    }

    #[test]
    fn preview_follows_filelink_destination() {
        let mut link = veo("success");
        link.node_type = TYPE_FILELINK.into();
        link.properties
            .insert(PROP_DESTINATION.into(), Value::from("target-99"));
        assert_eq!(preview_id(&link), "target-99");
    }

    #[test]
    fn parent_fallback_requires_all_four_conditions() {
        let mut record = Node {
            id: "rec-1".into(),
            name: "record.txt".into(),
            node_type: "cm:content".into(),
            is_file: true,
            parent_id: Some("folder-1".into()),
            ..Node::default()
        };
        record.aspect_names.push(ASPECT_CUT_OFF.into());
        record
            .properties
            .insert(PROP_SEARCH_HAS_DISPOSITION.into(), Value::from(false));
        assert!(needs_parent_status_fallback(&record));

        let mut with_lifecycle = record.clone();
        with_lifecycle
            .aspect_names
            .push(ASPECT_DISPOSITION_LIFECYCLE.into());
        assert!(!needs_parent_status_fallback(&with_lifecycle));

        let mut projected = record.clone();
        projected
            .properties
            .insert(PROP_SEARCH_HAS_DISPOSITION.into(), Value::from(true));
        assert!(!needs_parent_status_fallback(&projected));

        let mut folder = record.clone();
        folder.is_file = false;
        assert!(!needs_parent_status_fallback(&folder));
    }
}
