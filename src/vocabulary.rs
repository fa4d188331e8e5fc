//! Fixed, namespaced key vocabulary used on repository nodes, plus the VEO
//! status enumeration.
//!
//! Every property the workflow reads or writes lives here so the rest of the
//! crate never spells out a raw key string.

use crate::contract::Node;

/// Node type of a transfer container.
pub const TYPE_TRANSFER: &str = "vers:transfer";
/// Node type of a VEO artifact.
pub const TYPE_VEO: &str = "vers:veo";
/// Plain folder node type, used for the transfers root.
pub const TYPE_FOLDER: &str = "cm:folder";
/// File-link node type; its preview target lives in `cm:destination`.
pub const TYPE_FILELINK: &str = "app:filelink";

/// Directed association from a VEO to its source record.
pub const ASSOC_LINKED_RECORD: &str = "vers:linkedRecord";

pub const PROP_TITLE: &str = "cm:title";
pub const PROP_DESCRIPTION: &str = "cm:description";
pub const PROP_DESTINATION: &str = "cm:destination";

pub const PROP_VEO_STATUS: &str = "vers:veoStatus";
pub const PROP_CONSIGNMENT_ID: &str = "vers:consignmentId";
pub const PROP_CONSIGNMENT_ACCESS: &str = "vers:consignmentAccess";
pub const PROP_LINKED_RECORD_REF: &str = "vers:linkedRecordNodeRef";
pub const PROP_LINKED_RECORD_NAME: &str = "vers:linkedRecordName";
pub const PROP_VEO_GENERATED_AT: &str = "vers:veoGeneratedAt";
pub const PROP_VEO_ERROR_MESSAGE: &str = "vers:veoGenerationErrorMessage";

pub const PROP_RECORD_IDENTIFIER: &str = "rma:identifier";
/// Search results project the disposition status as a boolean property
/// instead of an aspect.
pub const PROP_SEARCH_HAS_DISPOSITION: &str = "rma:recordSearchHasDispositionSchedule";

pub const ASPECT_DISPOSITION_LIFECYCLE: &str = "rma:dispositionLifecycle";
pub const ASPECT_CUT_OFF: &str = "rma:cutOff";

/// Marker substring identifying the records-manager group.
pub const RECORDS_MANAGER_GROUP_MARKER: &str = "GROUP_RecordsManager";

/// Breadcrumb path of the site document library holding all transfers.
pub const SITE_LIBRARY_PATH: &str = "/Company Home/Sites/veo-transfers/documentLibrary";
/// Relative path used to resolve the site library from the repository root.
pub const SITE_LIBRARY_RELATIVE_PATH: &str = "/Sites/veo-transfers/documentLibrary";
/// Name of the folder under the site library that holds all transfers.
pub const TRANSFERS_ROOT_NAME: &str = "Transfers";

/// Extension appended to every derived VEO name.
pub const VEO_EXTENSION: &str = ".veo.zip";

/// Creation status carried on every VEO node in `vers:veoStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VeoStatus {
    Pending,
    Success,
    Failed,
}

impl VeoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VeoStatus::Pending => "pending",
            VeoStatus::Success => "success",
            VeoStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<VeoStatus> {
        match value {
            "pending" => Some(VeoStatus::Pending),
            "success" => Some(VeoStatus::Success),
            "failed" => Some(VeoStatus::Failed),
            _ => None,
        }
    }

    /// Reads the status property off a node. Unknown or missing values yield
    /// `None` rather than a default.
    pub fn from_node(node: &Node) -> Option<VeoStatus> {
        node.property_str(PROP_VEO_STATUS)
            .and_then(VeoStatus::parse)
    }
}

impl std::fmt::Display for VeoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
