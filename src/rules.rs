//! Rule evaluators: pure boolean predicates over a typed context bundle,
//! used to decide menu and action visibility.
//!
//! Every predicate is side-effect free and fail-closed: an empty selection,
//! a trashcan navigation, or a missing context field yields `false`, so a
//! missing signal never enables a destructive or premature action.

use crate::contract::Node;
use crate::vocabulary::{
    VeoStatus, ASPECT_DISPOSITION_LIFECYCLE, PROP_SEARCH_HAS_DISPOSITION,
    RECORDS_MANAGER_GROUP_MARKER, SITE_LIBRARY_PATH, TRANSFERS_ROOT_NAME, TYPE_TRANSFER,
};

/// Where the user currently is in the repository hierarchy.
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    pub current_folder: Option<Node>,
    pub in_trashcan: bool,
}

/// The user's current multi-selection.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub nodes: Vec<Node>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The selected folder, when exactly one node is selected and it is a
    /// folder.
    pub fn folder(&self) -> Option<&Node> {
        match self.nodes.as_slice() {
            [node] if node.is_folder => Some(node),
            _ => None,
        }
    }

    /// The selected file, when exactly one node is selected and it is a file.
    pub fn file(&self) -> Option<&Node> {
        match self.nodes.as_slice() {
            [node] if node.is_file => Some(node),
            _ => None,
        }
    }
}

/// The signed-in user's profile, as far as the rules need it.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub groups: Vec<String>,
}

/// Context bundle every rule evaluates against. Built once at the boundary
/// from the application state, not re-derived ad hoc per predicate.
#[derive(Debug, Clone, Default)]
pub struct RuleContext {
    pub navigation: Navigation,
    pub selection: Selection,
    pub profile: Profile,
}

pub fn has_selection(context: &RuleContext) -> bool {
    !context.selection.is_empty()
}

pub fn has_folder_selected(context: &RuleContext) -> bool {
    context.selection.folder().is_some()
}

pub fn has_file_selected(context: &RuleContext) -> bool {
    context.selection.file().is_some()
}

/// True when the current navigation folder is a transfer container.
pub fn is_parent_transfer_folder(context: &RuleContext) -> bool {
    context
        .navigation
        .current_folder
        .as_ref()
        .is_some_and(|folder| folder.node_type == TYPE_TRANSFER)
}

/// True when the current folder is the transfers root: the fixed label
/// inside the site document library.
pub fn is_root_for_transfers(context: &RuleContext) -> bool {
    context
        .navigation
        .current_folder
        .as_ref()
        .is_some_and(|folder| {
            folder.name == TRANSFERS_ROOT_NAME
                && folder
                    .path_name
                    .as_deref()
                    .is_some_and(|path| path.contains(SITE_LIBRARY_PATH))
        })
}

/// True when the single selected folder is a transfer container.
pub fn is_transfer_folder(context: &RuleContext) -> bool {
    context
        .selection
        .folder()
        .is_some_and(|folder| folder.node_type == TYPE_TRANSFER)
}

/// True when the selection lives inside the VEO transfers site: a selected
/// folder is judged by its own path, otherwise every selected file must be
/// under the site.
pub fn is_in_veo_transfers_site(context: &RuleContext) -> bool {
    const SITE_PATH: &str = "/Company Home/Sites/veo-transfers";

    if let Some(folder) = context.selection.folder() {
        return folder
            .path_name
            .as_deref()
            .is_some_and(|path| path.contains(SITE_PATH));
    }
    if context.selection.is_empty() || context.navigation.in_trashcan {
        return false;
    }
    context.selection.nodes.iter().all(|node| {
        node.is_file
            && node
                .path_name
                .as_deref()
                .is_some_and(|path| path.contains(SITE_PATH))
    })
}

/// True when any of the user's group identifiers carries the records-manager
/// marker.
pub fn is_records_manager(context: &RuleContext) -> bool {
    context
        .profile
        .groups
        .iter()
        .any(|group| group.contains(RECORDS_MANAGER_GROUP_MARKER))
}

/// True when every selected node is governed by a disposition schedule.
/// Search results surface the status as a boolean projection property rather
/// than an aspect; either representation counts.
pub fn has_disposition_lifecycle(context: &RuleContext) -> bool {
    if context.selection.is_empty() || context.navigation.in_trashcan {
        return false;
    }
    context.selection.nodes.iter().all(|node| {
        node.has_aspect(ASPECT_DISPOSITION_LIFECYCLE)
            || node.property_bool(PROP_SEARCH_HAS_DISPOSITION) == Some(true)
    })
}

fn selection_has_uniform_status(context: &RuleContext, status: VeoStatus) -> bool {
    if context.selection.is_empty() || context.navigation.in_trashcan {
        return false;
    }
    context
        .selection
        .nodes
        .iter()
        .all(|node| VeoStatus::from_node(node) == Some(status))
}

pub fn is_veo_creation_pending(context: &RuleContext) -> bool {
    selection_has_uniform_status(context, VeoStatus::Pending)
}

pub fn has_veo_creation_succeeded(context: &RuleContext) -> bool {
    selection_has_uniform_status(context, VeoStatus::Success)
}

pub fn has_veo_creation_failed(context: &RuleContext) -> bool {
    selection_has_uniform_status(context, VeoStatus::Failed)
}

/// True when the selection is non-empty and uniformly in one of the three
/// creation states. Mixed-status selections are false.
pub fn is_part_of_veo_creation_request(context: &RuleContext) -> bool {
    has_selection(context)
        && (is_veo_creation_pending(context)
            || has_veo_creation_succeeded(context)
            || has_veo_creation_failed(context))
}
