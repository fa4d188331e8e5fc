//! Action glue: dispatches workflow operations in response to UI-style
//! actions, reading the current multi-selection from shared application
//! state when no explicit payload is supplied.

use tracing::{debug, info};

use crate::config::TransfersConfig;
use crate::contract::{ContentRepository, DocumentList, Node, Notifier};
use crate::orchestrate;
use crate::rules::Selection;
use crate::transfers::{self, TransferForm};

/// Shared application state the dispatcher reads from.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub selection: Selection,
}

/// Workflow actions a host application can raise.
#[derive(Debug, Clone)]
pub enum VersAction {
    /// Create a transfer container under the transfers root.
    CreateTransfer(TransferForm),
    /// Queue VEOs inside the given transfer. An explicit record payload wins;
    /// without one the current selection is used.
    CreateVeos {
        transfer: Node,
        record: Option<Node>,
    },
    /// Reset a single VEO back to pending.
    RetryVeoCreation(Node),
}

/// The records an action applies to: the explicit payload when present,
/// otherwise the current non-empty selection.
pub fn resolve_records(payload: Option<Node>, state: &AppState) -> Vec<Node> {
    match payload {
        Some(node) => vec![node],
        None => state.selection.nodes.clone(),
    }
}

/// Handles one action end to end. Every failure path ends in a notification;
/// nothing raised here is fatal to the caller.
pub async fn handle<R>(
    repo: &R,
    notifier: &dyn Notifier,
    list: &dyn DocumentList,
    cfg: &TransfersConfig,
    state: &AppState,
    action: VersAction,
) where
    R: ContentRepository,
{
    match action {
        VersAction::CreateTransfer(form) => {
            let root = match transfers::transfers_root(repo, cfg).await {
                Ok(root) => root,
                Err(e) => {
                    notifier.show_error(&format!("Could not resolve transfers root: {e}"));
                    return;
                }
            };
            match form.create(repo, &root.id).await {
                Ok(node) => {
                    info!(transfer_id = %node.id, "Transfer folder created");
                    list.reload();
                }
                Err(e) => notifier.show_error(&e.user_message()),
            }
        }
        VersAction::CreateVeos { transfer, record } => {
            let records = resolve_records(record, state);
            if records.is_empty() {
                debug!("CreateVeos raised with no payload and an empty selection; ignoring");
                return;
            }
            orchestrate::queue_veos_for_creation(repo, notifier, list, &transfer, &records).await;
        }
        VersAction::RetryVeoCreation(veo) => {
            // retry notifies on both outcomes itself
            let _ = orchestrate::retry_veo_creation(repo, notifier, &veo).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> Node {
        Node {
            id: id.into(),
            name: format!("{id}.txt"),
            is_file: true,
            ..Node::default()
        }
    }

    #[test]
    fn explicit_payload_wins_over_selection() {
        let state = AppState {
            selection: Selection {
                nodes: vec![record("a"), record("b")],
            },
        };
        let resolved = resolve_records(Some(record("payload")), &state);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, "payload");
    }

    #[test]
    fn missing_payload_falls_back_to_selection() {
        let state = AppState {
            selection: Selection {
                nodes: vec![record("a"), record("b")],
            },
        };
        let resolved = resolve_records(None, &state);
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn missing_payload_and_empty_selection_resolve_to_nothing() {
        assert!(resolve_records(None, &AppState::default()).is_empty());
    }
}
