//! High-level pipeline: batch-creates VEO artifacts for a set of records.
//!
//! This module provides the orchestration logic for queueing VEOs
//! (Viewable Electronic Objects) inside a transfer container. For each source
//! record it:
//!   - Derives the VEO name from the record name
//!   - Creates a `vers:veo` node under the transfer, status `pending`, with
//!     consignment metadata copied from the transfer
//!   - Creates the VEO→record association so both directions can be navigated
//!   - Finalises the per-record outcome: association failure downgrades the
//!     VEO to `failed` (the node is retained, never rolled back)
//!
//! All per-record operations run concurrently and are joined only after every
//! one has settled; one record's failure never cancels or blocks the others.
//! The actual content export is an out-of-band asynchronous process that
//! watches the `pending` status externally; this crate only queues and tracks.
//!
//! # Error handling
//! Per-record failures are recovered locally into [`RecordOutcome`] values and
//! aggregated into a single user-facing summary by [`announce_batch`]. Nothing
//! here is fatal to the batch.
//!
//! # Navigation
//! - Main entrypoints: [`queue_veos_for_creation`], [`create_veos`],
//!   [`retry_veo_creation`]
//! - Association lookups: [`veo_for_record`], [`record_for_veo`]

use futures::future::join_all;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::contract::{
    AssociationBody, ContentRepository, DocumentList, Node, NodeBody, NodeUpdate, Notifier,
    RepoError,
};
use crate::vocabulary::{
    VeoStatus, ASSOC_LINKED_RECORD, PROP_CONSIGNMENT_ACCESS, PROP_CONSIGNMENT_ID,
    PROP_LINKED_RECORD_NAME, PROP_LINKED_RECORD_REF, PROP_RECORD_IDENTIFIER, PROP_VEO_ERROR_MESSAGE,
    PROP_VEO_GENERATED_AT, PROP_VEO_STATUS, TYPE_VEO, VEO_EXTENSION,
};

/// Why a record failed during the batch. Node-creation failure means no VEO
/// exists for the record; association failure means an orphaned VEO was
/// retained with status `failed`.
#[derive(Debug, Clone)]
pub enum VeoCreateError {
    NodeCreation(RepoError),
    Association(RepoError),
}

impl std::fmt::Display for VeoCreateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VeoCreateError::NodeCreation(e) => write!(f, "VEO node creation failed: {e}"),
            VeoCreateError::Association(e) => {
                write!(f, "VEO created but record association failed: {e}")
            }
        }
    }
}

impl std::error::Error for VeoCreateError {}

/// Settled result for one record in a batch.
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    pub record: Node,
    /// The created VEO node, present even when the association step failed.
    pub veo: Option<Node>,
    pub error: Option<VeoCreateError>,
}

impl RecordOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Partitioned batch result; `success` and `failure` are disjoint and
/// together cover every input record.
#[derive(Debug, Clone, Default)]
pub struct VeoBatchReport {
    pub success: Vec<RecordOutcome>,
    pub failure: Vec<RecordOutcome>,
}

impl VeoBatchReport {
    pub fn total(&self) -> usize {
        self.success.len() + self.failure.len()
    }
}

/// Derives the VEO name for a record: the record name minus its trailing
/// dot-extension (a leading dot is not an extension), a parenthesized
/// record identifier for folders, and the fixed extension.
pub fn veo_name(record: &Node) -> String {
    let base = match record.name.rfind('.') {
        Some(i) if i > 0 => &record.name[..i],
        _ => record.name.as_str(),
    };

    let mut name = base.to_string();
    if record.is_folder {
        let identifier = record.property_str(PROP_RECORD_IDENTIFIER).unwrap_or("");
        name.push_str(&format!("({identifier})"));
    }
    name.push_str(VEO_EXTENSION);
    name
}

fn veo_body(transfer: &Node, record: &Node) -> NodeBody {
    let mut properties = Map::new();
    properties.insert(
        PROP_VEO_STATUS.into(),
        Value::from(VeoStatus::Pending.as_str()),
    );
    if let Some(consignment_id) = transfer.property_str(PROP_CONSIGNMENT_ID) {
        properties.insert(PROP_CONSIGNMENT_ID.into(), Value::from(consignment_id));
    }
    if let Some(access) = transfer.property_str(PROP_CONSIGNMENT_ACCESS) {
        properties.insert(PROP_CONSIGNMENT_ACCESS.into(), Value::from(access));
    }
    properties.insert(PROP_LINKED_RECORD_REF.into(), Value::from(record.id.as_str()));
    properties.insert(
        PROP_LINKED_RECORD_NAME.into(),
        Value::from(record.name.as_str()),
    );
    properties.insert(
        PROP_VEO_GENERATED_AT.into(),
        Value::from(chrono::Utc::now().to_rfc3339()),
    );

    NodeBody {
        name: veo_name(record),
        node_type: TYPE_VEO.into(),
        properties,
    }
}

/// Creates one VEO per record under the transfer container, concurrently,
/// and partitions the settled outcomes into a [`VeoBatchReport`].
pub async fn create_veos<R>(repo: &R, transfer: &Node, records: &[Node]) -> VeoBatchReport
where
    R: ContentRepository,
{
    info!(
        transfer_id = %transfer.id,
        records = records.len(),
        "Starting VEO creation batch"
    );

    let outcomes = join_all(
        records
            .iter()
            .map(|record| create_one_veo(repo, transfer, record)),
    )
    .await;

    let mut report = VeoBatchReport::default();
    for outcome in outcomes {
        if outcome.succeeded() {
            report.success.push(outcome);
        } else {
            report.failure.push(outcome);
        }
    }

    info!(
        succeeded = report.success.len(),
        failed = report.failure.len(),
        "VEO creation batch settled"
    );
    report
}

/// Creates a single VEO and its association. Always settles into a
/// [`RecordOutcome`]; remote failures are captured, never propagated.
async fn create_one_veo<R>(repo: &R, transfer: &Node, record: &Node) -> RecordOutcome
where
    R: ContentRepository,
{
    debug!(record_id = %record.id, record_name = %record.name, "Creating VEO for record");

    let veo = match repo.create_node(transfer.id.as_str(), veo_body(transfer, record)).await {
        Ok(veo) => {
            info!(record_name = %record.name, veo_id = %veo.id, "Created VEO node");
            veo
        }
        Err(e) => {
            error!(record_name = %record.name, error = %e, "Failed to create VEO node");
            return RecordOutcome {
                record: record.clone(),
                veo: None,
                error: Some(VeoCreateError::NodeCreation(e)),
            };
        }
    };

    let association = AssociationBody {
        target_id: record.id.clone(),
        assoc_type: ASSOC_LINKED_RECORD.into(),
    };
    match repo.create_association(veo.id.as_str(), association).await {
        Ok(()) => RecordOutcome {
            record: record.clone(),
            veo: Some(veo),
            error: None,
        },
        Err(assoc_err) => {
            warn!(
                record_name = %record.name,
                veo_id = %veo.id,
                error = %assoc_err,
                "Failed to associate VEO with record; marking VEO failed"
            );
            // The orphaned VEO is retained on purpose: the transfer folder is
            // human-auditable and the out-of-band exporter must not pick it up.
            let veo = match update_veo_status(
                repo,
                veo.id.as_str(),
                VeoStatus::Failed,
                Some(&assoc_err.to_string()),
            )
            .await
            {
                Ok(updated) => updated,
                Err(update_err) => {
                    error!(veo_id = %veo.id, error = %update_err, "Failed to downgrade VEO status");
                    veo
                }
            };
            RecordOutcome {
                record: record.clone(),
                veo: Some(veo),
                error: Some(VeoCreateError::Association(assoc_err)),
            }
        }
    }
}

/// Completion callback for a settled batch: one aggregate notification and a
/// single listing refresh, regardless of batch size.
pub fn announce_batch(report: &VeoBatchReport, notifier: &dyn Notifier, list: &dyn DocumentList) {
    if report.failure.is_empty() {
        notifier.show_info(&format!(
            "{} records have been queued for VEO creation",
            report.success.len()
        ));
    } else {
        let failed_names: Vec<&str> = report
            .failure
            .iter()
            .map(|outcome| outcome.record.name.as_str())
            .collect();
        notifier.show_error(&format!(
            "Could not create VEOs for {}",
            failed_names.join(", ")
        ));
    }
    list.reload();
}

/// Queues VEOs for a set of records: runs the batch, then notifies and
/// refreshes exactly once.
pub async fn queue_veos_for_creation<R>(
    repo: &R,
    notifier: &dyn Notifier,
    list: &dyn DocumentList,
    transfer: &Node,
    records: &[Node],
) -> VeoBatchReport
where
    R: ContentRepository,
{
    let report = create_veos(repo, transfer, records).await;
    announce_batch(&report, notifier, list);
    report
}

/// Updates the status property of a VEO in place, optionally recording an
/// error message alongside a `failed` status.
pub async fn update_veo_status<R>(
    repo: &R,
    veo_id: &str,
    status: VeoStatus,
    error_message: Option<&str>,
) -> Result<Node, RepoError>
where
    R: ContentRepository,
{
    debug!(veo_id, status = %status, "Updating VEO status");
    let mut properties = Map::new();
    properties.insert(PROP_VEO_STATUS.into(), Value::from(status.as_str()));
    if let Some(message) = error_message {
        properties.insert(PROP_VEO_ERROR_MESSAGE.into(), Value::from(message));
    }
    repo.update_node(
        veo_id,
        NodeUpdate {
            name: None,
            properties,
        },
    )
    .await
}

/// Resubmits a single VEO: flips its status back to `pending` so the
/// out-of-band exporter picks it up again. Never recreates the node or the
/// association.
pub async fn retry_veo_creation<R>(
    repo: &R,
    notifier: &dyn Notifier,
    veo: &Node,
) -> Result<(), RepoError>
where
    R: ContentRepository,
{
    info!(veo_id = %veo.id, veo_name = %veo.name, "Retrying VEO creation");
    match update_veo_status(repo, veo.id.as_str(), VeoStatus::Pending, None).await {
        Ok(updated) => {
            notifier.show_info(&format!(
                "The VEO create retry has been queued for {}",
                updated.name
            ));
            Ok(())
        }
        Err(e) => {
            error!(veo_id = %veo.id, error = %e, "Failed to queue VEO retry");
            notifier.show_error(&format!("Could not queue VEO retry for {}", veo.name));
            Err(e)
        }
    }
}

/// Finds the VEO linked to a record, if any, by following the fixed
/// association type backwards. At most one such association exists per VEO;
/// the first entry wins.
pub async fn veo_for_record<R>(repo: &R, record: &Node) -> Result<Option<Node>, RepoError>
where
    R: ContentRepository,
{
    let associations = repo
        .list_source_associations(record.id.as_str(), ASSOC_LINKED_RECORD)
        .await?;
    Ok(associations.into_iter().next().map(|assoc| assoc.node))
}

/// Finds the record a VEO was generated from. Returns `None` for nodes that
/// are not VEOs.
pub async fn record_for_veo<R>(repo: &R, veo: &Node) -> Result<Option<Node>, RepoError>
where
    R: ContentRepository,
{
    if veo.node_type != TYPE_VEO {
        return Ok(None);
    }
    let associations = repo
        .list_target_associations(veo.id.as_str(), ASSOC_LINKED_RECORD)
        .await?;
    Ok(associations.into_iter().next().map(|assoc| assoc.node))
}
