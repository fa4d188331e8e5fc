//! Action dispatch tests: selection fallback and form-level error surfacing.

use veo_transfer::actions::{handle, AppState, VersAction};
use veo_transfer::config::TransfersConfig;
use veo_transfer::contract::{
    MockContentRepository, MockDocumentList, MockNotifier, Node, RepoError,
};
use veo_transfer::transfers::TransferForm;
use veo_transfer::vocabulary::TYPE_FOLDER;

fn folder(id: &str, name: &str) -> Node {
    Node {
        id: id.into(),
        name: name.into(),
        node_type: TYPE_FOLDER.into(),
        is_folder: true,
        ..Node::default()
    }
}

#[tokio::test]
async fn create_transfer_conflict_surfaces_existing_folder_message() {
    let mut repo = MockContentRepository::new();
    repo.expect_get_node_at_path()
        .returning(|_, _| Ok(folder("lib-1", "documentLibrary")));
    repo.expect_get_node_children()
        .returning(|_| Ok(vec![folder("root-1", "Transfers")]));
    repo.expect_create_folder().times(1).returning(|_, _| {
        Err(RepoError::Http {
            status: 409,
            message: "Duplicate child name not allowed".into(),
        })
    });

    let mut notifier = MockNotifier::new();
    notifier
        .expect_show_error()
        .times(1)
        .withf(|message| message == "A folder with this name already exists")
        .return_const(());

    let list = MockDocumentList::new();

    let form = TransferForm {
        name: "Consignment A".into(),
        consignment_id: "VPRS-123".into(),
        access: "open".into(),
        ..TransferForm::default()
    };
    handle(
        &repo,
        &notifier,
        &list,
        &TransfersConfig::default(),
        &AppState::default(),
        VersAction::CreateTransfer(form),
    )
    .await;
}

#[tokio::test]
async fn create_veos_without_payload_or_selection_makes_no_calls() {
    // No expectations anywhere: any remote call or notification fails the test.
    let repo = MockContentRepository::new();
    let notifier = MockNotifier::new();
    let list = MockDocumentList::new();

    let transfer = folder("transfer-1", "Consignment A");
    handle(
        &repo,
        &notifier,
        &list,
        &TransfersConfig::default(),
        &AppState::default(),
        VersAction::CreateVeos {
            transfer,
            record: None,
        },
    )
    .await;
}
