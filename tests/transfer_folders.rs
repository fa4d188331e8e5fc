//! Transfer root resolution and folder idempotence tests.

use veo_transfer::config::TransfersConfig;
use veo_transfer::contract::{MockContentRepository, Node};
use veo_transfer::transfers::{get_or_create_folder, transfers_root};
use veo_transfer::vocabulary::{TYPE_FOLDER, TYPE_TRANSFER};

fn folder(id: &str, name: &str, node_type: &str) -> Node {
    Node {
        id: id.into(),
        name: name.into(),
        node_type: node_type.into(),
        is_folder: true,
        ..Node::default()
    }
}

#[tokio::test]
async fn existing_folder_is_returned_without_creation() {
    let mut repo = MockContentRepository::new();
    repo.expect_get_node_children()
        .times(1)
        .returning(|_| Ok(vec![folder("f-1", "transfers", TYPE_FOLDER)]));
    // No create_folder expectation: creating would fail the test.

    // Case-insensitive name match, exact type match.
    let resolved = get_or_create_folder(&repo, "Transfers", TYPE_FOLDER, "parent-1")
        .await
        .unwrap();
    assert_eq!(resolved.id, "f-1");
}

#[tokio::test]
async fn name_match_with_different_type_creates_a_new_folder() {
    let mut repo = MockContentRepository::new();
    repo.expect_get_node_children()
        .times(1)
        .returning(|_| Ok(vec![folder("t-1", "Transfers", TYPE_TRANSFER)]));
    repo.expect_create_folder()
        .times(1)
        .withf(|parent_id, body| {
            parent_id == "parent-1" && body.name == "Transfers" && body.node_type == TYPE_FOLDER
        })
        .returning(|_, body| Ok(folder("f-new", &body.name, &body.node_type)));

    let resolved = get_or_create_folder(&repo, "Transfers", TYPE_FOLDER, "parent-1")
        .await
        .unwrap();
    assert_eq!(resolved.id, "f-new");
}

#[tokio::test]
async fn two_sequential_calls_resolve_to_the_same_node() {
    let mut repo = MockContentRepository::new();

    // First call: empty parent, folder gets created.
    repo.expect_get_node_children()
        .times(1)
        .returning(|_| Ok(vec![]));
    repo.expect_create_folder()
        .times(1)
        .returning(|_, body| Ok(folder("f-1", &body.name, &body.node_type)));
    // Second call: the folder now exists.
    repo.expect_get_node_children()
        .times(1)
        .returning(|_| Ok(vec![folder("f-1", "Transfers", TYPE_FOLDER)]));

    let first = get_or_create_folder(&repo, "Transfers", TYPE_FOLDER, "parent-1")
        .await
        .unwrap();
    let second = get_or_create_folder(&repo, "Transfers", TYPE_FOLDER, "parent-1")
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn transfers_root_resolves_library_then_transfers_folder() {
    let cfg = TransfersConfig::default();

    let mut repo = MockContentRepository::new();
    repo.expect_get_node_at_path()
        .times(1)
        .withf(|node_id, relative_path| {
            node_id == "-root-" && relative_path == "/Sites/veo-transfers/documentLibrary"
        })
        .returning(|_, _| Ok(folder("lib-1", "documentLibrary", TYPE_FOLDER)));
    repo.expect_get_node_children()
        .times(1)
        .withf(|node_id| node_id == "lib-1")
        .returning(|_| Ok(vec![folder("root-1", "Transfers", TYPE_FOLDER)]));

    let root = transfers_root(&repo, &cfg).await.unwrap();
    assert_eq!(root.id, "root-1");
}
