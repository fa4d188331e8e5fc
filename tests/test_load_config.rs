use std::env;
use std::fs::write;

use serial_test::serial;
use tempfile::NamedTempFile;

use veo_transfer::load_config::load_config;

#[test]
#[serial]
fn loads_config_and_injects_token_from_env() {
    let file = NamedTempFile::new().unwrap();
    write(
        file.path(),
        r#"
repository:
  base_url: https://repo.example/api/-default-/public/alfresco/versions/1
transfers:
  site_library_path: /Sites/veo-transfers/documentLibrary
  root_folder_name: Transfers
"#,
    )
    .unwrap();

    env::set_var("REPO_AUTH_TOKEN", "secret-token");
    let config = load_config(file.path()).expect("config should load");
    env::remove_var("REPO_AUTH_TOKEN");

    assert_eq!(
        config.repository.base_url,
        "https://repo.example/api/-default-/public/alfresco/versions/1"
    );
    assert_eq!(config.repository.auth_token.as_deref(), Some("secret-token"));
    assert_eq!(config.transfers.root_folder_name, "Transfers");
}

#[test]
#[serial]
fn missing_token_means_anonymous_access() {
    let file = NamedTempFile::new().unwrap();
    write(
        file.path(),
        "repository:\n  base_url: https://repo.example/api\n",
    )
    .unwrap();

    env::remove_var("REPO_AUTH_TOKEN");
    let config = load_config(file.path()).expect("config should load");
    assert!(config.repository.auth_token.is_none());
}

#[test]
#[serial]
fn transfers_section_defaults_when_absent() {
    let file = NamedTempFile::new().unwrap();
    write(
        file.path(),
        "repository:\n  base_url: https://repo.example/api\n",
    )
    .unwrap();

    let config = load_config(file.path()).expect("config should load");
    assert_eq!(
        config.transfers.site_library_path,
        "/Sites/veo-transfers/documentLibrary"
    );
    assert_eq!(config.transfers.root_folder_name, "Transfers");
}

#[test]
#[serial]
fn missing_file_is_an_error() {
    assert!(load_config("/definitely/not/here.yaml").is_err());
}

#[test]
#[serial]
fn malformed_yaml_is_an_error() {
    let file = NamedTempFile::new().unwrap();
    write(file.path(), "repository: [not, a, mapping").unwrap();
    assert!(load_config(file.path()).is_err());
}

#[test]
#[serial]
fn empty_base_url_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    write(file.path(), "repository:\n  base_url: \"\"\n").unwrap();
    assert!(load_config(file.path()).is_err());
}
