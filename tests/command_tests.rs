use nyaya_gpt::cli::DocumentSource;
use nyaya_gpt::commands::{argue, contract};
use nyaya_gpt::core::config::Config;
use nyaya_gpt::core::context::AppCtx;

/// A context whose provider key can never be resolved.
fn keyless_ctx(dir: &std::path::Path) -> AppCtx {
    let config = Config::parse(
        r#"
        [provider]
        backend = "openai"
        api_key_env = "NYAYA_COMMAND_TESTS_NO_SUCH_KEY"
        "#,
    )
    .unwrap();
    assert!(config.provider.settings().is_err());
    AppCtx {
        base_dir: dir.to_path_buf(),
        data_dir: dir.join("data"),
        config,
    }
}

#[tokio::test]
async fn contract_without_input_asks_for_input_before_the_key() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = keyless_ctx(dir.path());

    let err = contract::run(&ctx, Some("  ".to_string()), &DocumentSource::default(), None)
        .await
        .unwrap_err();
    assert_eq!(err, "Provide either contract text or a document to analyze.");
}

#[tokio::test]
async fn argue_without_input_asks_for_input_before_the_key() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = keyless_ctx(dir.path());

    let err = argue::run(&ctx, None, &DocumentSource::default(), None)
        .await
        .unwrap_err();
    assert_eq!(err, "Provide either a prompt or a document to argue from.");
}

#[tokio::test]
async fn valid_input_still_needs_the_key() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = keyless_ctx(dir.path());

    let err = argue::run(
        &ctx,
        Some("Defend a tenant against eviction for late rent".to_string()),
        &DocumentSource::default(),
        None,
    )
    .await
    .unwrap_err();
    assert!(err.contains("NYAYA_COMMAND_TESTS_NO_SUCH_KEY"));
}
