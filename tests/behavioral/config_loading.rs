// ABOUTME: Behavioral tests for configuration loading and the locale catalog
// Verifies partial config files keep defaults and that catalog translations reach controller messages

use crate::fixtures::Harness;
use apim_console::api::ResourceFamily;
use apim_console::config::AppConfig;
use apim_console::controllers::{FormController, SubmitOutcome};
use apim_console::forms::ApplicationPolicyForm;
use apim_console::i18n::CatalogLocalizer;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_partial_file_keeps_remaining_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[backend]\nbase_url = \"https://apim.example.com:9443\"\ntimeout_secs = 5\n",
    )
    .unwrap();

    let config = AppConfig::load_from_paths(&[path]).unwrap();
    let settings = config.http_settings(Some("token".to_string()));

    assert_eq!(settings.base_url, "https://apim.example.com:9443");
    assert_eq!(settings.api_path, "/api/am/admin/v4");
    assert_eq!(settings.timeout, Duration::from_secs(5));
    assert_eq!(settings.token.as_deref(), Some("token"));
    assert!(!config.ui.case_sensitive_search());
}

#[test]
fn test_missing_files_are_skipped() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::load_from_paths(&[dir.path().join("absent.toml")]).unwrap();
    assert_eq!(config.backend.base_url, AppConfig::default().backend.base_url);
}

#[tokio::test]
async fn test_catalog_translation_reaches_validation_message() {
    let dir = TempDir::new().unwrap();
    let catalog = dir.path().join("fr.json");
    std::fs::write(
        &catalog,
        r#"{"Throttling.Application.Policy.policy.name.empty": "Le nom est vide"}"#,
    )
    .unwrap();

    let h = Harness::new();
    let intl = Arc::new(CatalogLocalizer::load(&catalog).unwrap());
    let form = ApplicationPolicyForm::new(h.api.resource(ResourceFamily::ApplicationPolicies));
    let mut form = FormController::new(form, intl, h.log.clone());
    form.open(None).await;
    form.set_field("requestCount", 1).unwrap();
    form.set_field("unitTime", 1).unwrap();

    assert_eq!(form.submit().await, SubmitOutcome::Invalid("Le nom est vide".to_string()));
    assert_eq!(h.backend.request_count(), 0);
}
