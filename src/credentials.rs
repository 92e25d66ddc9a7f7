// ABOUTME: Access token storage using the system keychain
// Uses keyring crate for cross-platform support (macOS Keychain, Linux Secret Service)

use crate::config::TOKEN_ENV;
use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "apim-console";

/// Credential keys for different secrets
pub enum CredentialKey {
    AccessToken,
}

impl CredentialKey {
    fn as_str(&self) -> &'static str {
        match self {
            CredentialKey::AccessToken => "access_token",
        }
    }
}

/// Store a credential in the system keychain
pub fn store_credential(key: CredentialKey, value: &str) -> Result<()> {
    let entry = Entry::new(SERVICE_NAME, key.as_str())
        .context("Failed to create keyring entry")?;

    entry
        .set_password(value)
        .context("Failed to store credential in keychain")?;

    tracing::info!("Stored credential: {}", key.as_str());
    Ok(())
}

/// Retrieve a credential from the system keychain
pub fn get_credential(key: CredentialKey) -> Result<Option<String>> {
    let entry = Entry::new(SERVICE_NAME, key.as_str())
        .context("Failed to create keyring entry")?;

    match entry.get_password() {
        Ok(password) => {
            tracing::debug!("Retrieved credential: {}", key.as_str());
            Ok(Some(password))
        }
        Err(keyring::Error::NoEntry) => {
            tracing::debug!("No credential found for: {}", key.as_str());
            Ok(None)
        }
        Err(e) => {
            tracing::warn!("Failed to retrieve credential {}: {}", key.as_str(), e);
            Err(anyhow::anyhow!("Failed to retrieve credential: {}", e))
        }
    }
}

/// Delete a credential from the system keychain
pub fn delete_credential(key: CredentialKey) -> Result<()> {
    let entry = Entry::new(SERVICE_NAME, key.as_str())
        .context("Failed to create keyring entry")?;

    match entry.delete_credential() {
        Ok(()) => {
            tracing::info!("Deleted credential: {}", key.as_str());
            Ok(())
        }
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(anyhow::anyhow!("Failed to delete credential: {}", e)),
    }
}

/// Store the admin API bearer token
pub fn store_access_token(token: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        return Err(anyhow::anyhow!("Access token cannot be empty"));
    }
    store_credential(CredentialKey::AccessToken, token)
}

pub fn delete_access_token() -> Result<()> {
    delete_credential(CredentialKey::AccessToken)
}

/// Token from the environment first, then the keychain
pub fn resolve_access_token() -> Result<Option<String>> {
    resolve_with(
        std::env::var(TOKEN_ENV).ok(),
        || get_credential(CredentialKey::AccessToken),
    )
}

fn resolve_with<F>(from_env: Option<String>, from_keychain: F) -> Result<Option<String>>
where
    F: FnOnce() -> Result<Option<String>>,
{
    match from_env.filter(|t| !t.trim().is_empty()) {
        Some(token) => {
            tracing::debug!("Using access token from {}", TOKEN_ENV);
            Ok(Some(token))
        }
        None => from_keychain(),
    }
}

/// Masked display of the stored token
pub fn masked(token: &str) -> String {
    if token.chars().count() > 8 {
        let prefix: String = token.chars().take(4).collect();
        format!("{prefix}••••••••")
    } else {
        "••••••••".to_string()
    }
}
