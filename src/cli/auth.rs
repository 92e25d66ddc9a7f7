// ABOUTME: Auth command - store or clear the admin API access token in the system keychain

use super::AuthArgs;
use crate::config::TOKEN_ENV;
use crate::credentials;
use anyhow::Result;

/// Execute the auth command
pub fn execute(args: &AuthArgs) -> Result<()> {
    if args.clear {
        credentials::delete_access_token()?;
        println!("Access token removed from the system keychain.");
        return Ok(());
    }

    if let Some(token) = &args.token {
        credentials::store_access_token(token)?;
        println!("Access token {} stored in the system keychain.", credentials::masked(token.trim()));
        if std::env::var(TOKEN_ENV).is_ok_and(|v| !v.trim().is_empty()) {
            println!("Note: {TOKEN_ENV} is set and takes precedence over the stored token.");
        }
    }
    Ok(())
}
