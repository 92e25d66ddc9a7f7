// ABOUTME: Delete command - confirm-then-delete for one entity
//
// Without --force the confirmation dialog is rendered as a y/N prompt on stdin.

use super::util::print_json;
use super::{Console, DeleteArgs, OutputFormat};
use crate::api::ResourceFamily;
use crate::controllers::{DeleteAction, DeleteOutcome};
use crate::models::KeyManagerInfo;
use anyhow::{anyhow, Context, Result};
use serde_json::json;
use std::io::{self, BufRead, IsTerminal, Write};

/// Execute the delete command
pub async fn execute(console: &Console, args: &DeleteArgs, format: OutputFormat) -> Result<()> {
    if args.family == ResourceFamily::KeyManagers {
        ensure_key_manager_deletable(console, &args.id).await?;
    }

    let mut action = DeleteAction::new(
        console.api.resource(args.family),
        console.intl.clone(),
        console.notifier.clone(),
    );

    let outcome = if args.force {
        action.delete_now(&args.id).await
    } else {
        if !io::stdin().is_terminal() {
            return Err(anyhow!("Refusing to delete without confirmation; pass --force"));
        }
        let confirmation = action.request(args.id.clone());
        let accepted = prompt_yes_no(&confirmation.title, &confirmation.message)?;
        if accepted {
            if let Some(confirmation) = action.confirmation_mut() {
                confirmation.toggle();
            }
        }
        action.confirm().await
    };

    let (status, message) = match &outcome {
        DeleteOutcome::Deleted(message) => ("deleted", message.as_str()),
        DeleteOutcome::Failed(message) => ("failed", message.as_str()),
        DeleteOutcome::Cancelled => ("cancelled", "Delete cancelled"),
    };
    match format {
        OutputFormat::Json => print_json(&json!({
            "family": args.family.as_str(),
            "id": args.id,
            "outcome": status,
            "message": message,
        }))?,
        OutputFormat::Text => {
            if outcome == DeleteOutcome::Cancelled {
                println!("{message}");
            }
        }
    }

    match outcome {
        DeleteOutcome::Failed(_) => Err(anyhow!("Delete of {} {} failed", args.family, args.id)),
        DeleteOutcome::Deleted(_) | DeleteOutcome::Cancelled => Ok(()),
    }
}

/// The resident key manager is never offered for deletion
async fn ensure_key_manager_deletable(console: &Console, id: &str) -> Result<()> {
    let path = ResourceFamily::KeyManagers.item_path(id);
    let manager: KeyManagerInfo = console
        .api
        .resource(ResourceFamily::KeyManagers)
        .get(id)
        .await
        .and_then(|response| response.decode(&path))
        .map_err(|e| anyhow!(e.user_message(console.intl.as_ref())))?;

    // apimctl runs with the credentials of a super tenant admin
    if !manager.is_deletable(true) {
        return Err(anyhow!("Key manager '{}' cannot be deleted", manager.name));
    }
    Ok(())
}

fn prompt_yes_no(title: &str, message: &str) -> Result<bool> {
    let mut stdout = io::stdout();
    write!(stdout, "{title}\n{message} [y/N] ")?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
