// ABOUTME: Confirm-then-delete action for one entity family
// The list is asked to reload whether the delete succeeded or failed

use crate::api::{ResourceClient, ResourceFamily};
use crate::controllers::list::ReloadTrigger;
use crate::i18n::{Localizer, Message};
use crate::notify::Notifier;
use std::sync::Arc;
use tracing::{info, warn};

/// Localized texts of a family's delete dialog
#[derive(Debug, Clone, Copy)]
pub struct DeleteMessages {
    pub title: Message,
    pub confirmation: Message,
    pub success: Message,
}

impl DeleteMessages {
    pub fn for_family(family: ResourceFamily) -> Self {
        match family {
            ResourceFamily::KeyManagers => Self {
                title: Message::new("AdminPages.KeyManagers.Delete.form.delete.dialog.title", "Delete KeyManager ?"),
                confirmation: Message::new(
                    "AdminPages.KeyManager.Delete.form.delete.confirmation.message",
                    "Are you sure you want to delete this KeyManager ?",
                ),
                success: Message::new(
                    "AdminPages.KeyManagers.Delete.form.delete.successful",
                    "KeyManager deleted successfully",
                ),
            },
            ResourceFamily::ApiCategories => Self {
                title: Message::new("AdminPages.ApiCategories.Delete.form.delete.dialog.title", "Delete API category?"),
                confirmation: Message::new(
                    "AdminPages.ApiCategories.Delete.form.delete.confirmation.message",
                    "Are you sure you want to delete this API Category?",
                ),
                success: Message::new(
                    "AdminPages.ApiCategories.Delete.form.delete.successful",
                    "API Category deleted successfully",
                ),
            },
            ResourceFamily::DenyPolicies => Self {
                title: Message::new("Throttling.Blacklist.Policy.Delete.dialog.title", "Delete Deny Policy?"),
                confirmation: Message::new(
                    "Throttling.Blacklist.Policy.Delete.confirmation.message",
                    "Are you sure you want to delete this Deny Policy?",
                ),
                success: Message::new(
                    "Throttling.Blacklist.Policy.Delete.successful",
                    "Deny Policy deleted successfully",
                ),
            },
            ResourceFamily::ApplicationPolicies
            | ResourceFamily::SubscriptionPolicies
            | ResourceFamily::AdvancedPolicies => Self {
                title: Message::new("Throttling.Policy.Delete.dialog.title", "Delete Policy?"),
                confirmation: Message::new(
                    "Throttling.Policy.Delete.confirmation.message",
                    "Are you sure you want to delete this Policy?",
                ),
                success: Message::new("Throttling.Policy.Delete.successful", "Policy deleted successfully"),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmChoice {
    Yes,
    #[default]
    No,
}

/// Open confirmation dialog for one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub id: String,
    pub title: String,
    pub message: String,
    pub selection: ConfirmChoice,
}

impl Confirmation {
    pub fn toggle(&mut self) {
        self.selection = match self.selection {
            ConfirmChoice::Yes => ConfirmChoice::No,
            ConfirmChoice::No => ConfirmChoice::Yes,
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(String),
    Failed(String),
    Cancelled,
}

pub struct DeleteAction {
    resource: ResourceClient,
    messages: DeleteMessages,
    intl: Arc<dyn Localizer>,
    notifier: Arc<dyn Notifier>,
    reload: Option<ReloadTrigger>,
    confirmation: Option<Confirmation>,
}

impl DeleteAction {
    pub fn new(resource: ResourceClient, intl: Arc<dyn Localizer>, notifier: Arc<dyn Notifier>) -> Self {
        let messages = DeleteMessages::for_family(resource.family());
        Self {
            resource,
            messages,
            intl,
            notifier,
            reload: None,
            confirmation: None,
        }
    }

    pub fn with_reload(mut self, trigger: ReloadTrigger) -> Self {
        self.reload = Some(trigger);
        self
    }

    /// Open the confirmation dialog; selection starts on "No"
    pub fn request(&mut self, id: impl Into<String>) -> &Confirmation {
        self.confirmation.insert(Confirmation {
            id: id.into(),
            title: self.intl.text(&self.messages.title),
            message: self.intl.text(&self.messages.confirmation),
            selection: ConfirmChoice::No,
        })
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn confirmation_mut(&mut self) -> Option<&mut Confirmation> {
        self.confirmation.as_mut()
    }

    pub fn cancel(&mut self) {
        self.confirmation = None;
    }

    /// Act on the dialog's current selection and close it
    pub async fn confirm(&mut self) -> DeleteOutcome {
        let Some(confirmation) = self.confirmation.take() else {
            return DeleteOutcome::Cancelled;
        };
        if confirmation.selection == ConfirmChoice::No {
            return DeleteOutcome::Cancelled;
        }
        self.delete_now(&confirmation.id).await
    }

    /// Delete without a confirmation dialog
    pub async fn delete_now(&self, id: &str) -> DeleteOutcome {
        let path = self.resource.family().item_path(id);
        let result = match self.resource.delete(id).await {
            Ok(response) => response.into_result(&path).map(|_| ()),
            Err(e) => Err(e),
        };

        let outcome = match result {
            Ok(()) => {
                info!(family = %self.resource.family(), id, "Deleted entity");
                let message = self.intl.text(&self.messages.success);
                self.notifier.success(message.clone());
                DeleteOutcome::Deleted(message)
            }
            Err(e) => {
                warn!(family = %self.resource.family(), id, "Delete failed: {}", e);
                let message = e.user_message(self.intl.as_ref());
                self.notifier.error(message.clone());
                DeleteOutcome::Failed(message)
            }
        };

        if let Some(trigger) = &self.reload {
            trigger.request();
        }
        outcome
    }
}
