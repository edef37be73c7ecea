use std::sync::Arc;

use fleet_core::status::NOT_FOUND;
use fleet_core::{ErrorDisposition, FleetError, FleetResult};
use fleet_domain::User;

use crate::provider::{ImageProvider, ProviderSlot};
use crate::report::ErrorReporter;
use crate::session::SyncSession;

pub const USER_ERROR_KEY: &str = "users.userUnexpectedError";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarOutcome {
    /// A new user value carrying the fetched image.
    Loaded(User),
    NoImage,
    Cancelled,
    /// The error has already been reported.
    Failed,
}

/// What the avatar widget should draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarSource {
    Placeholder,
    Image(String),
    Initials(String),
}

/// Users without a displayable name get the placeholder picture, users
/// without an image get their initials.
pub fn avatar_source(user: Option<&User>) -> AvatarSource {
    match user {
        None => AvatarSource::Placeholder,
        Some(user) if !user.has_display_name() => AvatarSource::Placeholder,
        Some(user) => match user.image.as_deref() {
            Some(image) if !image.is_empty() => AvatarSource::Image(image.to_string()),
            _ => AvatarSource::Initials(user.initials()),
        },
    }
}

/// Loads user pictures for one mounted avatar.
pub struct AvatarLoader {
    provider: Arc<ProviderSlot<dyn ImageProvider>>,
    reporter: Arc<dyn ErrorReporter>,
    session: SyncSession,
}

impl AvatarLoader {
    pub fn new(
        provider: Arc<ProviderSlot<dyn ImageProvider>>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            provider,
            reporter,
            session: SyncSession::new(),
        }
    }

    pub async fn load(&self, user: &User) -> AvatarOutcome {
        match self.fetch(&user.id).await {
            Ok(Some(image)) => AvatarOutcome::Loaded(user.with_image(image)),
            Ok(None) => AvatarOutcome::NoImage,
            Err(e) if e.is_cancelled() => {
                tracing::debug!(user = %user.id, "Unmounting avatar, image request cancelled");
                AvatarOutcome::Cancelled
            }
            Err(FleetError::Http {
                status: NOT_FOUND, ..
            }) => {
                tracing::debug!(user = %user.id, "User has no picture");
                AvatarOutcome::NoImage
            }
            Err(e) => match e.disposition() {
                ErrorDisposition::EmptyResult => AvatarOutcome::NoImage,
                ErrorDisposition::Retry | ErrorDisposition::Report => {
                    self.reporter
                        .handle_unexpected_error(&e, USER_ERROR_KEY, None);
                    AvatarOutcome::Failed
                }
            },
        }
    }

    /// Reloads when `incoming` is a different user, or the same one still
    /// shown without a picture. `None` means the displayed avatar is current.
    pub async fn refresh_if_changed(
        &self,
        displayed: &User,
        incoming: &User,
    ) -> Option<AvatarOutcome> {
        let same_user = User {
            image: None,
            ..displayed.clone()
        } == User {
            image: None,
            ..incoming.clone()
        };
        if same_user && displayed.image.is_some() {
            return None;
        }
        Some(self.load(incoming).await)
    }

    pub fn teardown(&self) {
        self.session.cancel();
    }

    async fn fetch(&self, id: &str) -> FleetResult<Option<String>> {
        let token = self.session.request_token();
        if token.is_cancelled() {
            return Err(FleetError::Cancelled);
        }
        let provider = self.provider.get()?;
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(FleetError::Cancelled),
            result = provider.fetch_user_image(id, &token) => result,
        }
    }
}
