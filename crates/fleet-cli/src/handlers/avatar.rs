use std::sync::Arc;

use fleet_domain::User;
use fleet_sync::{
    avatar_source, AvatarLoader, AvatarOutcome, AvatarSource, ImageProvider, InMemoryImageProvider,
    ProviderSlot,
};
use serde::Serialize;

use crate::cli::AvatarArgs;
use crate::context::{CliContext, Fixture};
use crate::output;

#[derive(Serialize)]
struct AvatarReport {
    outcome: &'static str,
    source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    initials: Option<String>,
    user: User,
}

pub async fn handle(ctx: &CliContext, args: AvatarArgs) -> anyhow::Result<()> {
    let fixture = Fixture::load(&args.fixture)?;
    let user = fixture
        .find_user(&args.user_id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("User not found: {}", args.user_id))?;

    let mut images = InMemoryImageProvider::new(fixture.images);
    if let Some(status) = args.fail_status {
        images = images.with_failure(status);
    }
    let image_provider: Arc<dyn ImageProvider> = Arc::new(images);
    let loader = AvatarLoader::new(
        Arc::new(ProviderSlot::ready(image_provider)),
        ctx.reporter.clone(),
    );

    let outcome = loader.load(&user).await;
    loader.teardown();
    ctx.check_reports()?;

    let (outcome, user) = match outcome {
        AvatarOutcome::Loaded(loaded) => ("loaded", loaded),
        AvatarOutcome::NoImage => ("no_image", user),
        AvatarOutcome::Cancelled => ("cancelled", user),
        AvatarOutcome::Failed => ("failed", user),
    };
    let (source, initials) = match avatar_source(Some(&user)) {
        AvatarSource::Placeholder => ("placeholder", None),
        AvatarSource::Image(_) => ("image", None),
        AvatarSource::Initials(initials) => ("initials", Some(initials)),
    };

    output::output_success(AvatarReport {
        outcome,
        source,
        initials,
        user,
    })
}
