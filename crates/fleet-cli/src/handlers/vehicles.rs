use std::sync::Arc;

use fleet_domain::Vehicle;
use fleet_sync::{InMemoryProvider, ListProvider, ListScreen, ProviderSlot, RemoteListFetcher};
use serde::Serialize;

use crate::cli::VehiclesArgs;
use crate::context::{CliContext, Fixture};
use crate::output;

pub const VEHICLE_ERROR_KEY: &str = "cars.carUnexpectedError";

#[derive(Serialize)]
struct VehiclesReport {
    #[serde(flatten)]
    list: fleet_sync::ListSnapshot<Vehicle>,
    requests: usize,
}

pub async fn handle(ctx: &CliContext, args: VehiclesArgs) -> anyhow::Result<()> {
    let fixture = Fixture::load(&args.fixture)?;

    let mut provider = InMemoryProvider::new(fixture.vehicles);
    if args.unknown_count {
        provider = provider.with_unknown_count_once();
    }
    if let Some(status) = args.fail_status {
        provider = provider.with_failure(status);
    }
    let provider = Arc::new(provider);
    let list_provider: Arc<dyn ListProvider<Vehicle>> = provider.clone();
    let fetcher = RemoteListFetcher::new(
        Arc::new(ProviderSlot::ready(list_provider)),
        ctx.reporter.clone(),
        VEHICLE_ERROR_KEY,
    );

    let screen = ListScreen::new(fetcher, &ctx.config);
    screen.mount().await;
    if let Some(text) = &args.search {
        screen.search(text).await;
    }
    for _ in 1..args.pages {
        if !screen.on_end_reached().await {
            break;
        }
    }
    if args.refresh {
        screen.manual_refresh().await;
    }
    let list = screen.snapshot();
    screen.unmount();

    ctx.check_reports()?;
    output::output_success(VehiclesReport {
        list,
        requests: provider.request_count(),
    })
}
