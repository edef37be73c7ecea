use fleet_core::AppConfig;
use serde::Serialize;

use crate::context::CliContext;
use crate::output;

#[derive(Serialize)]
struct ConfigReport<'a> {
    path: Option<String>,
    #[serde(flatten)]
    config: &'a AppConfig,
}

pub fn handle(ctx: &CliContext) -> anyhow::Result<()> {
    output::output_success(ConfigReport {
        path: ctx.config_path.as_ref().map(|p| p.display().to_string()),
        config: &ctx.config,
    })
}
