//! Health and status handlers.

use qubes_air_core::Console;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn health(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let health = console.health().await?;
    let out = output::render_single(
        &global.output,
        &health,
        |h| {
            let color = output::should_color(&global.color);
            output::detail_block(&[
                ("Status", output::paint_status(&h.status, color)),
                ("Database", h.database.clone()),
                ("Version", h.version.clone().unwrap_or_default()),
                ("Timestamp", h.timestamp.clone().unwrap_or_default()),
            ])
        },
        |h| h.status.clone(),
    );
    output::print_output(&out, global.quiet);

    if health.is_healthy() {
        Ok(())
    } else {
        Err(CliError::Unhealthy {
            status: health.status,
        })
    }
}

pub async fn status(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let status = console.status().await?;
    let out = output::render_single(
        &global.output,
        &status,
        |s| {
            output::detail_block(&[
                ("App", s.app.clone()),
                ("Version", s.version.clone()),
                ("Zones", s.zones_count.to_string()),
                ("Qubes", s.qubes_count.to_string()),
            ])
        },
        |s| s.version.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
