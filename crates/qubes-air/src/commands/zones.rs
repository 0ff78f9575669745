//! Zone command handlers.

use std::sync::Arc;

use tabled::Tabled;

use qubes_air_core::{
    Console, ListOptions, Zone, ZoneConfig, ZoneCreateRequest, ZoneUpdateRequest,
};

use crate::cli::{GlobalOpts, ZoneConfigArgs, ZonesArgs, ZonesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    zone_type: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl ZoneRow {
    fn new(z: &Zone, color: bool) -> Self {
        Self {
            id: z.id.clone(),
            name: z.name.clone(),
            zone_type: z.zone_type.to_string(),
            status: output::paint_status(&z.status.to_string(), color),
            endpoint: z.config.endpoint.clone(),
            updated: util::short_time(&z.updated_at),
        }
    }
}

fn detail(z: &Zone) -> String {
    output::detail_block(&[
        ("ID", z.id.clone()),
        ("Name", z.name.clone()),
        ("Type", z.zone_type.to_string()),
        ("Status", z.status.to_string()),
        ("Endpoint", z.config.endpoint.clone()),
        ("Region", z.config.region.clone().unwrap_or_default()),
        ("Project", z.config.project.clone().unwrap_or_default()),
        ("Username", z.config.username.clone().unwrap_or_default()),
        ("Created", z.created_at.to_rfc3339()),
        ("Updated", z.updated_at.to_rfc3339()),
    ])
}

fn print_zone(zone: &Zone, global: &GlobalOpts) {
    let out = output::render_single(&global.output, zone, detail, |z| z.id.clone());
    output::print_output(&out, global.quiet);
}

/// Overlay the given flags on an existing config.
fn merge_config(mut base: ZoneConfig, args: ZoneConfigArgs) -> ZoneConfig {
    if let Some(endpoint) = args.endpoint {
        base.endpoint = endpoint;
    }
    base.region = args.region.or(base.region);
    base.project = args.project.or(base.project);
    base.username = args.username.or(base.username);
    base.public_key = args.public_key.or(base.public_key);
    base
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(console: &Console, args: ZonesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = console.zones();

    match args.command {
        ZonesCommand::List {
            list,
            status,
            zone_type,
            connected,
        } => {
            let mut options = ListOptions::new();
            options.page = list.page;
            options.page_size = list.page_size;
            options.status = status.map(|s| s.to_string());
            options.resource_type = zone_type.map(|t| t.to_string());

            let connected_view = store.connected_zones_view();
            store.load(&options).await;
            util::check_load("zones", store.error())?;

            let zones: Vec<Arc<Zone>> = if connected {
                connected_view.get().as_ref().clone()
            } else {
                store.items()
            };

            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &zones,
                |z| ZoneRow::new(z, color),
                |z| z.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ZonesCommand::Get { zone } => {
            let found = console
                .client()
                .get_zone(&zone)
                .await
                .map_err(|e| CliError::for_resource(e, "zone", &zone))?;
            print_zone(&found, global);
            Ok(())
        }

        ZonesCommand::Create {
            name,
            zone_type,
            config,
        } => {
            if config.endpoint.as_deref().is_none_or(str::is_empty) {
                return Err(CliError::Validation {
                    field: "endpoint".into(),
                    reason: "a new zone needs --endpoint".into(),
                });
            }
            let request = ZoneCreateRequest {
                name,
                zone_type,
                config: merge_config(ZoneConfig::default(), config),
            };
            let created = store.create(&request).await?;
            if !global.quiet {
                eprintln!("Zone '{}' created ({})", created.name, created.id);
            }
            print_zone(&created, global);
            Ok(())
        }

        ZonesCommand::Update { zone, name, config } => {
            if name.is_none() && config.is_empty() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "nothing to change; pass --name or a connection flag".into(),
                });
            }

            // The server replaces `config` wholesale, so start from the current one.
            let config = if config.is_empty() {
                None
            } else {
                let current = console
                    .client()
                    .get_zone(&zone)
                    .await
                    .map_err(|e| CliError::for_resource(e, "zone", &zone))?;
                Some(merge_config(current.config, config))
            };

            let updated = store
                .update(&zone, &ZoneUpdateRequest { name, config })
                .await
                .map_err(|e| CliError::for_resource(e, "zone", &zone))?;
            print_zone(&updated, global);
            Ok(())
        }

        ZonesCommand::Delete { zone } => {
            if !util::confirm(
                &format!("Delete zone '{zone}'? Its qubes become unreachable."),
                global.yes,
            )? {
                return Ok(());
            }
            store
                .remove(&zone)
                .await
                .map_err(|e| CliError::for_resource(e, "zone", &zone))?;
            if !global.quiet {
                eprintln!("Zone deleted");
            }
            Ok(())
        }

        ZonesCommand::Connect { zone } => {
            let connected = store
                .connect(&zone)
                .await
                .map_err(|e| CliError::for_resource(e, "zone", &zone))?;
            if !global.quiet {
                eprintln!("Zone '{}' is {}", connected.name, connected.status);
            }
            Ok(())
        }

        ZonesCommand::Disconnect { zone } => {
            let disconnected = store
                .disconnect(&zone)
                .await
                .map_err(|e| CliError::for_resource(e, "zone", &zone))?;
            if !global.quiet {
                eprintln!("Zone '{}' is {}", disconnected.name, disconnected.status);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_unspecified_fields() {
        let base = ZoneConfig {
            endpoint: "https://pve.lan:8006".into(),
            region: Some("home".into()),
            ..ZoneConfig::default()
        };
        let merged = merge_config(
            base,
            ZoneConfigArgs {
                endpoint: None,
                region: None,
                project: Some("lab".into()),
                username: None,
                public_key: None,
            },
        );
        assert_eq!(merged.endpoint, "https://pve.lan:8006");
        assert_eq!(merged.region.as_deref(), Some("home"));
        assert_eq!(merged.project.as_deref(), Some("lab"));
    }
}
