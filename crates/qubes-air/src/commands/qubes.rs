//! Qube command handlers.

use std::sync::Arc;

use tabled::Tabled;

use qubes_air_core::{
    Console, ListOptions, Qube, QubeCreateRequest, QubeSpecPatch, QubeUpdateRequest,
};

use crate::cli::{GlobalOpts, QubeSpecArgs, QubesArgs, QubesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct QubeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Type")]
    qube_type: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "vCPU")]
    vcpu: u32,
    #[tabled(rename = "Mem (MB)")]
    memory: u32,
    #[tabled(rename = "IP")]
    ip: String,
}

impl QubeRow {
    fn new(q: &Qube, color: bool) -> Self {
        Self {
            id: q.id.clone(),
            name: q.name.clone(),
            zone: q.zone_name.clone().unwrap_or_else(|| q.zone_id.clone()),
            qube_type: q.qube_type.to_string(),
            status: output::paint_status(&q.status.to_string(), color),
            vcpu: q.spec.vcpu,
            memory: q.spec.memory,
            ip: util::or_dash(q.ip_address.as_deref()),
        }
    }
}

fn detail(q: &Qube) -> String {
    let mut fields = vec![
        ("ID", q.id.clone()),
        ("Name", q.name.clone()),
        ("Zone", q.zone_id.clone()),
        ("Zone Name", q.zone_name.clone().unwrap_or_default()),
        ("Type", q.qube_type.to_string()),
        ("Status", q.status.to_string()),
        ("vCPU", q.spec.vcpu.to_string()),
        ("Memory", format!("{} MB", q.spec.memory)),
        ("Disk", format!("{} GB", q.spec.disk)),
        ("Template", q.spec.template.clone()),
        ("IP", q.ip_address.clone().unwrap_or_default()),
    ];
    if let Some(ref gpu) = q.spec.gpu {
        fields.push(("GPU", format!("{} x{}", gpu.gpu_type, gpu.count)));
    }
    fields.push(("Created", q.created_at.to_rfc3339()));
    fields.push(("Updated", q.updated_at.to_rfc3339()));
    output::detail_block(&fields)
}

fn print_qube(qube: &Qube, global: &GlobalOpts) {
    let out = output::render_single(&global.output, qube, detail, |q| q.id.clone());
    output::print_output(&out, global.quiet);
}

/// `None` when no resource flag was given, so the server keeps its defaults.
fn spec_patch(args: QubeSpecArgs) -> Option<QubeSpecPatch> {
    let patch = QubeSpecPatch {
        vcpu: args.vcpu,
        memory: args.memory,
        disk: args.disk,
        template: args.template,
        gpu: None,
    };
    (!patch.is_empty()).then_some(patch)
}

fn not_found(err: qubes_air_core::Error, qube: &str) -> CliError {
    CliError::for_resource(err, "qube", qube)
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(console: &Console, args: QubesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = console.qubes();

    match args.command {
        QubesCommand::List {
            list,
            zone,
            status,
            qube_type,
            running,
        } => {
            let options = ListOptions {
                page: list.page,
                page_size: list.page_size,
                status: status.map(|s| s.to_string()),
                resource_type: qube_type.map(|t| t.to_string()),
                zone_id: zone,
            };

            let running_view = store.running_qubes_view();
            store.load(&options).await;
            util::check_load("qubes", store.error())?;

            let qubes: Vec<Arc<Qube>> = if running {
                running_view.get().as_ref().clone()
            } else {
                store.items()
            };

            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &qubes,
                |q| QubeRow::new(q, color),
                |q| q.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        QubesCommand::Get { qube } => {
            let found = console
                .client()
                .get_qube(&qube)
                .await
                .map_err(|e| not_found(e, &qube))?;
            print_qube(&found, global);
            Ok(())
        }

        QubesCommand::Create {
            name,
            zone,
            qube_type,
            spec,
        } => {
            let request = QubeCreateRequest {
                name,
                zone_id: zone,
                qube_type,
                spec: spec_patch(spec),
            };
            let created = store.create(&request).await?;
            if !global.quiet {
                eprintln!("Qube '{}' created ({}, {})", created.name, created.id, created.status);
            }
            print_qube(&created, global);
            Ok(())
        }

        QubesCommand::Update { qube, name, spec } => {
            let spec = spec_patch(spec);
            if name.is_none() && spec.is_none() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "nothing to change; pass --name or a resource flag".into(),
                });
            }
            let updated = store
                .update(&qube, &QubeUpdateRequest { name, spec })
                .await
                .map_err(|e| not_found(e, &qube))?;
            print_qube(&updated, global);
            Ok(())
        }

        QubesCommand::Delete { qube } => {
            if !util::confirm(&format!("Delete qube '{qube}'?"), global.yes)? {
                return Ok(());
            }
            store.remove(&qube).await.map_err(|e| not_found(e, &qube))?;
            if !global.quiet {
                eprintln!("Qube deleted");
            }
            Ok(())
        }

        QubesCommand::Start { qube } => {
            let started = store.start(&qube).await.map_err(|e| not_found(e, &qube))?;
            if !global.quiet {
                eprintln!("Qube '{}' is {}", started.name, started.status);
            }
            Ok(())
        }

        QubesCommand::Stop { qube } => {
            let stopped = store.stop(&qube).await.map_err(|e| not_found(e, &qube))?;
            if !global.quiet {
                eprintln!("Qube '{}' is {}", stopped.name, stopped.status);
            }
            Ok(())
        }
    }
}
