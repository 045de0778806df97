//! Subcommand handlers

use crate::cli::Command;
use anyhow::{bail, Context, Result};
use invoice_model::TemplatePatch;
use std::io::Write;
use store::{KeyValueStorage, TemplateStore};

/// Execute one subcommand against `store`, writing user output to `out`
pub fn run<S: KeyValueStorage>(
    store: &TemplateStore<S>,
    command: Command,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Init => {
            if store.initialize() {
                writeln!(out, "Initialized template store")?;
            } else {
                writeln!(out, "Template store already initialized")?;
            }
        }
        Command::List => {
            let active = store.get_active();
            for template in store.list() {
                let marker = if template.id == active.id { '*' } else { ' ' };
                writeln!(out, "{} {}\t{}", marker, template.id, template.name())?;
            }
        }
        Command::Show { id } => {
            let json = store.export(&id)?;
            writeln!(out, "{}", json)?;
        }
        Command::Active => {
            let active = store.get_active();
            writeln!(out, "{}\t{}", active.id, active.name())?;
        }
        Command::Use { id } => {
            if !store.contains(&id) {
                tracing::warn!(id = %id, "Selected template does not exist yet, default will be used");
            }
            store.set_active(&id);
            writeln!(out, "Active template: {}", id)?;
        }
        Command::Rename { id, name } => {
            apply_patch(store, &id, TemplatePatch::new().name(name), out)?;
        }
        Command::Update { id, patch } => {
            let text = std::fs::read_to_string(&patch)
                .with_context(|| format!("Failed to read patch file {}", patch.display()))?;
            let patch: TemplatePatch =
                serde_json::from_str(&text).context("Patch file is not a valid template patch")?;
            apply_patch(store, &id, patch, out)?;
        }
        Command::Delete { id } => {
            if store.delete(&id)? {
                writeln!(out, "Deleted {}", id)?;
            } else {
                writeln!(out, "No template with id {}", id)?;
            }
        }
        Command::Duplicate { id, name } => {
            let copy = store.duplicate(&id, &name)?;
            writeln!(out, "{}\t{}", copy.id, copy.name())?;
        }
        Command::Export { id, output } => {
            let json = store.export(&id)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    writeln!(out, "Exported {} to {}", id, path.display())?;
                }
                None => writeln!(out, "{}", json)?,
            }
        }
        Command::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let template = store.import(&text)?;
            writeln!(out, "{}\t{}", template.id, template.name())?;
        }
        Command::Reset => {
            store.reset();
            writeln!(out, "Template store reset to default")?;
        }
    }
    Ok(())
}

fn apply_patch<S: KeyValueStorage>(
    store: &TemplateStore<S>,
    id: &str,
    patch: TemplatePatch,
    out: &mut impl Write,
) -> Result<()> {
    match store.update(id, patch) {
        Some(template) => {
            writeln!(out, "{}\t{}", template.id, template.name())?;
            Ok(())
        }
        None => bail!("Template not found: {}", id),
    }
}
