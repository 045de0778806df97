//! Template store: the durable template collection and active selection

use super::{log_write_failure, CollectionRead, TemplateError, TemplateResult, TemplateSlots};
use crate::{KeyValueStorage, StoreSettings};
use chrono::{DateTime, Utc};
use invoice_model::{Template, TemplateContent, TemplatePatch, DEFAULT_TEMPLATE_ID};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Owns the template collection and the active-template pointer.
///
/// Reads never fail: storage faults degrade to the seeded default. Every
/// read-modify-write operation holds a single write guard for the whole
/// read, mutate and persist sequence, so concurrent mutations through the
/// same store cannot drop each other's changes.
#[derive(Debug)]
pub struct TemplateStore<S> {
    slots: TemplateSlots<S>,
    reject_duplicate_ids: bool,
    write_guard: Mutex<()>,
}

impl<S: KeyValueStorage> TemplateStore<S> {
    /// Create a store over `storage` with default settings
    pub fn new(storage: S) -> Self {
        Self::with_settings(storage, &StoreSettings::default())
    }

    pub fn with_settings(storage: S, settings: &StoreSettings) -> Self {
        Self {
            slots: TemplateSlots::new(storage, settings),
            reject_duplicate_ids: settings.reject_duplicate_ids,
            write_guard: Mutex::new(()),
        }
    }

    /// The underlying slots (for inspection and tests)
    pub fn slots(&self) -> &TemplateSlots<S> {
        &self.slots
    }

    // The guard protects no data, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_guard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, templates: &[Template]) -> bool {
        log_write_failure(self.slots.templates_key(), self.slots.write_templates(templates))
    }

    fn persist_active(&self, id: &str) -> bool {
        log_write_failure(self.slots.active_key(), self.slots.write_active_id(id))
    }

    /// Load the collection, seeding and persisting the default when needed.
    /// Caller must hold the write guard.
    fn load_locked(&self) -> Vec<Template> {
        let loaded = self.slots.read_templates().or_seed(Utc::now());
        if loaded.seeded {
            self.persist(&loaded.templates);
        }
        loaded.templates
    }

    /// Append under the write guard, honouring the duplicate-id policy
    fn push_locked(&self, templates: &mut Vec<Template>, template: Template) -> TemplateResult<()> {
        if self.reject_duplicate_ids && templates.iter().any(|t| t.id == template.id) {
            return Err(TemplateError::AlreadyExists(template.id));
        }
        templates.push(template);
        self.persist(templates);
        Ok(())
    }

    /// All templates. Never empty: missing or unreadable data is replaced
    /// by the reserved default, which is persisted.
    pub fn list(&self) -> Vec<Template> {
        if let CollectionRead::Stored(templates) = self.slots.read_templates() {
            return templates;
        }

        let _guard = self.lock();
        self.load_locked()
    }

    /// First template with identity `id`
    pub fn get_by_id(&self, id: &str) -> Option<Template> {
        self.list().into_iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get_by_id(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    /// Raw value of the active pointer, unvalidated
    pub fn active_id(&self) -> Option<String> {
        match self.slots.read_active_id() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Failed to read active template pointer: {}", e);
                None
            }
        }
    }

    /// Resolve the active template: stored pointer, then the reserved
    /// default, then the built-in default. Always returns a template.
    pub fn get_active(&self) -> Template {
        if let Some(id) = self.active_id() {
            if let Some(template) = self.get_by_id(&id) {
                return template;
            }
            tracing::warn!(id = %id, "Active template pointer is dangling, using default");
        } else {
            tracing::debug!("No active template selected, using default");
        }

        if let Some(template) = self.get_by_id(DEFAULT_TEMPLATE_ID) {
            return template;
        }

        tracing::warn!("Reserved default template missing from collection, using built-in");
        Template::reserved_default(Utc::now())
    }

    /// Point the active selection at `id`. Not validated here; resolution
    /// happens in [`get_active`](Self::get_active).
    pub fn set_active(&self, id: &str) {
        let _guard = self.lock();
        tracing::info!(id = %id, "Selecting active template");
        self.persist_active(id);
    }

    /// Replace the whole collection. Write failures are logged, not returned.
    pub fn save_all(&self, templates: &[Template]) {
        let _guard = self.lock();
        self.persist(templates);
    }

    /// Append a template and persist the collection.
    ///
    /// Identities are not checked unless the store was configured with
    /// `reject_duplicate_ids`; otherwise a twin is stored and lookups
    /// return the first match.
    pub fn add(&self, template: Template) -> TemplateResult<Template> {
        let _guard = self.lock();
        let mut templates = self.load_locked();
        self.push_locked(&mut templates, template.clone())?;
        tracing::info!(id = %template.id, name = %template.name(), "Added template");
        Ok(template)
    }

    /// Merge `patch` over the template with identity `id` and refresh its
    /// `updated_at`. Returns `None` (and writes nothing) when absent.
    pub fn update(&self, id: &str, patch: TemplatePatch) -> Option<Template> {
        let _guard = self.lock();
        let mut templates = self.load_locked();

        let Some(template) = templates.iter_mut().find(|t| t.id == id) else {
            tracing::debug!(id = %id, "Update skipped, template not found");
            return None;
        };

        patch.apply_to(&mut template.content);
        template.touch(Utc::now());
        let updated = template.clone();

        self.persist(&templates);
        tracing::info!(id = %id, "Updated template");
        Some(updated)
    }

    /// Delete the template with identity `id`.
    ///
    /// The reserved default is protected. If the deleted template was the
    /// active one, the active pointer is redirected to the default once the
    /// reduced collection has been written. Returns whether anything was
    /// removed.
    pub fn delete(&self, id: &str) -> TemplateResult<bool> {
        if id == DEFAULT_TEMPLATE_ID {
            return Err(TemplateError::ProtectedEntity(id.to_string()));
        }

        let _guard = self.lock();
        let mut templates = self.load_locked();
        let before = templates.len();
        templates.retain(|t| t.id != id);
        let removed = templates.len() != before;

        if !removed {
            return Ok(false);
        }

        if !self.persist(&templates) {
            return Ok(true);
        }
        tracing::info!(id = %id, "Deleted template");

        if self.active_id().as_deref() == Some(id) {
            tracing::info!(id = %id, "Deleted template was active, selecting default");
            self.persist_active(DEFAULT_TEMPLATE_ID);
        }

        Ok(true)
    }

    /// Copy the template `id` under a fresh identity and `new_name`.
    /// The copy is not selected as active.
    pub fn duplicate(&self, id: &str, new_name: &str) -> TemplateResult<Template> {
        let _guard = self.lock();
        let mut templates = self.load_locked();

        let source = templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;

        let now = Utc::now();
        let copy = Template::new(
            fresh_id(&templates, now),
            source.content.renamed(new_name),
            now,
        );

        self.push_locked(&mut templates, copy.clone())?;
        tracing::info!(source = %id, id = %copy.id, "Duplicated template");
        Ok(copy)
    }

    /// Pretty-printed JSON of the template `id`, accepted by [`import`](Self::import)
    pub fn export(&self, id: &str) -> TemplateResult<String> {
        let template = self
            .get_by_id(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;
        Ok(serde_json::to_string_pretty(&template)?)
    }

    /// Parse `text` as a template and store it under a fresh identity, as a
    /// non-default template stamped with the current time.
    pub fn import(&self, text: &str) -> TemplateResult<Template> {
        let content: TemplateContent =
            serde_json::from_str(text).map_err(|e| TemplateError::InvalidFormat(e.to_string()))?;

        let _guard = self.lock();
        let mut templates = self.load_locked();

        let now = Utc::now();
        let template = Template::new(fresh_id(&templates, now), content, now);

        self.push_locked(&mut templates, template.clone())?;
        tracing::info!(id = %template.id, name = %template.name(), "Imported template");
        Ok(template)
    }

    /// Seed the reserved default and select it when nothing is stored yet.
    /// Returns whether seeding happened; a no-op once data exists.
    pub fn initialize(&self) -> bool {
        let _guard = self.lock();
        if self.slots.read_templates().is_stored() {
            return false;
        }

        let seeded = vec![Template::reserved_default(Utc::now())];
        self.persist(&seeded);
        self.persist_active(DEFAULT_TEMPLATE_ID);
        tracing::info!("Initialized template store with default template");
        true
    }

    /// Drop every template and selection, leaving only the reserved default
    pub fn reset(&self) -> Template {
        let _guard = self.lock();
        let default = Template::reserved_default(Utc::now());
        self.persist(std::slice::from_ref(&default));
        self.persist_active(DEFAULT_TEMPLATE_ID);
        tracing::info!("Reset template store");
        default
    }
}

/// A new identity derived from `now`, unique within `existing`
fn fresh_id(existing: &[Template], now: DateTime<Utc>) -> String {
    loop {
        let nonce = Uuid::new_v4().simple().to_string();
        let id = format!("template_{}_{}", now.timestamp_millis(), &nonce[..8]);
        if !existing.iter().any(|t| t.id == id) {
            return id;
        }
    }
}
