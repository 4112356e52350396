//! The form designer: owner of a form's field instances while it is being built.
//!
//! The designer is the host side of the attribute mutation protocol. Properties
//! editors hand it complete attribute bags; it replaces bags wholesale and
//! counts a revision per instance. Upload results are checked against those
//! revisions before they are applied, so a late upload can neither resurrect a
//! removed field nor overwrite a newer edit.

use std::collections::HashMap;
use std::sync::Arc;

use formsmith_fields::{
    ApplyChanges, AttributeBag, FieldInstance, FieldRegistry, FieldsError, FormContext,
    InstanceId, MediaOutcome, PaletteEntry, PropertiesContext, PropertiesEditor, RenderContext,
    RenderMode, Rendered, UploadDisposition, UploadState,
};
use tracing::{debug, warn};

use crate::error::{DesignerError, Result};
use crate::form::FormDefinition;

/// Handle for an upload started from the designer.
///
/// A result is applied only if the instance still exists, has not been
/// mutated since, and no newer upload was started for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    pub id: InstanceId,
    revision: u64,
    seq: u64,
}

#[derive(Debug, Default)]
struct Slot {
    revision: u64,
    upload_seq: u64,
    upload: UploadState,
}

/// Designer state for one form.
pub struct FormDesigner {
    registry: Arc<FieldRegistry>,
    form: FormDefinition,
    slots: HashMap<InstanceId, Slot>,
    selected: Option<InstanceId>,
}

impl FormDesigner {
    /// Open `form` for editing. Published forms are refused.
    pub fn new(registry: Arc<FieldRegistry>, form: FormDefinition) -> Result<Self> {
        form.ensure_editable()?;
        let slots = form
            .fields
            .iter()
            .map(|f| (f.id().clone(), Slot::default()))
            .collect();
        Ok(Self {
            registry,
            form,
            slots,
            selected: None,
        })
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    /// Hand the edited definition back, e.g. for storage.
    pub fn into_form(self) -> FormDefinition {
        self.form
    }

    pub fn elements(&self) -> &[FieldInstance] {
        &self.form.fields
    }

    pub fn get(&self, id: &InstanceId) -> Option<&FieldInstance> {
        self.form.fields.iter().find(|f| f.id() == id)
    }

    fn position(&self, id: &InstanceId) -> Option<usize> {
        self.form.fields.iter().position(|f| f.id() == id)
    }

    /// Sidebar entries, in registration order.
    pub fn palette(&self) -> Vec<(&str, &PaletteEntry)> {
        self.registry
            .all()
            .iter()
            .map(|f| (f.type_tag(), f.palette()))
            .collect()
    }

    // --- Structure ---

    /// Place a new field of `type_tag` at `index` (clamped to the end).
    pub fn add_element(&mut self, index: usize, type_tag: &str) -> Result<InstanceId> {
        let instance = self.registry.construct(type_tag, InstanceId::generate())?;
        let id = instance.id().clone();
        let index = index.min(self.form.fields.len());
        self.form.fields.insert(index, instance);
        self.slots.insert(id.clone(), Slot::default());
        debug!(%id, type_tag, index, "element added");
        Ok(id)
    }

    /// Append a new field of `type_tag`.
    pub fn push_element(&mut self, type_tag: &str) -> Result<InstanceId> {
        self.add_element(self.form.fields.len(), type_tag)
    }

    /// Remove a field. Pending uploads for it become stale; a selection of it is cleared.
    pub fn remove_element(&mut self, id: &InstanceId) -> Result<FieldInstance> {
        let index = self.position(id).ok_or_else(|| not_found(id))?;
        let removed = self.form.fields.remove(index);
        self.slots.remove(id);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        debug!(%id, "element removed");
        Ok(removed)
    }

    // --- Selection ---

    pub fn select(&mut self, id: &InstanceId) -> Result<()> {
        if self.position(id).is_none() {
            return Err(not_found(id).into());
        }
        self.selected = Some(id.clone());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&FieldInstance> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    // --- Mutation ---

    /// Number of accepted mutations of `id` since it was placed or loaded.
    pub fn revision(&self, id: &InstanceId) -> Option<u64> {
        self.slots.get(id).map(|s| s.revision)
    }

    /// Commit a properties editor against this designer.
    ///
    /// A commit for a field that was removed meanwhile is dropped and logged;
    /// it reports `Ok(false)` like a rejected draft.
    pub fn commit_properties(&mut self, editor: &mut dyn PropertiesEditor) -> Result<bool> {
        match editor.commit(self) {
            Ok(applied) => Ok(applied),
            Err(e) if e.is_instance_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    // --- Uploads ---

    /// Mark an upload for `id` as started.
    pub fn begin_upload(&mut self, id: &InstanceId) -> Result<UploadTicket> {
        let instance = self.get(id).ok_or_else(|| not_found(id))?;
        let field = self.registry.lookup(instance.type_tag())?;
        if field.media_attribute().is_none() {
            return Err(DesignerError::NoMediaSlot {
                type_tag: field.type_tag().to_string(),
            });
        }
        let slot = self.slots.entry(id.clone()).or_default();
        slot.upload_seq += 1;
        slot.upload = UploadState::Pending;
        Ok(UploadTicket {
            id: id.clone(),
            revision: slot.revision,
            seq: slot.upload_seq,
        })
    }

    /// Deliver an upload result.
    ///
    /// Fails with `InstanceNotFound` (and changes nothing) if the field is
    /// gone. A result superseded by a newer mutation or upload is `Stale`.
    pub fn complete_upload(
        &mut self,
        ticket: &UploadTicket,
        outcome: MediaOutcome,
    ) -> Result<UploadDisposition> {
        let Some(index) = self.position(&ticket.id) else {
            warn!(id = %ticket.id, "upload finished for a removed field, result dropped");
            return Err(not_found(&ticket.id).into());
        };
        let slot = self.slots.entry(ticket.id.clone()).or_default();
        if slot.upload_seq != ticket.seq {
            debug!(id = %ticket.id, seq = ticket.seq, latest = slot.upload_seq, "superseded upload dropped");
            return Ok(UploadDisposition::Stale);
        }
        if slot.revision != ticket.revision {
            debug!(id = %ticket.id, "field changed during upload, result dropped");
            slot.upload = UploadState::Idle;
            return Ok(UploadDisposition::Stale);
        }

        let url = match outcome {
            Ok(url) => url,
            Err(message) => {
                warn!(id = %ticket.id, %message, "upload failed");
                slot.upload = UploadState::Failed(message.clone());
                return Ok(UploadDisposition::Failed(message));
            }
        };
        slot.upload = UploadState::Idle;

        let instance = &self.form.fields[index];
        let field = self.registry.lookup(instance.type_tag())?;
        let key = field.media_attribute().ok_or_else(|| DesignerError::NoMediaSlot {
            type_tag: field.type_tag().to_string(),
        })?;
        let mut bag = instance.attributes().clone();
        bag.insert(key, url);
        self.apply_changes(&ticket.id, bag)?;
        Ok(UploadDisposition::Applied)
    }

    pub fn upload_state(&self, id: &InstanceId) -> Option<&UploadState> {
        self.slots.get(id).map(|s| &s.upload)
    }

    // --- Rendering ---

    /// Render every field in `mode`, in form order.
    ///
    /// Each field gets its own result, so one field of an unknown type does
    /// not take the rest of the form down with it.
    pub fn render_all(
        &self,
        mode: RenderMode,
    ) -> Vec<(InstanceId, formsmith_fields::Result<Rendered>)> {
        self.form
            .fields
            .iter()
            .map(|instance| {
                let ctx = match mode {
                    RenderMode::Designer => RenderContext::Designer,
                    RenderMode::Form => RenderContext::Form(FormContext::new()),
                    RenderMode::Properties => {
                        RenderContext::Properties(self.properties_context(instance.id()))
                    }
                };
                let rendered = self.registry.render(instance, ctx);
                if let Err(e) = &rendered {
                    warn!(id = %instance.id(), %e, "field failed to render");
                }
                (instance.id().clone(), rendered)
            })
            .collect()
    }

    /// Properties editor for `id`, showing its upload state.
    pub fn properties_editor(&self, id: &InstanceId) -> Result<Box<dyn PropertiesEditor>> {
        let instance = self.get(id).ok_or_else(|| not_found(id))?;
        Ok(self
            .registry
            .render_properties(instance, self.properties_context(id))?)
    }

    fn properties_context(&self, id: &InstanceId) -> PropertiesContext {
        let upload = self
            .upload_state(id)
            .cloned()
            .unwrap_or_default();
        PropertiesContext::new().with_upload(upload)
    }
}

impl ApplyChanges for FormDesigner {
    /// Replace the bag of `id` wholesale.
    fn apply_changes(
        &mut self,
        id: &InstanceId,
        attributes: AttributeBag,
    ) -> formsmith_fields::Result<()> {
        let Some(index) = self.position(id) else {
            warn!(%id, "mutation for unknown field dropped");
            return Err(not_found(id));
        };
        self.form.fields[index].replace_attributes(attributes);
        let slot = self.slots.entry(id.clone()).or_default();
        slot.revision += 1;
        debug!(%id, revision = slot.revision, "attributes replaced");
        Ok(())
    }
}

fn not_found(id: &InstanceId) -> FieldsError {
    FieldsError::InstanceNotFound { id: id.to_string() }
}

/// Turn an uploader result into what fields and the designer accept.
pub fn media_outcome(result: formsmith_upload::Result<formsmith_upload::MediaRef>) -> MediaOutcome {
    result
        .map(|media| media.url)
        .map_err(|e| format!("Failed to upload image: {e}"))
}
