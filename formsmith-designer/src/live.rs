//! Live forms: a published definition rendered in `form` mode and filled in.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use formsmith_fields::{
    FieldInstance, FieldRegistry, FieldsError, FormContext, FormControl, InstanceId, MediaOutcome,
    UploadDisposition, View,
};
use tracing::{debug, info, warn};
use ulid::Ulid;

use crate::error::{DesignerError, Result};
use crate::form::{FormDefinition, FormSubmission};

/// Result of `LiveForm::submit`.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Accepted(FormSubmission),
    /// These fields failed validation and now show their error state.
    Rejected { invalid: Vec<InstanceId> },
}

struct LiveField {
    instance: FieldInstance,
    control: Box<dyn FormControl>,
}

/// One person filling in one form.
pub struct LiveForm {
    registry: Arc<FieldRegistry>,
    form_id: Ulid,
    fields: Vec<LiveField>,
    broken: Vec<(InstanceId, FieldsError)>,
    values: HashMap<InstanceId, String>,
}

impl LiveForm {
    /// Render every field of a published form for value capture.
    ///
    /// Fields that fail to render are left out and listed by `broken()`.
    pub fn open(registry: Arc<FieldRegistry>, form: &FormDefinition) -> Result<Self> {
        if !form.published {
            return Err(DesignerError::NotPublished {
                name: form.name.clone(),
            });
        }
        let mut fields = Vec::with_capacity(form.fields.len());
        let mut broken = Vec::new();
        for instance in &form.fields {
            match registry.render_form(instance, FormContext::new()) {
                Ok(control) => fields.push(LiveField {
                    instance: instance.clone(),
                    control,
                }),
                Err(e) => {
                    warn!(id = %instance.id(), %e, "field left out of live form");
                    broken.push((instance.id().clone(), e));
                }
            }
        }
        debug!(form = %form.id, fields = fields.len(), "live form opened");
        Ok(Self {
            registry,
            form_id: form.id,
            fields,
            broken,
            values: HashMap::new(),
        })
    }

    pub fn form_id(&self) -> Ulid {
        self.form_id
    }

    pub fn broken(&self) -> &[(InstanceId, FieldsError)] {
        &self.broken
    }

    pub fn control(&self, id: &InstanceId) -> Option<&dyn FormControl> {
        self.fields
            .iter()
            .find(|f| f.instance.id() == id)
            .map(|f| f.control.as_ref())
    }

    fn field_mut(&mut self, id: &InstanceId) -> Result<&mut LiveField> {
        self.fields
            .iter_mut()
            .find(|f| f.instance.id() == id)
            .ok_or_else(|| DesignerError::NoControl { id: id.to_string() })
    }

    /// Views of all live fields, in form order.
    pub fn views(&self) -> Vec<(InstanceId, View)> {
        self.fields
            .iter()
            .map(|f| (f.instance.id().clone(), f.control.view()))
            .collect()
    }

    /// Values accepted so far, keyed by field id.
    pub fn values(&self) -> &HashMap<InstanceId, String> {
        &self.values
    }

    /// Record typing in progress without submitting it.
    pub fn change(&mut self, id: &InstanceId, value: &str) -> Result<()> {
        self.field_mut(id)?.control.change(value);
        Ok(())
    }

    /// The field lost focus: let it validate and submit its value.
    ///
    /// A rejected value also withdraws whatever the field submitted before.
    pub fn finalize(&mut self, id: &InstanceId) -> Result<bool> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.instance.id() == id)
            .ok_or_else(|| DesignerError::NoControl { id: id.to_string() })?;
        Ok(finalize_field(field, &mut self.values))
    }

    /// `change` followed by `finalize`.
    pub fn enter(&mut self, id: &InstanceId, value: &str) -> Result<bool> {
        self.change(id, value)?;
        self.finalize(id)
    }

    pub fn begin_upload(&mut self, id: &InstanceId) -> Result<u64> {
        let field = self.field_mut(id)?;
        field
            .control
            .begin_upload()
            .ok_or_else(|| DesignerError::NoMediaSlot {
                type_tag: field.instance.type_tag().to_string(),
            })
    }

    /// Deliver an upload result. An applied URL is finalized right away.
    pub fn finish_upload(
        &mut self,
        id: &InstanceId,
        seq: u64,
        outcome: MediaOutcome,
    ) -> Result<UploadDisposition> {
        let disposition = self.field_mut(id)?.control.finish_upload(seq, outcome);
        if disposition == UploadDisposition::Applied {
            self.finalize(id)?;
        }
        Ok(disposition)
    }

    /// Validate every field against its last submitted value.
    ///
    /// On failure the invalid fields are rendered again with `is_invalid` set
    /// and their current input kept; nothing is produced.
    pub fn submit(&mut self) -> Result<SubmitOutcome> {
        // Edits still sitting in a control count as finalized.
        for field in &mut self.fields {
            let Some(current) = field.control.value() else {
                continue;
            };
            if self.values.get(field.instance.id()).map(String::as_str) != Some(current) {
                finalize_field(field, &mut self.values);
            }
        }

        let mut invalid = Vec::new();
        for field in &self.fields {
            let id = field.instance.id();
            let value = self.values.get(id).map(String::as_str);
            if !self.registry.validate(&field.instance, value)? {
                invalid.push(id.clone());
            }
        }

        if !invalid.is_empty() {
            for field in self.fields.iter_mut().filter(|f| invalid.contains(f.instance.id())) {
                // A fresh control would orphan the upload in flight.
                if field.control.upload_pending() {
                    field.control.set_invalid(true);
                    continue;
                }
                let mut ctx = FormContext::new().invalid(true);
                if let Some(current) = field.control.value() {
                    ctx = ctx.default_value(current);
                }
                field.control = self.registry.render_form(&field.instance, ctx)?;
            }
            debug!(form = %self.form_id, invalid = invalid.len(), "submission rejected");
            return Ok(SubmitOutcome::Rejected { invalid });
        }

        let values: BTreeMap<String, String> = self
            .values
            .iter()
            .map(|(id, v)| (id.to_string(), v.clone()))
            .collect();
        info!(form = %self.form_id, fields = values.len(), "form submitted");
        Ok(SubmitOutcome::Accepted(FormSubmission {
            form_id: self.form_id,
            submitted_at: Utc::now(),
            values,
        }))
    }
}

fn finalize_field(field: &mut LiveField, values: &mut HashMap<InstanceId, String>) -> bool {
    let mut submit = |id: &InstanceId, value: &str| {
        values.insert(id.clone(), value.to_string());
    };
    let submitted = field.control.finalize(&mut submit);
    if !submitted {
        values.remove(field.instance.id());
    }
    submitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use formsmith_fields::{AttributeBag, BannerField, FieldKind, ImageField, TextField};

    fn published(fields: Vec<FieldInstance>) -> FormDefinition {
        let mut form = FormDefinition::new("Signup");
        form.fields = fields;
        form.publish();
        form
    }

    fn text(registry: &FieldRegistry, id: &str, required: bool) -> FieldInstance {
        let mut instance = registry.construct(TextField::TYPE_TAG, id.into()).unwrap();
        let mut bag = instance.attributes().clone();
        bag.insert("required", required);
        instance.replace_attributes(bag);
        instance
    }

    #[test]
    fn draft_forms_cannot_be_filled_in() {
        let registry = Arc::new(FieldRegistry::with_builtins().unwrap());
        let form = FormDefinition::new("Draft");
        assert!(matches!(
            LiveForm::open(registry, &form),
            Err(DesignerError::NotPublished { .. })
        ));
    }

    #[test]
    fn accepted_submission_carries_values() {
        let registry = Arc::new(FieldRegistry::with_builtins().unwrap());
        let form = published(vec![
            text(&registry, "name", true),
            text(&registry, "nick", false),
            registry.construct(BannerField::TYPE_TAG, "banner".into()).unwrap(),
        ]);
        let mut live = LiveForm::open(registry, &form).unwrap();

        assert!(live.enter(&"name".into(), "Ada").unwrap());
        let outcome = live.submit().unwrap();
        match outcome {
            SubmitOutcome::Accepted(submission) => {
                assert_eq!(submission.form_id, form.id);
                assert_eq!(submission.values.get("name").map(String::as_str), Some("Ada"));
                assert!(!submission.values.contains_key("banner"));
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[test]
    fn rejected_submission_marks_fields_invalid() {
        let registry = Arc::new(FieldRegistry::with_builtins().unwrap());
        let form = published(vec![text(&registry, "name", true)]);
        let mut live = LiveForm::open(registry, &form).unwrap();

        live.change(&"name".into(), "   ").unwrap();
        let outcome = live.submit().unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                invalid: vec![InstanceId::from("name")]
            }
        );
        let control = live.control(&"name".into()).unwrap();
        assert!(control.has_error());
        assert_eq!(control.value(), Some("   "));
        assert!(live.views()[0].1.shows_error());
    }

    #[test]
    fn cleared_value_is_withdrawn() {
        let registry = Arc::new(FieldRegistry::with_builtins().unwrap());
        let form = published(vec![text(&registry, "name", true)]);
        let mut live = LiveForm::open(registry, &form).unwrap();
        let id = InstanceId::from("name");

        assert!(live.enter(&id, "Ada").unwrap());
        assert!(!live.enter(&id, "").unwrap());
        assert!(!live.values().contains_key(&id));
        assert_eq!(
            live.submit().unwrap(),
            SubmitOutcome::Rejected {
                invalid: vec![id.clone()]
            }
        );
    }

    #[test]
    fn unfinished_edit_is_checked_on_submit() {
        let registry = Arc::new(FieldRegistry::with_builtins().unwrap());
        let form = published(vec![text(&registry, "name", true)]);
        let mut live = LiveForm::open(registry, &form).unwrap();
        let id = InstanceId::from("name");

        assert!(live.enter(&id, "Ada").unwrap());
        live.change(&id, "  ").unwrap();
        assert!(matches!(live.submit().unwrap(), SubmitOutcome::Rejected { .. }));

        live.change(&id, "Grace").unwrap();
        match live.submit().unwrap() {
            SubmitOutcome::Accepted(submission) => {
                assert_eq!(submission.values.get("name").map(String::as_str), Some("Grace"));
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[test]
    fn rejection_keeps_upload_in_flight() {
        let registry = Arc::new(FieldRegistry::with_builtins().unwrap());
        let mut image = registry.construct(ImageField::TYPE_TAG, "photo".into()).unwrap();
        let mut bag = image.attributes().clone();
        bag.insert("required", true);
        image.replace_attributes(bag);
        let form = published(vec![image]);
        let mut live = LiveForm::open(registry, &form).unwrap();
        let id = InstanceId::from("photo");

        let seq = live.begin_upload(&id).unwrap();
        assert!(matches!(live.submit().unwrap(), SubmitOutcome::Rejected { .. }));
        assert!(live.control(&id).unwrap().has_error());

        let disposition = live
            .finish_upload(&id, seq, Ok("/uploads/1-me.png".into()))
            .unwrap();
        assert_eq!(disposition, UploadDisposition::Applied);
        assert!(matches!(live.submit().unwrap(), SubmitOutcome::Accepted(_)));
    }

    #[test]
    fn banners_refuse_uploads() {
        let registry = Arc::new(FieldRegistry::with_builtins().unwrap());
        let banner = registry.construct(BannerField::TYPE_TAG, "hero".into()).unwrap();
        let form = published(vec![banner]);
        let mut live = LiveForm::open(registry, &form).unwrap();
        assert!(matches!(
            live.begin_upload(&"hero".into()),
            Err(DesignerError::NoMediaSlot { .. })
        ));
    }

    #[test]
    fn unknown_fields_are_left_out() {
        let registry = Arc::new(FieldRegistry::with_builtins().unwrap());
        let form = published(vec![
            FieldInstance::new("old".into(), "RetiredField", AttributeBag::new()),
            text(&registry, "name", false),
        ]);
        let live = LiveForm::open(registry, &form).unwrap();
        assert_eq!(live.broken().len(), 1);
        assert!(live.broken()[0].1.is_unknown_field_type());
        assert_eq!(live.views().len(), 1);
    }

    #[test]
    fn image_upload_becomes_the_value() {
        let registry = Arc::new(FieldRegistry::with_builtins().unwrap());
        let image = registry.construct(ImageField::TYPE_TAG, "photo".into()).unwrap();
        let form = published(vec![image]);
        let mut live = LiveForm::open(registry, &form).unwrap();

        let id = InstanceId::from("photo");
        let seq = live.begin_upload(&id).unwrap();
        let disposition = live
            .finish_upload(&id, seq, Ok("/uploads/1-me.png".into()))
            .unwrap();
        assert_eq!(disposition, UploadDisposition::Applied);
        assert_eq!(live.values().get(&id).map(String::as_str), Some("/uploads/1-me.png"));
    }

    #[test]
    fn text_controls_refuse_uploads() {
        let registry = Arc::new(FieldRegistry::with_builtins().unwrap());
        let form = published(vec![text(&registry, "name", false)]);
        let mut live = LiveForm::open(registry, &form).unwrap();
        assert!(matches!(
            live.begin_upload(&"name".into()),
            Err(DesignerError::NoMediaSlot { .. })
        ));
        assert!(matches!(
            live.change(&"missing".into(), "x"),
            Err(DesignerError::NoControl { .. })
        ));
    }
}
