//! Properties editors: the stateful output of the `properties` render variant.
//!
//! An editor works on an isolated draft of the instance's attributes and only
//! ever hands the host a complete replacement bag.

use std::marker::PhantomData;

use serde_json::Value;
use tracing::debug;

use crate::attributes::AttributeBag;
use crate::error::{FieldsError, Result};
use crate::instance::{FieldInstance, InstanceId};
use crate::kind::FieldKind;
use crate::media::UploadState;
use crate::render::{ApplyChanges, PropertiesContext};
use crate::view::View;

/// Per-editor state a kind's `properties_view` draws from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    /// Messages from the last rejected commit.
    pub errors: Vec<String>,
    pub upload: UploadState,
}

/// A field rendered as an editor for its own configuration.
pub trait PropertiesEditor: Send {
    fn instance_id(&self) -> &InstanceId;

    fn view(&self) -> View;

    /// The full draft as a bag.
    fn draft(&self) -> Result<AttributeBag>;

    /// Change one attribute of the draft. The instance is untouched until `commit`.
    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    /// Throw the draft away and start again from `attributes`.
    fn reset(&mut self, attributes: &AttributeBag) -> Result<()>;

    /// Check the draft and, if it passes, hand the complete bag to `apply`.
    ///
    /// Returns `Ok(false)` when the draft was rejected; the messages are then
    /// part of the editor's view.
    fn commit(&mut self, apply: &mut dyn ApplyChanges) -> Result<bool>;

    fn errors(&self) -> &[String];

    /// Update the upload status shown by the editor.
    fn set_upload(&mut self, upload: UploadState);
}

/// The `PropertiesEditor` every built-in kind uses.
pub struct DraftEditor<K: FieldKind> {
    id: InstanceId,
    draft: K::Attributes,
    state: EditorState,
    _kind: PhantomData<fn() -> K>,
}

impl<K: FieldKind> DraftEditor<K> {
    pub fn new(instance: &FieldInstance, ctx: PropertiesContext) -> Result<Self> {
        let draft = instance.attributes().decode::<K::Attributes>(K::TYPE_TAG)?;
        Ok(Self {
            id: instance.id().clone(),
            draft,
            state: EditorState {
                errors: Vec::new(),
                upload: ctx.upload,
            },
            _kind: PhantomData,
        })
    }

    pub fn typed_draft(&self) -> &K::Attributes {
        &self.draft
    }
}

impl<K: FieldKind> PropertiesEditor for DraftEditor<K> {
    fn instance_id(&self) -> &InstanceId {
        &self.id
    }

    fn view(&self) -> View {
        K::properties_view(&self.id, &self.draft, &self.state)
    }

    fn draft(&self) -> Result<AttributeBag> {
        AttributeBag::from_typed(K::TYPE_TAG, &self.draft)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let mut bag = self.draft()?;
        if !bag.contains_key(key) {
            return Err(FieldsError::UnknownAttribute {
                type_tag: K::TYPE_TAG.to_string(),
                key: key.to_string(),
            });
        }
        bag.insert(key, value);
        self.draft = bag.decode(K::TYPE_TAG)?;
        Ok(())
    }

    fn reset(&mut self, attributes: &AttributeBag) -> Result<()> {
        self.draft = attributes.decode(K::TYPE_TAG)?;
        self.state.errors.clear();
        Ok(())
    }

    fn commit(&mut self, apply: &mut dyn ApplyChanges) -> Result<bool> {
        let errors = K::check_properties(&self.draft);
        if !errors.is_empty() {
            debug!(id = %self.id, kind = K::TYPE_TAG, ?errors, "properties draft rejected");
            self.state.errors = errors;
            return Ok(false);
        }
        self.state.errors.clear();
        let bag = self.draft()?;
        apply.apply_changes(&self.id, bag)?;
        Ok(true)
    }

    fn errors(&self) -> &[String] {
        &self.state.errors
    }

    fn set_upload(&mut self, upload: UploadState) {
        self.state.upload = upload;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::TextField;
    use crate::registry::FieldRegistry;
    use serde_json::json;

    #[test]
    fn commit_hands_over_the_complete_bag() {
        let registry = FieldRegistry::with_builtins().unwrap();
        let instance = registry.construct(TextField::TYPE_TAG, "f1".into()).unwrap();
        let mut editor = registry
            .render_properties(&instance, PropertiesContext::new())
            .unwrap();

        editor.set("label", json!("Email")).unwrap();

        let mut applied = Vec::new();
        let mut apply = |id: &InstanceId, bag: AttributeBag| -> Result<()> {
            applied.push((id.clone(), bag));
            Ok(())
        };
        assert!(editor.commit(&mut apply).unwrap());
        drop(apply);

        let (id, bag) = &applied[0];
        assert_eq!(id.as_str(), "f1");
        assert_eq!(bag.get_str("label"), Some("Email"));
        // untouched attributes travel with the submission
        assert_eq!(bag.get_str("helper_text"), instance.attributes().get_str("helper_text"));
        assert_eq!(bag.len(), instance.attributes().len());
    }

    #[test]
    fn draft_is_isolated_from_the_instance() {
        let registry = FieldRegistry::with_builtins().unwrap();
        let instance = registry.construct(TextField::TYPE_TAG, "f1".into()).unwrap();
        let mut editor = registry
            .render_properties(&instance, PropertiesContext::new())
            .unwrap();
        editor.set("required", json!(true)).unwrap();
        assert_eq!(instance.attributes().get_bool("required"), Some(false));
        assert_eq!(editor.draft().unwrap().get_bool("required"), Some(true));
    }

    #[test]
    fn rejected_draft_is_not_applied() {
        let registry = FieldRegistry::with_builtins().unwrap();
        let instance = registry.construct(TextField::TYPE_TAG, "f1".into()).unwrap();
        let mut editor = registry
            .render_properties(&instance, PropertiesContext::new())
            .unwrap();
        editor.set("label", json!("")).unwrap();

        let mut calls = 0;
        let mut apply = |_: &InstanceId, _: AttributeBag| -> Result<()> {
            calls += 1;
            Ok(())
        };
        assert!(!editor.commit(&mut apply).unwrap());
        drop(apply);
        assert_eq!(calls, 0);
        assert_eq!(editor.errors(), ["Label is required".to_string()]);
        assert!(editor.view().shows_error());
    }

    #[test]
    fn unknown_and_mistyped_keys_are_refused() {
        let registry = FieldRegistry::with_builtins().unwrap();
        let instance = registry.construct(TextField::TYPE_TAG, "f1".into()).unwrap();
        let mut editor = registry
            .render_properties(&instance, PropertiesContext::new())
            .unwrap();

        assert!(matches!(
            editor.set("colour", json!("red")),
            Err(FieldsError::UnknownAttribute { .. })
        ));
        assert!(matches!(
            editor.set("required", json!("yes")),
            Err(FieldsError::InvalidAttributes { .. })
        ));
        // the draft survives a refused edit
        assert_eq!(editor.draft().unwrap(), *instance.attributes());
    }

    #[test]
    fn missing_instance_surfaces_from_commit() {
        let registry = FieldRegistry::with_builtins().unwrap();
        let instance = registry.construct(TextField::TYPE_TAG, "gone".into()).unwrap();
        let mut editor = registry
            .render_properties(&instance, PropertiesContext::new())
            .unwrap();
        let mut apply = |id: &InstanceId, _: AttributeBag| -> Result<()> {
            Err(FieldsError::InstanceNotFound { id: id.to_string() })
        };
        let err = editor.commit(&mut apply).unwrap_err();
        assert!(err.is_instance_not_found());
    }
}
