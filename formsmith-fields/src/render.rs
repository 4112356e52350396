//! Render modes, the per-mode contexts, and the host callbacks render
//! variants report back through.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attributes::AttributeBag;
use crate::control::FormControl;
use crate::descriptor::Validator;
use crate::editor::PropertiesEditor;
use crate::error::{FieldsError, Result};
use crate::instance::{FieldInstance, InstanceId};
use crate::media::UploadState;
use crate::view::View;

/// The three ways a field can be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Static preview inside the form designer.
    Designer,
    /// Interactive value capture in a live form.
    Form,
    /// Editor for the field's own configuration.
    Properties,
}

impl RenderMode {
    pub const ALL: [RenderMode; 3] = [RenderMode::Designer, RenderMode::Form, RenderMode::Properties];

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Designer => "designer",
            RenderMode::Form => "form",
            RenderMode::Properties => "properties",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "designer" => Ok(RenderMode::Designer),
            "form" => Ok(RenderMode::Form),
            "properties" => Ok(RenderMode::Properties),
            other => Err(format!("unknown render mode: {other}")),
        }
    }
}

/// Receives finalized values from `form` render variants.
pub trait SubmitValue {
    fn submit(&mut self, id: &InstanceId, value: &str);
}

impl<F> SubmitValue for F
where
    F: FnMut(&InstanceId, &str),
{
    fn submit(&mut self, id: &InstanceId, value: &str) {
        self(id, value)
    }
}

/// Receives complete replacement attribute bags from `properties` render variants.
///
/// Implementations replace the instance's bag wholesale and report
/// `InstanceNotFound` when the id is no longer held.
pub trait ApplyChanges {
    fn apply_changes(&mut self, id: &InstanceId, attributes: AttributeBag) -> Result<()>;
}

impl<F> ApplyChanges for F
where
    F: FnMut(&InstanceId, AttributeBag) -> Result<()>,
{
    fn apply_changes(&mut self, id: &InstanceId, attributes: AttributeBag) -> Result<()> {
        self(id, attributes)
    }
}

/// Context for `form` mode.
#[derive(Clone, Default)]
pub struct FormContext {
    /// Set by the host when a previous validation of this field failed.
    pub is_invalid: bool,
    /// Value to pre-fill, e.g. from an earlier submission.
    pub default_value: Option<String>,
    validator: Option<Validator>,
}

impl FormContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalid(mut self, is_invalid: bool) -> Self {
        self.is_invalid = is_invalid;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Attached by render dispatch so the control validates through its own descriptor.
    pub(crate) fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Run the descriptor validator for `instance`.
    ///
    /// A context that did not come through dispatch has no validator and
    /// accepts everything.
    pub fn validate(&self, instance: &FieldInstance, value: Option<&str>) -> bool {
        match &self.validator {
            Some(validator) => validator(instance, value),
            None => true,
        }
    }
}

impl fmt::Debug for FormContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormContext")
            .field("is_invalid", &self.is_invalid)
            .field("default_value", &self.default_value)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Context for `properties` mode.
#[derive(Debug, Clone, Default)]
pub struct PropertiesContext {
    /// Upload status the host tracks for this instance.
    pub upload: UploadState,
}

impl PropertiesContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_upload(mut self, upload: UploadState) -> Self {
        self.upload = upload;
        self
    }
}

/// Mode plus the context that mode needs.
#[derive(Debug, Clone)]
pub enum RenderContext {
    Designer,
    Form(FormContext),
    Properties(PropertiesContext),
}

impl RenderContext {
    pub fn mode(&self) -> RenderMode {
        match self {
            RenderContext::Designer => RenderMode::Designer,
            RenderContext::Form(_) => RenderMode::Form,
            RenderContext::Properties(_) => RenderMode::Properties,
        }
    }

    /// The default context for `mode`.
    pub fn for_mode(mode: RenderMode) -> Self {
        match mode {
            RenderMode::Designer => RenderContext::Designer,
            RenderMode::Form => RenderContext::Form(FormContext::new()),
            RenderMode::Properties => RenderContext::Properties(PropertiesContext::new()),
        }
    }
}

/// Output of render dispatch.
///
/// Designer output is a plain view. Form and properties output are stateful
/// components the host keeps alive and feeds events into.
pub enum Rendered {
    Designer(View),
    Form(Box<dyn FormControl>),
    Properties(Box<dyn PropertiesEditor>),
}

impl Rendered {
    pub fn mode(&self) -> RenderMode {
        match self {
            Rendered::Designer(_) => RenderMode::Designer,
            Rendered::Form(_) => RenderMode::Form,
            Rendered::Properties(_) => RenderMode::Properties,
        }
    }

    /// The current view of whatever was rendered.
    pub fn view(&self) -> View {
        match self {
            Rendered::Designer(view) => view.clone(),
            Rendered::Form(control) => control.view(),
            Rendered::Properties(editor) => editor.view(),
        }
    }

    pub fn into_form(self) -> Result<Box<dyn FormControl>> {
        match self {
            Rendered::Form(control) => Ok(control),
            other => Err(wrong_mode(RenderMode::Form, other.mode())),
        }
    }

    pub fn into_properties(self) -> Result<Box<dyn PropertiesEditor>> {
        match self {
            Rendered::Properties(editor) => Ok(editor),
            other => Err(wrong_mode(RenderMode::Properties, other.mode())),
        }
    }
}

impl fmt::Debug for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Rendered").field(&self.mode()).finish()
    }
}

fn wrong_mode(expected: RenderMode, actual: RenderMode) -> FieldsError {
    FieldsError::WrongRenderMode {
        expected: expected.as_str(),
        actual: actual.as_str(),
    }
}
