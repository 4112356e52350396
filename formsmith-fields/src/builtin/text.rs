//! Single-line text input.

use serde::{Deserialize, Serialize};

use crate::control::ControlState;
use crate::editor::EditorState;
use crate::instance::InstanceId;
use crate::kind::{FieldKind, PaletteEntry};
use crate::validation::check_required;
use crate::view::{InputKind, View};

use super::{error_notices, text_input};

const HELPER_TEXT_MAX: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextAttributes {
    pub label: String,
    pub helper_text: String,
    pub required: bool,
    pub placeholder: String,
}

impl Default for TextAttributes {
    fn default() -> Self {
        Self {
            label: "Text field".into(),
            helper_text: "Helper text".into(),
            required: false,
            placeholder: "Value here...".into(),
        }
    }
}

pub struct TextField;

impl FieldKind for TextField {
    const TYPE_TAG: &'static str = "TextField";
    type Attributes = TextAttributes;

    fn palette() -> PaletteEntry {
        PaletteEntry::new("text-fields", "Text Field")
    }

    fn designer_view(attrs: &TextAttributes) -> View {
        let mut children = vec![
            View::label(&attrs.label, attrs.required, false),
            View::Input {
                name: attrs.label.clone(),
                input: InputKind::Text,
                value: None,
                placeholder: Some(attrs.placeholder.clone()),
                accept: None,
                readonly: true,
                invalid: false,
            },
        ];
        if !attrs.helper_text.is_empty() {
            children.push(View::helper(&attrs.helper_text, false));
        }
        View::column(children)
    }

    fn form_view(id: &InstanceId, attrs: &TextAttributes, state: &ControlState) -> View {
        let mut children = vec![
            View::label(&attrs.label, attrs.required, state.error),
            View::Input {
                name: id.to_string(),
                input: InputKind::Text,
                value: state.value.clone(),
                placeholder: Some(attrs.placeholder.clone()),
                accept: None,
                readonly: false,
                invalid: state.error,
            },
        ];
        if !attrs.helper_text.is_empty() {
            children.push(View::helper(&attrs.helper_text, state.error));
        }
        View::column(children)
    }

    fn properties_view(_id: &InstanceId, draft: &TextAttributes, state: &EditorState) -> View {
        let mut children = vec![
            text_input("label", &draft.label),
            text_input("helper_text", &draft.helper_text),
            text_input("placeholder", &draft.placeholder),
            View::Switch {
                name: "required".into(),
                label: "Required".into(),
                checked: draft.required,
            },
        ];
        children.extend(error_notices(&state.errors));
        View::column(children)
    }

    fn check_properties(draft: &TextAttributes) -> Vec<String> {
        let mut errors = Vec::new();
        if draft.label.trim().is_empty() {
            errors.push("Label is required".to_string());
        }
        if draft.helper_text.chars().count() > HELPER_TEXT_MAX {
            errors.push(format!("Helper text must be at most {HELPER_TEXT_MAX} characters"));
        }
        errors
    }

    fn validate(attrs: &TextAttributes, value: Option<&str>) -> bool {
        check_required(attrs.required, value)
    }
}
