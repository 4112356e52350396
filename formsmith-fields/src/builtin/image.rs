//! Image upload field.
//!
//! In a live form the uploaded file's URL is the field's value. In the
//! designer an uploaded image becomes the field's preview (`image_url`).

use serde::{Deserialize, Serialize};

use crate::control::ControlState;
use crate::editor::EditorState;
use crate::instance::InstanceId;
use crate::kind::{FieldKind, PaletteEntry};
use crate::validation::check_required;
use crate::view::{InputKind, View};

use super::{error_notices, file_input, text_input, upload_notice};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageAttributes {
    pub label: String,
    pub helper_text: String,
    pub required: bool,
    pub image_url: Option<String>,
}

impl Default for ImageAttributes {
    fn default() -> Self {
        Self {
            label: "Upload Image".into(),
            helper_text: "Upload an image file".into(),
            required: false,
            image_url: None,
        }
    }
}

pub struct ImageField;

impl FieldKind for ImageField {
    const TYPE_TAG: &'static str = "ImageField";
    type Attributes = ImageAttributes;

    fn palette() -> PaletteEntry {
        PaletteEntry::new("image", "Image Field")
    }

    fn media_attribute() -> Option<&'static str> {
        Some("image_url")
    }

    fn designer_view(attrs: &ImageAttributes) -> View {
        let mut children = vec![View::label(&attrs.label, attrs.required, false)];
        match &attrs.image_url {
            Some(url) => children.push(View::image(url, "Uploaded preview")),
            None => children.push(View::helper("No image uploaded", false)),
        }
        if !attrs.helper_text.is_empty() {
            children.push(View::helper(&attrs.helper_text, false));
        }
        View::column(children)
    }

    fn form_view(id: &InstanceId, attrs: &ImageAttributes, state: &ControlState) -> View {
        let mut children = vec![
            View::label(&attrs.label, attrs.required, state.error),
            View::Input {
                name: id.to_string(),
                input: InputKind::File,
                value: None,
                placeholder: None,
                accept: Some("image/*".into()),
                readonly: false,
                invalid: state.error,
            },
        ];
        if let Some(url) = &state.value {
            children.push(View::image(url, "Preview"));
        }
        children.extend(upload_notice(&state.upload));
        if !attrs.helper_text.is_empty() {
            children.push(View::helper(&attrs.helper_text, state.error));
        }
        View::column(children)
    }

    fn properties_view(_id: &InstanceId, draft: &ImageAttributes, state: &EditorState) -> View {
        let mut children = vec![
            text_input("label", &draft.label),
            text_input("helper_text", &draft.helper_text),
            View::Switch {
                name: "required".into(),
                label: "Required".into(),
                checked: draft.required,
            },
            file_input("image_url"),
        ];
        if let Some(url) = &draft.image_url {
            children.push(View::image(url, "Current image"));
        }
        children.extend(upload_notice(&state.upload));
        children.extend(error_notices(&state.errors));
        View::column(children)
    }

    fn check_properties(draft: &ImageAttributes) -> Vec<String> {
        if draft.label.trim().is_empty() {
            vec!["Label is required".to_string()]
        } else {
            Vec::new()
        }
    }

    fn validate(attrs: &ImageAttributes, value: Option<&str>) -> bool {
        check_required(attrs.required, value)
    }
}
