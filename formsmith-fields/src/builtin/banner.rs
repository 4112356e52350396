//! Banner image: a layout element that shows an uploaded picture and captures no value.

use serde::{Deserialize, Serialize};

use crate::control::ControlState;
use crate::editor::EditorState;
use crate::instance::InstanceId;
use crate::kind::{FieldKind, PaletteEntry};
use crate::view::View;

use super::{error_notices, file_input, text_input, upload_notice};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerAttributes {
    pub banner_label: Option<String>,
    pub banner_url: Option<String>,
}

pub struct BannerField;

impl BannerField {
    fn banner(attrs: &BannerAttributes) -> View {
        let mut children = Vec::new();
        match &attrs.banner_url {
            Some(url) => children.push(View::image(
                url,
                attrs.banner_label.as_deref().unwrap_or("Banner"),
            )),
            None => children.push(View::helper("No banner uploaded", false)),
        }
        if let Some(label) = &attrs.banner_label {
            children.push(View::text(label));
        }
        View::column(children)
    }
}

impl FieldKind for BannerField {
    const TYPE_TAG: &'static str = "BannerField";
    type Attributes = BannerAttributes;

    fn palette() -> PaletteEntry {
        PaletteEntry::new("panorama", "Banner")
    }

    fn media_attribute() -> Option<&'static str> {
        Some("banner_url")
    }

    fn captures_value() -> bool {
        false
    }

    fn designer_view(attrs: &BannerAttributes) -> View {
        Self::banner(attrs)
    }

    fn form_view(_id: &InstanceId, attrs: &BannerAttributes, _state: &ControlState) -> View {
        Self::banner(attrs)
    }

    fn properties_view(_id: &InstanceId, draft: &BannerAttributes, state: &EditorState) -> View {
        let mut children = vec![
            text_input("banner_label", draft.banner_label.as_deref().unwrap_or("")),
            file_input("banner_url"),
        ];
        if let Some(url) = &draft.banner_url {
            children.push(View::image(url, "Current banner"));
        }
        children.extend(upload_notice(&state.upload));
        children.extend(error_notices(&state.errors));
        View::column(children)
    }

    fn validate(_attrs: &BannerAttributes, _value: Option<&str>) -> bool {
        true
    }
}
