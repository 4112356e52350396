//! Strongly typed field kinds.
//!
//! A `FieldKind` owns a typed attribute struct and knows how to draw itself
//! in each mode. `FieldDescriptor::of::<K>()` erases it into the opaque,
//! bag-based descriptor the registry stores.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::control::ControlState;
use crate::editor::EditorState;
use crate::instance::InstanceId;
use crate::view::View;

/// Icon and label for the designer's field palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub icon: String,
    pub label: String,
}

impl PaletteEntry {
    pub fn new(icon: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            label: label.into(),
        }
    }
}

/// A field type with its own attribute shape.
pub trait FieldKind: Send + Sync + 'static {
    /// Registry key for this kind.
    const TYPE_TAG: &'static str;

    /// Typed attributes. `Default` is the template every new instance starts from.
    ///
    /// Optional attributes should serialize as `null` rather than be skipped, so
    /// every key is present in the bag and properties editors can address it.
    type Attributes: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static;

    fn palette() -> PaletteEntry;

    /// Attribute that receives the URL of an uploaded media file, if the kind takes uploads.
    fn media_attribute() -> Option<&'static str> {
        None
    }

    /// Whether the live form collects a value from this field.
    fn captures_value() -> bool {
        true
    }

    fn designer_view(attrs: &Self::Attributes) -> View;

    fn form_view(id: &InstanceId, attrs: &Self::Attributes, state: &ControlState) -> View;

    fn properties_view(id: &InstanceId, draft: &Self::Attributes, state: &EditorState) -> View;

    /// Problems with a properties draft, as user-facing messages. Empty means valid.
    fn check_properties(_draft: &Self::Attributes) -> Vec<String> {
        Vec::new()
    }

    /// Accept or reject a candidate value. Must be total: `None` is the
    /// "no value" sentinel.
    fn validate(attrs: &Self::Attributes, value: Option<&str>) -> bool;
}
