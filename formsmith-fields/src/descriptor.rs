//! Field descriptors: how a field type is constructed, rendered and validated.
//!
//! A `FieldDescriptor` is assembled by the caller and may be incomplete. The
//! registry checks it on registration and stores a `RegisteredField`, which
//! always carries all three render variants and a validator.

use std::fmt;
use std::sync::Arc;

use crate::attributes::AttributeBag;
use crate::control::{FormControl, ValueControl};
use crate::editor::{DraftEditor, PropertiesEditor};
use crate::error::{FieldsError, Result};
use crate::instance::{FieldInstance, InstanceId};
use crate::kind::{FieldKind, PaletteEntry};
use crate::render::{FormContext, PropertiesContext, RenderContext, RenderMode, Rendered};
use crate::view::View;

/// `designer` render variant.
pub type DesignerRender = Arc<dyn Fn(&FieldInstance) -> Result<View> + Send + Sync>;

/// `form` render variant.
pub type FormRender =
    Arc<dyn Fn(&FieldInstance, FormContext) -> Result<Box<dyn FormControl>> + Send + Sync>;

/// `properties` render variant.
pub type PropertiesRender = Arc<
    dyn Fn(&FieldInstance, PropertiesContext) -> Result<Box<dyn PropertiesEditor>> + Send + Sync,
>;

/// Validator: `None` is the "no value" sentinel.
pub type Validator = Arc<dyn Fn(&FieldInstance, Option<&str>) -> bool + Send + Sync>;

/// A descriptor under construction.
pub struct FieldDescriptor {
    type_tag: String,
    default_attributes: AttributeBag,
    palette: Option<PaletteEntry>,
    media_attribute: Option<String>,
    designer: Option<DesignerRender>,
    form: Option<FormRender>,
    properties: Option<PropertiesRender>,
    validator: Option<Validator>,
}

impl FieldDescriptor {
    pub fn new(type_tag: impl Into<String>, default_attributes: AttributeBag) -> Self {
        Self {
            type_tag: type_tag.into(),
            default_attributes,
            palette: None,
            media_attribute: None,
            designer: None,
            form: None,
            properties: None,
            validator: None,
        }
    }

    /// Erase a typed `FieldKind` into a complete descriptor.
    pub fn of<K: FieldKind>() -> Result<Self> {
        let defaults = AttributeBag::from_typed(K::TYPE_TAG, &K::Attributes::default())?;
        let mut descriptor = Self::new(K::TYPE_TAG, defaults)
            .palette(K::palette())
            .designer(|instance| {
                let attrs = instance.attributes().decode::<K::Attributes>(K::TYPE_TAG)?;
                Ok(K::designer_view(&attrs))
            })
            .form(|instance, ctx| Ok(Box::new(ValueControl::<K>::new(instance, ctx)?)))
            .properties(|instance, ctx| Ok(Box::new(DraftEditor::<K>::new(instance, ctx)?)))
            .validator(|instance, value| {
                match instance.attributes().decode::<K::Attributes>(K::TYPE_TAG) {
                    Ok(attrs) => K::validate(&attrs, value),
                    Err(e) => {
                        tracing::warn!(id = %instance.id(), %e, "cannot validate against malformed attributes");
                        false
                    }
                }
            });
        if let Some(key) = K::media_attribute() {
            descriptor = descriptor.media_attribute(key);
        }
        Ok(descriptor)
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn palette(mut self, palette: PaletteEntry) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn media_attribute(mut self, key: impl Into<String>) -> Self {
        self.media_attribute = Some(key.into());
        self
    }

    pub fn designer<F>(mut self, render: F) -> Self
    where
        F: Fn(&FieldInstance) -> Result<View> + Send + Sync + 'static,
    {
        self.designer = Some(Arc::new(render));
        self
    }

    pub fn form<F>(mut self, render: F) -> Self
    where
        F: Fn(&FieldInstance, FormContext) -> Result<Box<dyn FormControl>> + Send + Sync + 'static,
    {
        self.form = Some(Arc::new(render));
        self
    }

    pub fn properties<F>(mut self, render: F) -> Self
    where
        F: Fn(&FieldInstance, PropertiesContext) -> Result<Box<dyn PropertiesEditor>>
            + Send
            + Sync
            + 'static,
    {
        self.properties = Some(Arc::new(render));
        self
    }

    pub fn validator<F>(mut self, validate: F) -> Self
    where
        F: Fn(&FieldInstance, Option<&str>) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validate));
        self
    }

    /// Check completeness and freeze.
    pub(crate) fn into_registered(self) -> Result<RegisteredField> {
        let mut missing = Vec::new();
        if self.designer.is_none() {
            missing.push("designer");
        }
        if self.form.is_none() {
            missing.push("form");
        }
        if self.properties.is_none() {
            missing.push("properties");
        }
        if self.validator.is_none() {
            missing.push("validator");
        }
        match (self.designer, self.form, self.properties, self.validator) {
            (Some(designer), Some(form), Some(properties), Some(validator)) => {
                let palette = self
                    .palette
                    .unwrap_or_else(|| PaletteEntry::new("field", self.type_tag.clone()));
                Ok(RegisteredField {
                    type_tag: self.type_tag,
                    default_attributes: self.default_attributes,
                    palette,
                    media_attribute: self.media_attribute,
                    designer,
                    form,
                    properties,
                    validator,
                })
            }
            _ => Err(FieldsError::IncompleteDescriptor {
                type_tag: self.type_tag,
                missing,
            }),
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("type_tag", &self.type_tag)
            .field("designer", &self.designer.is_some())
            .field("form", &self.form.is_some())
            .field("properties", &self.properties.is_some())
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// A complete, immutable descriptor owned by the registry.
#[derive(Clone)]
pub struct RegisteredField {
    type_tag: String,
    default_attributes: AttributeBag,
    palette: PaletteEntry,
    media_attribute: Option<String>,
    designer: DesignerRender,
    form: FormRender,
    properties: PropertiesRender,
    validator: Validator,
}

impl RegisteredField {
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// The template new instances are copied from.
    pub fn default_attributes(&self) -> &AttributeBag {
        &self.default_attributes
    }

    pub fn palette(&self) -> &PaletteEntry {
        &self.palette
    }

    pub fn media_attribute(&self) -> Option<&str> {
        self.media_attribute.as_deref()
    }

    /// Render modes this descriptor supports. Always all three.
    pub fn variants(&self) -> [RenderMode; 3] {
        RenderMode::ALL
    }

    /// A new instance with its own deep copy of the default attributes.
    pub fn construct(&self, id: InstanceId) -> FieldInstance {
        FieldInstance::new(id, self.type_tag.clone(), self.default_attributes.clone())
    }

    pub fn render(&self, instance: &FieldInstance, ctx: RenderContext) -> Result<Rendered> {
        match ctx {
            RenderContext::Designer => (self.designer)(instance).map(Rendered::Designer),
            RenderContext::Form(ctx) => {
                let ctx = ctx.with_validator(Arc::clone(&self.validator));
                (self.form)(instance, ctx).map(Rendered::Form)
            }
            RenderContext::Properties(ctx) => {
                (self.properties)(instance, ctx).map(Rendered::Properties)
            }
        }
    }

    pub fn validate(&self, instance: &FieldInstance, value: Option<&str>) -> bool {
        (self.validator)(instance, value)
    }
}

impl fmt::Debug for RegisteredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredField")
            .field("type_tag", &self.type_tag)
            .field("default_attributes", &self.default_attributes)
            .field("palette", &self.palette)
            .field("media_attribute", &self.media_attribute)
            .finish_non_exhaustive()
    }
}
