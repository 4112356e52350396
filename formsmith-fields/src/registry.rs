//! FieldRegistry: the main API surface of the crate.
//!
//! Maps type tags to registered descriptors and dispatches construction,
//! rendering and validation through them. Registration happens once at
//! start-up; afterwards the registry is shared read-only (usually behind an
//! `Arc`). It never holds instances, only descriptors.

use std::collections::HashMap;

use tracing::debug;

use crate::control::FormControl;
use crate::descriptor::{FieldDescriptor, RegisteredField};
use crate::editor::PropertiesEditor;
use crate::error::{FieldsError, Result};
use crate::instance::{FieldInstance, InstanceId};
use crate::kind::FieldKind;
use crate::render::{FormContext, PropertiesContext, RenderContext, Rendered};
use crate::view::View;

/// Collects descriptors for `FieldRegistry::builder()`.
///
/// Errors (an incomplete descriptor, a duplicate tag) surface from `build()`.
pub struct FieldRegistryBuilder {
    descriptors: Vec<Result<FieldDescriptor>>,
}

impl FieldRegistryBuilder {
    /// Add a typed field kind.
    pub fn kind<K: FieldKind>(mut self) -> Self {
        self.descriptors.push(FieldDescriptor::of::<K>());
        self
    }

    /// Add a hand-assembled descriptor.
    pub fn descriptor(mut self, descriptor: FieldDescriptor) -> Self {
        self.descriptors.push(Ok(descriptor));
        self
    }

    /// Add the built-in text, image and banner fields.
    pub fn builtins(self) -> Self {
        crate::builtin::add_builtins(self)
    }

    pub fn build(self) -> Result<FieldRegistry> {
        let mut registry = FieldRegistry::new();
        for descriptor in self.descriptors {
            registry.register(descriptor?)?;
        }
        debug!(fields = registry.len(), "field registry built");
        Ok(registry)
    }
}

/// Registry of field descriptors, keyed by type tag.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: Vec<RegisteredField>,
    index: HashMap<String, usize>,
}

impl FieldRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a registry from several descriptors.
    ///
    /// ```rust,ignore
    /// let registry = FieldRegistry::builder()
    ///     .builtins()
    ///     .kind::<RatingField>()
    ///     .build()?;
    /// ```
    pub fn builder() -> FieldRegistryBuilder {
        FieldRegistryBuilder {
            descriptors: Vec::new(),
        }
    }

    /// A registry holding the built-in field kinds.
    pub fn with_builtins() -> Result<Self> {
        Self::builder().builtins().build()
    }

    // --- Registration ---

    /// Register a descriptor.
    ///
    /// Fails with `DuplicateTypeTag` if the tag is taken and with
    /// `IncompleteDescriptor` if a render variant or the validator is missing.
    pub fn register(&mut self, descriptor: FieldDescriptor) -> Result<&RegisteredField> {
        if self.index.contains_key(descriptor.type_tag()) {
            return Err(FieldsError::DuplicateTypeTag {
                type_tag: descriptor.type_tag().to_string(),
            });
        }
        let registered = descriptor.into_registered()?;
        let idx = self.fields.len();
        self.index.insert(registered.type_tag().to_string(), idx);
        self.fields.push(registered);
        debug!(type_tag = %self.fields[idx].type_tag(), "registered field type");
        Ok(&self.fields[idx])
    }

    /// Register a typed field kind.
    pub fn register_kind<K: FieldKind>(&mut self) -> Result<&RegisteredField> {
        self.register(FieldDescriptor::of::<K>()?)
    }

    // --- Lookup ---

    /// Look up a descriptor, failing with `UnknownFieldType`.
    pub fn lookup(&self, type_tag: &str) -> Result<&RegisteredField> {
        self.get(type_tag)
            .ok_or_else(|| FieldsError::UnknownFieldType {
                type_tag: type_tag.to_string(),
            })
    }

    pub fn get(&self, type_tag: &str) -> Option<&RegisteredField> {
        self.index.get(type_tag).map(|&i| &self.fields[i])
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.index.contains_key(type_tag)
    }

    /// All descriptors, in registration order.
    pub fn all(&self) -> &[RegisteredField] {
        &self.fields
    }

    pub fn type_tags(&self) -> Vec<&str> {
        self.fields.iter().map(RegisteredField::type_tag).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // --- Dispatch ---

    /// Construct a new instance of `type_tag` with a deep copy of its defaults.
    pub fn construct(&self, type_tag: &str, id: InstanceId) -> Result<FieldInstance> {
        Ok(self.lookup(type_tag)?.construct(id))
    }

    /// Render `instance` in the mode `ctx` selects.
    pub fn render(&self, instance: &FieldInstance, ctx: RenderContext) -> Result<Rendered> {
        self.lookup(instance.type_tag())?.render(instance, ctx)
    }

    pub fn render_designer(&self, instance: &FieldInstance) -> Result<View> {
        match self.render(instance, RenderContext::Designer)? {
            Rendered::Designer(view) => Ok(view),
            other => Ok(other.view()),
        }
    }

    pub fn render_form(
        &self,
        instance: &FieldInstance,
        ctx: FormContext,
    ) -> Result<Box<dyn FormControl>> {
        self.render(instance, RenderContext::Form(ctx))?.into_form()
    }

    pub fn render_properties(
        &self,
        instance: &FieldInstance,
        ctx: PropertiesContext,
    ) -> Result<Box<dyn PropertiesEditor>> {
        self.render(instance, RenderContext::Properties(ctx))?.into_properties()
    }

    /// Run the instance's validator. The result is returned unchanged.
    pub fn validate(&self, instance: &FieldInstance, value: Option<&str>) -> Result<bool> {
        Ok(self.lookup(instance.type_tag())?.validate(instance, value))
    }
}
