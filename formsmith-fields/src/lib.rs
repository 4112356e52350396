//! Form element plugin model
//!
//! `formsmith-fields` owns the contract every form element type fulfils: a
//! descriptor per type tag, instances that carry an opaque attribute bag, three
//! render variants (designer preview, live form control, properties editor) and
//! a validator. Hosts (the form designer, the live form) only ever talk to
//! element types through the `FieldRegistry`.
//!
//! # Architecture
//!
//! - **Registry-driven**: adding an element type is one `register` call, no host changes
//! - **Opaque attributes**: hosts store and copy `AttributeBag`s without reading them
//! - **Typed kinds**: `FieldKind` implementors get typed attributes; the registry erases them
//! - **Callbacks at the edges**: controls submit through `SubmitValue`, editors through `ApplyChanges`

pub mod attributes;
pub mod builtin;
pub mod control;
pub mod descriptor;
pub mod editor;
pub mod error;
pub mod instance;
pub mod kind;
pub mod media;
pub mod registry;
pub mod render;
pub mod validation;
pub mod view;

pub use attributes::AttributeBag;
pub use builtin::{BannerField, ImageField, TextField};
pub use control::{ControlState, FormControl, ValueControl};
pub use descriptor::{FieldDescriptor, RegisteredField};
pub use editor::{DraftEditor, EditorState, PropertiesEditor};
pub use error::{FieldsError, Result};
pub use instance::{FieldInstance, InstanceId};
pub use kind::{FieldKind, PaletteEntry};
pub use media::{MediaOutcome, UploadDisposition, UploadState};
pub use registry::{FieldRegistry, FieldRegistryBuilder};
pub use render::{
    ApplyChanges, FormContext, PropertiesContext, RenderContext, RenderMode, Rendered, SubmitValue,
};
pub use view::{InputKind, NoticeLevel, View};
