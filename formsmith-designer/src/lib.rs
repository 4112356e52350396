//! Hosts for the Formsmith field model
//!
//! - `FormDesigner` owns the field instances of a form while it is built and
//!   applies attribute mutations and upload results to them
//! - `LiveForm` renders a published form for value capture and produces submissions
//! - `FormStore` keeps definitions and submissions as YAML files

pub mod designer;
pub mod error;
pub mod form;
pub mod live;
pub mod store;

pub use designer::{media_outcome, FormDesigner, UploadTicket};
pub use error::{DesignerError, Result};
pub use form::{FormDefinition, FormSubmission, SubmissionTable};
pub use live::{LiveForm, SubmitOutcome};
pub use store::FormStore;
