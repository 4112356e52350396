//! Live-form controls: the stateful output of the `form` render variant.

use std::marker::PhantomData;

use tracing::debug;

use crate::error::Result;
use crate::instance::{FieldInstance, InstanceId};
use crate::kind::FieldKind;
use crate::media::{MediaOutcome, UploadDisposition, UploadState};
use crate::render::{FormContext, SubmitValue};
use crate::view::View;

/// Per-control state a kind's `form_view` draws from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlState {
    /// Current candidate value, if the user entered one.
    pub value: Option<String>,
    /// Whether the control currently shows its error styling.
    pub error: bool,
    pub upload: UploadState,
}

/// A field rendered for value capture.
///
/// The control validates itself before submitting and submits at most once
/// per `finalize` call.
pub trait FormControl: Send {
    fn instance_id(&self) -> &InstanceId;

    fn view(&self) -> View;

    fn value(&self) -> Option<&str>;

    /// Record an edit in progress. Nothing is submitted.
    fn change(&mut self, value: &str);

    /// A finalization event (the field lost focus). Validates the current value
    /// and, if it passes, submits it under this control's own id. Returns
    /// whether a value was submitted.
    fn finalize(&mut self, submit: &mut dyn SubmitValue) -> bool;

    /// Set by the host after a whole-form validation pass.
    fn set_invalid(&mut self, invalid: bool);

    fn has_error(&self) -> bool;

    /// Whether the control takes media uploads.
    fn accepts_media(&self) -> bool {
        false
    }

    /// Mark an upload as started. Returns the sequence number its result must
    /// carry, or `None` if the control takes no uploads.
    fn begin_upload(&mut self) -> Option<u64> {
        None
    }

    /// Whether an upload was started and its result has not arrived yet.
    fn upload_pending(&self) -> bool {
        false
    }

    /// Deliver an upload result. Results for anything but the latest upload are stale.
    fn finish_upload(&mut self, _seq: u64, _outcome: MediaOutcome) -> UploadDisposition {
        UploadDisposition::Stale
    }
}

/// The `FormControl` every built-in kind uses.
pub struct ValueControl<K: FieldKind> {
    instance: FieldInstance,
    attrs: K::Attributes,
    ctx: FormContext,
    state: ControlState,
    upload_seq: u64,
    _kind: PhantomData<fn() -> K>,
}

impl<K: FieldKind> ValueControl<K> {
    pub fn new(instance: &FieldInstance, ctx: FormContext) -> Result<Self> {
        let attrs = instance.attributes().decode::<K::Attributes>(K::TYPE_TAG)?;
        let state = ControlState {
            value: ctx.default_value.clone(),
            error: ctx.is_invalid,
            upload: UploadState::Idle,
        };
        Ok(Self {
            instance: instance.clone(),
            attrs,
            ctx,
            state,
            upload_seq: 0,
            _kind: PhantomData,
        })
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }
}

impl<K: FieldKind> FormControl for ValueControl<K> {
    fn instance_id(&self) -> &InstanceId {
        self.instance.id()
    }

    fn view(&self) -> View {
        K::form_view(self.instance.id(), &self.attrs, &self.state)
    }

    fn value(&self) -> Option<&str> {
        self.state.value.as_deref()
    }

    fn change(&mut self, value: &str) {
        self.state.value = Some(value.to_string());
    }

    fn finalize(&mut self, submit: &mut dyn SubmitValue) -> bool {
        if !K::captures_value() {
            return false;
        }
        let valid = self.ctx.validate(&self.instance, self.state.value.as_deref());
        self.state.error = !valid;
        if !valid {
            debug!(id = %self.instance.id(), kind = K::TYPE_TAG, "value rejected, not submitted");
            return false;
        }
        submit.submit(self.instance.id(), self.state.value.as_deref().unwrap_or(""));
        true
    }

    fn set_invalid(&mut self, invalid: bool) {
        self.state.error = invalid;
    }

    fn has_error(&self) -> bool {
        self.state.error || self.state.upload.error().is_some()
    }

    /// Only kinds that capture a value take uploads in a live form.
    fn accepts_media(&self) -> bool {
        K::captures_value() && K::media_attribute().is_some()
    }

    fn upload_pending(&self) -> bool {
        self.state.upload.is_pending()
    }

    fn begin_upload(&mut self) -> Option<u64> {
        if !self.accepts_media() {
            return None;
        }
        self.upload_seq += 1;
        self.state.upload = UploadState::Pending;
        Some(self.upload_seq)
    }

    fn finish_upload(&mut self, seq: u64, outcome: MediaOutcome) -> UploadDisposition {
        if seq != self.upload_seq || !self.state.upload.is_pending() {
            debug!(id = %self.instance.id(), seq, latest = self.upload_seq, "stale upload result dropped");
            return UploadDisposition::Stale;
        }
        match outcome {
            Ok(url) => {
                self.state.value = Some(url);
                self.state.upload = UploadState::Idle;
                self.state.error = false;
                UploadDisposition::Applied
            }
            Err(message) => {
                self.state.upload = UploadState::Failed(message.clone());
                UploadDisposition::Failed(message)
            }
        }
    }
}
