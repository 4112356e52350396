//! Built-in field kinds.

mod banner;
mod image;
mod text;

pub use banner::{BannerAttributes, BannerField};
pub use image::{ImageAttributes, ImageField};
pub use text::{TextAttributes, TextField};

use crate::media::UploadState;
use crate::registry::FieldRegistryBuilder;
use crate::view::{InputKind, View};

pub(crate) fn add_builtins(builder: FieldRegistryBuilder) -> FieldRegistryBuilder {
    builder
        .kind::<TextField>()
        .kind::<ImageField>()
        .kind::<BannerField>()
}

fn text_input(name: &str, value: &str) -> View {
    View::Input {
        name: name.to_string(),
        input: InputKind::Text,
        value: Some(value.to_string()),
        placeholder: None,
        accept: None,
        readonly: false,
        invalid: false,
    }
}

fn file_input(name: &str) -> View {
    View::Input {
        name: name.to_string(),
        input: InputKind::File,
        value: None,
        placeholder: None,
        accept: Some("image/*".into()),
        readonly: false,
        invalid: false,
    }
}

fn upload_notice(upload: &UploadState) -> Option<View> {
    match upload {
        UploadState::Idle => None,
        UploadState::Pending => Some(View::info("Uploading...")),
        UploadState::Failed(message) => Some(View::error(message)),
    }
}

fn error_notices(errors: &[String]) -> impl Iterator<Item = View> + '_ {
    errors.iter().map(View::error)
}
