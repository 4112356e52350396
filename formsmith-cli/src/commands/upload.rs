//! `upload`: store media and optionally attach it to a designer field.

use std::path::PathBuf;

use formsmith_designer::{media_outcome, FormDesigner};
use formsmith_fields::{InstanceId, UploadDisposition};
use formsmith_upload::{MediaUpload, MediaUploader};
use serde::Serialize;
use tracing::debug;

use super::{parse_form_id, CommandContext};
use crate::error::{CliError, CliResult};
use crate::exit_codes::{EXIT_SUCCESS, EXIT_WARNING};

#[derive(Serialize)]
struct UploadReport {
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn upload(
    ctx: &CommandContext,
    file: Option<PathBuf>,
    data_url: Option<String>,
    target: Option<(String, String)>,
) -> CliResult<i32> {
    let media = match (file, data_url) {
        (Some(path), _) => MediaUpload::from_path(&path).await?,
        (None, Some(url)) => MediaUpload::from_data_url(&url)?,
        (None, None) => return Err(CliError::new("nothing to upload", EXIT_WARNING)),
    };
    debug!(file = media.file_name(), size = media.len(), "uploading");
    let uploader = ctx.uploader();

    let Some((form, field)) = target else {
        let stored = uploader.upload(media).await?;
        ctx.emit(&stored, || format!("{}\n", stored.url))?;
        return Ok(EXIT_SUCCESS);
    };

    let id = parse_form_id(&form)?;
    let mut store = ctx.store().await?;
    let mut designer = FormDesigner::new(ctx.registry.clone(), store.form(&id)?.clone())?;
    let field = InstanceId::from(field);
    let ticket = designer.begin_upload(&field)?;
    let outcome = media_outcome(uploader.upload(media).await);

    let report = match designer.complete_upload(&ticket, outcome)? {
        UploadDisposition::Applied => {
            store.write_form(designer.form()).await?;
            let url = designer.get(&field).and_then(|instance| {
                let key = designer
                    .registry()
                    .lookup(instance.type_tag())
                    .ok()?
                    .media_attribute()?;
                instance.attributes().get_str(key).map(String::from)
            });
            UploadReport { url, error: None }
        }
        UploadDisposition::Failed(message) => UploadReport {
            url: None,
            error: Some(message),
        },
        UploadDisposition::Stale => UploadReport {
            url: None,
            error: Some("upload superseded".to_string()),
        },
    };

    let code = if report.error.is_some() {
        EXIT_WARNING
    } else {
        EXIT_SUCCESS
    };
    ctx.emit(&report, || match (&report.url, &report.error) {
        (_, Some(error)) => format!("{error}\n"),
        (Some(url), None) => format!("{url}\n"),
        (None, None) => String::new(),
    })?;
    Ok(code)
}
