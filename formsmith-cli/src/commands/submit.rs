//! Filling in published forms and reading back what was submitted.

use std::fmt::Write as _;
use std::path::Path;

use formsmith_designer::{LiveForm, SubmissionTable, SubmitOutcome};
use formsmith_fields::InstanceId;
use serde::Serialize;
use tracing::{info, warn};

use super::{parse_form_id, split_pair, CommandContext};
use crate::error::{CliError, CliResult};
use crate::exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_WARNING};

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
enum SubmitReport<'a> {
    Accepted {
        submission: &'a formsmith_designer::FormSubmission,
    },
    Rejected {
        invalid: Vec<String>,
    },
}

pub async fn submit(ctx: &CommandContext, form: &str, values: &[String]) -> CliResult<i32> {
    let id = parse_form_id(form)?;
    let mut store = ctx.store().await?;
    let definition = store.form(&id)?.clone();
    let mut live = LiveForm::open(ctx.registry.clone(), &definition)?;
    store.record_visit(&id).await?;

    for (field, error) in live.broken() {
        warn!(%field, %error, "field cannot be filled in");
    }

    for raw in values {
        let (field, value) = split_pair(raw)?;
        let field = InstanceId::from(field);
        if live.control(&field).is_none() {
            return Err(CliError::new(
                format!("form has no fillable field '{field}'"),
                EXIT_ERROR,
            ));
        }
        if !live.enter(&field, value)? {
            info!(%field, "value not accepted by field");
        }
    }

    match live.submit()? {
        SubmitOutcome::Accepted(submission) => {
            store.add_submission(&submission).await?;
            let report = SubmitReport::Accepted {
                submission: &submission,
            };
            ctx.emit(&report, || {
                format!("submitted {} values\n", submission.values.len())
            })?;
            Ok(EXIT_SUCCESS)
        }
        SubmitOutcome::Rejected { invalid } => {
            let invalid: Vec<String> = invalid.iter().map(ToString::to_string).collect();
            let text = {
                let mut out = String::from("submission rejected, invalid fields:\n");
                for field in &invalid {
                    let _ = writeln!(out, "  {field}");
                }
                out
            };
            ctx.emit(&SubmitReport::Rejected { invalid }, || text)?;
            Ok(EXIT_WARNING)
        }
    }
}

pub async fn list(ctx: &CommandContext, form: &str) -> CliResult<i32> {
    let id = parse_form_id(form)?;
    let store = ctx.store().await?;
    store.form(&id)?;
    let submissions = store.submissions(&id).await?;
    ctx.emit(&submissions, || {
        let mut out = String::new();
        for submission in &submissions {
            let _ = writeln!(out, "{}", submission.submitted_at.to_rfc3339());
            for (field, value) in &submission.values {
                let _ = writeln!(out, "  {field} = {value}");
            }
        }
        out
    })?;
    Ok(EXIT_SUCCESS)
}

/// Write every submission of a form to a CSV file.
pub async fn export(ctx: &CommandContext, form: &str, path: &Path) -> CliResult<i32> {
    let id = parse_form_id(form)?;
    let store = ctx.store().await?;
    let definition = store.form(&id)?.clone();
    let submissions = store.submissions(&id).await?;
    let table = SubmissionTable::build(&definition, &submissions);

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info!(form = %id, rows = table.rows.len(), path = %path.display(), "submissions exported");
    ctx.emit(&table, || format!("exported {} submissions to {}\n", table.rows.len(), path.display()))?;
    Ok(EXIT_SUCCESS)
}
