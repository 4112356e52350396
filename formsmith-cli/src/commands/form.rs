//! Form lifecycle commands: create, edit through the designer, publish.

use std::fmt::Write as _;

use formsmith_designer::{FormDefinition, FormDesigner, FormStore};
use formsmith_fields::{FieldInstance, InstanceId};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::{parse_form_id, split_pair, CommandContext};
use crate::error::CliResult;
use crate::exit_codes::{EXIT_SUCCESS, EXIT_WARNING};

#[derive(Serialize)]
struct FormRow<'a> {
    id: String,
    name: &'a str,
    published: bool,
    fields: usize,
    visits: u64,
    submissions: u64,
}

pub async fn list(ctx: &CommandContext) -> CliResult<i32> {
    let store = ctx.store().await?;
    let rows: Vec<FormRow<'_>> = store
        .forms()
        .iter()
        .map(|form| FormRow {
            id: form.id.to_string(),
            name: &form.name,
            published: form.published,
            fields: form.fields.len(),
            visits: form.visits,
            submissions: form.submissions,
        })
        .collect();
    ctx.emit(&rows, || {
        let mut out = String::new();
        for row in &rows {
            let state = if row.published { "published" } else { "draft" };
            let _ = writeln!(
                out,
                "{}  {:<9} {:>2} fields  {}",
                row.id, state, row.fields, row.name
            );
        }
        out
    })?;
    Ok(EXIT_SUCCESS)
}

pub async fn create(ctx: &CommandContext, name: &str, description: &str) -> CliResult<i32> {
    let mut store = ctx.store().await?;
    let form = FormDefinition::new(name).with_description(description);
    store.write_form(&form).await?;
    info!(id = %form.id, name, "form created");
    ctx.emit(&form, || format!("{}\n", form.id))?;
    Ok(EXIT_SUCCESS)
}

/// Load a draft form into a designer.
async fn designer(
    ctx: &CommandContext,
    raw_id: &str,
) -> CliResult<(FormStore, FormDesigner)> {
    let id = parse_form_id(raw_id)?;
    let store = ctx.store().await?;
    let form = store.form(&id)?.clone();
    let designer = FormDesigner::new(ctx.registry.clone(), form)?;
    Ok((store, designer))
}

pub async fn add(
    ctx: &CommandContext,
    form: &str,
    type_tag: &str,
    index: Option<usize>,
) -> CliResult<i32> {
    let (mut store, mut designer) = designer(ctx, form).await?;
    let index = index.unwrap_or(designer.elements().len());
    let id = designer.add_element(index, type_tag)?;
    store.write_form(designer.form()).await?;

    let instance = designer.get(&id).cloned();
    ctx.emit(&instance, || format!("{id}\n"))?;
    Ok(EXIT_SUCCESS)
}

pub async fn remove(ctx: &CommandContext, form: &str, field: &str) -> CliResult<i32> {
    let (mut store, mut designer) = designer(ctx, form).await?;
    let removed = designer.remove_element(&InstanceId::from(field))?;
    store.write_form(designer.form()).await?;
    ctx.emit(&removed, || format!("removed {}\n", removed.id()))?;
    Ok(EXIT_SUCCESS)
}

/// Read a command-line value as JSON, falling back to a plain string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[derive(Serialize)]
struct SetReport<'a> {
    applied: bool,
    errors: &'a [String],
    field: Option<&'a FieldInstance>,
}

pub async fn set(ctx: &CommandContext, form: &str, field: &str, pairs: &[String]) -> CliResult<i32> {
    let (mut store, mut designer) = designer(ctx, form).await?;
    let id = InstanceId::from(field);
    let mut editor = designer.properties_editor(&id)?;
    for raw in pairs {
        let (key, value) = split_pair(raw)?;
        editor.set(key, parse_value(value))?;
    }

    let applied = designer.commit_properties(editor.as_mut())?;
    if applied {
        store.write_form(designer.form()).await?;
    }
    let report = SetReport {
        applied,
        errors: editor.errors(),
        field: designer.get(&id),
    };
    ctx.emit(&report, || {
        if applied {
            format!("updated {id}\n")
        } else {
            let mut out = format!("{id} not updated\n");
            for error in report.errors {
                let _ = writeln!(out, "  {error}");
            }
            out
        }
    })?;
    Ok(if applied { EXIT_SUCCESS } else { EXIT_WARNING })
}

pub async fn publish(ctx: &CommandContext, form: &str) -> CliResult<i32> {
    let id = parse_form_id(form)?;
    let mut store = ctx.store().await?;
    let form = store.publish(&id).await?;
    ctx.emit(form, || format!("{}\n", form.share_url))?;
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_values_parse_as_json_first() {
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("null"), Value::Null);
        assert_eq!(parse_value("\"quoted\""), json!("quoted"));
        assert_eq!(parse_value("Email address"), json!("Email address"));
    }
}
