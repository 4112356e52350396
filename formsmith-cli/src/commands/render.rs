//! `render`: draw every field of a stored form in one mode.

use std::fmt::Write as _;

use formsmith_fields::{FormContext, PropertiesContext, RenderContext, RenderMode, View};
use serde::Serialize;

use super::{parse_form_id, CommandContext};
use crate::error::CliResult;
use crate::exit_codes::{EXIT_SUCCESS, EXIT_WARNING};

/// One field's render result. Failures are reported per field.
#[derive(Debug, Serialize)]
pub struct RenderedField {
    pub id: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<View>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn render(ctx: &CommandContext, form: &str, mode: RenderMode) -> CliResult<i32> {
    let id = parse_form_id(form)?;
    let store = ctx.store().await?;
    let form = store.form(&id)?;

    let fields: Vec<RenderedField> = form
        .fields
        .iter()
        .map(|instance| {
            let render_ctx = match mode {
                RenderMode::Designer => RenderContext::Designer,
                RenderMode::Form => RenderContext::Form(FormContext::new()),
                RenderMode::Properties => RenderContext::Properties(PropertiesContext::new()),
            };
            let rendered = ctx.registry.render(instance, render_ctx);
            RenderedField {
                id: instance.id().to_string(),
                type_tag: instance.type_tag().to_string(),
                view: rendered.as_ref().ok().map(|r| r.view()),
                error: rendered.err().map(|e| e.to_string()),
            }
        })
        .collect();

    ctx.emit(&fields, || {
        let mut out = String::new();
        for field in &fields {
            let _ = writeln!(out, "[{}] {}", field.type_tag, field.id);
            match (&field.view, &field.error) {
                (Some(view), _) => write_view(&mut out, view, 1),
                (None, Some(error)) => {
                    let _ = writeln!(out, "  ! {error}");
                }
                (None, None) => {}
            }
        }
        out
    })?;

    let failed = fields.iter().any(|f| f.error.is_some());
    Ok(if failed { EXIT_WARNING } else { EXIT_SUCCESS })
}

fn write_view(out: &mut String, view: &View, depth: usize) {
    let pad = "  ".repeat(depth);
    let _ = match view {
        View::Column { children } => {
            for child in children {
                write_view(out, child, depth);
            }
            return;
        }
        View::Label { text, required, .. } => {
            let marker = if *required { " *" } else { "" };
            writeln!(out, "{pad}{text}{marker}")
        }
        View::Input {
            name,
            value,
            placeholder,
            ..
        } => {
            let shown = value
                .as_deref()
                .or(placeholder.as_deref())
                .unwrap_or_default();
            writeln!(out, "{pad}<{name}> {shown}")
        }
        other => writeln!(out, "{pad}{}", summarize(other)),
    };
}

/// One-line form of the leaf views without a dedicated layout.
fn summarize(view: &View) -> String {
    serde_json::to_string(view).unwrap_or_else(|_| format!("{view:?}"))
}
