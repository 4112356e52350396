use std::fmt::Write as _;

use formsmith_fields::{AttributeBag, PaletteEntry};
use serde::Serialize;

use super::CommandContext;
use crate::error::CliResult;
use crate::exit_codes::EXIT_SUCCESS;

#[derive(Serialize)]
struct FieldTypeRow<'a> {
    type_tag: &'a str,
    palette: &'a PaletteEntry,
    media_attribute: Option<&'a str>,
    defaults: &'a AttributeBag,
}

pub fn list(ctx: &CommandContext) -> CliResult<i32> {
    let rows: Vec<FieldTypeRow<'_>> = ctx
        .registry
        .all()
        .iter()
        .map(|f| FieldTypeRow {
            type_tag: f.type_tag(),
            palette: f.palette(),
            media_attribute: f.media_attribute(),
            defaults: f.default_attributes(),
        })
        .collect();

    ctx.emit(&rows, || {
        let mut out = String::new();
        for row in &rows {
            let _ = writeln!(out, "{:<14} {}", row.type_tag, row.palette.label);
            for (key, value) in row.defaults.iter() {
                let _ = writeln!(out, "    {key} = {value}");
            }
        }
        out
    })?;
    Ok(EXIT_SUCCESS)
}
