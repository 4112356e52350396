//! Form definitions and submissions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use formsmith_fields::FieldInstance;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{DesignerError, Result};

/// A form: metadata plus the ordered field instances the designer produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub id: Ulid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published: bool,
    /// Public handle under which the live form is shared.
    pub share_url: Ulid,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub fields: Vec<FieldInstance>,
    #[serde(default)]
    pub visits: u64,
    #[serde(default)]
    pub submissions: u64,
}

impl FormDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Ulid::new(),
            name: name.into(),
            description: String::new(),
            published: false,
            share_url: Ulid::new(),
            created_at: Utc::now(),
            fields: Vec::new(),
            visits: 0,
            submissions: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The field sequence as JSON, the canonical form exchanged with frontends.
    pub fn content(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.fields)?)
    }

    /// Replace the field sequence from its JSON form.
    pub fn set_content(&mut self, content: &str) -> Result<()> {
        self.ensure_editable()?;
        self.fields = serde_json::from_str(content)?;
        Ok(())
    }

    pub fn ensure_editable(&self) -> Result<()> {
        if self.published {
            return Err(DesignerError::FormPublished {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Freeze the form and make it available for filling in. Idempotent.
    pub fn publish(&mut self) {
        self.published = true;
    }

    /// Share of visits that ended in a submission, in percent.
    pub fn submission_rate(&self) -> f64 {
        if self.visits == 0 {
            return 0.0;
        }
        self.submissions as f64 / self.visits as f64 * 100.0
    }
}

/// The values captured by one run of a live form, keyed by field id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub form_id: Ulid,
    pub submitted_at: DateTime<Utc>,
    pub values: BTreeMap<String, String>,
}

/// Submissions laid out as a table: one column per labelled field, one row
/// per submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SubmissionTable {
    pub const SUBMITTED_AT: &'static str = "Submitted at";

    /// Columns follow the form's field order. Fields without a `label`
    /// attribute hold no answer and get no column; a field missing from a
    /// submission yields an empty cell.
    pub fn build(form: &FormDefinition, submissions: &[FormSubmission]) -> Self {
        let columns: Vec<(&str, &str)> = form
            .fields
            .iter()
            .filter_map(|field| {
                let label = field.attributes().get_str("label")?;
                Some((field.id().as_str(), label))
            })
            .collect();

        let headers = std::iter::once(Self::SUBMITTED_AT.to_string())
            .chain(columns.iter().map(|(_, label)| label.to_string()))
            .collect();
        let rows = submissions
            .iter()
            .map(|submission| {
                std::iter::once(submission.submitted_at.to_rfc3339())
                    .chain(columns.iter().map(|(id, _)| {
                        submission.values.get(*id).cloned().unwrap_or_default()
                    }))
                    .collect()
            })
            .collect();
        Self { headers, rows }
    }
}
