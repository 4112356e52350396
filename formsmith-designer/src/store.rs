//! FormStore: form definitions and submissions as YAML files.
//!
//! Layout under the store root:
//!
//! ```text
//! forms/<form-ulid>.yaml          one definition per file
//! submissions/<form-ulid>.yaml    every submission of that form, as a list
//! ```
//!
//! Definitions are indexed in memory by ULID and by share URL. Every write
//! goes through a temp file and a rename.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};
use ulid::Ulid;

use crate::error::{DesignerError, Result};
use crate::form::{FormDefinition, FormSubmission};

pub struct FormStore {
    root: PathBuf,
    forms: Vec<FormDefinition>,
    id_index: HashMap<Ulid, usize>,
    share_index: HashMap<Ulid, usize>,
}

impl FormStore {
    /// Open or create a store: create directories, load every definition.
    ///
    /// Files that do not parse are skipped with a warning.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join("forms")).await?;
        fs::create_dir_all(root.join("submissions")).await?;

        let mut store = Self {
            root,
            forms: Vec::new(),
            id_index: HashMap::new(),
            share_index: HashMap::new(),
        };
        store.load_forms().await?;
        debug!(forms = store.forms.len(), "form store opened");
        Ok(store)
    }

    async fn load_forms(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(self.root.join("forms")).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            let content = fs::read_to_string(&path).await?;
            match serde_yaml_ng::from_str::<FormDefinition>(&content) {
                Ok(form) => self.index(form),
                Err(e) => warn!(path = %path.display(), %e, "skipping unreadable form"),
            }
        }
        // ULIDs sort by creation time
        self.forms.sort_by_key(|f| f.id);
        self.reindex();
        Ok(())
    }

    fn index(&mut self, form: FormDefinition) {
        let idx = self.forms.len();
        self.id_index.insert(form.id, idx);
        self.share_index.insert(form.share_url, idx);
        self.forms.push(form);
    }

    fn reindex(&mut self) {
        self.id_index.clear();
        self.share_index.clear();
        for (idx, form) in self.forms.iter().enumerate() {
            self.id_index.insert(form.id, idx);
            self.share_index.insert(form.share_url, idx);
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // --- Forms ---

    /// All forms, oldest first.
    pub fn forms(&self) -> &[FormDefinition] {
        &self.forms
    }

    pub fn get_form(&self, id: &Ulid) -> Option<&FormDefinition> {
        self.id_index.get(id).map(|&i| &self.forms[i])
    }

    /// Resolve a form by ULID or fail with `FormNotFound`.
    pub fn form(&self, id: &Ulid) -> Result<&FormDefinition> {
        self.get_form(id).ok_or_else(|| DesignerError::FormNotFound {
            id: id.to_string(),
        })
    }

    pub fn get_by_share_url(&self, share_url: &Ulid) -> Option<&FormDefinition> {
        self.share_index.get(share_url).map(|&i| &self.forms[i])
    }

    /// Create or update a definition. Persists immediately.
    pub async fn write_form(&mut self, form: &FormDefinition) -> Result<()> {
        let yaml = serde_yaml_ng::to_string(form)?;
        atomic_write(&self.form_path(&form.id), yaml.as_bytes()).await?;

        if let Some(&idx) = self.id_index.get(&form.id) {
            let old_share = self.forms[idx].share_url;
            if old_share != form.share_url {
                self.share_index.remove(&old_share);
                self.share_index.insert(form.share_url, idx);
            }
            self.forms[idx] = form.clone();
        } else {
            self.index(form.clone());
        }
        debug!(id = %form.id, name = %form.name, "form written");
        Ok(())
    }

    /// Delete a definition and its submissions.
    pub async fn delete_form(&mut self, id: &Ulid) -> Result<FormDefinition> {
        let idx = self
            .id_index
            .get(id)
            .copied()
            .ok_or_else(|| DesignerError::FormNotFound { id: id.to_string() })?;

        let _ = fs::remove_file(self.form_path(id)).await;
        let _ = fs::remove_file(self.submissions_path(id)).await;

        let removed = self.forms.remove(idx);
        self.reindex();
        debug!(%id, "form deleted");
        Ok(removed)
    }

    /// Publish a form. Publishing an already published form is a no-op.
    pub async fn publish(&mut self, id: &Ulid) -> Result<&FormDefinition> {
        let mut form = self.form(id)?.clone();
        if !form.published {
            form.publish();
            self.write_form(&form).await?;
        }
        self.form(id)
    }

    /// Count a visit to the live form.
    pub async fn record_visit(&mut self, id: &Ulid) -> Result<u64> {
        let mut form = self.form(id)?.clone();
        form.visits += 1;
        self.write_form(&form).await?;
        Ok(form.visits)
    }

    // --- Submissions ---

    /// Append a submission and bump the form's counter.
    pub async fn add_submission(&mut self, submission: &FormSubmission) -> Result<()> {
        let mut form = self.form(&submission.form_id)?.clone();

        let mut all = self.submissions(&submission.form_id).await?;
        all.push(submission.clone());
        let yaml = serde_yaml_ng::to_string(&all)?;
        atomic_write(&self.submissions_path(&submission.form_id), yaml.as_bytes()).await?;

        form.submissions += 1;
        self.write_form(&form).await
    }

    /// All submissions of a form, oldest first.
    pub async fn submissions(&self, id: &Ulid) -> Result<Vec<FormSubmission>> {
        let path = self.submissions_path(id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).await?;
        Ok(serde_yaml_ng::from_str(&content)?)
    }

    fn form_path(&self, id: &Ulid) -> PathBuf {
        self.root.join("forms").join(format!("{id}.yaml"))
    }

    fn submissions_path(&self, id: &Ulid) -> PathBuf {
        self.root.join("submissions").join(format!("{id}.yaml"))
    }
}

/// Write data to a file atomically via temp file + rename.
async fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent dir"))?;
    let tmp = dir.join(format!(".tmp_{}", Ulid::new()));
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
