//! Command implementations.

pub mod fields;
pub mod form;
pub mod render;
pub mod submit;
pub mod upload;

use std::path::PathBuf;
use std::sync::Arc;

use formsmith_config::{ConfigProvider, FormsmithConfig};
use formsmith_designer::FormStore;
use formsmith_fields::FieldRegistry;
use formsmith_upload::LocalUploader;
use serde::Serialize;
use tracing::debug;
use ulid::Ulid;

use crate::cli::{Cli, Commands, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::exit_codes::EXIT_ERROR;

/// Everything a command needs, resolved once from flags and configuration.
pub struct CommandContext {
    pub registry: Arc<FieldRegistry>,
    pub config: FormsmithConfig,
    pub store_dir: PathBuf,
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let mut provider = ConfigProvider::new();
        if let Some(path) = &cli.config {
            provider = provider.with_file(path);
        }
        let config = provider.load()?;
        let store_dir = cli
            .store
            .clone()
            .unwrap_or_else(|| config.store.dir.clone());
        debug!(store = %store_dir.display(), "command context ready");
        Ok(Self {
            registry: Arc::new(FieldRegistry::with_builtins()?),
            config,
            store_dir,
            format: cli.format,
        })
    }

    pub async fn store(&self) -> CliResult<FormStore> {
        Ok(FormStore::open(&self.store_dir).await?)
    }

    pub fn uploader(&self) -> LocalUploader {
        let upload = &self.config.upload;
        LocalUploader::new(&upload.dir)
            .public_prefix(upload.public_prefix.clone())
            .max_bytes(upload.max_bytes)
            .allowed_types(upload.allowed_types.iter().cloned())
    }

    /// Print `value` in the selected format; `text` renders the plain variant.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> CliResult<()> {
        match self.format {
            OutputFormat::Text => print!("{}", text()),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => print!("{}", serde_yaml_ng::to_string(value)?),
        }
        Ok(())
    }
}

pub fn parse_form_id(raw: &str) -> CliResult<Ulid> {
    Ulid::from_string(raw)
        .map_err(|e| CliError::new(format!("invalid form id '{raw}': {e}"), EXIT_ERROR))
}

/// Split `KEY=VALUE`.
pub fn split_pair(raw: &str) -> CliResult<(&str, &str)> {
    raw.split_once('=')
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| CliError::new(format!("expected KEY=VALUE, got '{raw}'"), EXIT_ERROR))
}

/// Run the parsed command and return the process exit code.
pub async fn run(cli: Cli) -> CliResult<i32> {
    let ctx = CommandContext::from_cli(&cli)?;
    match cli.command {
        Commands::Fields => fields::list(&ctx),
        Commands::Forms => form::list(&ctx).await,
        Commands::New { name, description } => form::create(&ctx, &name, &description).await,
        Commands::Add {
            form,
            type_tag,
            index,
        } => form::add(&ctx, &form, &type_tag, index).await,
        Commands::Remove { form, field } => form::remove(&ctx, &form, &field).await,
        Commands::Set { form, field, pairs } => form::set(&ctx, &form, &field, &pairs).await,
        Commands::Render { form, mode } => render::render(&ctx, &form, mode.into()).await,
        Commands::Publish { form } => form::publish(&ctx, &form).await,
        Commands::Submit { form, values } => submit::submit(&ctx, &form, &values).await,
        Commands::Submissions { form, export } => match export {
            Some(path) => submit::export(&ctx, &form, &path).await,
            None => submit::list(&ctx, &form).await,
        },
        Commands::Upload {
            file,
            data_url,
            form,
            field,
        } => upload::upload(&ctx, file, data_url, form.zip(field)).await,
    }
}
