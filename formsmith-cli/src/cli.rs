use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use formsmith_fields::RenderMode;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Render mode as a command-line value.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Default)]
pub enum ModeArg {
    #[default]
    Designer,
    Form,
    Properties,
}

impl From<ModeArg> for RenderMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Designer => RenderMode::Designer,
            ModeArg::Form => RenderMode::Form,
            ModeArg::Properties => RenderMode::Properties,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "formsmith")]
#[command(version)]
#[command(about = "Design, publish and fill in forms built from pluggable field types")]
#[command(long_about = "
formsmith manages form definitions composed of typed fields (text, image,
banner). Forms are built in a designer, published, and then filled in as live
forms whose submissions are stored next to the definitions.

Global arguments can be used with any command:
  --verbose     Show trace output
  --debug       Show debug output
  --quiet       Suppress all output except errors
  --store       Directory holding forms and submissions
  --config      Explicit configuration file

Example usage:
  formsmith fields                                  # List field types
  formsmith new \"Signup\"                            # Create a form
  formsmith add <form-id> TextField                 # Append a text field
  formsmith set <form-id> <field-id> label=Email    # Configure a field
  formsmith publish <form-id>                       # Freeze and share
  formsmith submit <form-id> --value <field-id>=Ada # Fill it in
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (default: formsmith.{toml,yaml,yml,json} in the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store directory, overriding the configured one
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered field types with their default attributes
    Fields,

    /// List stored forms
    Forms,

    /// Create a new, empty form
    New {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Add a field to a form
    Add {
        form: String,
        type_tag: String,
        /// Position in the form (default: append)
        #[arg(long)]
        index: Option<usize>,
    },

    /// Remove a field from a form
    Remove { form: String, field: String },

    /// Change field attributes through the field's properties editor
    #[command(long_about = "
Each KEY=VALUE pair is applied to the field's properties draft. VALUE is read
as JSON when it parses (true, 3, null, \"text\") and as a plain string otherwise.
The draft is checked by the field type before it replaces the stored attributes.")]
    Set {
        form: String,
        field: String,
        #[arg(value_name = "KEY=VALUE", required = true)]
        pairs: Vec<String>,
    },

    /// Render every field of a form
    Render {
        form: String,
        #[arg(long, value_enum, default_value_t = ModeArg::Designer)]
        mode: ModeArg,
    },

    /// Publish a form so it can be filled in
    Publish { form: String },

    /// Fill in a published form and store the submission
    Submit {
        form: String,
        /// Field value as FIELD-ID=VALUE, repeatable
        #[arg(long = "value", value_name = "FIELD=VALUE")]
        values: Vec<String>,
    },

    /// Store a media file and print its URL
    Upload {
        /// File to upload
        #[arg(required_unless_present = "data_url", conflicts_with = "data_url")]
        file: Option<PathBuf>,
        /// Upload a base64 `data:image/...` URL instead of a file
        #[arg(long)]
        data_url: Option<String>,
        /// Attach the upload to this form's field (requires --field)
        #[arg(long, requires = "field")]
        form: Option<String>,
        #[arg(long, requires = "form")]
        field: Option<String>,
    },

    /// List the submissions of a form
    Submissions {
        form: String,
        /// Write the submissions to this CSV file instead, one column per field label
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
    },
}
