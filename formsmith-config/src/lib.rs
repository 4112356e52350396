//! Formsmith configuration management using Figment
//!
//! # Sources
//!
//! - Defaults compiled into `FormsmithConfig`
//! - `formsmith.{toml,yaml,yml,json}` in the working directory (or one explicit file)
//! - `FORMSMITH_` environment variables, nested with `__`
//!
//! ## Example TOML Configuration
//!
//! ```toml
//! [upload]
//! dir = "public/uploads"
//! public_prefix = "/uploads"
//! max_bytes = 10485760
//! allowed_types = ["image/*"]
//!
//! [store]
//! dir = ".formsmith"
//! ```

pub mod discovery;
pub mod error;
pub mod provider;
pub mod types;

#[cfg(test)]
mod tests;

pub use discovery::{ConfigFile, ConfigFormat};
pub use error::{ConfigError, ConfigResult};
pub use provider::{load_configuration, ConfigProvider, ENV_PREFIX};
pub use types::{FormsmithConfig, StoreConfig, UploadConfig};
