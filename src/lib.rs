//! # tmplconf
//!
//! Configuration resolution for a document templating tool.
//!
//! ## Overview
//!
//! tmplconf provides:
//! - **Config decoding**: Read a YAML config file into a [`Config`]
//! - **Flag reconciliation**: Turn repeated `alias=value` command-line flags
//!   into datasource, context, template, header and plugin maps
//! - **Layered merging**: Combine a file layer and a flag layer with
//!   field-specific precedence
//! - **Validation and defaults**: Reject conflicting input/output options and
//!   fill in the rest
//! - **Source locators**: Normalize paths, `-`, Windows drive and UNC paths,
//!   and URLs into one canonical absolute URL form
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tmplconf::{Config, ConfigError, cli::FlagArgs};
//!
//! fn main() -> Result<(), ConfigError> {
//!     let file = std::fs::File::open(".tmplconf.yaml").map_err(ConfigError::Read)?;
//!     let mut cfg = Config::parse(file)?;
//!
//!     let mut flags = Config::new();
//!     FlagArgs::new()
//!         .with_datasource("data=./data.json")
//!         .with_header("data=Authorization: Bearer abc")
//!         .apply_to(&mut flags)?;
//!
//!     cfg.merge_from(&flags);
//!     cfg.apply_defaults();
//!     cfg.validate()?;
//!
//!     println!("{cfg}");
//!     Ok(())
//! }
//! ```
//!
//! ## Zero values
//!
//! Empty strings, empty lists and `false` all count as "unset". Merging only
//! lets set values override, so a later layer can never clear a field an
//! earlier layer set.
//!
//! ## Features
//!
//! - `miette` - Pretty error reporting with miette
//! - `cli` - The `tmplconf_resolve` demo binary

// Core modules
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod source;

// Re-exports for convenience
pub use cli::FlagArgs;
pub use config::{Config, DataSource, Headers, Templates};
pub use error::{ConfigError, ErrorKind};
pub use io::{
    FileSystem, InMemorySource, InputProvider, MemoryFs, OsFs, OutputTarget, PipeBuffer,
    StderrOutput, StdinInput, StdoutOutput,
};
pub use source::{SourceLocator, SourceUrl, parse_source_url};

// Miette re-exports
#[cfg(feature = "miette")]
pub use error::ConfigDiagnostic;

// Internal test modules (see src/tests)
#[cfg(test)]
mod tests;
