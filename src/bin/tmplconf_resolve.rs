use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use tmplconf::{Config, ConfigError, FlagArgs};
use tracing::{Level, debug};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Resolve a templating configuration from a config file and flags, then
/// print the result.
#[derive(Debug, Parser)]
#[command(name = "tmplconf_resolve")]
struct Cli {
    /// Config file to use as the base layer
    #[arg(long)]
    config: Option<PathBuf>,

    /// Inline template
    #[arg(short = 'i', long = "in")]
    input: Option<String>,
    /// Template file ("-" for stdin)
    #[arg(short = 'f', long = "file")]
    input_files: Vec<String>,
    #[arg(long)]
    input_dir: Option<String>,
    #[arg(long = "exclude")]
    excludes: Vec<String>,

    /// Output file ("-" for stdout)
    #[arg(short = 'o', long = "out")]
    output_files: Vec<String>,
    #[arg(long)]
    output_dir: Option<String>,
    #[arg(long)]
    output_map: Option<String>,
    #[arg(long)]
    chmod: Option<String>,

    #[arg(long)]
    left_delim: Option<String>,
    #[arg(long)]
    right_delim: Option<String>,

    /// Datasource, as alias=locator
    #[arg(short = 'd', long = "datasource")]
    datasources: Vec<String>,
    /// Context datasource, as alias=locator
    #[arg(short = 'c', long = "context")]
    contexts: Vec<String>,
    /// Nested template, as alias=locator
    #[arg(short = 't', long = "template")]
    templates: Vec<String>,
    /// HTTP header for a datasource, as alias=Name: value
    #[arg(short = 'H', long = "datasource-header")]
    headers: Vec<String>,
    /// Plugin, as alias=path
    #[arg(long = "plugin")]
    plugins: Vec<String>,

    /// Pipe rendered output into the post-exec command
    #[arg(long)]
    exec_pipe: bool,
    /// Skip writing outputs that render empty
    #[arg(long)]
    suppress_empty: bool,
    #[arg(long)]
    experimental: bool,

    #[arg(short, long)]
    verbose: bool,

    /// Command to run after rendering
    #[arg(last = true)]
    post_exec: Vec<String>,
}

impl Cli {
    fn flag_config(&self) -> Result<Config, ConfigError> {
        let mut cfg = Config::new();
        cfg.input = self.input.clone().unwrap_or_default();
        cfg.input_files = self.input_files.clone();
        cfg.input_dir = self.input_dir.clone().unwrap_or_default();
        cfg.exclude_globs = self.excludes.clone();
        cfg.output_files = self.output_files.clone();
        cfg.output_dir = self.output_dir.clone().unwrap_or_default();
        cfg.output_map = self.output_map.clone().unwrap_or_default();
        cfg.out_mode = self.chmod.clone().unwrap_or_default();
        cfg.left_delim = self.left_delim.clone().unwrap_or_default();
        cfg.right_delim = self.right_delim.clone().unwrap_or_default();
        cfg.exec_pipe = self.exec_pipe;
        cfg.suppress_empty = self.suppress_empty;
        cfg.experimental = self.experimental;
        cfg.post_exec = self.post_exec.clone();

        FlagArgs::new()
            .with_datasources(self.datasources.clone())
            .with_contexts(self.contexts.clone())
            .with_templates(self.templates.clone())
            .with_headers(self.headers.clone())
            .with_plugins(self.plugins.clone())
            .apply_to(&mut cfg)?;
        Ok(cfg)
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut cfg = match &cli.config {
        Some(path) => {
            debug!(path = %path.display(), "reading config file");
            let file = File::open(path).map_err(ConfigError::Read)?;
            Config::parse(file)?
        }
        None => Config::new(),
    };

    let flags = cli.flag_config()?;
    cfg.merge_from(&flags);
    cfg.apply_defaults();
    cfg.validate()?;

    for (alias, headers) in &cfg.extra_headers {
        debug!(%alias, ?headers, "headers for undefined alias");
    }

    print!("{}", cfg.to_yaml_string()?);
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("tmplconf_resolve error: {e}");
        std::process::exit(1);
    }
}
