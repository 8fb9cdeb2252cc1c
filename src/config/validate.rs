//! Cross-field validation.

use tracing::debug;

use super::Config;
use crate::error::{ConfigError, Result};

/// Zero values count as "unset" for merging and validation.
pub(crate) trait IsZero {
    fn is_zero(&self) -> bool;
}

impl IsZero for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl IsZero for Vec<String> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl IsZero for bool {
    fn is_zero(&self) -> bool {
        !*self
    }
}

/// Fail if more than one of `options` is set, naming the first two.
fn not_together(options: &[(&'static str, bool)]) -> Result<()> {
    let mut found: Option<&'static str> = None;
    for &(name, is_set) in options {
        if !is_set {
            continue;
        }
        if let Some(first) = found {
            return Err(ConfigError::NotTogether {
                first,
                second: name,
            });
        }
        found = Some(name);
    }
    Ok(())
}

/// Fail if `left` is set without `right`. The reverse is allowed.
fn must_together(
    (left, l_set): (&'static str, bool),
    (right, r_set): (&'static str, bool),
) -> Result<()> {
    if l_set && !r_set {
        return Err(ConfigError::MustTogether { left, right });
    }
    Ok(())
}

impl Config {
    /// Check the cross-field rules, returning the first violation.
    pub fn validate(&self) -> Result<()> {
        self.check().inspect_err(|e| debug!(error = %e, "configuration rejected"))
    }

    fn check(&self) -> Result<()> {
        let input = !self.input.is_zero();
        let input_files = !self.input_files.is_zero();
        let input_dir = !self.input_dir.is_zero();
        let output_files = !self.output_files.is_zero();
        let output_dir = !self.output_dir.is_zero();
        let output_map = !self.output_map.is_zero();
        let exec_pipe = !self.exec_pipe.is_zero();

        not_together(&[
            ("in", input),
            ("inputFiles", input_files),
            ("inputDir", input_dir),
        ])?;
        not_together(&[
            ("outputFiles", output_files),
            ("outputDir", output_dir),
            ("outputMap", output_map),
        ])?;
        not_together(&[
            ("outputDir", output_dir),
            ("outputMap", output_map),
            ("execPipe", exec_pipe),
        ])?;

        must_together(("outputDir", output_dir), ("inputDir", input_dir))?;
        must_together(("outputMap", output_map), ("inputDir", input_dir))?;

        let mut inputs = self.input_files.len();
        if inputs == 0 && !self.input.is_empty() {
            inputs = 1;
        }
        let outputs = self.output_files.len();
        if inputs != outputs && !self.exec_pipe {
            return Err(ConfigError::OutputCountMismatch { outputs, inputs });
        }

        if self.exec_pipe && self.post_exec.is_empty() {
            return Err(ConfigError::ExecPipeWithoutPostExec);
        }

        let stdout_only = self.output_files.is_empty() || self.output_files == ["-"];
        if self.exec_pipe && !stdout_only {
            return Err(ConfigError::ExecPipeWithOutputFiles);
        }

        Ok(())
    }
}
