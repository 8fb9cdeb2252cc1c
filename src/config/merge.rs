//! Layered configuration merging.

use tracing::debug;

use super::validate::IsZero;
use super::{Config, merge_data_sources, merge_templates};

impl Config {
    /// Use `self` as the defaults and override with any non-zero values
    /// from `other`.
    ///
    /// `in`, `inputDir` and `inputFiles` override each other (in that order
    /// of priority), as do `outputMap`, `outputDir` and `outputFiles`.
    /// Because only non-zero values act, an empty string or `false` in
    /// `other` never clears a field that is set in `self`.
    ///
    /// Headers `other` holds for undefined aliases are unioned into
    /// `extra_headers`, `other` winning per header name.
    pub fn merge_from(&mut self, other: &Config) -> &mut Self {
        if !other.input.is_zero() {
            debug!("merge: inline input overrides other inputs");
            self.input = other.input.clone();
            self.input_dir.clear();
            self.input_files.clear();
            self.output_dir.clear();
        } else if !other.input_dir.is_zero() {
            debug!(input_dir = %other.input_dir, "merge: input directory overrides other inputs");
            self.input.clear();
            self.input_dir = other.input_dir.clone();
            self.input_files.clear();
        } else if !other.input_files.is_zero() {
            // a lone "-" is the flag default, not a real override
            if !(other.input_files.len() == 1 && other.input_files[0] == "-") {
                debug!(input_files = ?other.input_files, "merge: input files override other inputs");
                self.input.clear();
                self.input_files = other.input_files.clone();
                self.input_dir.clear();
                self.output_dir.clear();
            }
        }

        if !other.output_map.is_zero() {
            self.output_dir.clear();
            self.output_files.clear();
            self.output_map = other.output_map.clone();
        }
        if !other.output_dir.is_zero() {
            self.output_dir = other.output_dir.clone();
            self.output_files.clear();
            self.output_map.clear();
        }
        if !other.output_files.is_zero() {
            self.output_dir.clear();
            self.output_files = other.output_files.clone();
            self.output_map.clear();
        }
        if !other.exec_pipe.is_zero() {
            self.exec_pipe = other.exec_pipe;
            self.post_exec = other.post_exec.clone();
            self.output_files = other.output_files.clone();
        }

        if !other.exclude_globs.is_zero() {
            self.exclude_globs = other.exclude_globs.clone();
        }
        if !other.out_mode.is_zero() {
            self.out_mode = other.out_mode.clone();
        }
        if !other.left_delim.is_zero() {
            self.left_delim = other.left_delim.clone();
        }
        if !other.right_delim.is_zero() {
            self.right_delim = other.right_delim.clone();
        }

        merge_data_sources(&mut self.datasources, &other.datasources);
        merge_data_sources(&mut self.context, &other.context);
        self.templates = merge_templates(self.templates.take(), other.templates.clone());
        for (alias, path) in &other.plugins {
            self.plugins.insert(alias.clone(), path.clone());
        }
        for (alias, headers) in &other.extra_headers {
            debug!(%alias, "merge: keeping headers for alias defined in another layer");
            self.extra_headers
                .entry(alias.clone())
                .or_default()
                .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        self
    }
}
