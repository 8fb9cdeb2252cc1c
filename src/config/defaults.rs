//! Defaults for unset fields.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::Config;
use crate::io::PipeBuffer;

pub const DEFAULT_LEFT_DELIM: &str = "{{";
pub const DEFAULT_RIGHT_DELIM: &str = "}}";
pub const DEFAULT_PLUGIN_TIMEOUT: Duration = Duration::from_secs(5);

impl Config {
    /// Fill unset fields with their defaults.
    ///
    /// With `execPipe` set, the primary output is redirected into a fresh
    /// [`PipeBuffer`] that also becomes the post-exec command's input.
    /// Otherwise the post-exec command reads this config's stdin.
    pub fn apply_defaults(&mut self) {
        if !self.input_dir.is_empty() && self.output_dir.is_empty() && self.output_map.is_empty() {
            self.output_dir = ".".to_string();
        }
        if self.input.is_empty() && self.input_dir.is_empty() && self.input_files.is_empty() {
            self.input_files = vec!["-".to_string()];
        }
        if self.output_dir.is_empty()
            && self.output_map.is_empty()
            && self.output_files.is_empty()
            && !self.exec_pipe
        {
            self.output_files = vec!["-".to_string()];
        }
        if self.left_delim.is_empty() {
            self.left_delim = DEFAULT_LEFT_DELIM.to_string();
        }
        if self.right_delim.is_empty() {
            self.right_delim = DEFAULT_RIGHT_DELIM.to_string();
        }

        if self.exec_pipe {
            debug!("execPipe set, redirecting stdout into the post-exec pipe");
            let pipe = PipeBuffer::new("execPipe");
            self.post_exec_input = Some(Arc::new(pipe.clone()));
            self.output_files = vec!["-".to_string()];
            self.stdout = Arc::new(pipe);
        } else {
            self.post_exec_input = Some(self.stdin.clone());
        }

        if self.plugin_timeout.is_zero() {
            self.plugin_timeout = DEFAULT_PLUGIN_TIMEOUT;
        }
    }
}
