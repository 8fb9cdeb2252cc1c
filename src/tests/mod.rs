//! Internal test modules.

mod cli;
mod source;
