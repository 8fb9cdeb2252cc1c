//! Flag reconciliation tests.

mod header_tests;
mod template_arg_tests;
