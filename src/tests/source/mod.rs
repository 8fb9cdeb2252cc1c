//! Source locator tests.

mod path_tests;
