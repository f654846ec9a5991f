//! Template catalog adapters.

mod builtin;
mod file;

pub use builtin::{BuiltinCatalog, DEFAULT_TEMPLATE_PACKAGE};
pub use file::FileCatalog;
