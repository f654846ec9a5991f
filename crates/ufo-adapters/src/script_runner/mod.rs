//! Custom installer runners.

mod node;

pub use node::{BOOTSTRAP, NodeScriptRunner};
