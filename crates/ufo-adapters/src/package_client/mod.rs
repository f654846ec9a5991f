//! Registry client adapters.

mod npm;

pub use npm::{NpmClient, PackageManager, parse_view_output};
