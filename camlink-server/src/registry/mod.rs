mod peer;
mod registry;

pub use peer::*;
pub use registry::*;
