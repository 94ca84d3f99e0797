pub mod audit;
pub mod snapshot;
pub mod status;

pub use audit::*;
pub use snapshot::*;
pub use status::*;
