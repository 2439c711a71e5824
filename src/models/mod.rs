pub mod task;
pub mod status;
pub mod user;
pub mod snapshot;

pub use task::*;
pub use status::*;
pub use user::*;
pub use snapshot::*;
