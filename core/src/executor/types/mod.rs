pub mod error;
pub mod result;
pub mod task;

pub use error::*;
pub use result::*;
pub use task::*;
