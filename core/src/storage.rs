pub mod error;
pub use error::*;

pub mod contest;
pub use contest::*;

pub mod problem;
pub use problem::*;
