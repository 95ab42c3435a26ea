pub mod batch;
pub mod error;
pub mod runner;
pub mod testcase;
pub mod verdict;

pub use batch::*;
pub use error::{JudgeError, Result};
pub use runner::*;
pub use testcase::*;
pub use verdict::*;
