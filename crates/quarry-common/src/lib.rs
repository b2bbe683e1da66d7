pub mod error;
pub mod types;

pub use error::{ErrorKind, QuarryError};
pub use types::*;
