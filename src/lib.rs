pub mod cli;
pub mod dump;

// Re-export commonly used items
pub use dump::{Dumper, Format};
pub use quarry_logger::{log, LogSeverity};
