pub mod commands;

pub use commands::{Cli, Commands, ExportFormat, finish_loading, run};
