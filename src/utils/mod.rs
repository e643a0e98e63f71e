pub mod environment;
pub mod paths;
pub mod terminal;

pub use environment::{get_config_dir, get_config_path};
pub use paths::{
    MAX_ENTRY_SIZE_BYTES, file_url, format_path_with_tilde, resolve_entry_path,
    validate_entry_name, validate_file_size,
};
pub use terminal::sanitize_for_terminal;
