/// Configuration system
///
/// - `macros`: the `config_struct!` macro
/// - `schemas`: config structures with embedded defaults
/// - `utils`: loading from disk
pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{Config, ImagesConfig, ProbeConfig};
pub use utils::{default_config_path, load_config_from_path, parse_config, CONFIG_FILE_PATH};
