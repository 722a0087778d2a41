pub mod query_loader;
pub mod toml_loader;

pub use query_loader::{parse_query, to_query_string, DEFAULT_TOPIC};
pub use toml_loader::{load_preset, parse_preset};
