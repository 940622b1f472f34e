mod defaults;
mod load;
mod types;
mod validate;

pub use load::{load_config, load_configs, parse_config_str};
pub use types::*;
