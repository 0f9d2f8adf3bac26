pub mod config;
pub mod error;
pub mod state;

pub use config::{create_example_config, LaunchpadConfig, TemplateConfig};
pub use error::{CliError, CliResult};
pub use state::{bootstrap, factory_address, open, persist, LocalFactory, Snapshot};
