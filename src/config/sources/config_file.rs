//! Optional configuration file source (TOML, JSON or YAML by extension).

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;
use tracing::debug;

/// Add an explicitly requested configuration file. A missing file is an error.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: Option<&Path>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let Some(path) = path else {
        return Ok(builder);
    };

    if !path.exists() {
        return Err(ConfigError::Message(format!(
            "configuration file {} not found",
            path.display()
        )));
    }

    debug!(config_path = %path.display(), "Loading configuration file");
    Ok(builder.add_source(File::from(path).required(true)))
}
