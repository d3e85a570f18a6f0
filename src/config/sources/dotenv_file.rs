//! `.env` file source. Sits between the configuration file and the process
//! environment, so a real environment variable always wins over the file.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Default `.env` location, relative to the working directory.
pub const DOTENV_FILE: &str = ".env";

/// Add the variables of a `.env` file if it exists. A missing file is skipped.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: Option<&Path>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let Some(path) = path else {
        return Ok(builder);
    };

    if !path.exists() {
        debug!(dotenv_path = %path.display(), "No .env file found");
        return Ok(builder);
    }

    let entries = dotenvy::from_path_iter(path).map_err(|e| {
        ConfigError::Message(format!("failed to read {}: {}", path.display(), e))
    })?;
    let vars = entries
        .collect::<Result<HashMap<String, String>, _>>()
        .map_err(|e| ConfigError::Message(format!("invalid entry in {}: {}", path.display(), e)))?;

    debug!(dotenv_path = %path.display(), variables = vars.len(), "Loading .env file");
    Ok(builder.add_source(
        Environment::default()
            .try_parsing(false)
            .source(Some(vars.into_iter().collect())),
    ))
}
