//! Environment variable source. Variable names map to lowercase keys
//! (`REDIS_URL` -> `redis_url`).

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;
use std::collections::HashMap;

/// Add the process environment, or `vars` in its place when given.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    vars: Option<HashMap<String, String>>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let environment = Environment::default().try_parsing(false);
    let environment = match vars {
        Some(vars) => environment.source(Some(vars.into_iter().collect())),
        None => environment,
    };
    Ok(builder.add_source(environment))
}
