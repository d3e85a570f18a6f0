pub mod config_file;
pub mod dotenv_file;
pub mod environment;
