pub mod default_config;
pub mod runtime_config;
