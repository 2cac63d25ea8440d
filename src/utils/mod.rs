/// Environment and TOML configuration loading.
pub mod config;
