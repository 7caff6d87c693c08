pub mod template;
pub mod update;
pub mod wif_config;
