mod cli;
mod settings;

pub use cli::{CliArgs, LogFormat, DEFAULT_SETTINGS_PATH};
pub use settings::{
    Settings, DEFAULT_ACCOUNT, DEFAULT_AMOUNT, DEFAULT_CARD_JSON, DEFAULT_CSV, DEFAULT_CTA_URL,
    DEFAULT_LOG_FILE, DEFAULT_OPPORTUNITY,
};
