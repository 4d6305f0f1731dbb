pub mod config;
pub mod error;
pub mod locale;
pub mod types;

pub use config::CardlinkConfig;
pub use error::{CardlinkError, Result};
pub use locale::{resolve_locale, FrontendLocale, LocaleFormatter};
pub use types::*;
