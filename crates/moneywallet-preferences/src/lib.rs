#![doc = include_str!("../README.md")]

mod backup;
mod config;
mod error;
pub mod keys;
mod model;
pub mod notifier;
mod preferences;
mod reminder;

pub use backup::{AutoBackupSettings, DEFAULT_HOURS_OFFSET};
pub use config::{
    PreferencesConfig, API_KEY_PLACEHOLDER, DEFAULT_EXPENSE_COLOR, DEFAULT_INCOME_COLOR, MONDAY,
};
pub use error::PreferencesError;
pub use model::{
    DailyReminder, DateFormat, ExchangeRateService, GroupType, LockMode,
    DAILY_REMINDER_DISABLED, NO_CURRENT_WALLET, TOTAL_WALLET_ID,
};
pub use notifier::{CurrentWalletObserver, ObserverError, ObserverHandle};
pub use preferences::Preferences;
pub use reminder::DailyReminderScheduler;
