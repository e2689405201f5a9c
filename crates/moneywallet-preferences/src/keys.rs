//! Persisted key names.
//!
//! These names are the on-disk layout of existing preference stores and must never change.

#![allow(missing_docs)]

use std::collections::BTreeSet;

use moneywallet_state::{register_preference_family, register_preference_key};

register_preference_key!(pub const CURRENT_WALLET: i64 = "current_wallet_id");
register_preference_key!(pub const CURRENT_LOCK_MODE: i32 = "current_lock_mode");
register_preference_key!(pub const CURRENT_LOCK_CODE: String = "current_lock_code");
register_preference_key!(pub const LAST_LOCK_TIMESTAMP: i64 = "last_lock_timestamp");
register_preference_key!(pub const COLOR_INCOME: i32 = "color_income");
register_preference_key!(pub const COLOR_EXPENSE: i32 = "color_expense");
register_preference_key!(pub const SHOW_CURRENCY: bool = "show_currency");
register_preference_key!(pub const GROUP_DIGITS: bool = "group_digits");
register_preference_key!(pub const ROUND_DECIMALS: bool = "round_decimals");
register_preference_key!(pub const DATE_FORMAT: i32 = "date_format");
register_preference_key!(pub const FIRST_DAY_OF_WEEK: i32 = "first_day_of_week");
register_preference_key!(pub const FIRST_DAY_OF_MONTH: i32 = "first_day_of_month");
register_preference_key!(pub const GROUP_TYPE: i32 = "group_type");
register_preference_key!(pub const EXCHANGE_RATE_SERVICE: i32 = "exchange_rate_service");
register_preference_key!(pub const EXCHANGE_RATE_LAST_UPDATE: i64 = "exchange_rate_last_update");
register_preference_key!(pub const DAILY_REMINDER: i32 = "daily_reminder");
register_preference_key!(pub const FIRST_START: bool = "first_start");
register_preference_key!(pub const SEND_ANONYMOUS_DATA: bool = "send_anonymous_data");
register_preference_key!(pub const LAST_DATA_CHANGE_TIME: i64 = "last_data_change_time");

register_preference_key!(
    /// Ids of every backend whose auto backup is enabled.
    pub const AUTO_BACKUP_ENABLED_SERVICES: BTreeSet<String> = "auto_backup_enabled_services"
);

register_preference_family!(
    /// User supplied API key, per exchange rate service index.
    pub const SERVICE_API_KEY: String = "user_api_key_"
);

register_preference_family!(pub const AUTO_BACKUP_ENABLED: bool = "auto_backup_enabled_");
register_preference_family!(pub const AUTO_BACKUP_WIFI_ONLY: bool = "auto_backup_wifi_only_");
register_preference_family!(
    pub const AUTO_BACKUP_SHOW_NOTIFICATION: bool = "auto_backup_show_notification_"
);
register_preference_family!(
    pub const AUTO_BACKUP_DATA_CHANGED_ONLY: bool = "auto_backup_data_changed_only_"
);
register_preference_family!(pub const AUTO_BACKUP_HOUR_OFFSET: i32 = "auto_backup_hour_offset_");
register_preference_family!(pub const AUTO_BACKUP_FOLDER: String = "auto_backup_folder_");
register_preference_family!(pub const AUTO_BACKUP_LAST_TIME: i64 = "auto_backup_last_time_");
