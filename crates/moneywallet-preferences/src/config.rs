use serde::{Deserialize, Serialize};

use crate::model::DateFormat;

/// The placeholder shipped in place of a real exchange rate API key.
pub const API_KEY_PLACEHOLDER: &str = "INSERT_API_KEY_HERE";

/// Opaque blue, the default income color.
pub const DEFAULT_INCOME_COLOR: i32 = 0xFF0000FF_u32 as i32;

/// Opaque red, the default expense color.
pub const DEFAULT_EXPENSE_COLOR: i32 = 0xFFFF0000_u32 as i32;

/// Monday, in the convention where Sunday is 1.
pub const MONDAY: i32 = 2;

/// Defaults and build values the preferences can't derive on their own. They are fixed once
/// the [`Preferences`](crate::Preferences) are created.
///
/// Defaults to
///
/// ```
/// # use moneywallet_preferences::{DateFormat, PreferencesConfig};
/// let config = PreferencesConfig {
///     date_format: DateFormat::Type2,
///     first_day_of_week: 2,
///     income_color: 0xFF0000FF_u32 as i32,
///     expense_color: 0xFFFF0000_u32 as i32,
///     open_exchange_rates_api_key: None,
/// };
/// assert_eq!(config, PreferencesConfig::default());
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PreferencesConfig {
    /// Date format used until the user picks one. Usually derived from the locale.
    pub date_format: DateFormat,
    /// First day of the week until the user picks one, 1 being Sunday.
    pub first_day_of_week: i32,
    /// Income color until the user picks one, as ARGB.
    pub income_color: i32,
    /// Expense color until the user picks one, as ARGB.
    pub expense_color: i32,
    /// The built-in openexchangerates.org API key, if the build has one.
    pub open_exchange_rates_api_key: Option<String>,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            date_format: DateFormat::Type2,
            first_day_of_week: MONDAY,
            income_color: DEFAULT_INCOME_COLOR,
            expense_color: DEFAULT_EXPENSE_COLOR,
            open_exchange_rates_api_key: None,
        }
    }
}

impl PreferencesConfig {
    /// The default configuration, with the API key compiled in through the
    /// `MONEYWALLET_OPEN_EXCHANGE_RATES_API_KEY` environment variable.
    pub fn from_build() -> Self {
        Self {
            open_exchange_rates_api_key: option_env!("MONEYWALLET_OPEN_EXCHANGE_RATES_API_KEY")
                .map(str::to_string),
            ..Self::default()
        }
    }

    pub(crate) fn has_open_exchange_rates_api_key(&self) -> bool {
        is_usable_api_key(self.open_exchange_rates_api_key.as_deref())
    }
}

fn is_usable_api_key(key: Option<&str>) -> bool {
    matches!(key, Some(key) if !key.is_empty() && key != API_KEY_PLACEHOLDER)
}
