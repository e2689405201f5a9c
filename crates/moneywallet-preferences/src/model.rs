//! Enumerated preference values and their persisted integer codes.

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::PreferencesError;

/// The wallet id stored when no wallet is selected.
pub const NO_CURRENT_WALLET: i64 = -1;

/// The id of the virtual wallet aggregating every other wallet.
pub const TOTAL_WALLET_ID: i64 = 0;

/// How the application is locked when resumed.
#[derive(Clone, Copy, Serialize_repr, Deserialize_repr, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LockMode {
    /// No lock
    #[default]
    None = 0,
    /// Numeric PIN
    Pin = 1,
    /// Pattern sequence
    Sequence = 2,
    /// Platform fingerprint
    Fingerprint = 3,
}

impl LockMode {
    /// The persisted code of this lock mode.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Resolve a persisted code. Unknown codes resolve to [`LockMode::None`].
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => LockMode::Pin,
            2 => LockMode::Sequence,
            3 => LockMode::Fingerprint,
            0 => LockMode::None,
            other => {
                log::warn!("Unknown lock mode {}, falling back to none", other);
                LockMode::None
            }
        }
    }
}

/// Index of one of the supported date formats.
#[allow(missing_docs)]
#[derive(Clone, Copy, Serialize_repr, Deserialize_repr, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DateFormat {
    Type0 = 0,
    Type1 = 1,
    #[default]
    Type2 = 2,
    Type3 = 3,
    Type4 = 4,
    Type5 = 5,
    Type6 = 6,
    Type7 = 7,
    Type8 = 8,
}

impl DateFormat {
    const ALL: [DateFormat; 9] = [
        DateFormat::Type0,
        DateFormat::Type1,
        DateFormat::Type2,
        DateFormat::Type3,
        DateFormat::Type4,
        DateFormat::Type5,
        DateFormat::Type6,
        DateFormat::Type7,
        DateFormat::Type8,
    ];

    /// The persisted index of this date format.
    pub fn index(self) -> i32 {
        self as i32
    }

    /// Resolve a persisted index, if it names a known format.
    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }
}

/// The period transactions are grouped by.
#[allow(missing_docs)]
#[derive(Clone, Copy, Serialize_repr, Deserialize_repr, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum GroupType {
    Daily = 0,
    Weekly = 1,
    #[default]
    Monthly = 2,
    Yearly = 3,
}

impl GroupType {
    /// The persisted code of this group type.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Resolve a persisted code. Codes outside `[0, 3]` resolve to [`GroupType::Monthly`].
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => GroupType::Daily,
            1 => GroupType::Weekly,
            3 => GroupType::Yearly,
            _ => GroupType::Monthly,
        }
    }
}

/// A provider of currency exchange rates.
///
/// Stored as its integer index, which also parameterizes the user API key family.
#[derive(Clone, Copy, Serialize_repr, Deserialize_repr, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ExchangeRateService {
    /// openexchangerates.org
    #[default]
    OpenExchangeRates = 1,
}

impl ExchangeRateService {
    /// The persisted index of this service.
    pub fn index(self) -> i32 {
        self as i32
    }

    /// Resolve a persisted index, if it names a known service.
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            1 => Some(ExchangeRateService::OpenExchangeRates),
            _ => None,
        }
    }
}

/// The stored value of a disabled daily reminder.
pub const DAILY_REMINDER_DISABLED: i32 = -1;

/// The daily reminder setting: either off, or the hour of day it fires at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DailyReminder {
    /// No reminder is scheduled.
    #[default]
    Disabled,
    /// Remind every day at this hour, in `[0, 23]`. Prefer [`DailyReminder::at`], which checks
    /// the range.
    At(u8),
}

impl DailyReminder {
    /// A reminder at `hour`, which must be in `[0, 23]`.
    pub fn at(hour: i32) -> Result<Self, PreferencesError> {
        match u8::try_from(hour) {
            Ok(hour) if hour <= 23 => Ok(DailyReminder::At(hour)),
            _ => Err(PreferencesError::InvalidReminderHour(hour)),
        }
    }

    /// The hour of day, or `None` if disabled.
    pub fn hour(self) -> Option<u8> {
        match self {
            DailyReminder::Disabled => None,
            DailyReminder::At(hour) => Some(hour),
        }
    }

    /// Check that an enabled reminder's hour is in `[0, 23]`.
    pub fn validate(self) -> Result<Self, PreferencesError> {
        match self {
            DailyReminder::Disabled => Ok(self),
            DailyReminder::At(hour) => DailyReminder::at(i32::from(hour)),
        }
    }

    pub(crate) fn to_stored(self) -> i32 {
        match self {
            DailyReminder::Disabled => DAILY_REMINDER_DISABLED,
            DailyReminder::At(hour) => i32::from(hour),
        }
    }

    pub(crate) fn from_stored(value: i32) -> Self {
        if value == DAILY_REMINDER_DISABLED {
            return DailyReminder::Disabled;
        }
        DailyReminder::at(value).unwrap_or_else(|_| {
            log::warn!("Stored daily reminder hour {} is out of range", value);
            DailyReminder::Disabled
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_mode_codes() {
        for mode in [
            LockMode::None,
            LockMode::Pin,
            LockMode::Sequence,
            LockMode::Fingerprint,
        ] {
            assert_eq!(LockMode::from_code(mode.code()), mode);
        }
        assert_eq!(LockMode::from_code(42), LockMode::None);
    }

    #[test]
    fn test_group_type_out_of_range_is_monthly() {
        assert_eq!(GroupType::from_code(0), GroupType::Daily);
        assert_eq!(GroupType::from_code(3), GroupType::Yearly);
        assert_eq!(GroupType::from_code(-1), GroupType::Monthly);
        assert_eq!(GroupType::from_code(4), GroupType::Monthly);
    }

    #[test]
    fn test_date_format_index() {
        assert_eq!(DateFormat::from_index(0), Some(DateFormat::Type0));
        assert_eq!(DateFormat::from_index(8), Some(DateFormat::Type8));
        assert_eq!(DateFormat::from_index(9), None);
        assert_eq!(DateFormat::from_index(-1), None);
        assert_eq!(DateFormat::Type5.index(), 5);
    }

    #[test]
    fn test_daily_reminder_hours() {
        assert_eq!(DailyReminder::at(0).unwrap(), DailyReminder::At(0));
        assert_eq!(DailyReminder::at(23).unwrap(), DailyReminder::At(23));
        assert!(matches!(
            DailyReminder::at(24),
            Err(PreferencesError::InvalidReminderHour(24))
        ));
        assert!(DailyReminder::at(-1).is_err());

        assert_eq!(DailyReminder::from_stored(-1), DailyReminder::Disabled);
        assert_eq!(DailyReminder::from_stored(9), DailyReminder::At(9));
        assert_eq!(DailyReminder::from_stored(99), DailyReminder::Disabled);
        assert_eq!(DailyReminder::At(14).to_stored(), 14);
        assert_eq!(DailyReminder::Disabled.to_stored(), -1);
    }

    #[test]
    fn test_validate_rejects_out_of_range_hours() {
        assert_eq!(DailyReminder::At(23).validate().unwrap(), DailyReminder::At(23));
        assert_eq!(
            DailyReminder::Disabled.validate().unwrap(),
            DailyReminder::Disabled
        );
        assert!(matches!(
            DailyReminder::At(24).validate(),
            Err(PreferencesError::InvalidReminderHour(24))
        ));
        assert!(matches!(
            DailyReminder::At(255).validate(),
            Err(PreferencesError::InvalidReminderHour(255))
        ));
    }

    #[test]
    fn test_enums_serialize_as_codes() {
        assert_eq!(serde_json::to_string(&DateFormat::Type2).unwrap(), "2");
        assert_eq!(
            serde_json::from_str::<LockMode>("3").unwrap(),
            LockMode::Fingerprint
        );
    }
}
