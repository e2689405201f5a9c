use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use moneywallet_state::{PreferenceBackend, PreferenceStore};

use crate::{
    keys,
    model::{
        DailyReminder, DateFormat, ExchangeRateService, GroupType, LockMode, NO_CURRENT_WALLET,
    },
    notifier::{CurrentWalletObserver, ObserverHandle, WalletObserverRegistry},
    AutoBackupSettings, DailyReminderScheduler, PreferencesConfig, PreferencesError,
};

/// The application preferences.
///
/// Create one instance per process and share it. Every getter returns its documented default
/// until the preference is first written. Setters persist synchronously and report backend
/// failures.
///
/// A few setters have side effects beyond the write:
/// - [`set_current_wallet`](Preferences::set_current_wallet) notifies the registered
///   [`CurrentWalletObserver`]s,
/// - [`set_daily_reminder`](Preferences::set_daily_reminder) schedules or cancels the
///   reminder through the [`DailyReminderScheduler`],
/// - [`AutoBackupSettings::set_enabled`] maintains the set of enabled backup backends.
pub struct Preferences {
    store: PreferenceStore,
    scheduler: Arc<dyn DailyReminderScheduler>,
    observers: WalletObserverRegistry,
    config: PreferencesConfig,
    // Serializes the read-modify-write sequences of the setters with side effects.
    transition: Mutex<()>,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences")
            .field("config", &self.config)
            .field("observers", &self.observers)
            .finish()
    }
}

impl Preferences {
    /// Create the preferences over `backend`.
    pub fn new(
        backend: Arc<dyn PreferenceBackend>,
        scheduler: Arc<dyn DailyReminderScheduler>,
        config: PreferencesConfig,
    ) -> Self {
        Self {
            store: PreferenceStore::new(backend),
            scheduler,
            observers: WalletObserverRegistry::new(),
            config,
            transition: Mutex::new(()),
        }
    }

    /// The configuration these preferences were created with.
    pub fn config(&self) -> &PreferencesConfig {
        &self.config
    }

    pub(crate) fn store(&self) -> &PreferenceStore {
        &self.store
    }

    pub(crate) fn lock_transition(&self) -> MutexGuard<'_, ()> {
        // The guarded data is `()`, a panic while holding it leaves nothing inconsistent.
        self.transition.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The currently selected wallet, or [`NO_CURRENT_WALLET`].
    pub fn current_wallet(&self) -> i64 {
        self.store.get(&keys::CURRENT_WALLET, NO_CURRENT_WALLET)
    }

    /// Select the current wallet.
    ///
    /// Does nothing if `wallet_id` is already selected. Otherwise the new id is persisted first
    /// and then published to every observer, so observers always read the new value back.
    pub fn set_current_wallet(&self, wallet_id: i64) -> Result<(), PreferencesError> {
        {
            let _guard = self.lock_transition();
            let current = self
                .store
                .try_get(&keys::CURRENT_WALLET, NO_CURRENT_WALLET)?;
            if current == wallet_id {
                return Ok(());
            }
            self.store.set(&keys::CURRENT_WALLET, wallet_id)?;
            log::debug!("Current wallet changed from {} to {}", current, wallet_id);
        }

        self.observers.publish(wallet_id);
        Ok(())
    }

    /// Register an observer of current wallet changes.
    pub fn register_current_wallet_observer(
        &self,
        observer: Arc<dyn CurrentWalletObserver>,
    ) -> ObserverHandle {
        self.observers.register(observer)
    }

    /// Unregister an observer. Returns whether a registration was removed.
    pub fn unregister_current_wallet_observer(&self, handle: ObserverHandle) -> bool {
        self.observers.unregister(handle)
    }

    /// The daily reminder setting.
    pub fn daily_reminder(&self) -> DailyReminder {
        DailyReminder::from_stored(
            self.store
                .get(&keys::DAILY_REMINDER, DailyReminder::Disabled.to_stored()),
        )
    }

    /// Change the daily reminder.
    ///
    /// The value is always persisted. The scheduler is then updated from the previous value:
    /// enabling schedules, disabling cancels, and any write of an enabled reminder, even with
    /// an unchanged hour, cancels and schedules again so the next fire time is recomputed.
    ///
    /// An hour outside `[0, 23]`, or a failure to read the previous value, is reported before
    /// anything is written or scheduled.
    pub fn set_daily_reminder(&self, reminder: DailyReminder) -> Result<(), PreferencesError> {
        let reminder = reminder.validate()?;

        let _guard = self.lock_transition();
        let old = DailyReminder::from_stored(
            self.store
                .try_get(&keys::DAILY_REMINDER, DailyReminder::Disabled.to_stored())?,
        );
        self.store.set(&keys::DAILY_REMINDER, reminder.to_stored())?;

        log::debug!("Daily reminder changed from {:?} to {:?}", old, reminder);

        match (old, reminder) {
            (DailyReminder::Disabled, DailyReminder::At(hour)) => self.scheduler.schedule(hour),
            (DailyReminder::At(_), DailyReminder::Disabled) => self.scheduler.cancel(),
            (DailyReminder::At(_), DailyReminder::At(hour)) => {
                self.scheduler.cancel();
                self.scheduler.schedule(hour);
            }
            (DailyReminder::Disabled, DailyReminder::Disabled) => {}
        }

        Ok(())
    }

    /// The auto backup settings of one backup backend.
    pub fn auto_backup<'a>(&'a self, backend_id: &'a str) -> AutoBackupSettings<'a> {
        AutoBackupSettings::new(self, backend_id)
    }

    /// Ids of every backend whose auto backup is enabled.
    pub fn auto_backup_enabled_services(&self) -> BTreeSet<String> {
        self.store
            .get(&keys::AUTO_BACKUP_ENABLED_SERVICES, BTreeSet::new())
    }

    /// How the application is locked.
    pub fn current_lock_mode(&self) -> LockMode {
        LockMode::from_code(
            self.store
                .get(&keys::CURRENT_LOCK_MODE, LockMode::None.code()),
        )
    }

    /// Set how the application is locked.
    pub fn set_current_lock_mode(&self, mode: LockMode) -> Result<(), PreferencesError> {
        Ok(self.store.set(&keys::CURRENT_LOCK_MODE, mode.code())?)
    }

    /// The lock code, if one was set.
    pub fn current_lock_code(&self) -> Option<String> {
        self.store.get_optional(&keys::CURRENT_LOCK_CODE)
    }

    /// Set the lock code, or remove it with `None`.
    pub fn set_current_lock_code(&self, code: Option<String>) -> Result<(), PreferencesError> {
        match code {
            Some(code) => self.store.set(&keys::CURRENT_LOCK_CODE, code)?,
            None => self.store.remove(&keys::CURRENT_LOCK_CODE)?,
        }
        Ok(())
    }

    /// When the application was last locked, in milliseconds since the epoch. Defaults to 0.
    pub fn last_lock_time(&self) -> i64 {
        self.store.get(&keys::LAST_LOCK_TIMESTAMP, 0)
    }

    /// Record when the application was last locked.
    pub fn set_last_lock_time(&self, timestamp: i64) -> Result<(), PreferencesError> {
        Ok(self.store.set(&keys::LAST_LOCK_TIMESTAMP, timestamp)?)
    }

    /// Whether amounts are shown with their currency. Defaults to `true`.
    pub fn is_currency_enabled(&self) -> bool {
        self.store.get(&keys::SHOW_CURRENCY, true)
    }

    /// Show or hide the currency next to amounts.
    pub fn set_currency_enabled(&self, enabled: bool) -> Result<(), PreferencesError> {
        Ok(self.store.set(&keys::SHOW_CURRENCY, enabled)?)
    }

    /// Whether digits are grouped. Defaults to `true`.
    pub fn is_group_digits_enabled(&self) -> bool {
        self.store.get(&keys::GROUP_DIGITS, true)
    }

    /// Enable or disable digit grouping.
    pub fn set_group_digits_enabled(&self, enabled: bool) -> Result<(), PreferencesError> {
        Ok(self.store.set(&keys::GROUP_DIGITS, enabled)?)
    }

    /// Whether decimals are rounded. Defaults to `false`.
    pub fn is_round_decimals_enabled(&self) -> bool {
        self.store.get(&keys::ROUND_DECIMALS, false)
    }

    /// Enable or disable decimal rounding.
    pub fn set_round_decimals_enabled(&self, enabled: bool) -> Result<(), PreferencesError> {
        Ok(self.store.set(&keys::ROUND_DECIMALS, enabled)?)
    }

    /// The date format. Defaults to the configured one, which also replaces unknown stored
    /// indices.
    pub fn current_date_format(&self) -> DateFormat {
        let index = self
            .store
            .get(&keys::DATE_FORMAT, self.config.date_format.index());
        DateFormat::from_index(index).unwrap_or_else(|| {
            log::warn!("Unknown date format {}, using the default", index);
            self.config.date_format
        })
    }

    /// Set the date format.
    pub fn set_current_date_format(&self, format: DateFormat) -> Result<(), PreferencesError> {
        Ok(self.store.set(&keys::DATE_FORMAT, format.index())?)
    }

    /// The first day of the week, 1 being Sunday. Defaults to the configured one.
    pub fn first_day_of_week(&self) -> i32 {
        self.store
            .get(&keys::FIRST_DAY_OF_WEEK, self.config.first_day_of_week)
    }

    /// Set the first day of the week, 1 being Sunday.
    pub fn set_first_day_of_week(&self, day: i32) -> Result<(), PreferencesError> {
        Ok(self.store.set(&keys::FIRST_DAY_OF_WEEK, day)?)
    }

    /// The day the month starts on for grouping. Defaults to 1.
    pub fn first_day_of_month(&self) -> i32 {
        self.store.get(&keys::FIRST_DAY_OF_MONTH, 1)
    }

    /// Set the day the month starts on.
    pub fn set_first_day_of_month(&self, day: i32) -> Result<(), PreferencesError> {
        Ok(self.store.set(&keys::FIRST_DAY_OF_MONTH, day)?)
    }

    /// The period transactions are grouped by. Defaults to monthly.
    pub fn current_group_type(&self) -> GroupType {
        GroupType::from_code(
            self.store
                .get(&keys::GROUP_TYPE, GroupType::Monthly.code()),
        )
    }

    /// Set the period transactions are grouped by.
    pub fn set_current_group_type(&self, group_type: GroupType) -> Result<(), PreferencesError> {
        Ok(self.store.set(&keys::GROUP_TYPE, group_type.code())?)
    }

    /// The income color as ARGB. Defaults to the configured one.
    pub fn current_income_color(&self) -> i32 {
        self.store
            .get(&keys::COLOR_INCOME, self.config.income_color)
    }

    /// Set the income color, as ARGB.
    pub fn set_current_income_color(&self, color: i32) -> Result<(), PreferencesError> {
        Ok(self.store.set(&keys::COLOR_INCOME, color)?)
    }

    /// The expense color as ARGB. Defaults to the configured one.
    pub fn current_expense_color(&self) -> i32 {
        self.store
            .get(&keys::COLOR_EXPENSE, self.config.expense_color)
    }

    /// Set the expense color, as ARGB.
    pub fn set_current_expense_color(&self, color: i32) -> Result<(), PreferencesError> {
        Ok(self.store.set(&keys::COLOR_EXPENSE, color)?)
    }

    /// The stored exchange rate service index. Defaults to openexchangerates.org.
    pub fn current_exchange_rate_service_index(&self) -> i32 {
        self.store.get(
            &keys::EXCHANGE_RATE_SERVICE,
            ExchangeRateService::default().index(),
        )
    }

    /// The exchange rate service, or `None` if the stored index names no known service.
    pub fn current_exchange_rate_service(&self) -> Option<ExchangeRateService> {
        ExchangeRateService::from_index(self.current_exchange_rate_service_index())
    }

    /// Select the exchange rate service.
    pub fn set_current_exchange_rate_service(
        &self,
        service: ExchangeRateService,
    ) -> Result<(), PreferencesError> {
        Ok(self
            .store
            .set(&keys::EXCHANGE_RATE_SERVICE, service.index())?)
    }

    /// Whether the build ships a usable API key for the current exchange rate service.
    pub fn has_current_exchange_rate_service_default_api_key(&self) -> bool {
        match self.current_exchange_rate_service() {
            Some(ExchangeRateService::OpenExchangeRates) => {
                self.config.has_open_exchange_rates_api_key()
            }
            None => false,
        }
    }

    /// The user supplied API key of the current exchange rate service.
    pub fn current_exchange_rate_service_custom_api_key(&self) -> Option<String> {
        self.service_api_key_for_index(self.current_exchange_rate_service_index())
    }

    /// The user supplied API key of `service`.
    pub fn service_api_key(&self, service: ExchangeRateService) -> Option<String> {
        self.service_api_key_for_index(service.index())
    }

    /// Set the user supplied API key of `service`, or remove it with `None`.
    pub fn set_service_api_key(
        &self,
        service: ExchangeRateService,
        api_key: Option<String>,
    ) -> Result<(), PreferencesError> {
        let key = keys::SERVICE_API_KEY.key(&service.index().to_string());
        match api_key {
            Some(api_key) => self.store.set(&key, api_key)?,
            None => self.store.remove(&key)?,
        }
        Ok(())
    }

    fn service_api_key_for_index(&self, index: i32) -> Option<String> {
        self.store
            .get_optional(&keys::SERVICE_API_KEY.key(&index.to_string()))
    }

    /// When exchange rates were last updated, in milliseconds since the epoch. Defaults to 0.
    pub fn last_exchange_rate_update(&self) -> i64 {
        self.store.get(&keys::EXCHANGE_RATE_LAST_UPDATE, 0)
    }

    /// Record when exchange rates were last updated.
    pub fn set_last_exchange_rate_update(&self, timestamp: i64) -> Result<(), PreferencesError> {
        Ok(self
            .store
            .set(&keys::EXCHANGE_RATE_LAST_UPDATE, timestamp)?)
    }

    /// Whether the first start flow was completed. Defaults to `false`.
    pub fn is_first_start_done(&self) -> bool {
        self.store.get(&keys::FIRST_START, false)
    }

    /// Mark the first start flow as completed or not.
    pub fn set_first_start_done(&self, done: bool) -> Result<(), PreferencesError> {
        Ok(self.store.set(&keys::FIRST_START, done)?)
    }

    /// Whether anonymous usage data may be sent. Defaults to `true`.
    pub fn is_send_anonymous_data_enabled(&self) -> bool {
        self.store.get(&keys::SEND_ANONYMOUS_DATA, true)
    }

    /// Allow or forbid sending anonymous usage data.
    pub fn set_send_anonymous_data_enabled(&self, enabled: bool) -> Result<(), PreferencesError> {
        Ok(self.store.set(&keys::SEND_ANONYMOUS_DATA, enabled)?)
    }

    /// When the wallet data last changed, in milliseconds since the epoch. Defaults to 0.
    pub fn last_data_change_time(&self) -> i64 {
        self.store.get(&keys::LAST_DATA_CHANGE_TIME, 0)
    }

    /// Record when the wallet data last changed.
    pub fn set_last_data_change_time(&self, timestamp: i64) -> Result<(), PreferencesError> {
        Ok(self.store.set(&keys::LAST_DATA_CHANGE_TIME, timestamp)?)
    }
}
