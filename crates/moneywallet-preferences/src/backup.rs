use std::collections::BTreeSet;

use moneywallet_state::PreferenceStore;

use crate::{keys, Preferences, PreferencesError};

/// Default number of hours between two automatic backups.
pub const DEFAULT_HOURS_OFFSET: i32 = 48;

/// The auto backup settings of a single backup backend, obtained from
/// [`Preferences::auto_backup`].
///
/// The backend id is opaque, e.g. `"dropbox"` or `"google_drive"`. Each id has its own
/// independent settings.
#[derive(Debug, Clone, Copy)]
pub struct AutoBackupSettings<'a> {
    preferences: &'a Preferences,
    backend_id: &'a str,
}

impl<'a> AutoBackupSettings<'a> {
    pub(crate) fn new(preferences: &'a Preferences, backend_id: &'a str) -> Self {
        Self {
            preferences,
            backend_id,
        }
    }

    /// The backend these settings belong to.
    pub fn backend_id(&self) -> &'a str {
        self.backend_id
    }

    fn store(&self) -> &'a PreferenceStore {
        self.preferences.store()
    }

    /// Whether auto backup is enabled for this backend. Defaults to `false`.
    pub fn is_enabled(&self) -> bool {
        self.store()
            .get(&keys::AUTO_BACKUP_ENABLED.key(self.backend_id), false)
    }

    /// Enable or disable auto backup for this backend.
    ///
    /// The flag and the set of enabled backends are committed together. Disabling also
    /// forgets the backup folder and the time of the last backup. Nothing is written if the
    /// current set can't be read.
    pub fn set_enabled(&self, enabled: bool) -> Result<(), PreferencesError> {
        let _guard = self.preferences.lock_transition();

        let mut enabled_ids = self
            .store()
            .try_get(&keys::AUTO_BACKUP_ENABLED_SERVICES, BTreeSet::new())?;
        let mut changes = vec![PreferenceStore::put_change(
            &keys::AUTO_BACKUP_ENABLED.key(self.backend_id),
            enabled,
        )];

        if enabled {
            enabled_ids.insert(self.backend_id.to_string());
        } else {
            enabled_ids.remove(self.backend_id);
            changes.push(PreferenceStore::remove_change(
                &keys::AUTO_BACKUP_FOLDER.key(self.backend_id),
            ));
            changes.push(PreferenceStore::remove_change(
                &keys::AUTO_BACKUP_LAST_TIME.key(self.backend_id),
            ));
        }
        changes.push(PreferenceStore::put_change(
            &keys::AUTO_BACKUP_ENABLED_SERVICES,
            enabled_ids,
        ));

        self.store().apply(changes)?;

        log::debug!(
            "Auto backup {} for backend '{}'",
            if enabled { "enabled" } else { "disabled" },
            self.backend_id
        );
        Ok(())
    }

    /// Whether backups only run on an unmetered connection. Defaults to `false`.
    pub fn is_wifi_only(&self) -> bool {
        self.store()
            .get(&keys::AUTO_BACKUP_WIFI_ONLY.key(self.backend_id), false)
    }

    /// Restrict backups to unmetered connections.
    pub fn set_wifi_only(&self, wifi_only: bool) -> Result<(), PreferencesError> {
        Ok(self
            .store()
            .set(&keys::AUTO_BACKUP_WIFI_ONLY.key(self.backend_id), wifi_only)?)
    }

    /// Whether a notification is shown while backing up. Defaults to `true`.
    pub fn shows_notification(&self) -> bool {
        self.store()
            .get(&keys::AUTO_BACKUP_SHOW_NOTIFICATION.key(self.backend_id), true)
    }

    /// Show or hide the notification while backing up.
    pub fn set_show_notification(&self, show: bool) -> Result<(), PreferencesError> {
        Ok(self
            .store()
            .set(&keys::AUTO_BACKUP_SHOW_NOTIFICATION.key(self.backend_id), show)?)
    }

    /// Whether a backup is skipped when no data changed since the last one. Defaults to `true`.
    pub fn is_data_changed_only(&self) -> bool {
        self.store()
            .get(&keys::AUTO_BACKUP_DATA_CHANGED_ONLY.key(self.backend_id), true)
    }

    /// Skip backups when no data changed since the last one.
    pub fn set_data_changed_only(&self, changed_only: bool) -> Result<(), PreferencesError> {
        Ok(self.store().set(
            &keys::AUTO_BACKUP_DATA_CHANGED_ONLY.key(self.backend_id),
            changed_only,
        )?)
    }

    /// Hours between two backups. Defaults to [`DEFAULT_HOURS_OFFSET`].
    pub fn hours_offset(&self) -> i32 {
        self.store().get(
            &keys::AUTO_BACKUP_HOUR_OFFSET.key(self.backend_id),
            DEFAULT_HOURS_OFFSET,
        )
    }

    /// Set the hours between two backups.
    pub fn set_hours_offset(&self, hours: i32) -> Result<(), PreferencesError> {
        Ok(self
            .store()
            .set(&keys::AUTO_BACKUP_HOUR_OFFSET.key(self.backend_id), hours)?)
    }

    /// The remote folder backups are written to, if one was chosen.
    pub fn folder(&self) -> Option<String> {
        self.store()
            .get_optional(&keys::AUTO_BACKUP_FOLDER.key(self.backend_id))
    }

    /// Set the remote folder backups are written to.
    pub fn set_folder(&self, folder: impl Into<String>) -> Result<(), PreferencesError> {
        Ok(self
            .store()
            .set(&keys::AUTO_BACKUP_FOLDER.key(self.backend_id), folder.into())?)
    }

    /// When the last backup ran, in milliseconds since the epoch.
    ///
    /// Defaults to the current time, so a backend that never ran waits a full
    /// [`hours_offset`](Self::hours_offset) before its first backup.
    pub fn last_time(&self) -> i64 {
        self.store()
            .get_optional(&keys::AUTO_BACKUP_LAST_TIME.key(self.backend_id))
            .unwrap_or_else(|| chrono::Utc::now().timestamp_millis())
    }

    /// Record when the last backup ran, in milliseconds since the epoch.
    pub fn set_last_time(&self, timestamp: i64) -> Result<(), PreferencesError> {
        Ok(self
            .store()
            .set(&keys::AUTO_BACKUP_LAST_TIME.key(self.backend_id), timestamp)?)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        },
        thread,
    };

    use moneywallet_state::{
        BackendError, Change, InMemoryBackend, PreferenceBackend, PreferenceValue,
    };

    use super::*;
    use crate::{reminder::MockDailyReminderScheduler, PreferencesConfig};

    fn preferences_over(backend: Arc<InMemoryBackend>) -> Preferences {
        Preferences::new(
            backend,
            Arc::new(MockDailyReminderScheduler::new()),
            PreferencesConfig::default(),
        )
    }

    /// Delegates to a memory backend, with reads failing while `fail_reads` is set.
    #[derive(Default)]
    struct UnreadableBackend {
        inner: InMemoryBackend,
        fail_reads: AtomicBool,
    }

    impl PreferenceBackend for UnreadableBackend {
        fn get(&self, key: &str) -> Result<Option<PreferenceValue>, BackendError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(BackendError::Internal("read failed".to_string()));
            }
            self.inner.get(key)
        }
        fn put(&self, key: &str, value: PreferenceValue) -> Result<(), BackendError> {
            self.inner.put(key, value)
        }
        fn remove(&self, key: &str) -> Result<(), BackendError> {
            self.inner.remove(key)
        }
        fn keys(&self) -> Result<Vec<String>, BackendError> {
            self.inner.keys()
        }
        fn apply(&self, changes: Vec<Change>) -> Result<(), BackendError> {
            self.inner.apply(changes)
        }
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let preferences = preferences_over(Arc::new(InMemoryBackend::new()));
        let dropbox = preferences.auto_backup("dropbox");

        let before = chrono::Utc::now().timestamp_millis();
        let last_time = dropbox.last_time();
        let after = chrono::Utc::now().timestamp_millis();

        assert!(!dropbox.is_enabled());
        assert!(!dropbox.is_wifi_only());
        assert!(dropbox.shows_notification());
        assert!(dropbox.is_data_changed_only());
        assert_eq!(dropbox.hours_offset(), 48);
        assert_eq!(dropbox.folder(), None);
        assert!((before..=after).contains(&last_time));
    }

    #[test]
    fn test_backends_are_independent() {
        let preferences = preferences_over(Arc::new(InMemoryBackend::new()));

        preferences.auto_backup("a").set_hours_offset(12).unwrap();
        preferences.auto_backup("a").set_wifi_only(true).unwrap();

        assert_eq!(preferences.auto_backup("a").hours_offset(), 12);
        assert_eq!(preferences.auto_backup("b").hours_offset(), 48);
        assert!(preferences.auto_backup("a").is_wifi_only());
        assert!(!preferences.auto_backup("b").is_wifi_only());
    }

    #[test]
    fn test_settings_round_trip() {
        let preferences = preferences_over(Arc::new(InMemoryBackend::new()));
        let drive = preferences.auto_backup("google_drive");

        drive.set_show_notification(false).unwrap();
        drive.set_data_changed_only(false).unwrap();
        drive.set_folder("/MoneyWallet").unwrap();
        drive.set_last_time(1_000).unwrap();

        assert!(!drive.shows_notification());
        assert!(!drive.is_data_changed_only());
        assert_eq!(drive.folder(), Some("/MoneyWallet".to_string()));
        assert_eq!(drive.last_time(), 1_000);
        assert_eq!(drive.backend_id(), "google_drive");
    }

    #[test]
    fn test_enabled_set_tracks_flags() {
        let preferences = preferences_over(Arc::new(InMemoryBackend::new()));

        preferences.auto_backup("a").set_enabled(true).unwrap();
        preferences.auto_backup("b").set_enabled(true).unwrap();
        preferences.auto_backup("a").set_enabled(true).unwrap();
        assert_eq!(preferences.auto_backup_enabled_services(), set(&["a", "b"]));

        preferences.auto_backup("a").set_enabled(false).unwrap();
        assert_eq!(preferences.auto_backup_enabled_services(), set(&["b"]));
        assert!(!preferences.auto_backup("a").is_enabled());
        assert!(preferences.auto_backup("b").is_enabled());
    }

    #[test]
    fn test_disable_forgets_folder_and_last_time() {
        let backend = Arc::new(InMemoryBackend::new());
        let preferences = preferences_over(backend.clone());
        let dropbox = preferences.auto_backup("dropbox");

        dropbox.set_enabled(true).unwrap();
        dropbox.set_folder("/x").unwrap();
        dropbox.set_last_time(1_000).unwrap();
        dropbox.set_hours_offset(6).unwrap();

        dropbox.set_enabled(false).unwrap();

        assert_eq!(dropbox.folder(), None);
        assert_eq!(backend.get("auto_backup_last_time_dropbox").unwrap(), None);
        assert_eq!(dropbox.hours_offset(), 6);
        assert!(preferences.auto_backup_enabled_services().is_empty());
    }

    #[test]
    fn test_disable_on_fresh_store_writes_empty_set() {
        let backend = Arc::new(InMemoryBackend::new());
        let preferences = preferences_over(backend.clone());

        preferences.auto_backup("dropbox").set_enabled(false).unwrap();

        assert_eq!(
            backend.get("auto_backup_enabled_services").unwrap(),
            Some(PreferenceValue::StringSet(BTreeSet::new()))
        );
        assert_eq!(
            backend.get("auto_backup_enabled_dropbox").unwrap(),
            Some(PreferenceValue::Bool(false))
        );
    }

    #[test]
    fn test_concurrent_enables_keep_every_id() {
        let preferences = Arc::new(preferences_over(Arc::new(InMemoryBackend::new())));
        let ids: Vec<String> = (0..16).map(|i| format!("backend_{i}")).collect();

        let workers: Vec<_> = ids
            .iter()
            .cloned()
            .map(|id| {
                let preferences = Arc::clone(&preferences);
                thread::spawn(move || preferences.auto_backup(&id).set_enabled(true).unwrap())
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let expected: BTreeSet<String> = ids.into_iter().collect();
        assert_eq!(preferences.auto_backup_enabled_services(), expected);
    }

    #[test]
    fn test_unreadable_enabled_set_is_not_overwritten() {
        let backend = Arc::new(UnreadableBackend::default());
        let preferences = Preferences::new(
            backend.clone(),
            Arc::new(MockDailyReminderScheduler::new()),
            PreferencesConfig::default(),
        );
        preferences.auto_backup("a").set_enabled(true).unwrap();

        backend.fail_reads.store(true, Ordering::SeqCst);
        let result = preferences.auto_backup("b").set_enabled(true);
        backend.fail_reads.store(false, Ordering::SeqCst);

        assert!(matches!(result, Err(PreferencesError::Backend(_))));
        assert_eq!(preferences.auto_backup_enabled_services(), set(&["a"]));
        assert!(preferences.auto_backup("a").is_enabled());
        assert!(!preferences.auto_backup("b").is_enabled());
    }
}
