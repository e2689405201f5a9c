/// Platform API for the recurring daily reminder notification.
///
/// Both calls are fire-and-forget. The scheduler keeps no state of its own that the
/// preferences rely on: every change of an enabled reminder cancels and schedules again so the
/// next fire time is recomputed from now.
#[cfg_attr(test, mockall::automock)]
pub trait DailyReminderScheduler: Send + Sync {
    /// Schedule the recurring reminder at `hour`, in `[0, 23]`.
    fn schedule(&self, hour: u8);

    /// Cancel the recurring reminder, if one is scheduled.
    fn cancel(&self);
}
