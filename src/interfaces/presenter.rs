/// Sink for the single user-facing reminder notification. The alarm service
/// calls `show` when a session starts or an alarm fires and `clear` when the
/// session ends.
pub trait NotificationPresenter: Send + Sync {
    fn show(&self, title: &str, message: &str);
    fn clear(&self);
}
