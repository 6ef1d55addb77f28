use crate::interfaces::presenter::NotificationPresenter;

/// Presents the reminder session through the host desktop notification
/// system.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopPresenter;

impl NotificationPresenter for DesktopPresenter {
    fn show(&self, title: &str, message: &str) {
        show_desktop_notification(title, message);
    }

    // Desktop notifications expire on their own; there is no ongoing
    // notification to tear down.
    fn clear(&self) {}
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn show_desktop_notification(title: &str, message: &str) {
    if let Err(err) = notify_rust::Notification::new()
        .summary(title)
        .body(message)
        .show()
    {
        tracing::warn!(error = %err, "Desktop notification failed");
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn show_desktop_notification(_title: &str, _message: &str) {}
