//! Blocking user notifications.

/// Show a browser alert; falls back to the console when no window exists.
pub fn alert(message: &str) {
    let shown = web_sys::window()
        .map(|w| w.alert_with_message(message).is_ok())
        .unwrap_or(false);

    if !shown {
        log::warn!("{}", message);
    }
}
