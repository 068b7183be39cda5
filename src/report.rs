use rfd::{MessageButtons, MessageDialog, MessageLevel};

use crate::error::ViewerError;

const STARTUP_TITLE: &str = "Image Viewer";
const FAILURE_TITLE: &str = "Error";

/// Dialog title and body for an error.
///
/// Startup errors show their own message. Everything else names the failing
/// step and its status code, followed by the underlying error text.
pub fn describe(err: &ViewerError) -> (&'static str, String) {
    if err.is_startup() {
        return (STARTUP_TITLE, err.to_string());
    }

    let body = format!("{} failed (code {})\n{}", err.step(), err.exit_code(), err);
    (FAILURE_TITLE, body)
}

/// Log the error and, if enabled, block on a modal message box
pub fn report(err: &ViewerError, dialogs: bool) {
    let (title, body) = describe(err);
    let level = if matches!(err, ViewerError::Usage) {
        eprintln!("{}", body);
        MessageLevel::Info
    } else {
        log::error!("{}", body.replace('\n', " | "));
        MessageLevel::Error
    };

    if !dialogs {
        return;
    }

    MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(body)
        .set_buttons(MessageButtons::Ok)
        .show();
}
