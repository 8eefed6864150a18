//! Opening results in the user's browser.

use tracing::info;

use crate::error::{InferenceError, Result};

/// Open `url` in the default system browser.
pub fn open_in_browser(url: &str) -> Result<()> {
    info!("Opening {url} in browser");
    webbrowser::open(url).map_err(InferenceError::Browser)
}
