pub fn set_panic_hook() {
    // Routes panic messages to the browser console when the
    // `console_error_panic_hook` feature is on
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

pub fn init_logging() {
    // A second call would find the logger already installed
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::debug!("console logger installed");
    }
}
