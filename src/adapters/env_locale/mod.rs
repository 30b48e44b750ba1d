//! UTF-8 process environment
//!
//! Set up once at startup, before any file or subprocess work. The result is
//! handed to the adapters that spawn tools so every child sees a UTF-8 locale.

use std::process::Command;

#[cfg(target_os = "macos")]
const UTF8_LOCALE: &str = "en_US.UTF-8";
#[cfg(not(target_os = "macos"))]
const UTF8_LOCALE: &str = "C.UTF-8";

/// Locale overrides applied to every spawned tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utf8Environment {
    overrides: Vec<(String, String)>,
}

impl Utf8Environment {
    /// Switch the console to UTF-8 where needed and compute child overrides
    pub fn initialize() -> Self {
        #[cfg(windows)]
        Self::enable_console_utf8();

        let env = Self::for_locale(UTF8_LOCALE);
        tracing::debug!(locale = UTF8_LOCALE, "UTF-8 environment initialised");
        env
    }

    /// Overrides for a specific locale name
    pub fn for_locale(locale: &str) -> Self {
        Self {
            overrides: vec![
                ("LC_ALL".to_string(), locale.to_string()),
                ("LANG".to_string(), locale.to_string()),
            ],
        }
    }

    /// Variables set on child processes
    pub fn overrides(&self) -> &[(String, String)] {
        &self.overrides
    }

    /// Apply the overrides to a command about to be spawned
    pub fn apply(&self, command: &mut Command) {
        for (key, value) in &self.overrides {
            command.env(key, value);
        }
    }

    #[cfg(windows)]
    fn enable_console_utf8() {
        use winapi::um::wincon::{SetConsoleCP, SetConsoleOutputCP};
        use winapi::um::winnls::CP_UTF8;

        // Both calls fail harmlessly when no console is attached
        let ok = unsafe { SetConsoleOutputCP(CP_UTF8) != 0 && SetConsoleCP(CP_UTF8) != 0 };
        if !ok {
            tracing::debug!("Console code page left unchanged");
        }
    }
}
