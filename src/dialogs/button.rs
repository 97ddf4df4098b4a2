use std::borrow::Cow;
use std::fmt;

/// A user-selectable option attached to a dialog.
///
/// Buttons compare by label, so a button constructed by the presentation
/// layer from the label it rendered equals the stock constant it came from.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Button {
    label: Cow<'static, str>,
}

impl Button {
    pub const OK: Self = Self::stock("OK");
    pub const APPLY: Self = Self::stock("Apply");
    pub const CLOSE: Self = Self::stock("Close");
    pub const CANCEL: Self = Self::stock("Cancel");
    pub const DONE: Self = Self::stock("Done");
    pub const YES: Self = Self::stock("Yes");
    pub const NO: Self = Self::stock("No");
    pub const QUIT: Self = Self::stock("Quit");
    pub const CONTINUE: Self = Self::stock("Continue");
    pub const IGNORE: Self = Self::stock("Ignore");
    pub const IMPORT_FILES: Self = Self::stock("Import Files");
    pub const SUBMIT_REPORT: Self = Self::stock("Submit Crash Report");
    pub const MIGRATE: Self = Self::stock("Migrate");
    pub const DONT_MIGRATE: Self = Self::stock("Don't Migrate");
    pub const DOWNLOAD: Self = Self::stock("Download");
    pub const REMOVE_ENTRY: Self = Self::stock("Remove Entry");
    pub const DELETE_FILE: Self = Self::stock("Delete File");
    pub const DELETE_FILES: Self = Self::stock("Delete Files");
    pub const KEEP_VIDEOS: Self = Self::stock("Keep Videos");
    pub const DELETE_VIDEOS: Self = Self::stock("Delete Videos");
    pub const CREATE: Self = Self::stock("Create");
    pub const CREATE_FEED: Self = Self::stock("Create Podcast");
    pub const CREATE_FOLDER: Self = Self::stock("Create Folder");
    pub const CHOOSE_NEW_FOLDER: Self = Self::stock("Choose New Folder");
    pub const ADD_FOLDER: Self = Self::stock("Add Folder");
    pub const ADD: Self = Self::stock("Add");
    pub const ADD_INTO_NEW_FOLDER: Self = Self::stock("Add Into New Folder");
    pub const KEEP: Self = Self::stock("Keep");
    pub const DELETE: Self = Self::stock("Delete");
    pub const REMOVE: Self = Self::stock("Remove");
    pub const NOT_NOW: Self = Self::stock("Not Now");
    pub const CLOSE_TO_TRAY: Self = Self::stock("Close to Tray");
    pub const LAUNCH_PLAYER: Self = Self::stock("Launch Player");
    pub const DOWNLOAD_ANYWAY: Self = Self::stock("Download Anyway");
    pub const OPEN_IN_EXTERNAL_BROWSER: Self = Self::stock("Open in External Browser");
    pub const DONT_INSTALL: Self = Self::stock("Don't Install");
    pub const SUBSCRIBE: Self = Self::stock("Subscribe");
    pub const STOP_WATCHING: Self = Self::stock("Stop Watching");
    pub const RETRY: Self = Self::stock("Retry");
    pub const START_FRESH: Self = Self::stock("Start Fresh");
    pub const INCLUDE_DATABASE: Self = Self::stock("Include Database");
    pub const DONT_INCLUDE_DATABASE: Self = Self::stock("Don't Include Database");

    const fn stock(label: &'static str) -> Self {
        Self {
            label: Cow::Borrowed(label),
        }
    }

    /// Create an application-specific button.
    pub fn new(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// All buttons known to the application out of the box.
    ///
    /// Frontends use this to pick stock icons for familiar choices.
    pub fn stock_buttons() -> &'static [Self] {
        STOCK_BUTTONS
    }

    pub fn is_stock(&self) -> bool {
        STOCK_BUTTONS.contains(self)
    }
}

static STOCK_BUTTONS: &[Button] = &[
    Button::OK,
    Button::APPLY,
    Button::CLOSE,
    Button::CANCEL,
    Button::DONE,
    Button::YES,
    Button::NO,
    Button::QUIT,
    Button::CONTINUE,
    Button::IGNORE,
    Button::IMPORT_FILES,
    Button::SUBMIT_REPORT,
    Button::MIGRATE,
    Button::DONT_MIGRATE,
    Button::DOWNLOAD,
    Button::REMOVE_ENTRY,
    Button::DELETE_FILE,
    Button::DELETE_FILES,
    Button::KEEP_VIDEOS,
    Button::DELETE_VIDEOS,
    Button::CREATE,
    Button::CREATE_FEED,
    Button::CREATE_FOLDER,
    Button::CHOOSE_NEW_FOLDER,
    Button::ADD_FOLDER,
    Button::ADD,
    Button::ADD_INTO_NEW_FOLDER,
    Button::KEEP,
    Button::DELETE,
    Button::REMOVE,
    Button::NOT_NOW,
    Button::CLOSE_TO_TRAY,
    Button::LAUNCH_PLAYER,
    Button::DOWNLOAD_ANYWAY,
    Button::OPEN_IN_EXTERNAL_BROWSER,
    Button::DONT_INSTALL,
    Button::SUBSCRIBE,
    Button::STOP_WATCHING,
    Button::RETRY,
    Button::START_FRESH,
    Button::INCLUDE_DATABASE,
    Button::DONT_INCLUDE_DATABASE,
];

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Button({:?})", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_by_label() {
        assert_eq!(Button::new("Yes"), Button::YES);
        assert_eq!(Button::new(String::from("Retry")), Button::RETRY);
        assert_ne!(Button::YES, Button::NO);
    }

    #[test]
    fn test_custom_button_is_not_stock() {
        assert!(Button::SUBSCRIBE.is_stock());
        assert!(!Button::new("Rename Feed").is_stock());
    }

    #[test]
    fn test_display_and_debug() {
        assert_eq!(Button::DONT_MIGRATE.to_string(), "Don't Migrate");
        assert_eq!(format!("{:?}", Button::OK), "Button(\"OK\")");
    }

    #[test]
    fn test_stock_registry_has_unique_labels() {
        let stock = Button::stock_buttons();
        assert!(stock.contains(&Button::LAUNCH_PLAYER));
        assert!(stock.iter().all(Button::is_stock));

        let labels: std::collections::HashSet<&str> = stock.iter().map(Button::label).collect();
        assert_eq!(labels.len(), stock.len());
    }
}
