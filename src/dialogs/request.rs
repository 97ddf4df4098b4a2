use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tracing::{info, warn};

use super::{Button, DialogError};
use crate::main_loop::MainHandle;

/// Callback run on the main context once a dialog has been answered.
pub type Continuation = Box<dyn FnOnce(Dialog) + Send + 'static>;

/// Produces the initial text of a [`DialogKind::TextEntry`] dialog.
pub type PrefillSource = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Variant-specific data of a dialog.
///
/// Every variant shares the title, description and button list stored on
/// [`Dialog`]; the tag only carries what that prompt needs on top.
#[derive(Clone)]
pub enum DialogKind {
    /// Informational box with a single OK button.
    MessageBox,
    /// Two options, e.g. Yes/No or Migrate/Don't Migrate.
    Choice,
    /// Retry/Quit choice shown when the database cannot be written.
    DatabaseError,
    /// Three options, e.g. Remove Entry/Delete File/Cancel.
    ThreeChoice,
    /// Username and password prompt for HTTP authorization.
    HttpAuth {
        prefill_user: Option<String>,
        prefill_password: Option<String>,
    },
    /// Choice plus a single-line text entry (rename, create playlist...).
    TextEntry {
        prefill: Option<PrefillSource>,
        fill_with_clipboard_url: bool,
    },
    /// Choice plus a checkbox, typically "don't ask me again".
    Checkbox { label: String, initial: bool },
    /// Checkbox plus a free-text area, used for crash reports.
    CheckboxTextbox {
        label: String,
        initial: bool,
        textbox_initial: String,
    },
}

impl DialogKind {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MessageBox => "MessageBoxDialog",
            Self::Choice => "ChoiceDialog",
            Self::DatabaseError => "DatabaseErrorDialog",
            Self::ThreeChoice => "ThreeChoiceDialog",
            Self::HttpAuth { .. } => "HttpAuthDialog",
            Self::TextEntry { .. } => "TextEntryDialog",
            Self::Checkbox { .. } => "CheckboxDialog",
            Self::CheckboxTextbox { .. } => "CheckboxTextboxDialog",
        }
    }
}

impl fmt::Debug for DialogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpAuth { prefill_user, .. } => f
                .debug_struct("HttpAuth")
                .field("prefill_user", prefill_user)
                .finish_non_exhaustive(),
            Self::TextEntry {
                prefill,
                fill_with_clipboard_url,
            } => f
                .debug_struct("TextEntry")
                .field("has_prefill", &prefill.is_some())
                .field("fill_with_clipboard_url", fill_with_clipboard_url)
                .finish(),
            Self::Checkbox { label, initial } => f
                .debug_struct("Checkbox")
                .field("label", label)
                .field("initial", initial)
                .finish(),
            Self::CheckboxTextbox {
                label,
                initial,
                textbox_initial,
            } => f
                .debug_struct("CheckboxTextbox")
                .field("label", label)
                .field("initial", initial)
                .field("textbox_initial", textbox_initial)
                .finish(),
            other => f.write_str(other.name()),
        }
    }
}

/// What the presentation layer reports back for a dialog.
///
/// Fields a variant does not use stay at their empty defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// The clicked button, or `None` if the window was closed.
    pub choice: Option<Button>,
    pub username: String,
    pub password: String,
    pub text: String,
    pub checkbox: bool,
    pub textbox: String,
}

impl Resolution {
    pub fn new(choice: Option<Button>) -> Self {
        Self {
            choice,
            ..Self::default()
        }
    }

    pub fn choice(button: Button) -> Self {
        Self::new(Some(button))
    }

    /// The user closed the dialog without picking anything.
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub const fn with_checkbox(mut self, checked: bool) -> Self {
        self.checkbox = checked;
        self
    }

    #[must_use]
    pub fn with_textbox(mut self, text: impl Into<String>) -> Self {
        self.textbox = text.into();
        self
    }
}

#[derive(Default)]
struct State {
    submitted: bool,
    response: Option<Resolution>,
    continuation: Option<(Continuation, MainHandle)>,
}

struct Inner {
    title: String,
    description: String,
    buttons: Vec<Button>,
    kind: DialogKind,
    state: Mutex<State>,
    resolved: Condvar,
    notify: Notify,
}

/// A one-shot modal prompt shared between the thread asking the question and
/// the UI answering it.
///
/// Cloning is cheap and every clone refers to the same request. Submit it
/// through a [`DialogHub`](super::DialogHub); the presentation layer answers
/// with [`Dialog::resolve`].
#[derive(Clone)]
pub struct Dialog {
    inner: Arc<Inner>,
}

impl Dialog {
    fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        buttons: Vec<Button>,
        kind: DialogKind,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                title: title.into(),
                description: description.into(),
                buttons,
                kind,
                state: Mutex::new(State::default()),
                resolved: Condvar::new(),
                notify: Notify::new(),
            }),
        }
    }

    /// Show some information; the only button is OK.
    pub fn message_box(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, vec![Button::OK], DialogKind::MessageBox)
    }

    /// Let the user pick one of two options. `default` is listed first.
    pub fn binary_choice(
        title: impl Into<String>,
        description: impl Into<String>,
        default: Button,
        other: Button,
    ) -> Self {
        Self::new(title, description, vec![default, other], DialogKind::Choice)
    }

    /// Retry/Quit choice for database failures.
    pub fn database_error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(
            title,
            description,
            vec![Button::RETRY, Button::QUIT],
            DialogKind::DatabaseError,
        )
    }

    pub fn three_choice(
        title: impl Into<String>,
        description: impl Into<String>,
        default: Button,
        second: Button,
        third: Button,
    ) -> Self {
        Self::new(
            title,
            description,
            vec![default, second, third],
            DialogKind::ThreeChoice,
        )
    }

    /// Ask for a username and password for `url`, protected by `realm`.
    ///
    /// The buttons are always OK and Cancel.
    pub fn http_auth(
        auth_type: &str,
        url: &str,
        realm: &str,
        prefill_user: Option<String>,
        prefill_password: Option<String>,
    ) -> Self {
        let description =
            format!("{auth_type} {url} requires a username and password for \"{realm}\".");
        Self::new(
            "Login Required",
            description,
            vec![Button::OK, Button::CANCEL],
            DialogKind::HttpAuth {
                prefill_user,
                prefill_password,
            },
        )
    }

    pub fn text_entry(
        title: impl Into<String>,
        description: impl Into<String>,
        default: Button,
        other: Button,
        prefill: Option<PrefillSource>,
        fill_with_clipboard_url: bool,
    ) -> Self {
        Self::new(
            title,
            description,
            vec![default, other],
            DialogKind::TextEntry {
                prefill,
                fill_with_clipboard_url,
            },
        )
    }

    pub fn checkbox(
        title: impl Into<String>,
        description: impl Into<String>,
        checkbox_text: impl Into<String>,
        checkbox_value: bool,
        default: Button,
        other: Button,
    ) -> Self {
        Self::new(
            title,
            description,
            vec![default, other],
            DialogKind::Checkbox {
                label: checkbox_text.into(),
                initial: checkbox_value,
            },
        )
    }

    pub fn checkbox_textbox(
        title: impl Into<String>,
        description: impl Into<String>,
        checkbox_text: impl Into<String>,
        checkbox_value: bool,
        textbox_value: impl Into<String>,
        default: Button,
        other: Button,
    ) -> Self {
        Self::new(
            title,
            description,
            vec![default, other],
            DialogKind::CheckboxTextbox {
                label: checkbox_text.into(),
                initial: checkbox_value,
                textbox_initial: textbox_value.into(),
            },
        )
    }

    pub fn title(&self) -> &str {
        &self.inner.title
    }

    pub fn description(&self) -> &str {
        &self.inner.description
    }

    /// Buttons in display order; the first one is the default.
    pub fn buttons(&self) -> &[Button] {
        &self.inner.buttons
    }

    pub fn default_button(&self) -> Option<&Button> {
        self.inner.buttons.first()
    }

    pub fn kind(&self) -> &DialogKind {
        &self.inner.kind
    }

    /// Initial text for a text entry dialog, if it has a prefill source.
    pub fn prefill_text(&self) -> Option<String> {
        match &self.inner.kind {
            DialogKind::TextEntry {
                prefill: Some(source),
                ..
            } => source(),
            _ => None,
        }
    }

    /// Whether a text entry wants a URL on the clipboard as its starting
    /// text.
    pub fn fills_with_clipboard_url(&self) -> bool {
        matches!(
            self.inner.kind,
            DialogKind::TextEntry {
                fill_with_clipboard_url: true,
                ..
            }
        )
    }

    /// Whether two handles refer to the same request.
    pub fn same_request(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn read<T>(&self, f: impl FnOnce(&Resolution) -> T) -> Option<T> {
        self.state().response.as_ref().map(f)
    }

    pub fn is_resolved(&self) -> bool {
        self.state().response.is_some()
    }

    /// The button the user clicked. `None` until resolved or when dismissed.
    pub fn choice(&self) -> Option<Button> {
        self.read(|r| r.choice.clone()).flatten()
    }

    pub fn username(&self) -> String {
        self.read(|r| r.username.clone()).unwrap_or_default()
    }

    pub fn password(&self) -> String {
        self.read(|r| r.password.clone()).unwrap_or_default()
    }

    /// Text entered into a text entry dialog.
    pub fn text(&self) -> String {
        self.read(|r| r.text.clone()).unwrap_or_default()
    }

    pub fn checkbox_value(&self) -> bool {
        self.read(|r| r.checkbox).unwrap_or_default()
    }

    /// Contents of the text area of a checkbox/textbox dialog.
    pub fn textbox_value(&self) -> String {
        self.read(|r| r.textbox.clone()).unwrap_or_default()
    }

    pub(super) fn mark_submitted(
        &self,
        continuation: Option<Continuation>,
        main: MainHandle,
    ) -> Result<(), DialogError> {
        let mut state = self.state();
        if state.submitted {
            warn!(dialog = %self, "Dialog submitted twice");
            return Err(DialogError::AlreadySubmitted);
        }
        state.submitted = true;
        state.continuation = continuation.map(|c| (c, main));
        Ok(())
    }

    /// Record the user's answer.
    ///
    /// Only the presentation layer calls this. Waiting threads are woken and
    /// the continuation, if any, is queued on the main context; it never runs
    /// on the calling thread.
    pub fn resolve(&self, resolution: Resolution) -> Result<(), DialogError> {
        let continuation = {
            let mut state = self.state();
            if !state.submitted {
                warn!(dialog = %self, "Dialog resolved before submission");
                return Err(DialogError::NotSubmitted);
            }
            if state.response.is_some() {
                warn!(dialog = %self, "Dialog resolved twice, keeping first answer");
                return Err(DialogError::AlreadyResolved);
            }
            info!(
                dialog = %self,
                choice = ?resolution.choice,
                "Dialog resolved"
            );
            state.response = Some(resolution);
            state.continuation.take()
        };

        self.inner.resolved.notify_all();
        self.inner.notify.notify_waiters();

        if let Some((callback, main)) = continuation {
            let dialog = self.clone();
            main.add_urgent_call(format!("{} callback", self.kind().name()), move || {
                callback(dialog);
            });
        }
        Ok(())
    }

    /// Resolve without a choice, as when the window is closed.
    pub fn dismiss(&self) -> Result<(), DialogError> {
        self.resolve(Resolution::none())
    }

    pub(super) fn wait(&self) -> Option<Button> {
        let mut state = self.state();
        while state.response.is_none() {
            state = self
                .inner
                .resolved
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.response.as_ref().and_then(|r| r.choice.clone())
    }

    pub(super) async fn wait_async(&self) -> Option<Button> {
        loop {
            // Registered before the check so a resolve in between is not missed.
            let notified = self.inner.notify.notified();
            if let Some(choice) = self.read(|r| r.choice.clone()) {
                return choice;
            }
            notified.await;
        }
    }
}

impl fmt::Display for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buttons = self
            .buttons()
            .iter()
            .map(Button::label)
            .collect::<Vec<_>>()
            .join("/");
        write!(
            f,
            "{} (text: {}, buttons: {})",
            self.kind().name(),
            self.title(),
            buttons
        )
    }
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("title", &self.inner.title)
            .field("buttons", &self.inner.buttons)
            .field("kind", &self.inner.kind)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
