//! Terminal frontend for dialogs.
//!
//! [`ConsoleSink`] answers dialogs by printing them to stdout and reading the
//! user's answer from stdin on a dedicated thread. The actual conversation is
//! done by [`Prompter`], which works on any reader/writer pair.

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use arboard::Clipboard;
use tracing::{debug, warn};

use crate::dialogs::{Button, Dialog, DialogKind, PrefillSource, PresentationSink, Resolution};

const URL_SCHEMES: &[&str] = &["http://", "https://", "feed://"];

fn looks_like_url(text: &str) -> bool {
    URL_SCHEMES.iter().any(|scheme| text.starts_with(scheme))
}

/// Text currently on the system clipboard, if any can be read.
fn system_clipboard_text() -> Option<String> {
    match Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
        Ok(text) => Some(text),
        Err(error) => {
            debug!(%error, "Clipboard unavailable");
            None
        }
    }
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
    default_on_empty: bool,
    clipboard: Option<PrefillSource>,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub const fn new(input: R, output: W, default_on_empty: bool) -> Self {
        Self {
            input,
            output,
            default_on_empty,
            clipboard: None,
        }
    }

    /// Read the clipboard from `source` for text entries that ask for it.
    #[must_use]
    pub fn with_clipboard(mut self, source: PrefillSource) -> Self {
        self.clipboard = Some(source);
        self
    }

    /// Show `dialog` and collect the answer.
    ///
    /// End of input or `q` closes the dialog without a choice.
    pub fn prompt(&mut self, dialog: &Dialog) -> io::Result<Resolution> {
        self.show(dialog)?;
        let Some(choice) = self.choose(dialog.buttons())? else {
            return Ok(Resolution::none());
        };
        let resolution = Resolution::choice(choice);

        Ok(match dialog.kind() {
            DialogKind::HttpAuth {
                prefill_user,
                prefill_password,
            } => {
                let username = self.ask("Username", prefill_user.as_deref())?;
                let password = self.ask("Password", prefill_password.as_deref())?;
                resolution.with_credentials(username, password)
            }
            DialogKind::TextEntry { .. } => {
                let prefill = dialog.prefill_text().or_else(|| self.clipboard_url(dialog));
                let text = self.ask("Text", prefill.as_deref())?;
                resolution.with_text(text)
            }
            DialogKind::Checkbox { label, initial } => {
                let checked = self.ask_bool(label, *initial)?;
                resolution.with_checkbox(checked)
            }
            DialogKind::CheckboxTextbox {
                label,
                initial,
                textbox_initial,
            } => {
                let checked = self.ask_bool(label, *initial)?;
                let text = self.ask("Details", Some(textbox_initial.as_str()))?;
                resolution.with_checkbox(checked).with_textbox(text)
            }
            DialogKind::MessageBox
            | DialogKind::Choice
            | DialogKind::DatabaseError
            | DialogKind::ThreeChoice => resolution,
        })
    }

    /// A URL from the clipboard, when the dialog asks for one.
    fn clipboard_url(&self, dialog: &Dialog) -> Option<String> {
        if !dialog.fills_with_clipboard_url() {
            return None;
        }
        let text = self.clipboard.as_ref().and_then(|source| source())?;
        let text = text.trim();
        looks_like_url(text).then(|| text.to_string())
    }

    fn show(&mut self, dialog: &Dialog) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "== {} ==", dialog.title())?;
        writeln!(self.output, "{}", dialog.description())?;
        for (i, button) in dialog.buttons().iter().enumerate() {
            if i == 0 {
                writeln!(self.output, "  [{}] {button} (default)", i + 1)?;
            } else {
                writeln!(self.output, "  [{}] {button}", i + 1)?;
            }
        }
        Ok(())
    }

    fn choose(&mut self, buttons: &[Button]) -> io::Result<Option<Button>> {
        loop {
            write!(self.output, "Choice: ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if line.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            if line.is_empty() {
                if self.default_on_empty {
                    return Ok(buttons.first().cloned());
                }
                continue;
            }
            match line.parse::<usize>() {
                Ok(n) if (1..=buttons.len()).contains(&n) => return Ok(Some(buttons[n - 1].clone())),
                _ => writeln!(
                    self.output,
                    "Please enter a number between 1 and {}, or q to close.",
                    buttons.len()
                )?,
            }
        }
    }

    fn ask(&mut self, label: &str, prefill: Option<&str>) -> io::Result<String> {
        match prefill {
            Some(value) if !value.is_empty() => write!(self.output, "{label} [{value}]: ")?,
            _ => write!(self.output, "{label}: ")?,
        }
        self.output.flush()?;

        Ok(match self.read_line()? {
            Some(line) if !line.is_empty() => line,
            _ => prefill.unwrap_or_default().to_string(),
        })
    }

    fn ask_bool(&mut self, label: &str, initial: bool) -> io::Result<bool> {
        let hint = if initial { "Y/n" } else { "y/N" };
        write!(self.output, "{label} [{hint}]: ")?;
        self.output.flush()?;

        Ok(match self.read_line()?.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("y" | "yes") => true,
            Some("n" | "no") => false,
            _ => initial,
        })
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Presentation sink that talks to the user over stdin/stdout.
///
/// Each dialog is handled on its own thread; a shared lock keeps two dialogs
/// from interleaving on the terminal.
#[derive(Clone)]
pub struct ConsoleSink {
    default_on_empty: bool,
    terminal: Arc<Mutex<()>>,
}

impl ConsoleSink {
    pub fn new(default_on_empty: bool) -> Self {
        Self {
            default_on_empty,
            terminal: Arc::new(Mutex::new(())),
        }
    }

    fn answer(&self, dialog: &Dialog) {
        let _terminal = self.terminal.lock().unwrap_or_else(PoisonError::into_inner);
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut prompter = Prompter::new(stdin.lock(), stdout.lock(), self.default_on_empty)
            .with_clipboard(Arc::new(system_clipboard_text));

        let resolution = prompter.prompt(dialog).unwrap_or_else(|error| {
            warn!(%error, dialog = %dialog, "Console prompt failed, dismissing dialog");
            Resolution::none()
        });
        if let Err(error) = dialog.resolve(resolution) {
            warn!(%error, dialog = %dialog, "Could not resolve dialog");
        }
    }
}

impl PresentationSink for ConsoleSink {
    fn present(&self, dialog: Dialog) {
        let sink = self.clone();
        let spawned = thread::Builder::new()
            .name("console-dialog".into())
            .spawn({
                let dialog = dialog.clone();
                move || sink.answer(&dialog)
            });

        if let Err(error) = spawned {
            warn!(%error, dialog = %dialog, "Could not start console prompt");
            if let Err(error) = dialog.dismiss() {
                warn!(%error, "Could not dismiss dialog");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use super::*;
    use crate::dialogs::{DialogHub, PrefillSource};
    use crate::main_loop::MainLoop;

    fn run(dialog: &Dialog, input: &str) -> (Resolution, String) {
        run_with(dialog, input, true)
    }

    fn run_with(dialog: &Dialog, input: &str, default_on_empty: bool) -> (Resolution, String) {
        let mut output = Vec::new();
        let resolution = Prompter::new(Cursor::new(input.as_bytes()), &mut output, default_on_empty)
            .prompt(dialog)
            .unwrap();
        (resolution, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_pick_numbered_button() {
        let dialog = Dialog::three_choice(
            "Remove",
            "Remove this item?",
            Button::REMOVE_ENTRY,
            Button::DELETE_FILE,
            Button::CANCEL,
        );
        let (resolution, output) = run(&dialog, "2\n");
        assert_eq!(resolution.choice, Some(Button::DELETE_FILE));
        assert!(output.contains("== Remove =="));
        assert!(output.contains("[1] Remove Entry (default)"));
        assert!(output.contains("[3] Cancel"));
    }

    #[test]
    fn test_empty_line_picks_default() {
        let dialog = Dialog::binary_choice("t", "d", Button::YES, Button::NO);
        assert_eq!(run(&dialog, "\n").0.choice, Some(Button::YES));
    }

    #[test]
    fn test_empty_line_ignored_without_default() {
        let dialog = Dialog::binary_choice("t", "d", Button::YES, Button::NO);
        assert_eq!(run_with(&dialog, "\n2\n", false).0.choice, Some(Button::NO));
    }

    #[test]
    fn test_invalid_then_valid() {
        let dialog = Dialog::binary_choice("t", "d", Button::YES, Button::NO);
        let (resolution, output) = run(&dialog, "7\nabc\n2\n");
        assert_eq!(resolution.choice, Some(Button::NO));
        assert_eq!(output.matches("Please enter a number between 1 and 2").count(), 2);
    }

    #[test]
    fn test_quit_and_eof_dismiss() {
        let dialog = Dialog::message_box("t", "d");
        assert_eq!(run(&dialog, "q\n").0, Resolution::none());
        assert_eq!(run(&dialog, "").0, Resolution::none());
    }

    #[test]
    fn test_http_auth_uses_prefill() {
        let dialog = Dialog::http_auth(
            "HTTP",
            "http://example.com",
            "r",
            Some("alice".into()),
            Some("secret".into()),
        );
        let (resolution, output) = run(&dialog, "1\n\nnewpass\n");
        assert_eq!(resolution.choice, Some(Button::OK));
        assert_eq!(resolution.username, "alice");
        assert_eq!(resolution.password, "newpass");
        assert!(output.contains("Username [alice]: "));
    }

    #[test]
    fn test_text_entry_prefill_source() {
        let source: PrefillSource = Arc::new(|| Some("http://example.com/feed.rss".into()));
        let dialog = Dialog::text_entry(
            "Add Podcast",
            "Enter the URL",
            Button::CREATE_FEED,
            Button::CANCEL,
            Some(source),
            true,
        );
        assert_eq!(run(&dialog, "1\n\n").0.text, "http://example.com/feed.rss");
        assert_eq!(run(&dialog, "1\nhttp://other\n").0.text, "http://other");
    }

    fn run_with_clipboard(dialog: &Dialog, clipboard: &'static str, input: &str) -> String {
        let source: PrefillSource = Arc::new(move || Some(clipboard.to_string()));
        Prompter::new(Cursor::new(input.as_bytes()), io::sink(), true)
            .with_clipboard(source)
            .prompt(dialog)
            .unwrap()
            .text
    }

    #[test]
    fn test_text_entry_fills_with_clipboard_url() {
        let wants_url = Dialog::text_entry("Add Podcast", "URL", Button::SUBSCRIBE, Button::CANCEL, None, true);
        assert_eq!(
            run_with_clipboard(&wants_url, " https://example.com/rss \n", "1\n\n"),
            "https://example.com/rss"
        );
        assert_eq!(run_with_clipboard(&wants_url, "not a url", "1\n\n"), "");

        let ignores_clipboard =
            Dialog::text_entry("Rename", "Name", Button::OK, Button::CANCEL, None, false);
        assert!(!ignores_clipboard.fills_with_clipboard_url());
        assert_eq!(run_with_clipboard(&ignores_clipboard, "https://example.com", "1\n\n"), "");
    }

    #[test]
    fn test_prefill_wins_over_clipboard() {
        let source: PrefillSource = Arc::new(|| Some("http://prefilled".into()));
        let dialog = Dialog::text_entry("t", "d", Button::OK, Button::CANCEL, Some(source), true);
        assert_eq!(run_with_clipboard(&dialog, "https://clipboard", "1\n\n"), "http://prefilled");
    }

    #[test]
    fn test_checkbox_and_textbox() {
        let dialog = Dialog::checkbox_textbox(
            "Crash",
            "Something went wrong",
            "Include database",
            true,
            "",
            Button::SUBMIT_REPORT,
            Button::IGNORE,
        );
        let (resolution, _) = run(&dialog, "1\nn\nplayback froze\n");
        assert!(!resolution.checkbox);
        assert_eq!(resolution.textbox, "playback froze");

        let checkbox = Dialog::checkbox("t", "d", "Remember", true, Button::YES, Button::NO);
        assert!(run(&checkbox, "1\n\n").0.checkbox);
    }

    #[test]
    fn test_dismissed_dialog_skips_extras() {
        let dialog = Dialog::http_auth("HTTP", "http://example.com", "r", Some("bob".into()), None);
        let (resolution, output) = run(&dialog, "q\n");
        assert_eq!(resolution, Resolution::none());
        assert!(!output.contains("Username"));
    }

    #[test]
    fn test_sink_resolves_through_hub() {
        let main_loop = MainLoop::new();
        let hub = DialogHub::new(main_loop.handle());
        hub.install_sink(|dialog: Dialog| {
            let resolution = Prompter::new(Cursor::new(&b"2\n"[..]), io::sink(), true)
                .prompt(&dialog)
                .unwrap();
            dialog.resolve(resolution).unwrap();
        });

        let dialog = Dialog::binary_choice("t", "d", Button::KEEP, Button::DELETE);
        assert_eq!(hub.await_response(&dialog).unwrap(), Some(Button::DELETE));
    }
}
