use thiserror::Error;

/// Misuse of the dialog lifecycle.
///
/// The user declining to answer is not an error; it resolves the dialog with
/// no choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DialogError {
    /// The dialog was handed to the presentation sink more than once.
    #[error("dialog has already been submitted")]
    AlreadySubmitted,
    /// The presentation layer answered a dialog nobody submitted.
    #[error("dialog was resolved before it was submitted")]
    NotSubmitted,
    /// The presentation layer answered the same dialog twice.
    #[error("dialog has already been resolved")]
    AlreadyResolved,
}
