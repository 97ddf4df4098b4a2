//! Dialog popups.
//!
//! Code that needs an answer from the user builds a [`Dialog`] and hands it
//! to the [`DialogHub`], either with a continuation:
//!
//! ```rust,ignore
//! let dialog = Dialog::binary_choice(
//!     "Subscribe?",
//!     "Add this podcast to your feeds?",
//!     Button::YES,
//!     Button::NO,
//! );
//! hub.submit_with(&dialog, |dialog| {
//!     if dialog.choice() == Some(Button::YES) {
//!         // subscribe
//!     }
//! })?;
//! ```
//!
//! or, from a worker thread, by blocking with [`DialogHub::await_response`].
//!
//! # Frontend requirements
//!
//! The frontend installs a [`PresentationSink`]. It receives every submitted
//! dialog and must answer each one exactly once through [`Dialog::resolve`],
//! passing `None` as the choice if the window was closed. The first button is
//! the default; where it is placed on screen is up to the frontend.

mod button;
mod error;
mod hub;
mod request;

pub use button::Button;
pub use error::DialogError;
pub use hub::{DialogHub, PresentationSink};
pub use request::{Continuation, Dialog, DialogKind, PrefillSource, Resolution};
