//! Dialog and menu glue for a feed-driven desktop media player.
//!
//! - [`dialogs`] - one-shot modal prompts answered by the frontend
//! - [`menus`] - menu action groups enabled by the current selection
//! - [`main_loop`] - serial main context continuations and handlers run on
//! - [`console`] - terminal frontend for dialogs
//! - [`config`] - user configuration

pub mod config;
pub mod console;
pub mod dialogs;
pub mod main_loop;
pub mod menus;
