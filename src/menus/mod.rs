//! Menu handling.
//!
//! - [`groups`] - which group each menu action belongs to
//! - [`MenuManager`] - enabled groups for the current selection
//! - [`ActionHandlers`] - callbacks for activated menu actions

pub mod groups;
mod handlers;
mod manager;

pub use groups::{ActionGroup, ActionGroupTable, action_group, action_group_names};
pub use handlers::{ActionHandler, ActionHandlers};
pub use manager::{
    FeedInfo, ItemInfo, ListenerId, MenuManager, PlaylistInfo, SelectionEvent, StaticTabInfo,
};
