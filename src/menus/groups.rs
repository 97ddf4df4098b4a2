use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Menu actions that are enabled and disabled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionGroup {
    /// Catch-all group for actions without an explicit mapping.
    AlwaysOn,
    /// Exactly one feed is selected.
    FeedSelected,
    /// One or more feeds are selected.
    FeedsSelected,
    /// At least one downloaded item is selected.
    PlayableSelected,
}

impl ActionGroup {
    pub const ALL: [Self; 4] = [
        Self::FeedSelected,
        Self::FeedsSelected,
        Self::PlayableSelected,
        Self::AlwaysOn,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::AlwaysOn => "AlwaysOn",
            Self::FeedSelected => "FeedSelected",
            Self::FeedsSelected => "FeedsSelected",
            Self::PlayableSelected => "PlayableSelected",
        }
    }
}

impl fmt::Display for ActionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|group| group.name() == s)
            .ok_or_else(|| format!("Unknown action group: {s}"))
    }
}

/// Group name -> menu actions belonging to it.
const BUILTIN_GROUPS: &[(ActionGroup, &[&str])] = &[
    (ActionGroup::FeedSelected, &["CopyChannelURL", "MailChannel"]),
    (ActionGroup::FeedsSelected, &["UpdateChannels"]),
    (ActionGroup::PlayableSelected, &["PlayPauseVideo"]),
];

/// Lookup from menu action name to its group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionGroupTable {
    groups: HashMap<String, ActionGroup>,
}

impl Default for ActionGroupTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ActionGroupTable {
    /// The table shipped with the application.
    pub fn builtin() -> Self {
        let groups = BUILTIN_GROUPS
            .iter()
            .flat_map(|(group, actions)| {
                actions
                    .iter()
                    .map(move |action| ((*action).to_string(), *group))
            })
            .collect();
        Self { groups }
    }

    /// Add or replace mappings, e.g. from the user's configuration.
    #[must_use]
    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = (String, ActionGroup)>) -> Self {
        for (action, group) in overrides {
            debug!(action = %action, group = %group, "Overriding menu action group");
            self.groups.insert(action, group);
        }
        self
    }

    /// The group `action` belongs to. Unknown actions are always enabled.
    pub fn group_of(&self, action: &str) -> ActionGroup {
        self.groups
            .get(action)
            .copied()
            .unwrap_or(ActionGroup::AlwaysOn)
    }
}

static TABLE: OnceLock<Arc<ActionGroupTable>> = OnceLock::new();

/// Install the process-wide table. Must happen before the first lookup;
/// returns `false` if a table was already in place.
pub fn init(table: ActionGroupTable) -> bool {
    TABLE.set(Arc::new(table)).is_ok()
}

/// The process-wide table, defaulting to [`ActionGroupTable::builtin`].
pub fn table() -> Arc<ActionGroupTable> {
    TABLE
        .get_or_init(|| Arc::new(ActionGroupTable::builtin()))
        .clone()
}

/// Every group name, including the catch-all.
pub const fn action_group_names() -> &'static [ActionGroup] {
    &ActionGroup::ALL
}

pub fn action_group(action: &str) -> ActionGroup {
    table().group_of(action)
}
