mod loader;

use std::collections::HashMap;

pub use loader::{config_path, load, load_from};
use serde::{Deserialize, Serialize};

use crate::menus::{ActionGroup, ActionGroupTable};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` is used when unset.
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Extra action -> group mappings layered over the built-in table.
    #[serde(default)]
    pub action_groups: HashMap<String, ActionGroup>,
}

impl MenuConfig {
    pub fn action_group_table(&self) -> ActionGroupTable {
        ActionGroupTable::builtin().with_overrides(
            self.action_groups
                .iter()
                .map(|(action, group)| (action.clone(), *group)),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogConfig {
    /// In the console frontend, an empty answer picks the default button.
    #[serde(default = "default_true")]
    pub default_on_empty: bool,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            default_on_empty: true,
        }
    }
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub menus: MenuConfig,
    #[serde(default)]
    pub dialogs: DialogConfig,
}
