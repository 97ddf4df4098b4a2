use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::groups::{self, ActionGroup, ActionGroupTable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedInfo {
    pub id: u64,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistInfo {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticTabInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInfo {
    pub id: u64,
    pub title: String,
    /// The item has a local file and can be played.
    pub downloaded: bool,
}

/// The selection in one of the sidebar or item lists changed.
#[derive(Debug, Clone)]
pub enum SelectionEvent {
    Feeds(Vec<FeedInfo>),
    Playlists(Vec<PlaylistInfo>),
    StaticTabs(Vec<StaticTabInfo>),
    Items(Vec<ItemInfo>),
}

/// Identifies a connected "enabled changed" listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

type Listener = Box<dyn FnMut(&HashSet<ActionGroup>)>;

/// Tracks which menu action groups are enabled for the current selection.
///
/// The enabled set is rebuilt from scratch on every selection event and
/// always contains [`ActionGroup::AlwaysOn`]. Listeners are notified once per
/// event, whether or not the set actually changed.
pub struct MenuManager {
    table: Arc<ActionGroupTable>,
    enabled: HashSet<ActionGroup>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: usize,
}

impl Default for MenuManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuManager {
    /// Manager backed by the process-wide action group table.
    pub fn new() -> Self {
        Self::with_table(groups::table())
    }

    pub fn with_table(table: Arc<ActionGroupTable>) -> Self {
        Self {
            table,
            enabled: HashSet::from([ActionGroup::AlwaysOn]),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub const fn enabled_groups(&self) -> &HashSet<ActionGroup> {
        &self.enabled
    }

    pub fn is_group_enabled(&self, group: ActionGroup) -> bool {
        self.enabled.contains(&group)
    }

    /// Whether the menu item for `action` should be sensitive.
    pub fn is_enabled(&self, action: &str) -> bool {
        self.is_group_enabled(self.table.group_of(action))
    }

    /// Call `listener` with the new enabled set after every selection event.
    pub fn connect_enabled_changed(
        &mut self,
        listener: impl FnMut(&HashSet<ActionGroup>) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn disconnect(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn handle_selection(&mut self, event: &SelectionEvent) {
        match event {
            SelectionEvent::Feeds(feeds) => self.handle_feed_selection(feeds),
            SelectionEvent::Playlists(playlists) => self.handle_playlist_selection(playlists),
            SelectionEvent::StaticTabs(tabs) => self.handle_static_tab_selection(tabs),
            SelectionEvent::Items(items) => self.handle_item_list_selection(items),
        }
    }

    /// The user selected things in the feed list.
    pub fn handle_feed_selection(&mut self, selected_feeds: &[FeedInfo]) {
        let mut enabled = HashSet::from([ActionGroup::AlwaysOn, ActionGroup::FeedsSelected]);
        if selected_feeds.len() == 1 {
            enabled.insert(ActionGroup::FeedSelected);
        }
        self.replace(enabled);
    }

    pub fn handle_playlist_selection(&mut self, _selected_playlists: &[PlaylistInfo]) {
        self.replace(HashSet::from([ActionGroup::AlwaysOn]));
    }

    pub fn handle_static_tab_selection(&mut self, _selected_tabs: &[StaticTabInfo]) {
        self.replace(HashSet::from([ActionGroup::AlwaysOn]));
    }

    /// The user selected things in the item list.
    pub fn handle_item_list_selection(&mut self, selected_items: &[ItemInfo]) {
        let mut enabled = HashSet::from([ActionGroup::AlwaysOn]);
        if selected_items.iter().any(|item| item.downloaded) {
            enabled.insert(ActionGroup::PlayableSelected);
        }
        self.replace(enabled);
    }

    fn replace(&mut self, enabled: HashSet<ActionGroup>) {
        debug!(groups = ?enabled, "Menu groups recomputed");
        self.enabled = enabled;
        for (_, listener) in &mut self.listeners {
            listener(&self.enabled);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn feed(id: u64) -> FeedInfo {
        FeedInfo {
            id,
            name: format!("Feed {id}"),
            url: format!("http://example.com/{id}.rss"),
        }
    }

    fn item(id: u64, downloaded: bool) -> ItemInfo {
        ItemInfo {
            id,
            title: format!("Episode {id}"),
            downloaded,
        }
    }

    fn set(groups: &[ActionGroup]) -> HashSet<ActionGroup> {
        groups.iter().copied().collect()
    }

    #[test]
    fn test_initial_state() {
        let manager = MenuManager::with_table(Arc::new(ActionGroupTable::builtin()));
        assert_eq!(manager.enabled_groups(), &set(&[ActionGroup::AlwaysOn]));
        assert!(manager.is_enabled("Quit"));
        assert!(!manager.is_enabled("UpdateChannels"));
    }

    #[test]
    fn test_single_feed_selection() {
        let mut manager = MenuManager::default();
        manager.handle_feed_selection(&[feed(1)]);
        assert_eq!(
            manager.enabled_groups(),
            &set(&[
                ActionGroup::AlwaysOn,
                ActionGroup::FeedsSelected,
                ActionGroup::FeedSelected,
            ])
        );
        assert!(manager.is_enabled("CopyChannelURL"));
        assert!(manager.is_enabled("UpdateChannels"));
    }

    #[test]
    fn test_zero_or_many_feeds() {
        let mut manager = MenuManager::default();
        let expected = set(&[ActionGroup::AlwaysOn, ActionGroup::FeedsSelected]);

        manager.handle_feed_selection(&[]);
        assert_eq!(manager.enabled_groups(), &expected);

        manager.handle_feed_selection(&[feed(1), feed(2)]);
        assert_eq!(manager.enabled_groups(), &expected);
        assert!(!manager.is_enabled("MailChannel"));
    }

    #[test]
    fn test_item_selection() {
        let mut manager = MenuManager::default();

        manager.handle_item_list_selection(&[item(1, false), item(2, false)]);
        assert!(!manager.is_group_enabled(ActionGroup::PlayableSelected));
        assert!(!manager.is_enabled("PlayPauseVideo"));

        manager.handle_item_list_selection(&[item(1, false), item(2, true)]);
        assert_eq!(
            manager.enabled_groups(),
            &set(&[ActionGroup::AlwaysOn, ActionGroup::PlayableSelected])
        );
    }

    #[test]
    fn test_recompute_drops_stale_groups() {
        let mut manager = MenuManager::default();
        manager.handle_feed_selection(&[feed(1)]);
        manager.handle_selection(&SelectionEvent::Playlists(vec![PlaylistInfo {
            id: 1,
            name: "Favorites".into(),
        }]));
        assert_eq!(manager.enabled_groups(), &set(&[ActionGroup::AlwaysOn]));

        manager.handle_item_list_selection(&[item(1, true)]);
        manager.handle_selection(&SelectionEvent::StaticTabs(vec![StaticTabInfo {
            id: "downloads".into(),
            name: "Downloads".into(),
        }]));
        assert_eq!(manager.enabled_groups(), &set(&[ActionGroup::AlwaysOn]));
    }

    #[test]
    fn test_one_notification_per_event() {
        let mut manager = MenuManager::default();
        let count = Rc::new(RefCell::new(0));

        let counter = count.clone();
        manager.connect_enabled_changed(move |_| *counter.borrow_mut() += 1);

        manager.handle_playlist_selection(&[]);
        manager.handle_playlist_selection(&[]);
        manager.handle_selection(&SelectionEvent::Items(vec![]));
        manager.handle_selection(&SelectionEvent::Feeds(vec![feed(3)]));

        assert_eq!(*count.borrow(), 4);
    }

    #[test]
    fn test_listener_sees_new_set_and_can_disconnect() {
        let mut manager = MenuManager::default();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = seen.clone();
        let id = manager.connect_enabled_changed(move |groups| {
            log.borrow_mut().push(groups.contains(&ActionGroup::FeedSelected));
        });

        manager.handle_feed_selection(&[feed(1)]);
        assert!(manager.disconnect(id));
        assert!(!manager.disconnect(id));
        manager.handle_feed_selection(&[feed(1), feed(2)]);

        assert_eq!(*seen.borrow(), vec![true]);
    }

    #[test]
    fn test_custom_table() {
        let table = ActionGroupTable::builtin()
            .with_overrides([("DeleteItem".to_string(), ActionGroup::PlayableSelected)]);
        let mut manager = MenuManager::with_table(Arc::new(table));
        assert!(!manager.is_enabled("DeleteItem"));
        manager.handle_item_list_selection(&[item(7, true)]);
        assert!(manager.is_enabled("DeleteItem"));
    }
}
