use std::sync::Arc;
use std::thread;

use color_eyre::Result;
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tvshell::config::AppConfig;
use tvshell::console::ConsoleSink;
use tvshell::dialogs::{Button, Dialog, DialogError, DialogHub, PrefillSource};
use tvshell::main_loop::{MainHandle, MainLoop};
use tvshell::menus::{self, ActionHandlers, FeedInfo, ItemInfo, MenuManager, SelectionEvent};

const DEFAULT_FEED_URL: &str = "https://example.com/podcast/feed.rss";

/// Menu actions shown in the console after each selection change.
const MENU_ACTIONS: &[&str] = &[
    "UpdateChannels",
    "CopyChannelURL",
    "MailChannel",
    "PlayPauseVideo",
    "Quit",
];

pub struct App {
    main_loop: MainLoop,
    hub: Arc<DialogHub>,
    menus: MenuManager,
    handlers: Arc<ActionHandlers>,
    shutdown: CancellationToken,
    selection_tx: UnboundedSender<SelectionEvent>,
    selection_rx: UnboundedReceiver<SelectionEvent>,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        if !menus::groups::init(config.menus.action_group_table()) {
            warn!("Menu action groups were already initialized");
        }

        let main_loop = MainLoop::new();
        let hub = Arc::new(DialogHub::new(main_loop.handle()));
        hub.install_sink(ConsoleSink::new(config.dialogs.default_on_empty));

        let shutdown = CancellationToken::new();
        let mut handlers = ActionHandlers::with_builtin(shutdown.clone());
        handlers.register("UpdateChannels", || {
            info!("Updating feeds");
            println!("Updating feeds...");
        });
        let handlers = Arc::new(handlers);

        let mut menu_manager = MenuManager::new();
        let table = menus::groups::table();
        menu_manager.connect_enabled_changed(move |groups| {
            let enabled: Vec<&str> = MENU_ACTIONS
                .iter()
                .copied()
                .filter(|action| groups.contains(&table.group_of(action)))
                .collect();
            info!(?groups, "Menu groups changed");
            println!("Enabled menu actions: {}", enabled.join(", "));
        });

        let (selection_tx, selection_rx) = mpsc::unbounded_channel();

        Self {
            main_loop,
            hub,
            menus: menu_manager,
            handlers,
            shutdown,
            selection_tx,
            selection_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let session = Session {
            hub: self.hub.clone(),
            main: self.main_loop.handle(),
            handlers: self.handlers.clone(),
            selection_tx: self.selection_tx.clone(),
        };
        session.spawn()?;

        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => break,
                result = tokio::signal::ctrl_c() => {
                    result?;
                    info!("Interrupted");
                    self.shutdown.cancel();
                }
                Some(call) = self.main_loop.next_call() => call.run(),
                Some(event) = self.selection_rx.recv() => {
                    debug!(?event, "Selection changed");
                    self.menus.handle_selection(&event);
                }
            }
        }

        self.main_loop.run_pending();
        info!("Shutting down");
        Ok(())
    }
}

/// Background conversation with the user, run on a worker thread the way
/// feed updates and downloads ask their questions.
#[derive(Clone)]
struct Session {
    hub: Arc<DialogHub>,
    main: MainHandle,
    handlers: Arc<ActionHandlers>,
    selection_tx: UnboundedSender<SelectionEvent>,
}

impl Session {
    fn spawn(self) -> Result<()> {
        thread::Builder::new()
            .name("session".into())
            .spawn(move || {
                if let Err(error) = self.run() {
                    warn!(%error, "Session ended early");
                }
            })?;
        Ok(())
    }

    fn run(self) -> Result<(), DialogError> {
        self.hub.await_response(&Dialog::message_box(
            "Welcome",
            "Answer the prompts below. Enter picks the default, q closes a dialog.",
        ))?;

        let prefill: PrefillSource = Arc::new(|| Some(DEFAULT_FEED_URL.to_string()));
        let add_feed = Dialog::text_entry(
            "Add Podcast",
            "Enter the URL of the podcast feed to subscribe to.",
            Button::SUBSCRIBE,
            Button::CANCEL,
            Some(prefill),
            true,
        );
        if self.hub.await_response(&add_feed)? == Some(Button::SUBSCRIBE) {
            let url = add_feed.text();
            self.select(SelectionEvent::Feeds(vec![FeedInfo {
                id: 1,
                name: url.clone(),
                url,
            }]));
            let handlers = self.handlers.clone();
            self.main.add_urgent_call("UpdateChannels", move || {
                handlers.dispatch("UpdateChannels");
            });
        } else {
            self.select(SelectionEvent::StaticTabs(Vec::new()));
        }

        let download = Dialog::binary_choice(
            "Download",
            "Download the latest episode now?",
            Button::DOWNLOAD,
            Button::NOT_NOW,
        );
        let downloaded = self.hub.await_response(&download)? == Some(Button::DOWNLOAD);
        self.select(SelectionEvent::Items(vec![ItemInfo {
            id: 1,
            title: "Latest episode".into(),
            downloaded,
        }]));

        let quit = Dialog::binary_choice("Quit", "Quit tvshell?", Button::QUIT, Button::CANCEL);
        let hub = self.hub.clone();
        hub.submit_with(&quit, move |dialog| {
            if wants_another_round(dialog.choice()) {
                if let Err(error) = self.spawn() {
                    warn!(%error, "Could not restart session");
                }
            } else {
                self.handlers.dispatch("Quit");
            }
        })
    }

    fn select(&self, event: SelectionEvent) {
        if self.selection_tx.send(event).is_err() {
            warn!("Application stopped, dropping selection event");
        }
    }
}

/// Only an explicit Cancel on the quit prompt starts over; closing it, or
/// running out of input, quits.
fn wants_another_round(choice: Option<Button>) -> bool {
    choice == Some(Button::CANCEL)
}
