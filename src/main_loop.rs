//! Main execution context.
//!
//! Work that must happen on the UI side (dialog continuations, menu action
//! handlers) is funneled through a single queue and executed serially by
//! whoever drives the [`MainLoop`]. Calls run in the order they were
//! scheduled. A call scheduled from inside another call is queued behind it,
//! so nothing ever runs re-entrantly.

use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

type Callback = Box<dyn FnOnce() + Send + 'static>;

/// A labelled unit of work waiting for the main context.
pub struct ScheduledCall {
    label: String,
    callback: Callback,
}

impl ScheduledCall {
    pub fn run(self) {
        debug!(label = %self.label, "Running scheduled call");
        (self.callback)();
    }
}

/// Cloneable, thread-safe handle used to schedule work on the main context.
#[derive(Clone)]
pub struct MainHandle {
    tx: UnboundedSender<ScheduledCall>,
}

impl MainHandle {
    /// Queue `callback` to run on the main context.
    ///
    /// Returns `false` when the loop has already been dropped; the callback
    /// is discarded in that case.
    pub fn add_urgent_call(
        &self,
        label: impl Into<String>,
        callback: impl FnOnce() + Send + 'static,
    ) -> bool {
        let call = ScheduledCall {
            label: label.into(),
            callback: Box::new(callback),
        };
        match self.tx.send(call) {
            Ok(()) => true,
            Err(mpsc::error::SendError(call)) => {
                warn!(label = %call.label, "Main loop is gone, dropping scheduled call");
                false
            }
        }
    }
}

/// Receiving end of the main-context queue.
///
/// Once the loop starts waiting for calls it no longer keeps the queue open
/// by itself: it stops when every [`MainHandle`] has been dropped.
pub struct MainLoop {
    // Released on the first wait.
    tx: Option<UnboundedSender<ScheduledCall>>,
    weak_tx: WeakUnboundedSender<ScheduledCall>,
    rx: UnboundedReceiver<ScheduledCall>,
}

impl Default for MainLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl MainLoop {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            weak_tx: tx.downgrade(),
            tx: Some(tx),
            rx,
        }
    }

    pub fn handle(&self) -> MainHandle {
        let tx = match &self.tx {
            Some(tx) => tx.clone(),
            None => self.weak_tx.upgrade().unwrap_or_else(|| {
                // Every handle is gone and the queue is closed for good.
                mpsc::unbounded_channel().0
            }),
        };
        MainHandle { tx }
    }

    /// Run every call that is queued right now, plus anything those calls
    /// schedule in turn. Returns the number of calls executed.
    pub fn run_pending(&mut self) -> usize {
        let mut count = 0;
        while let Ok(call) = self.rx.try_recv() {
            call.run();
            count += 1;
        }
        count
    }

    /// Wait for the next scheduled call.
    ///
    /// Returns `None` once every [`MainHandle`] has been dropped and the
    /// queue is empty.
    pub async fn next_call(&mut self) -> Option<ScheduledCall> {
        self.tx = None;
        self.rx.recv().await
    }

    /// Drive the queue until `shutdown` is cancelled or every handle is
    /// dropped.
    ///
    /// Calls already queued when shutdown is requested are still executed so
    /// that pending continuations are not silently lost.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                call = self.next_call() => match call {
                    Some(call) => call.run(),
                    None => break,
                },
            }
        }
        let drained = self.run_pending();
        debug!(drained, "Main loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_calls_run_in_order() {
        let mut main_loop = MainLoop::new();
        let handle = main_loop.handle();
        let log = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let log = log.clone();
            handle.add_urgent_call(format!("call {i}"), move || log.lock().unwrap().push(i));
        }

        assert_eq!(main_loop.run_pending(), 3);
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_nested_call_runs_after_current() {
        let mut main_loop = MainLoop::new();
        let handle = main_loop.handle();
        let log = Arc::new(Mutex::new(Vec::new()));

        let inner_log = log.clone();
        let inner_handle = handle.clone();
        handle.add_urgent_call("outer", move || {
            let nested_log = inner_log.clone();
            inner_handle.add_urgent_call("nested", move || {
                nested_log.lock().unwrap().push("nested");
            });
            inner_log.lock().unwrap().push("outer");
        });

        assert_eq!(main_loop.run_pending(), 2);
        assert_eq!(*log.lock().unwrap(), vec!["outer", "nested"]);
    }

    #[test]
    fn test_schedule_after_drop_fails() {
        let main_loop = MainLoop::new();
        let handle = main_loop.handle();
        drop(main_loop);
        assert!(!handle.add_urgent_call("late", || {}));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let mut main_loop = MainLoop::new();
        let handle = main_loop.handle();
        let shutdown = CancellationToken::new();
        let ran = Arc::new(Mutex::new(false));

        let flag = ran.clone();
        let token = shutdown.clone();
        handle.add_urgent_call("quit", move || {
            *flag.lock().unwrap() = true;
            token.cancel();
        });

        main_loop.run(shutdown).await;
        assert!(*ran.lock().unwrap());
    }

    #[tokio::test]
    async fn test_run_stops_when_handles_dropped() {
        let mut main_loop = MainLoop::new();
        let handle = main_loop.handle();
        let ran = Arc::new(Mutex::new(false));

        let flag = ran.clone();
        handle.add_urgent_call("last", move || *flag.lock().unwrap() = true);
        drop(handle);

        tokio::time::timeout(Duration::from_secs(2), main_loop.run(CancellationToken::new()))
            .await
            .expect("run should return once every handle is dropped");
        assert!(*ran.lock().unwrap());
    }

    #[tokio::test]
    async fn test_handle_after_wait_shares_queue() {
        let mut main_loop = MainLoop::new();
        let first = main_loop.handle();
        first.add_urgent_call("first", || {});
        assert!(main_loop.next_call().await.is_some());

        let second = main_loop.handle();
        drop(first);
        assert!(second.add_urgent_call("second", || {}));
        assert!(main_loop.next_call().await.is_some());

        drop(second);
        assert!(main_loop.next_call().await.is_none());
    }
}
