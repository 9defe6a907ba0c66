use std::mem;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::query::WidthQuery;

type MatchCallback = Box<dyn FnMut(bool) + Send>;

struct Watcher {
    queries: SmallVec<[WidthQuery; 2]>,
    matched: bool,
    callback: MatchCallback,
}

struct ViewportState {
    width: f64,
    next_id: u64,
    watchers: Vec<(u64, Watcher)>,
    // Ids of handles dropped while their watcher was detached for
    // notification; reconciled when the watchers are merged back.
    removed: Vec<u64>,
}

/// Tracks the current viewport width and notifies size watchers when their
/// match state changes.
///
/// The host feeds width updates in via [`set_width`](Viewport::set_width);
/// this crate does not integrate with any real window. Callbacks run on the
/// thread calling `set_width`, outside the viewport lock, so they may call
/// back into the viewport (register further watches, query the width, drop
/// their own handle).
pub struct Viewport {
    state: Arc<Mutex<ViewportState>>,
}

impl Viewport {
    pub fn new(width: f64) -> Self {
        Self {
            state: Arc::new(Mutex::new(ViewportState {
                width,
                next_id: 0,
                watchers: Vec::new(),
                removed: Vec::new(),
            })),
        }
    }

    pub fn width(&self) -> f64 {
        self.state.lock().width
    }

    /// Whether any of the queries matches the current width.
    pub fn is_matched(&self, queries: &[WidthQuery]) -> bool {
        let width = self.state.lock().width;
        queries.iter().any(|query| query.matches(width))
    }

    /// Subscribes to match-state changes for an OR-combined query set.
    ///
    /// The callback is invoked once with the current state when the watch is
    /// registered, and afterwards only when the state actually flips.
    /// Dropping the returned handle unsubscribes.
    pub fn watch(
        &self,
        queries: impl IntoIterator<Item = WidthQuery>,
        mut callback: impl FnMut(bool) + Send + 'static,
    ) -> WatchHandle {
        let queries: SmallVec<[WidthQuery; 2]> = queries.into_iter().collect();
        let matched = self.is_matched(&queries);
        callback(matched);

        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.watchers.push((
            id,
            Watcher {
                queries,
                matched,
                callback: Box::new(callback),
            },
        ));
        WatchHandle {
            state: Arc::downgrade(&self.state),
            id,
        }
    }

    /// Updates the width and notifies every watcher whose match state
    /// flipped.
    pub fn set_width(&self, width: f64) {
        // Detach the watchers so callbacks run without holding the lock.
        let mut notifying = {
            let mut state = self.state.lock();
            state.width = width;
            mem::take(&mut state.watchers)
        };

        for (_, watcher) in &mut notifying {
            let matched = watcher.queries.iter().any(|query| query.matches(width));
            if matched != watcher.matched {
                watcher.matched = matched;
                (watcher.callback)(matched);
            }
        }

        let mut state = self.state.lock();
        // Watches registered by a callback landed in the fresh list; keep
        // registration order by merging them after the notified ones, and
        // honor any handle dropped while its watcher was detached.
        let added = mem::replace(&mut state.watchers, notifying);
        state.watchers.extend(added);
        if !state.removed.is_empty() {
            let removed = mem::take(&mut state.removed);
            state.watchers.retain(|(id, _)| !removed.contains(id));
        }
    }
}

/// Keeps a [`Viewport::watch`] subscription alive; unsubscribes on drop.
pub struct WatchHandle {
    state: Weak<Mutex<ViewportState>>,
    id: u64,
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            let mut state = state.lock();
            let before = state.watchers.len();
            state.watchers.retain(|(id, _)| *id != self.id);
            if state.watchers.len() == before {
                state.removed.push(self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::{Viewport, WatchHandle};
    use crate::breakpoints::Breakpoints;
    use crate::responsive::{Breakpoint, SizeResolver};

    #[test]
    fn is_matched_ors_the_queries() {
        let resolver = SizeResolver::new(&Breakpoints::default());
        let viewport = Viewport::new(700.0);

        assert!(viewport.is_matched(&[resolver.query(Breakpoint::Sm)]));
        assert!(!viewport.is_matched(&[resolver.query(Breakpoint::Md)]));
        assert!(viewport.is_matched(&[
            resolver.query(Breakpoint::Md),
            resolver.query(Breakpoint::Sm),
        ]));
        assert!(!viewport.is_matched(&[]));
    }

    #[test]
    fn watch_reports_initial_state_then_changes_only() {
        let resolver = SizeResolver::new(&Breakpoints::default());
        let viewport = Viewport::new(700.0);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let _handle = viewport.watch([resolver.query(Breakpoint::Sm)], move |matched| {
            sink.lock().push(matched);
        });
        assert_eq!(*seen.lock(), [true]);

        // Still inside sm; no notification.
        viewport.set_width(800.0);
        assert_eq!(*seen.lock(), [true]);

        viewport.set_width(1000.0);
        assert_eq!(*seen.lock(), [true, false]);

        viewport.set_width(650.0);
        assert_eq!(*seen.lock(), [true, false, true]);
    }

    #[test]
    fn dropping_the_handle_unsubscribes() {
        let resolver = SizeResolver::new(&Breakpoints::default());
        let viewport = Viewport::new(700.0);
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let handle = viewport.watch([resolver.query(Breakpoint::Sm)], move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        drop(handle);
        viewport.set_width(2000.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callbacks_may_call_back_into_the_viewport() {
        let resolver = SizeResolver::new(&Breakpoints::default());
        let viewport = Arc::new(Viewport::new(700.0));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let inner = Arc::clone(&viewport);
        let _handle = viewport.watch([resolver.query(Breakpoint::Sm)], move |matched| {
            sink.lock().push((matched, inner.width()));
        });

        viewport.set_width(1000.0);
        assert_eq!(*seen.lock(), [(true, 700.0), (false, 1000.0)]);
    }

    #[test]
    fn unsubscribing_from_inside_a_callback_is_safe() {
        let resolver = SizeResolver::new(&Breakpoints::default());
        let viewport = Viewport::new(700.0);
        let calls = Arc::new(AtomicUsize::new(0));
        let handle_slot: Arc<Mutex<Option<WatchHandle>>> = Arc::new(Mutex::new(None));

        let counter = Arc::clone(&calls);
        let slot = Arc::clone(&handle_slot);
        let handle = viewport.watch([resolver.query(Breakpoint::Sm)], move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            // Drops the handle on the first change notification.
            *slot.lock() = None;
        });
        *handle_slot.lock() = Some(handle);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        viewport.set_width(1000.0);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // The watcher unsubscribed itself; flipping back stays silent.
        viewport.set_width(700.0);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
