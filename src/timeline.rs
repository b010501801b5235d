use crate::caption::CaptionEntry;

use std::fmt;

use tracing::trace;

type Listener = Box<dyn FnMut(Option<usize>) + Send>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimelineState {
    Empty,
    Populated,
}

/// Result of feeding one position sample into a [`CaptionTimeline`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Update {
    /// Last entry at or before the sampled position, if any.
    pub index: Option<usize>,
    /// Whether `index` differs from the previously reported value.
    pub changed: bool,
}

/// Cursor over a parsed caption track.
///
/// Every call to [`update`](Self::update) resolves the active line from
/// scratch, so samples may arrive in any order. Listeners only hear about
/// actual changes.
#[derive(Default)]
pub struct CaptionTimeline {
    entries: Vec<CaptionEntry>,
    active: Option<usize>,
    listeners: Vec<Listener>,
}

impl CaptionTimeline {
    /// `entries` must be sorted by timestamp, as the parser returns them.
    pub fn new(entries: Vec<CaptionEntry>) -> Self {
        debug_assert!(is_sorted(&entries));
        Self {
            entries,
            active: None,
            listeners: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[CaptionEntry] {
        &self.entries
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_entry(&self) -> Option<&CaptionEntry> {
        self.active.and_then(|i| self.entries.get(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn state(&self) -> TimelineState {
        if self.entries.is_empty() {
            TimelineState::Empty
        } else {
            TimelineState::Populated
        }
    }

    /// Registers a callback invoked with the new index whenever it changes.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(Option<usize>) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Installs the captions of a new track. The active index is reset
    /// without notifying listeners.
    pub fn replace(&mut self, entries: Vec<CaptionEntry>) {
        debug_assert!(is_sorted(&entries));
        self.entries = entries;
        self.active = None;
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    pub fn update(&mut self, position: f64) -> Update {
        let index = self.resolve(position);
        let changed = index != self.active;
        if changed {
            trace!(position, from = ?self.active, to = ?index, "active caption changed");
            self.active = index;
            for listener in self.listeners.iter_mut() {
                listener(index);
            }
        }
        Update { index, changed }
    }

    /// Index of the last entry with `timestamp <= position`. Relies on
    /// `entries` being sorted, which `new` and `replace` require.
    fn resolve(&self, position: f64) -> Option<usize> {
        if let Some(i) = self.active {
            if self.brackets(i, position) {
                return Some(i);
            }
        }
        let count = self.entries.partition_point(|e| e.timestamp <= position);
        count.checked_sub(1)
    }

    /// True when `i` is still the answer for `position`: it starts at or
    /// before it and the next entry starts strictly after it.
    fn brackets(&self, i: usize, position: f64) -> bool {
        let Some(current) = self.entries.get(i) else {
            return false;
        };
        current.timestamp <= position
            && self
                .entries
                .get(i + 1)
                .map_or(true, |next| next.timestamp > position)
    }
}

impl fmt::Debug for CaptionTimeline {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("CaptionTimeline")
            .field("entries", &self.entries.len())
            .field("active", &self.active)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn is_sorted(entries: &[CaptionEntry]) -> bool {
    entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
}
