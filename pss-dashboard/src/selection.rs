//! Selection state controller.
//!
//! The map, the watershed dropdown, the species filter and the charts all
//! read the same `SelectionState`. Writes go through [`SelectionController`]
//! only; observers hold a `watch::Receiver` and see every write as soon as
//! the setter returns.

use log::debug;
use pss_core::selection::{Filter, SelectionState};
use tokio::sync::watch;

pub struct SelectionController {
    tx: watch::Sender<SelectionState>,
}

impl SelectionController {
    pub fn new(initial: SelectionState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Snapshot of the current selection.
    pub fn current(&self) -> SelectionState {
        self.tx.borrow().clone()
    }

    /// Replace the watershed filter; the species filter is untouched.
    pub fn set_watershed(&self, watershed: impl Into<Filter>) {
        let watershed = watershed.into();
        debug!("[PSS] selection: watershed -> {}", watershed);
        self.tx.send_modify(|state| state.watershed = watershed);
    }

    /// Replace the species filter; the watershed filter is untouched.
    pub fn set_species(&self, species: impl Into<Filter>) {
        let species = species.into();
        debug!("[PSS] selection: species -> {}", species);
        self.tx.send_modify(|state| state.species = species);
    }

    /// Back to all watersheds and all species.
    pub fn reset(&self) {
        self.tx.send_replace(SelectionState::default());
    }

    /// A new observer. `borrow()` on it always yields the latest selection.
    pub fn subscribe(&self) -> watch::Receiver<SelectionState> {
        self.tx.subscribe()
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(SelectionState::default())
    }
}
