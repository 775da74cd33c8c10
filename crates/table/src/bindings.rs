//! Trigger anchors and the operations bound to them.

use std::path::PathBuf;

use indexmap::IndexMap;

/// Optional trigger elements a host view may provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Text input feeding the row filter.
    SearchInput,
    /// Button that writes the CSV export.
    ExportButton,
    /// Selector holding the page size.
    EntriesPerPage,
}

impl Anchor {
    pub const ALL: [Anchor; 3] = [Anchor::SearchInput, Anchor::ExportButton, Anchor::EntriesPerPage];

    /// The operation this anchor drives once bound.
    pub fn operation(self) -> Operation {
        match self {
            Anchor::SearchInput => Operation::Filter,
            Anchor::ExportButton => Operation::Export,
            Anchor::EntriesPerPage => Operation::SetEntriesPerPage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Filter,
    Export,
    SetEntriesPerPage,
}

/// An event raised by an anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    /// The input's full current value after a keystroke.
    Input(String),
    Click,
    /// The selector's new raw value.
    Change(String),
}

/// What a dispatched event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Filtered { visible: usize },
    Exported(PathBuf),
    EntriesPerPageChanged(usize),
    /// Nothing was bound, the event did not fit the operation, or there was
    /// no table to act on.
    Ignored,
}

/// One operation per anchor. Binding an anchor twice replaces the first
/// binding, so repeated initialization never stacks handlers.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    bound: IndexMap<Anchor, Operation>,
}

impl Bindings {
    /// Rebinds from scratch: anchors no longer present lose their binding.
    pub fn rebind(&mut self, anchors: &[Anchor]) {
        self.bound.clear();
        for anchor in anchors {
            self.bound.insert(*anchor, anchor.operation());
        }
    }

    pub fn operation(&self, anchor: Anchor) -> Option<Operation> {
        self.bound.get(&anchor).copied()
    }

    pub fn is_bound(&self, anchor: Anchor) -> bool {
        self.bound.contains_key(&anchor)
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}
