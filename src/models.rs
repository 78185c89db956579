//! Plain data passed between the record source, the bound lists and the
//! terminal shell. These types carry no behaviour beyond formatting so the
//! query layer and the rendering layer can share them freely.

use std::fmt;

use rusqlite::types::Value;

/// Handle to a list inside a [`LinkGraph`](crate::graph::LinkGraph). It is only
/// meaningful for the graph that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub(crate) usize);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One visible row of a bound list: the text the user sees plus the primary
/// key it came from. Two entries may share a display value; the row id is what
/// tells them apart. `value` keeps the stored display column for lookups.
pub struct ListEntry {
    pub display: String,
    pub value: Value,
    pub row_id: i64,
}

impl ListEntry {
    pub fn new(display: impl Into<String>, row_id: i64) -> Self {
        let display = display.into();
        Self {
            value: Value::Text(display.clone()),
            display,
            row_id,
        }
    }
}

impl fmt::Display for ListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

/// What a selection event did. Returned by
/// [`LinkGraph::on_select`](crate::graph::LinkGraph::on_select) so callers and
/// tests can tell a cascade apart from the quiet no-op cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The index was outside the list; nothing changed.
    NoSelection,
    /// The selection moved but the list feeds nothing.
    NoDependent,
    /// The lookup found no row for the selected value; the dependent was left
    /// as it was.
    Unresolved,
    /// The dependent was requeried with the resolved row id.
    Cascaded { dependent: ViewId, row_id: i64 },
}
