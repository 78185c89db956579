//! A list bound to one `(table, display field)` pair. The view owns its rows
//! and knows how to load them and how to map a selected row back to its
//! primary key; wiring views together and cascading selections is the job of
//! [`LinkGraph`](crate::graph::LinkGraph).

use rusqlite::types::Value;
use thiserror::Error;

use crate::db::{RecordSource, SourceError, SourceRow};
use crate::models::{ListEntry, ViewId};
use crate::query::{validate_identifier, ListQuery, QueryError};

/// Primary key column used when a binding does not name one.
pub const DEFAULT_ID_FIELD: &str = "_id";

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    SourceUnavailable(#[from] SourceError),
    #[error("{view} list is misconfigured: {reason}")]
    Misconfigured { view: String, reason: String },
    #[error("{0} does not belong to this graph")]
    UnknownView(ViewId),
}

impl ViewError {
    pub(crate) fn misconfigured(view: &str, reason: impl Into<String>) -> Self {
        Self::Misconfigured {
            view: view.to_string(),
            reason: reason.into(),
        }
    }

    fn binding(view: &str, err: QueryError) -> Self {
        Self::misconfigured(view, err.to_string())
    }
}

/// Static description of a list: where its rows come from and how the shell
/// should label it.
#[derive(Debug, Clone)]
pub struct ViewBinding<'a> {
    pub title: &'a str,
    pub table: &'a str,
    pub display_field: &'a str,
    pub id_field: &'a str,
    pub sort_keys: &'a [&'a str],
    pub placeholder: Option<&'a str>,
}

impl<'a> ViewBinding<'a> {
    pub fn new(table: &'a str, display_field: &'a str) -> Self {
        Self {
            title: table,
            table,
            display_field,
            id_field: DEFAULT_ID_FIELD,
            sort_keys: &[],
            placeholder: None,
        }
    }

    pub fn titled(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn sorted_by(mut self, sort_keys: &'a [&'a str]) -> Self {
        self.sort_keys = sort_keys;
        self
    }

    pub fn with_id_field(mut self, id_field: &'a str) -> Self {
        self.id_field = id_field;
        self
    }

    /// Text the shell shows while the list is empty, e.g. "Choose an artist.".
    pub fn with_placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

#[derive(Debug, Clone)]
pub struct BoundListView {
    title: String,
    placeholder: Option<String>,
    query: ListQuery,
    dependent: Option<ViewId>,
    link_field: Option<String>,
    current_filter: Option<i64>,
    items: Vec<ListEntry>,
    selection: Option<usize>,
}

impl BoundListView {
    pub fn new(binding: &ViewBinding<'_>) -> Result<Self, ViewError> {
        let query = ListQuery::new(
            binding.table,
            binding.display_field,
            binding.id_field,
            binding.sort_keys,
        )
        .map_err(|err| ViewError::binding(binding.title, err))?;

        Ok(Self {
            title: binding.title.to_string(),
            placeholder: binding.placeholder.map(str::to_string),
            query,
            dependent: None,
            link_field: None,
            current_filter: None,
            items: Vec::new(),
            selection: None,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn table(&self) -> &str {
        self.query.table()
    }

    pub fn display_field(&self) -> &str {
        self.query.display_field()
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn dependent(&self) -> Option<ViewId> {
        self.dependent
    }

    pub fn link_field(&self) -> Option<&str> {
        self.link_field.as_deref()
    }

    pub fn current_filter(&self) -> Option<i64> {
        self.current_filter
    }

    pub fn items(&self) -> &[ListEntry] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn selected_entry(&self) -> Option<&ListEntry> {
        self.selection.and_then(|index| self.items.get(index))
    }

    /// Display strings in list order, for shells that only render text.
    pub fn display_values(&self) -> Vec<&str> {
        self.items.iter().map(|entry| entry.display.as_str()).collect()
    }

    pub(crate) fn set_dependent(&mut self, dependent: ViewId) {
        self.dependent = Some(dependent);
    }

    pub(crate) fn set_link_field(&mut self, field: &str) -> Result<(), ViewError> {
        validate_identifier(field, "link field").map_err(|err| ViewError::binding(&self.title, err))?;
        self.link_field = Some(field.to_string());
        Ok(())
    }

    /// Drop rows, selection and filter. Used both for resets and when an
    /// upstream list repopulates and this one goes stale.
    pub fn clear(&mut self) {
        self.items.clear();
        self.selection = None;
        self.current_filter = None;
    }

    /// Run the listing query for `filter` and replace the rows with the result.
    ///
    /// A linked list called without a filter is reset to empty instead of
    /// listing its whole table. On failure the previous rows stay in place.
    pub fn populate(
        &mut self,
        source: &dyn RecordSource,
        filter: Option<i64>,
    ) -> Result<(), ViewError> {
        let rows = match (filter, self.link_field.as_deref()) {
            (Some(value), None) => {
                return Err(ViewError::misconfigured(
                    &self.title,
                    format!("received filter value {value} but has no link field"),
                ))
            }
            (None, Some(_)) => {
                self.clear();
                return Ok(());
            }
            (None, None) => source.execute(&self.query.list_sql(None), &[])?,
            (Some(value), Some(field)) => source.execute(
                &self.query.list_sql(Some(field)),
                &[Value::Integer(value)],
            )?,
        };

        self.items = rows.into_iter().map(ListEntry::from).collect();
        self.current_filter = filter;
        self.selection = None;
        Ok(())
    }

    /// Move the selection. Returns `false` and leaves the view untouched when
    /// `index` is out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.selection = Some(index);
            true
        } else {
            false
        }
    }

    /// Look the selected display value up again to find its row id.
    ///
    /// The lookup is narrowed by the current filter so equal names under
    /// different parents resolve to their own rows. If equal names remain
    /// under one parent, the id cached with the entry picks between them.
    /// `Ok(None)` means the value is no longer in the table.
    pub fn resolve(
        &self,
        source: &dyn RecordSource,
        index: usize,
    ) -> Result<Option<i64>, ViewError> {
        let Some(entry) = self.items.get(index) else {
            return Ok(None);
        };

        let display = entry.value.clone();
        let rows = match (self.link_field.as_deref(), self.current_filter) {
            (Some(field), Some(filter)) => source.execute(
                &self.query.lookup_sql(Some(field)),
                &[display, Value::Integer(filter)],
            )?,
            _ => source.execute(&self.query.lookup_sql(None), &[display])?,
        };

        let resolved = rows
            .iter()
            .find(|row| row.row_id == entry.row_id)
            .or_else(|| rows.first())
            .map(|row| row.row_id);
        Ok(resolved)
    }
}

impl From<SourceRow> for ListEntry {
    fn from(row: SourceRow) -> Self {
        ListEntry {
            display: row.display,
            value: row.value,
            row_id: row.row_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Replays canned rows and records every statement it was asked to run.
    struct ScriptedSource {
        rows: Vec<SourceRow>,
        seen: RefCell<Vec<(String, Vec<Value>)>>,
    }

    impl ScriptedSource {
        fn new(rows: &[(&str, i64)]) -> Self {
            Self {
                rows: rows
                    .iter()
                    .map(|(display, row_id)| SourceRow::text(*display, *row_id))
                    .collect(),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl RecordSource for ScriptedSource {
        fn execute(&self, query: &str, params: &[Value]) -> Result<Vec<SourceRow>, SourceError> {
            self.seen
                .borrow_mut()
                .push((query.to_string(), params.to_vec()));
            Ok(self.rows.clone())
        }
    }

    fn albums() -> BoundListView {
        BoundListView::new(&ViewBinding::new("albums", "albums.name").titled("Albums")).unwrap()
    }

    #[test]
    fn bad_binding_is_rejected_at_construction() {
        let err = BoundListView::new(&ViewBinding::new("albums", "name, _id FROM x --"))
            .expect_err("binding should be rejected");
        assert!(matches!(err, ViewError::Misconfigured { .. }));
    }

    #[test]
    fn filter_without_link_field_is_misconfiguration() {
        let source = ScriptedSource::new(&[("Arrival", 4)]);
        let mut view = albums();
        let err = view.populate(&source, Some(1)).expect_err("must not run");
        assert!(matches!(err, ViewError::Misconfigured { .. }));
        assert!(source.seen.borrow().is_empty());
    }

    #[test]
    fn reset_on_linked_view_runs_no_query() {
        let source = ScriptedSource::new(&[("Arrival", 4)]);
        let mut view = albums();
        view.set_link_field("artist").unwrap();
        view.populate(&source, Some(1)).unwrap();
        assert_eq!(view.display_values(), vec!["Arrival"]);

        view.populate(&source, None).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.current_filter(), None);
        assert_eq!(source.seen.borrow().len(), 1);
    }

    #[test]
    fn populate_binds_filter_and_clears_selection() {
        let source = ScriptedSource::new(&[("Arrival", 4), ("Greatest Hits", 1)]);
        let mut view = albums();
        view.set_link_field("artist").unwrap();
        view.populate(&source, Some(1)).unwrap();
        assert!(view.select(1));

        view.populate(&source, Some(1)).unwrap();
        assert_eq!(view.selection(), None);
        let seen = source.seen.borrow();
        assert_eq!(seen[0].1, vec![Value::Integer(1)]);
        assert!(seen[0].0.contains(r#"WHERE "artist" = ?1"#));
    }

    #[test]
    fn resolve_passes_current_filter_and_prefers_cached_id() {
        let source = ScriptedSource::new(&[("Intro", 7), ("Intro", 9)]);
        let mut view = albums();
        view.set_link_field("artist").unwrap();
        view.populate(&source, Some(2)).unwrap();

        assert_eq!(view.resolve(&source, 1).unwrap(), Some(9));
        let seen = source.seen.borrow();
        let (sql, params) = seen.last().unwrap();
        assert!(sql.contains(r#"AND "artist" = ?2"#));
        assert_eq!(
            params,
            &vec![Value::Text("Intro".into()), Value::Integer(2)]
        );
    }

    #[test]
    fn select_ignores_out_of_range_index() {
        let mut view = albums();
        assert!(!view.select(0));
        assert_eq!(view.selection(), None);
    }
}
