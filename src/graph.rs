//! The link graph: every bound list of the browser plus the parent → dependent
//! edges between them. Lists live in an arena and refer to each other by
//! [`ViewId`], so a parent never owns its dependent and a selection can
//! requery the dependent without shared mutable pointers.

use std::rc::Rc;

use log::{debug, warn};

use crate::db::RecordSource;
use crate::models::{SelectOutcome, ViewId};
use crate::view::{BoundListView, ViewBinding, ViewError};

pub struct LinkGraph {
    source: Rc<dyn RecordSource>,
    views: Vec<BoundListView>,
}

impl LinkGraph {
    /// Every list added later shares `source`.
    pub fn new(source: Rc<dyn RecordSource>) -> Self {
        Self {
            source,
            views: Vec::new(),
        }
    }

    pub fn add_view(&mut self, binding: &ViewBinding<'_>) -> Result<ViewId, ViewError> {
        let view = BoundListView::new(binding)?;
        self.views.push(view);
        Ok(ViewId(self.views.len() - 1))
    }

    pub fn view(&self, id: ViewId) -> Result<&BoundListView, ViewError> {
        self.views.get(id.0).ok_or(ViewError::UnknownView(id))
    }

    fn view_mut(&mut self, id: ViewId) -> Result<&mut BoundListView, ViewError> {
        self.views.get_mut(id.0).ok_or(ViewError::UnknownView(id))
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ViewId> + '_ {
        (0..self.views.len()).map(ViewId)
    }

    /// Lists nothing links into. These are the ones the shell requeries at
    /// startup.
    pub fn roots(&self) -> Vec<ViewId> {
        self.ids()
            .filter(|id| self.views[id.0].link_field().is_none())
            .collect()
    }

    /// Make `child` the dependent of `parent`, filtered on `link_field`.
    ///
    /// Wiring errors are reported here rather than on the first selection: a
    /// parent that already feeds a list, a child that already has a parent, a
    /// bad field name, or an edge that would close a loop.
    pub fn link(
        &mut self,
        parent: ViewId,
        child: ViewId,
        link_field: &str,
    ) -> Result<(), ViewError> {
        let parent_view = self.view(parent)?;
        let child_view = self.view(child)?;

        if parent == child {
            return Err(ViewError::misconfigured(
                parent_view.title(),
                "cannot be linked to itself",
            ));
        }
        if let Some(existing) = parent_view.dependent() {
            return Err(ViewError::misconfigured(
                parent_view.title(),
                format!("already feeds the {} list", self.view(existing)?.title()),
            ));
        }
        if let Some(field) = child_view.link_field() {
            return Err(ViewError::misconfigured(
                child_view.title(),
                format!("already linked upstream on `{field}`"),
            ));
        }
        if self.reaches(child, parent) {
            return Err(ViewError::misconfigured(
                parent_view.title(),
                format!("linking to {} would create a cycle", child_view.title()),
            ));
        }

        self.view_mut(child)?.set_link_field(link_field)?;
        self.view_mut(parent)?.set_dependent(child);
        debug!("linked {parent} -> {child} on `{link_field}`");
        Ok(())
    }

    /// Follow dependents from `from` and report whether `target` shows up.
    fn reaches(&self, from: ViewId, target: ViewId) -> bool {
        let mut cursor = Some(from);
        for _ in 0..=self.views.len() {
            match cursor {
                Some(id) if id == target => return true,
                Some(id) => cursor = self.views.get(id.0).and_then(BoundListView::dependent),
                None => return false,
            }
        }
        false
    }

    /// Reload `id` for `filter` and clear its direct dependent.
    ///
    /// Only one level is cleared. Lists further down keep their rows until
    /// their own parent requeries; they are unreachable in the meantime
    /// because nothing above them is selected.
    pub fn requery(&mut self, id: ViewId, filter: Option<i64>) -> Result<(), ViewError> {
        let source = Rc::clone(&self.source);
        let view = self.view_mut(id)?;
        view.populate(source.as_ref(), filter)?;
        debug!(
            "requeried {} list with filter {:?}: {} rows",
            view.title(),
            filter,
            view.items().len()
        );

        if let Some(dependent) = view.dependent() {
            self.view_mut(dependent)?.clear();
        }
        Ok(())
    }

    /// Startup call: populate every root list.
    pub fn requery_roots(&mut self) -> Result<(), ViewError> {
        for id in self.roots() {
            self.requery(id, None)?;
        }
        Ok(())
    }

    /// Handle a selection change on `id`: resolve the row id behind
    /// `index` and requery the dependent with it.
    pub fn on_select(&mut self, id: ViewId, index: usize) -> Result<SelectOutcome, ViewError> {
        let source = Rc::clone(&self.source);
        let view = self.view_mut(id)?;
        if !view.select(index) {
            return Ok(SelectOutcome::NoSelection);
        }
        let Some(dependent) = view.dependent() else {
            return Ok(SelectOutcome::NoDependent);
        };

        match view.resolve(source.as_ref(), index)? {
            Some(row_id) => {
                self.requery(dependent, Some(row_id))?;
                Ok(SelectOutcome::Cascaded { dependent, row_id })
            }
            None => {
                warn!(
                    "no row in {} matches {:?} under filter {:?}; leaving dependent unchanged",
                    view.table(),
                    view.items()[index].display,
                    view.current_filter()
                );
                Ok(SelectOutcome::Unresolved)
            }
        }
    }
}
