use super::{
    filter::{
        SearchFilter,
        StatusFilter,
    },
    sort::{
        sort_indices,
        SortDirection,
        SortState,
    },
};
use crate::core::Entity;

/// Search box, column sort and status dropdown of a list page.
pub struct ViewQuery<E: Entity> {
    pub search: String,
    pub sort: SortState<E::SortField>,
    pub status: StatusFilter<E::Status>,
}

impl<E: Entity> Default for ViewQuery<E> {
    fn default() -> Self {
        Self { search: String::new(), sort: SortState::unsorted(), status: StatusFilter::All }
    }
}

impl<E: Entity> Clone for ViewQuery<E> {
    fn clone(&self) -> Self {
        Self { search: self.search.clone(), sort: self.sort, status: self.status.clone() }
    }
}

impl<E: Entity> ViewQuery<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn sorted_by(mut self, field: E::SortField, direction: SortDirection) -> Self {
        self.sort = SortState::by(field, direction);
        self
    }

    pub fn with_status(mut self, status: E::Status) -> Self {
        self.status = StatusFilter::Only(status);
        self
    }
}

/// Filtered and sorted projection of `items`. Never mutates the collection.
pub fn derive_view<'a, E: Entity>(items: &'a [E], query: &ViewQuery<E>) -> Vec<&'a E> {
    let search = SearchFilter::new(&query.search);

    let mut indices: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| query.status.accepts(&item.status()))
        .filter(|(_, item)| search.matches(&item.search_fields()))
        .map(|(index, _)| index)
        .collect();

    if let Some(field) = query.sort.field {
        sort_indices(&mut indices, items, field, query.sort.direction);
    }

    indices.into_iter().map(|index| &items[index]).collect()
}
