use std::cmp::Ordering;

use crate::core::{
    utils::FoldForSearch,
    Entity,
    SortValue,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortState<F> {
    pub field: Option<F>,
    pub direction: SortDirection,
}

impl<F: Copy + PartialEq> SortState<F> {
    pub fn new(field: Option<F>, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn by(field: F, direction: SortDirection) -> Self {
        Self::new(Some(field), direction)
    }

    pub fn unsorted() -> Self {
        Self::new(None, SortDirection::Ascending)
    }

    /// Column header click: same field flips direction, a new field starts ascending.
    pub fn toggle_or_set(&mut self, field: F) {
        match self.field {
            Some(current) if current == field => {
                self.direction = self.direction.reversed();
            }
            _ => {
                self.field = Some(field);
                self.direction = SortDirection::Ascending;
            }
        }
    }
}

impl<F: Copy + PartialEq> Default for SortState<F> {
    fn default() -> Self {
        Self::unsorted()
    }
}

/// Text compares case and accent insensitively. Missing dates and numbers
/// order before present ones. Mixed kinds compare equal.
pub fn compare_values(left: &SortValue<'_>, right: &SortValue<'_>) -> Ordering {
    match (left, right) {
        (SortValue::Text(l), SortValue::Text(r)) => l.fold_for_search().cmp(&r.fold_for_search()),
        (SortValue::Date(l), SortValue::Date(r)) => l.cmp(r),
        (SortValue::Number(l), SortValue::Number(r)) => l.cmp(r),
        _ => Ordering::Equal,
    }
}

/// Stable: equal keys keep their relative input order in both directions.
pub fn sort_indices<E: Entity>(
    indices: &mut [usize],
    items: &[E],
    field: E::SortField,
    direction: SortDirection,
) {
    indices.sort_by(|&lhs, &rhs| {
        let ordering = compare_values(&items[lhs].sort_value(field), &items[rhs].sort_value(field));

        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}
