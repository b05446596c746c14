use crate::core::utils::FoldForSearch;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter<S> {
    #[default]
    All,
    Only(S),
}

impl<S: PartialEq> StatusFilter<S> {
    pub fn is_active(&self) -> bool {
        matches!(self, StatusFilter::Only(_))
    }

    pub fn accepts(&self, status: &S) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

/// Case and accent insensitive substring match over display fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchFilter {
    needle: String,
}

impl SearchFilter {
    pub(crate) fn new(search: &str) -> Self {
        Self { needle: search.trim().fold_for_search() }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub(crate) fn matches(&self, fields: &[&str]) -> bool {
        self.is_empty() || fields.iter().any(|field| field.fold_for_search().contains(&self.needle))
    }
}
