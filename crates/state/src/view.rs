//! Per-view fetch state.

use taskbase_client::ApiError;

/// The lifecycle of one view's fetched data.
///
/// Loading and failure both retain the previously displayed value, so a
/// view never flashes empty while a refresh is in flight and never loses
/// data to a transient backend error.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewData<T> {
    /// Nothing requested yet
    Empty,

    /// A fetch is in flight; the prior value stays visible
    Loading(Option<T>),

    /// The latest fetch succeeded
    Ready(T),

    /// The latest fetch failed; the prior value stays visible
    Failed {
        /// Dismissable message for the affected view
        message: String,
        /// Last successfully fetched value
        prev: Option<T>,
    },
}

impl<T> Default for ViewData<T> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<T> ViewData<T> {
    /// The value the view should render, regardless of fetch state.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Empty => None,
            Self::Loading(prev) => prev.as_ref(),
            Self::Ready(value) => Some(value),
            Self::Failed { prev, .. } => prev.as_ref(),
        }
    }

    /// The current error message, if the last fetch failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }

    /// Mark a fetch as started, carrying the current value along.
    pub fn begin(&mut self) {
        let prev = std::mem::take(self).into_value();
        *self = Self::Loading(prev);
    }

    /// Apply a finished fetch.
    pub fn resolve(&mut self, result: Result<T, ApiError>) {
        match result {
            Ok(value) => *self = Self::Ready(value),
            Err(err) => {
                let prev = std::mem::take(self).into_value();
                *self = Self::Failed {
                    message: err.to_string(),
                    prev,
                };
            }
        }
    }

    /// Drop the error message, keeping whatever data survived it.
    pub fn dismiss_error(&mut self) {
        if let Self::Failed { .. } = self {
            *self = match std::mem::take(self).into_value() {
                Some(value) => Self::Ready(value),
                None => Self::Empty,
            };
        }
    }

    /// Replace the value in place without a fetch, e.g. after a local
    /// removal. Empty slices stay empty.
    pub fn map_value(&mut self, f: impl FnOnce(&mut T)) {
        match self {
            Self::Loading(Some(value)) | Self::Ready(value) => f(value),
            Self::Failed {
                prev: Some(value), ..
            } => f(value),
            _ => {}
        }
    }

    fn into_value(self) -> Option<T> {
        match self {
            Self::Empty => None,
            Self::Loading(prev) => prev,
            Self::Ready(value) => Some(value),
            Self::Failed { prev, .. } => prev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed_fetch() -> Result<i64, ApiError> {
        Err(ApiError::Status {
            status: 500,
            detail: "boom".into(),
        })
    }

    #[test]
    fn failure_retains_prior_data() {
        let mut view = ViewData::Ready(7);
        view.begin();
        assert_eq!(view.value(), Some(&7));

        view.resolve(failed_fetch());
        assert_eq!(view.value(), Some(&7));
        assert!(view.error().is_some());
    }

    #[test]
    fn dismissing_an_error_restores_ready() {
        let mut view = ViewData::Ready(7);
        view.begin();
        view.resolve(failed_fetch());
        view.dismiss_error();
        assert_eq!(view, ViewData::Ready(7));

        let mut empty: ViewData<i64> = ViewData::Empty;
        empty.begin();
        empty.resolve(failed_fetch());
        empty.dismiss_error();
        assert_eq!(empty, ViewData::Empty);
    }

    #[test]
    fn resolve_overwrites_with_fresh_data() {
        let mut view = ViewData::Ready(7);
        view.begin();
        view.resolve(Ok(9));
        assert_eq!(view, ViewData::Ready(9));
    }
}
