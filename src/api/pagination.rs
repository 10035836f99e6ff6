//! Offset/limit pagination over a forward-only iterator
//!
//! The store only offers a forward-only key iterator, so `offset` is applied
//! by skipping and `limit` by stopping early. Each surviving key is resolved
//! lazily through a fetch function. Faults are never skipped: the first one
//! is yielded and the cursor is exhausted afterwards.

use std::collections::HashMap;

use crate::constants::{PARAM_LIMIT, PARAM_OFFSET};
use crate::types::{ApiError, GraphError, Result};

/// Requested slice of a list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationWindow {
    /// Number of leading items to skip; unset skips nothing
    pub offset: Option<usize>,
    /// Maximum number of items to return; unset is unbounded
    pub limit: Option<usize>,
}

impl PaginationWindow {
    /// Window with both bounds set
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset: Some(offset), limit: Some(limit) }
    }

    /// Read `offset` and `limit` from query parameters
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self> {
        Ok(Self {
            offset: non_negative_param(params, PARAM_OFFSET)?,
            limit: non_negative_param(params, PARAM_LIMIT)?,
        })
    }
}

fn non_negative_param(params: &HashMap<String, String>, name: &str) -> Result<Option<usize>> {
    params
        .get(name)
        .map(|raw| {
            raw.trim().parse::<usize>().map_err(|_| {
                ApiError::invalid_request(format!(
                    "Parameter {} should be a positive integer number",
                    name
                ))
            })
        })
        .transpose()
}

/// Lazy page of fetched records
pub struct PageCursor<I, F> {
    iter: I,
    fetch: F,
    remaining: Option<usize>,
    done: bool,
}

impl<I, F, R, T> PageCursor<I, F>
where
    I: Iterator<Item = std::result::Result<R, GraphError>>,
    F: FnMut(R) -> Result<T>,
{
    /// Skip `window.offset` items and prepare to yield up to `window.limit`.
    ///
    /// Fails with `OffsetOutOfRange` if the iterator ends while skipping.
    pub fn open(mut iter: I, fetch: F, window: PaginationWindow) -> Result<Self> {
        let offset = window.offset.unwrap_or(0);

        for skipped in 0..offset {
            match iter.next() {
                None => return Err(ApiError::OffsetOutOfRange { offset, available: skipped }),
                Some(Err(err)) => return Err(ApiError::FetchFailure(err)),
                Some(Ok(_)) => {}
            }
        }

        Ok(Self {
            iter,
            fetch,
            remaining: window.limit,
            done: false,
        })
    }
}

impl<I, F, R, T> Iterator for PageCursor<I, F>
where
    I: Iterator<Item = std::result::Result<R, GraphError>>,
    F: FnMut(R) -> Result<T>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.remaining == Some(0) {
            return None;
        }

        let item = match self.iter.next()? {
            Ok(reference) => (self.fetch)(reference),
            Err(err) => Err(ApiError::FetchFailure(err)),
        };

        if item.is_err() {
            self.done = true;
        }
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }

        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn keys(n: usize) -> impl Iterator<Item = std::result::Result<usize, GraphError>> {
        (0..n).map(Ok)
    }

    fn identity(k: usize) -> Result<usize> {
        Ok(k)
    }

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_window_from_query() {
        assert_eq!(PaginationWindow::from_query(&query(&[])).unwrap(), PaginationWindow::default());
        assert_eq!(
            PaginationWindow::from_query(&query(&[("limit", "2"), ("offset", "1")])).unwrap(),
            PaginationWindow::new(1, 2)
        );
        assert_eq!(
            PaginationWindow::from_query(&query(&[("limit", "0")])).unwrap(),
            PaginationWindow { offset: None, limit: Some(0) }
        );
    }

    #[test]
    fn test_window_rejects_bad_numbers() {
        for bad in ["-1", "abc", "1.5", ""] {
            let err = PaginationWindow::from_query(&query(&[("offset", bad)])).unwrap_err();
            assert_eq!(
                err,
                ApiError::invalid_request("Parameter offset should be a positive integer number")
            );
        }
    }

    #[test]
    fn test_offset_past_end_fails() {
        let err = PageCursor::open(keys(3), identity, PaginationWindow::new(4, 1)).err().unwrap();
        assert_eq!(err, ApiError::OffsetOutOfRange { offset: 4, available: 3 });
    }

    #[test]
    fn test_offset_equal_to_population_yields_nothing() {
        let cursor = PageCursor::open(keys(3), identity, PaginationWindow::new(3, 5)).unwrap();
        let rows: Vec<_> = cursor.collect();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_iterator_fault_during_skip() {
        let iter = vec![Ok(1), Err(GraphError::Storage("broken".into())), Ok(3)].into_iter();
        let err = PageCursor::open(iter, identity, PaginationWindow::new(2, 1)).err().unwrap();
        assert_eq!(err, ApiError::FetchFailure(GraphError::Storage("broken".into())));
    }

    #[test]
    fn test_fault_is_yielded_once_then_cursor_stops() {
        let iter = vec![Ok(1), Err(GraphError::Storage("broken".into())), Ok(3)].into_iter();
        let mut cursor = PageCursor::open(iter, identity, PaginationWindow::default()).unwrap();

        assert_eq!(cursor.next(), Some(Ok(1)));
        assert!(matches!(cursor.next(), Some(Err(ApiError::FetchFailure(_)))));
        assert_eq!(cursor.next(), None);
    }

    #[test]
    fn test_fetch_failure_stops_cursor() {
        let fetch = |k: usize| {
            if k == 1 {
                Err(ApiError::FetchFailure(GraphError::Storage("gone".into())))
            } else {
                Ok(k * 10)
            }
        };
        let cursor = PageCursor::open(keys(5), fetch, PaginationWindow::default()).unwrap();
        let rows: Vec<_> = cursor.collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], Ok(0));
        assert!(rows[1].is_err());
    }

    #[test]
    fn test_limit_stops_before_pulling_more_keys() {
        let mut pulled = 0;
        let iter = (0..10).map(|k| {
            pulled += 1;
            Ok(k)
        });
        let rows: Vec<_> = PageCursor::open(iter, identity, PaginationWindow::new(1, 2))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(rows, vec![1, 2]);
        assert_eq!(pulled, 3);
    }

    proptest! {
        #[test]
        fn prop_skip_then_cap(
            population in 0usize..50,
            offset in 0usize..60,
            limit in proptest::option::of(0usize..60),
        ) {
            let window = PaginationWindow { offset: Some(offset), limit };
            let result = PageCursor::open(keys(population), identity, window);

            if offset > population {
                let expected = ApiError::OffsetOutOfRange { offset, available: population };
                prop_assert_eq!(result.err(), Some(expected));
            } else {
                let rows: Vec<usize> = result.unwrap().collect::<Result<_>>().unwrap();
                let remaining = population - offset;
                let expected_len = limit.map_or(remaining, |l| l.min(remaining));
                prop_assert_eq!(rows.len(), expected_len);
                prop_assert_eq!(rows, (offset..offset + expected_len).collect::<Vec<_>>());
            }
        }
    }
}
