// VecDocs — iterator.rs
// Batched iteration over query and search results.
// Author: d65v <https://github.com/d65v>
//
// Both iterators page through the client with offset + limit, so a
// batch is always the next slice of the result the one-shot call would
// return. Iteration stops at the first short or empty batch, when the
// total cap is reached, or after an error.

use crate::client::{QueryRequest, SearchRequest, VectorClient, MAX_TOP_K};
use crate::data::{Column, ResultSet, SearchResult};
use crate::{Result, VecDocsError};

fn check_batch_size(batch_size: usize) -> Result<()> {
    if batch_size == 0 || batch_size > MAX_TOP_K {
        return Err(VecDocsError::InvalidParameter(format!(
            "batch_size must be between 1 and {}",
            MAX_TOP_K
        )));
    }
    Ok(())
}

/// Where a paged iteration stands.
#[derive(Debug, Clone)]
struct Cursor {
    batch_size: usize,
    offset: usize,
    remaining: Option<usize>,
    done: bool,
}

impl Cursor {
    /// Size of the next page, or `None` when iteration is over.
    fn next_size(&self) -> Option<usize> {
        let size = self.remaining.map_or(self.batch_size, |r| r.min(self.batch_size));
        (!self.done && size > 0).then_some(size)
    }

    fn advance(&mut self, requested: usize, got: usize) {
        self.offset += got;
        if let Some(r) = self.remaining.as_mut() {
            *r = r.saturating_sub(got);
        }
        if got < requested {
            self.done = true;
        }
    }
}

// ── Query ─────────────────────────────────────────────────────────────────────

/// Pages through a query, yielding one `ResultSet` per batch.
pub struct QueryIterator<'a, C: VectorClient> {
    client: &'a C,
    collection: String,
    request: QueryRequest,
    cursor: Cursor,
}

impl<'a, C: VectorClient> QueryIterator<'a, C> {
    pub fn new(client: &'a C, collection: &str, request: QueryRequest, batch_size: usize) -> Result<Self> {
        check_batch_size(batch_size)?;
        let cursor = Cursor {
            batch_size,
            offset: request.offset,
            remaining: request.limit,
            done: false,
        };
        Ok(Self {
            client,
            collection: collection.to_string(),
            request,
            cursor,
        })
    }
}

impl<C: VectorClient> Iterator for QueryIterator<'_, C> {
    type Item = Result<ResultSet>;

    fn next(&mut self) -> Option<Self::Item> {
        let size = self.cursor.next_size()?;
        let page = QueryRequest {
            offset: self.cursor.offset,
            limit: Some(size),
            ..self.request.clone()
        };

        match self.client.query(&self.collection, &page) {
            Ok(batch) => {
                // The primary key column comes first and is never empty
                // for a non-empty batch.
                let got = batch.first().map_or(0, Column::len);
                self.cursor.advance(size, got);
                if got == 0 {
                    return None;
                }
                log::debug!("query batch of {} from '{}'", got, self.collection);
                Some(Ok(batch))
            }
            Err(e) => {
                self.cursor.done = true;
                Some(Err(e))
            }
        }
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

/// Pages through the ranked hits for a single query vector.
pub struct SearchIterator<'a, C: VectorClient> {
    client: &'a C,
    collection: String,
    request: SearchRequest,
    cursor: Cursor,
}

impl<'a, C: VectorClient> SearchIterator<'a, C> {
    pub fn new(client: &'a C, collection: &str, request: SearchRequest, batch_size: usize) -> Result<Self> {
        check_batch_size(batch_size)?;
        if request.vectors.len() != 1 {
            return Err(VecDocsError::InvalidParameter(format!(
                "a search iterator takes exactly one query vector, got {}",
                request.vectors.len()
            )));
        }
        let cursor = Cursor {
            batch_size,
            offset: request.offset,
            remaining: Some(request.top_k),
            done: false,
        };
        Ok(Self {
            client,
            collection: collection.to_string(),
            request,
            cursor,
        })
    }
}

impl<C: VectorClient> Iterator for SearchIterator<'_, C> {
    type Item = Result<SearchResult>;

    fn next(&mut self) -> Option<Self::Item> {
        let size = self.cursor.next_size()?;
        let page = SearchRequest {
            offset: self.cursor.offset,
            top_k: size,
            ..self.request.clone()
        };

        let result = self
            .client
            .search(&self.collection, &page)
            .map(|mut results| results.pop());
        match result {
            Ok(Some(batch)) if batch.result_count > 0 => {
                self.cursor.advance(size, batch.result_count);
                Some(Ok(batch))
            }
            Ok(_) => {
                self.cursor.done = true;
                None
            }
            Err(e) => {
                self.cursor.done = true;
                Some(Err(e))
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
