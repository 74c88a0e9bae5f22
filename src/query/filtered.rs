//! Filtered term enumeration
//!
//! A [`TermFilter`] decides, term by term, whether the wrapped source's
//! current term matches, whether the walk should jump ahead, or whether it
//! is over. [`FilteredTermsEnum`] drives that protocol against any
//! [`SeekableTermSource`].

use tracing::trace;

use crate::segment::{SeekableTermSource, TermOrdinal};

/// Verdict of a filter on one term
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcceptStatus {
    /// The term matches; continue with the next term
    Yes,
    /// The term does not match; continue with the next term
    No,
    /// The term does not match; ask the filter where to seek next
    NoAndSeek,
    /// No further term can match
    End,
}

/// The decision half of a filtered walk
pub trait TermFilter {
    /// Where to seek next, given the source's current term.
    ///
    /// Must never return a term below `current`. `None` ends the walk.
    fn next_seek_term(&mut self, current: Option<&[u8]>) -> Option<Vec<u8>>;

    /// Judge the source's current term
    fn accept(&mut self, term: &[u8]) -> AcceptStatus;
}

/// Lazily yields the terms of `source` accepted by `filter`, in ascending order
pub struct FilteredTermsEnum<F, S> {
    filter: F,
    source: S,
    do_seek: bool,
    exhausted: bool,
    seeks: usize,
}

impl<F: TermFilter, S: SeekableTermSource> FilteredTermsEnum<F, S> {
    pub fn new(filter: F, source: S) -> Self {
        Self {
            filter,
            source,
            do_seek: true,
            exhausted: false,
            seeks: 0,
        }
    }

    /// Advance to the next accepted term
    pub fn next_term(&mut self) -> Option<&[u8]> {
        if self.exhausted {
            return None;
        }

        loop {
            let positioned = if self.do_seek {
                self.do_seek = false;
                let Some(target) = self.filter.next_seek_term(self.source.current()) else {
                    return self.finish();
                };
                debug_assert!(
                    self.source.current().map_or(true, |cur| target.as_slice() >= cur),
                    "seek target must not move backward"
                );
                self.seeks += 1;
                trace!(target = ?target, "seeking term source");
                self.source.seek_ceil(&target).is_some()
            } else {
                self.source.advance().is_some()
            };

            if !positioned {
                return self.finish();
            }

            let Some(term) = self.source.current() else {
                return self.finish();
            };
            match self.filter.accept(term) {
                AcceptStatus::Yes => return self.source.current(),
                AcceptStatus::No => {}
                AcceptStatus::NoAndSeek => self.do_seek = true,
                AcceptStatus::End => return self.finish(),
            }
        }
    }

    fn finish(&mut self) -> Option<&[u8]> {
        self.exhausted = true;
        None
    }

    /// Ordinal of the most recently accepted term
    pub fn ordinal(&self) -> Option<TermOrdinal> {
        if self.exhausted {
            None
        } else {
            self.source.ordinal()
        }
    }

    /// Number of seeks issued against the source
    pub fn seek_count(&self) -> usize {
        self.seeks
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    /// Drain the remaining accepted terms
    pub fn collect_terms(mut self) -> Vec<Vec<u8>> {
        let mut terms = Vec::new();
        while let Some(term) = self.next_term() {
            terms.push(term.to_vec());
        }
        terms
    }

    pub fn into_inner(self) -> (F, S) {
        (self.filter, self.source)
    }
}
