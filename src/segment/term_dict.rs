//! Term dictionary using FST (Finite State Transducer)
//!
//! Maps prefix-coded byte terms to ordinals; the ordinal indexes the
//! postings array of the owning field. Terms are walked in ascending byte
//! order through a [`TermCursor`], which can also seek forward.

use std::io;

use fst::map::Stream;
use fst::{IntoStreamer, Map, MapBuilder, Streamer};

use super::types::TermOrdinal;

/// A sorted, duplicate-free sequence of terms that can jump forward
///
/// `seek_ceil` positions on the first term `>= target`. Both moves return the
/// new current term, or `None` once the source is exhausted.
pub trait SeekableTermSource {
    /// Move to the next term
    fn advance(&mut self) -> Option<&[u8]>;

    /// Move to the first term greater than or equal to `target`
    fn seek_ceil(&mut self, target: &[u8]) -> Option<&[u8]>;

    /// The term the source is positioned on
    fn current(&self) -> Option<&[u8]>;

    /// Ordinal of the current term
    fn ordinal(&self) -> Option<TermOrdinal>;
}

impl<S: SeekableTermSource + ?Sized> SeekableTermSource for &mut S {
    fn advance(&mut self) -> Option<&[u8]> {
        (**self).advance()
    }

    fn seek_ceil(&mut self, target: &[u8]) -> Option<&[u8]> {
        (**self).seek_ceil(target)
    }

    fn current(&self) -> Option<&[u8]> {
        (**self).current()
    }

    fn ordinal(&self) -> Option<TermOrdinal> {
        (**self).ordinal()
    }
}

/// Term dictionary backed by FST
pub struct TermDictionary {
    /// FST mapping term -> ordinal
    fst: Map<Vec<u8>>,
}

impl TermDictionary {
    /// Create a term dictionary from FST data
    pub fn new(fst_data: Vec<u8>) -> io::Result<Self> {
        let fst = Map::new(fst_data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Self { fst })
    }

    /// Look up a term and return its ordinal
    pub fn get(&self, term: &[u8]) -> Option<TermOrdinal> {
        self.fst.get(term).map(TermOrdinal)
    }

    /// Check if a term exists
    pub fn contains(&self, term: &[u8]) -> bool {
        self.fst.contains_key(term)
    }

    /// Get the number of terms
    pub fn len(&self) -> usize {
        self.fst.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.fst.is_empty()
    }

    /// Iterate over all terms in the dictionary
    pub fn iter_terms(&self) -> Vec<(Vec<u8>, TermOrdinal)> {
        let mut results = Vec::with_capacity(self.len());
        let mut stream = self.fst.stream();
        while let Some((key, ord)) = stream.next() {
            results.push((key.to_vec(), TermOrdinal(ord)));
        }
        results
    }

    /// Open a forward cursor positioned before the first term
    pub fn cursor(&self) -> TermCursor<'_> {
        TermCursor {
            map: &self.fst,
            stream: self.fst.stream(),
            term: Vec::new(),
            ordinal: None,
        }
    }
}

/// Forward cursor over a [`TermDictionary`]
///
/// Seeking re-opens the FST stream at the target, so a seek costs one FST
/// descent rather than a scan over the skipped terms.
pub struct TermCursor<'a> {
    map: &'a Map<Vec<u8>>,
    stream: Stream<'a>,
    term: Vec<u8>,
    ordinal: Option<TermOrdinal>,
}

impl<'a> TermCursor<'a> {
    fn pull(&mut self) -> Option<&[u8]> {
        match self.stream.next() {
            Some((key, ord)) => {
                self.term.clear();
                self.term.extend_from_slice(key);
                self.ordinal = Some(TermOrdinal(ord));
                Some(self.term.as_slice())
            }
            None => {
                self.term.clear();
                self.ordinal = None;
                None
            }
        }
    }
}

impl<'a> SeekableTermSource for TermCursor<'a> {
    fn advance(&mut self) -> Option<&[u8]> {
        self.pull()
    }

    fn seek_ceil(&mut self, target: &[u8]) -> Option<&[u8]> {
        self.stream = self.map.range().ge(target).into_stream();
        self.pull()
    }

    fn current(&self) -> Option<&[u8]> {
        self.ordinal.map(|_| self.term.as_slice())
    }

    fn ordinal(&self) -> Option<TermOrdinal> {
        self.ordinal
    }
}

/// Builder for term dictionaries
pub struct TermDictionaryBuilder {
    terms: Vec<(Vec<u8>, u64)>,
}

impl TermDictionaryBuilder {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            terms: Vec::with_capacity(capacity),
        }
    }

    /// Add a term with its ordinal
    pub fn add(&mut self, term: impl Into<Vec<u8>>, ordinal: u64) {
        self.terms.push((term.into(), ordinal));
    }

    /// Build the term dictionary
    ///
    /// Duplicate terms are rejected by the FST and surface as `InvalidData`.
    pub fn build(mut self) -> io::Result<TermDictionary> {
        // FST requires sorted input
        self.terms.sort_by(|a, b| a.0.cmp(&b.0));

        let mut fst_builder = MapBuilder::memory();
        for (term, ordinal) in &self.terms {
            fst_builder
                .insert(term, *ordinal)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        }

        let fst_data = fst_builder
            .into_inner()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        TermDictionary::new(fst_data)
    }
}

impl Default for TermDictionaryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory sorted term list implementing [`SeekableTermSource`]
///
/// Ordinals are positions in the sorted list.
#[derive(Debug, Clone, Default)]
pub struct SortedTermList {
    terms: Vec<Vec<u8>>,
    position: Option<usize>,
    started: bool,
}

impl SortedTermList {
    pub fn new<I, T>(terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Vec<u8>>,
    {
        let mut terms: Vec<Vec<u8>> = terms.into_iter().map(Into::into).collect();
        terms.sort();
        terms.dedup();
        Self {
            terms,
            position: None,
            started: false,
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn land(&mut self, index: usize) -> Option<&[u8]> {
        self.started = true;
        self.position = (index < self.terms.len()).then_some(index);
        self.position.map(|pos| self.terms[pos].as_slice())
    }
}

impl SeekableTermSource for SortedTermList {
    fn advance(&mut self) -> Option<&[u8]> {
        let next = match (self.started, self.position) {
            (false, _) => 0,
            (true, Some(pos)) => pos + 1,
            (true, None) => self.terms.len(),
        };
        self.land(next)
    }

    fn seek_ceil(&mut self, target: &[u8]) -> Option<&[u8]> {
        let index = self.terms.partition_point(|term| term.as_slice() < target);
        self.land(index)
    }

    fn current(&self) -> Option<&[u8]> {
        self.position.map(|pos| self.terms[pos].as_slice())
    }

    fn ordinal(&self) -> Option<TermOrdinal> {
        self.position.map(|pos| TermOrdinal(pos as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_dict(terms: &[&str]) -> TermDictionary {
        let mut builder = TermDictionaryBuilder::new();
        for (i, term) in terms.iter().enumerate() {
            builder.add(term.as_bytes(), i as u64);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_term_dictionary_builder() {
        let dict = build_dict(&["cherry", "apple", "banana"]);

        assert_eq!(dict.len(), 3);
        assert!(dict.contains(b"apple"));
        assert!(dict.contains(b"banana"));
        assert!(!dict.contains(b"date"));
        assert_eq!(dict.get(b"cherry"), Some(TermOrdinal(0)));
        assert_eq!(dict.get(b"apple"), Some(TermOrdinal(1)));

        let terms: Vec<Vec<u8>> = dict.iter_terms().into_iter().map(|(t, _)| t).collect();
        assert_eq!(terms, vec![b"apple".to_vec(), b"banana".to_vec(), b"cherry".to_vec()]);
    }

    #[test]
    fn test_duplicate_terms_rejected() {
        let mut builder = TermDictionaryBuilder::new();
        builder.add(b"a".to_vec(), 0);
        builder.add(b"a".to_vec(), 1);
        let err = builder.build().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_cursor_advance_and_seek() {
        let dict = build_dict(&["b", "d", "f", "h"]);
        let mut cursor = dict.cursor();

        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.advance(), Some(&b"b"[..]));
        assert_eq!(cursor.ordinal(), Some(TermOrdinal(0)));

        // Seek lands on the ceiling when the target is absent
        assert_eq!(cursor.seek_ceil(b"e"), Some(&b"f"[..]));
        assert_eq!(cursor.ordinal(), Some(TermOrdinal(2)));
        assert_eq!(cursor.advance(), Some(&b"h"[..]));
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.current(), None);

        // Exact hit
        assert_eq!(cursor.seek_ceil(b"d"), Some(&b"d"[..]));
        assert_eq!(cursor.seek_ceil(b"z"), None);
    }

    #[test]
    fn test_sorted_term_list() {
        let mut list = SortedTermList::new(vec![b"d".to_vec(), b"b".to_vec(), b"d".to_vec()]);
        assert_eq!(list.len(), 2);

        assert_eq!(list.advance(), Some(&b"b"[..]));
        assert_eq!(list.advance(), Some(&b"d"[..]));
        assert_eq!(list.ordinal(), Some(TermOrdinal(1)));
        assert_eq!(list.advance(), None);
        assert_eq!(list.advance(), None);

        assert_eq!(list.seek_ceil(b"a"), Some(&b"b"[..]));
        assert_eq!(list.seek_ceil(b"c"), Some(&b"d"[..]));
        assert_eq!(list.seek_ceil(b"e"), None);
    }

    #[test]
    fn test_sorted_term_list_through_mut_ref() {
        fn seek_then_advance<S: SeekableTermSource>(mut source: S) -> Vec<Vec<u8>> {
            let mut seen = Vec::new();
            let mut term = source.seek_ceil(b"c").map(<[u8]>::to_vec);
            while let Some(t) = term {
                seen.push(t);
                term = source.advance().map(<[u8]>::to_vec);
            }
            seen
        }

        let mut list = SortedTermList::new(vec!["b", "d", "f"]);
        assert_eq!(seek_then_advance(&mut list), vec![b"d".to_vec(), b"f".to_vec()]);
        assert_eq!(list.current(), None);
        assert_eq!(list.seek_ceil(b"a"), Some(&b"b"[..]));
        assert_eq!(list.ordinal(), Some(TermOrdinal(0)));
    }
}
