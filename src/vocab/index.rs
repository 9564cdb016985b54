//! Compiled multi-pattern index over the vocabulary
//!
//! Built once at startup and shared read-only across every session. The
//! automaton reports every occurrence of every pattern — overlapping ones
//! included — in non-decreasing end-offset order, in O(n + matches) over a
//! text of length n.

use std::collections::{HashMap, HashSet};

use aho_corasick::{AhoCorasick, MatchKind};

use crate::vocab::Vocabulary;
use crate::{Error, Result};

/// One pattern occurrence inside a scanned text
///
/// `end` is the exclusive byte offset just past the occurrence; `term` is the
/// canonical name the matched pattern resolves to (for aliases, the canonical
/// name — never the alias text).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOccurrence<'a> {
    pub end: usize,
    pub term: &'a str,
}

/// Immutable automaton over canonical names and aliases
///
/// Matching is on raw substrings of the scanned text, not word-bounded: a
/// short name can match inside an unrelated longer word. That is the
/// documented upstream contract, kept as-is.
#[derive(Debug)]
pub struct PatternIndex {
    automaton: AhoCorasick,
    /// Pattern id -> canonical name it resolves to
    terms: Vec<String>,
    /// Canonical set retained for diagnostics
    canonical: HashSet<String>,
}

impl PatternIndex {
    /// Compile the automaton from a vocabulary
    ///
    /// Canonical names register first and resolve to themselves; aliases
    /// register after and resolve to their canonical name. When an alias is
    /// textually identical to a canonical name, the alias wins (last write
    /// for identical pattern text).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Vocabulary`] if the vocabulary is empty or the
    /// automaton cannot be built.
    pub fn compile(vocab: &Vocabulary) -> Result<Self> {
        if vocab.is_empty() {
            return Err(Error::Vocabulary("vocabulary is empty".to_string()));
        }

        let mut resolutions: HashMap<&str, &str> = HashMap::new();
        for name in vocab.canonical() {
            resolutions.insert(name, name);
        }
        for (alias, name) in vocab.aliases() {
            resolutions.insert(alias, name);
        }

        let (patterns, terms): (Vec<&str>, Vec<String>) = resolutions
            .into_iter()
            .map(|(pattern, term)| (pattern, term.to_string()))
            .unzip();

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&patterns)
            .map_err(|e| Error::Vocabulary(format!("automaton build failed: {e}")))?;

        Ok(Self {
            automaton,
            terms,
            canonical: vocab.canonical().clone(),
        })
    }

    /// Scan a text for every pattern occurrence
    ///
    /// Occurrences come back in non-decreasing end-offset order, overlapping
    /// matches included, each resolved to its canonical name.
    #[must_use]
    pub fn scan(&self, text: &str) -> Vec<MatchOccurrence<'_>> {
        self.automaton
            .find_overlapping_iter(text)
            .map(|m| MatchOccurrence {
                end: m.end(),
                term: self.terms[m.pattern().as_usize()].as_str(),
            })
            .collect()
    }

    /// Whether a name is in the canonical set
    #[must_use]
    pub fn contains_canonical(&self, term: &str) -> bool {
        self.canonical.contains(term)
    }

    /// Number of distinct patterns in the automaton
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when the automaton holds no patterns (never after `compile`)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
