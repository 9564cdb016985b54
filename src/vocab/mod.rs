//! Vocabulary loading and pattern compilation
//!
//! The vocabulary is a plain-text file with two sections:
//!
//! ```text
//! [COUNTRIES]
//! chad
//! united states of america
//!
//! [ALTERNATES]
//! usa -> united states of america
//! ```
//!
//! Canonical names and aliases share one matching namespace; an alias always
//! resolves to its canonical name in emitted events.

pub mod index;

pub use index::{MatchOccurrence, PatternIndex};

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::{Error, Result};

/// Section header opening the canonical-name list
const SECTION_COUNTRIES: &str = "[COUNTRIES]";
/// Section header opening the alias list
const SECTION_ALTERNATES: &str = "[ALTERNATES]";
/// Separator between an alias and its canonical name
const ALIAS_ARROW: &str = "->";

/// A parsed vocabulary: canonical country names plus alias mappings
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    canonical: HashSet<String>,
    aliases: HashMap<String, String>,
}

impl Vocabulary {
    /// Load a vocabulary from the two-section text file
    ///
    /// Lines outside a recognized section are ignored. Alternates lines
    /// without `->` are silently skipped. A missing or unreadable file is an
    /// error — callers treat this as fatal at startup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Vocabulary`] if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Vocabulary(format!("cannot read {}: {e}", path.display()))
        })?;
        Ok(Self::parse(&contents))
    }

    /// Parse vocabulary text (see [`Vocabulary::load`] for the format)
    #[must_use]
    pub fn parse(contents: &str) -> Self {
        enum Section {
            None,
            Countries,
            Alternates,
        }

        let mut vocab = Self::default();
        let mut section = Section::None;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line {
                SECTION_COUNTRIES => section = Section::Countries,
                SECTION_ALTERNATES => section = Section::Alternates,
                _ => match section {
                    Section::Countries => {
                        vocab.canonical.insert(normalize(line));
                    }
                    Section::Alternates => {
                        // Lines without the arrow are dropped, not surfaced
                        if let Some((alias, name)) = line.split_once(ALIAS_ARROW) {
                            vocab.aliases.insert(normalize(alias), normalize(name));
                        }
                    }
                    Section::None => {}
                },
            }
        }

        vocab
    }

    /// Build a vocabulary directly from parts (tests, embedded defaults)
    pub fn from_parts<C, A>(canonical: C, aliases: A) -> Self
    where
        C: IntoIterator<Item = String>,
        A: IntoIterator<Item = (String, String)>,
    {
        Self {
            canonical: canonical.into_iter().map(|s| normalize(&s)).collect(),
            aliases: aliases
                .into_iter()
                .map(|(a, c)| (normalize(&a), normalize(&c)))
                .collect(),
        }
    }

    /// Canonical country names
    #[must_use]
    pub const fn canonical(&self) -> &HashSet<String> {
        &self.canonical
    }

    /// Alias-to-canonical mappings
    #[must_use]
    pub const fn aliases(&self) -> &HashMap<String, String> {
        &self.aliases
    }

    /// True when neither section produced an entry
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty() && self.aliases.is_empty()
    }
}

/// Normalize a vocabulary entry: lowercase, trimmed
fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
