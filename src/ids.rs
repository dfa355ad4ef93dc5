//! Identifier Sets
//!
//! Ordered, deduplicated collections of external identifiers (product IDs, collection IDs) and the
//! editor used to build them from free-form text.

use std::{fmt, slice};

use smallvec::SmallVec;
use tracing::debug;

/// An ordered set of identifiers.
///
/// Uniqueness is exact string equality, so `"ABC"` and `"abc"` are distinct entries. Insertion
/// order is preserved for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierSet {
    ids: Vec<String>,
}

impl IdentifierSet {
    /// Create an empty identifier set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an identifier set from existing identifiers.
    ///
    /// Entries are trimmed; blank entries and repeats are dropped, keeping the first occurrence.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();

        for id in ids {
            set.insert(id.as_ref().trim());
        }

        set
    }

    /// Number of identifiers in the set.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Check if the set contains the exact identifier.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Iterate over identifiers in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, String> {
        self.ids.iter()
    }

    /// Identifiers in insertion order.
    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }

    /// Consume the set, returning the identifiers in insertion order.
    pub fn into_vec(self) -> Vec<String> {
        self.ids
    }

    /// Append an identifier unless it is blank or already present.
    ///
    /// Returns `true` if the identifier was added.
    fn insert(&mut self, id: &str) -> bool {
        if id.is_empty() || self.contains(id) {
            return false;
        }

        self.ids.push(id.to_string());

        true
    }

    /// Remove an identifier, returning `true` if it was present.
    fn remove(&mut self, id: &str) -> bool {
        let Some(pos) = self.ids.iter().position(|existing| existing == id) else {
            return false;
        };

        self.ids.remove(pos);

        true
    }
}

impl fmt::Display for IdentifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ids.join(", "))
    }
}

impl<'a> IntoIterator for &'a IdentifierSet {
    type Item = &'a String;
    type IntoIter = slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Split free-form text into identifier tokens.
///
/// Tokens are separated by any run of commas or whitespace (including newlines). Empty tokens are
/// discarded, as are repeats within the same input.
pub fn parse_batch(raw: &str) -> SmallVec<[String; 8]> {
    let mut tokens: SmallVec<[String; 8]> = SmallVec::new();

    for token in raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|token| !token.is_empty())
    {
        if !tokens.iter().any(|seen| seen == token) {
            tokens.push(token.to_string());
        }
    }

    tokens
}

/// Editor for an [`IdentifierSet`] owned by the caller.
///
/// Every mutation reports the full resulting set through the change callback. The editor keeps
/// nothing beyond its copy of the caller's set and the transient draft text.
pub struct IdentifierEditor<F>
where
    F: FnMut(&IdentifierSet),
{
    ids: IdentifierSet,
    draft: String,
    on_change: F,
}

impl<F> fmt::Debug for IdentifierEditor<F>
where
    F: FnMut(&IdentifierSet),
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifierEditor")
            .field("ids", &self.ids)
            .field("draft", &self.draft)
            .finish_non_exhaustive()
    }
}

impl<F> IdentifierEditor<F>
where
    F: FnMut(&IdentifierSet),
{
    /// Create an editor over the caller's current set.
    pub fn new(ids: IdentifierSet, on_change: F) -> Self {
        Self {
            ids,
            draft: String::new(),
            on_change,
        }
    }

    /// The set as last reported to, or supplied by, the caller.
    pub fn ids(&self) -> &IdentifierSet {
        &self.ids
    }

    /// Replace the current set with one supplied by the caller. Does not notify.
    pub fn set_ids(&mut self, ids: IdentifierSet) {
        self.ids = ids;
    }

    /// Transient raw text awaiting submission.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the transient raw text.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Submit the draft text as a batch, clearing the draft if anything was submitted.
    pub fn submit_draft(&mut self) {
        let draft = std::mem::take(&mut self.draft);

        if !self.submit_batch(&draft) {
            self.draft = draft;
        }
    }

    /// Add every new identifier found in `raw`, after the existing entries.
    ///
    /// Returns `false` without notifying when the input is blank. Otherwise the caller is notified
    /// with the full set, even if every token was already present.
    pub fn submit_batch(&mut self, raw: &str) -> bool {
        if raw.trim().is_empty() {
            return false;
        }

        let tokens = parse_batch(raw);
        let added = tokens.iter().filter(|token| self.ids.insert(token)).count();

        debug!(
            token_count = tokens.len(),
            added,
            total = self.ids.len(),
            "submitted identifier batch"
        );

        self.notify();

        true
    }

    /// Remove an identifier. Does nothing if it is not present.
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.ids.remove(id) {
            return false;
        }

        debug!(remaining = self.ids.len(), "removed identifier");

        self.notify();

        true
    }

    /// Remove every identifier. Always notifies.
    pub fn clear_all(&mut self) {
        debug!(cleared = self.ids.len(), "cleared identifiers");

        self.ids = IdentifierSet::new();

        self.notify();
    }

    fn notify(&mut self) {
        (self.on_change)(&self.ids);
    }
}
