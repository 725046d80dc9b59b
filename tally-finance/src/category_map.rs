//! Merchant → category map learned from hand-labelled ledger rows.
//!
//! Keys are lower-cased merchant strings. A description matches a key when the
//! key is a substring of the lower-cased description; when several keys match,
//! the longest wins and ties go to the key inserted first.

use tally_core::CategoryLabel;

#[derive(Debug, Clone, Default)]
pub struct CategoryMap {
    entries: Vec<(String, CategoryLabel)>,
}

impl CategoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or relabel a key. Blank keys are ignored since they would match
    /// every description. Relabelling keeps the key's original position.
    pub fn insert(&mut self, key: &str, label: CategoryLabel) {
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = label,
            None => self.entries.push((key, label)),
        }
    }

    /// Best label for a description, if any key occurs in it
    pub fn lookup(&self, text: &str) -> Option<&CategoryLabel> {
        let text = text.to_lowercase();
        let mut best: Option<&(String, CategoryLabel)> = None;
        for entry in &self.entries {
            if !text.contains(entry.0.as_str()) {
                continue;
            }
            // strictly longer only, so earlier keys win ties
            if best.is_none_or(|b| entry.0.len() > b.0.len()) {
                best = Some(entry);
            }
        }
        best.map(|(_, label)| label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryLabel)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: AsRef<str>> FromIterator<(K, CategoryLabel)> for CategoryMap {
    fn from_iter<I: IntoIterator<Item = (K, CategoryLabel)>>(iter: I) -> Self {
        let mut map = CategoryMap::new();
        for (key, label) in iter {
            map.insert(key.as_ref(), label);
        }
        map
    }
}
