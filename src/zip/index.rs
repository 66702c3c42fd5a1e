use std::collections::HashMap;
use std::collections::hash_map;

use super::structures::Entry;

/// Immutable lookup table from member path to its location in the bundle.
///
/// Built once by [`build_index`](super::build_index) and shared read-only
/// between entry reads.
#[derive(Debug, Clone, Default)]
pub struct Index {
    entries: HashMap<String, Entry>,
}

impl Index {
    /// Look up a member by its exact path.
    ///
    /// # Returns
    ///
    /// The entry recorded last for `path`, or `None` if the bundle has none.
    pub fn get(&self, path: &str) -> Option<&Entry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in arbitrary order.
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.entries.values())
    }

    /// All member paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

/// Later entries with the same path replace earlier ones.
impl FromIterator<Entry> for Index {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut entries = HashMap::new();
        for entry in iter {
            entries.insert(entry.path.clone(), entry);
        }
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a Index {
    type Item = &'a Entry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of an [`Index`].
#[derive(Debug, Clone)]
pub struct Iter<'a>(hash_map::Values<'a, String, Entry>);

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}
