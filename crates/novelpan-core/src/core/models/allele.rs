use std::collections::BTreeSet;

/// The MHC-II alleles a batch is evaluated against.
///
/// Membership is all that matters; iteration order is lexical so runs are
/// reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlleleSet {
    alleles: BTreeSet<String>,
}

impl AlleleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the allele was already present.
    pub fn insert(&mut self, allele: impl Into<String>) -> bool {
        self.alleles.insert(allele.into())
    }

    pub fn contains(&self, allele: &str) -> bool {
        self.alleles.contains(allele)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.alleles.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AlleleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            alleles: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_collapse_and_iteration_is_sorted() {
        let set: AlleleSet = ["DRB1_1501", "DRB1_0101", "DRB1_1501"].into_iter().collect();
        assert_eq!(set.len(), 2);
        let alleles: Vec<_> = set.iter().collect();
        assert_eq!(alleles, vec!["DRB1_0101", "DRB1_1501"]);
    }

    #[test]
    fn insert_reports_whether_allele_was_new() {
        let mut set = AlleleSet::new();
        assert!(set.is_empty());
        assert!(set.insert("DRB1_0401"));
        assert!(!set.insert("DRB1_0401"));
        assert!(set.contains("DRB1_0401"));
    }
}
