use std::cmp::Ordering;

use super::result::ScanResult;

/// All results of one scan invocation.
///
/// A batch is built once from the collected results and exposes no way to
/// change them afterwards. Iteration follows arrival order, which differs
/// between runs; use [`ScanBatch::sorted`] for anything user-visible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanBatch {
    results: Vec<ScanResult>,
}

impl ScanBatch {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn available_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_available()).count()
    }

    /// Results in arrival order.
    pub fn iter(&self) -> std::slice::Iter<'_, ScanResult> {
        self.results.iter()
    }

    /// Results ordered by title, ties broken by url.
    pub fn sorted(&self) -> Vec<&ScanResult> {
        let mut sorted: Vec<&ScanResult> = self.results.iter().collect();
        sorted.sort_by(|a, b| by_title(a, b));
        sorted
    }

    /// Compares two batches ignoring arrival order.
    pub fn same_results(&self, other: &ScanBatch) -> bool {
        self.sorted() == other.sorted()
    }
}

fn by_title(a: &ScanResult, b: &ScanResult) -> Ordering {
    a.title()
        .cmp(b.title())
        .then_with(|| a.url().cmp(b.url()))
}

impl FromIterator<ScanResult> for ScanBatch {
    fn from_iter<I: IntoIterator<Item = ScanResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ScanBatch {
    type Item = ScanResult;
    type IntoIter = std::vec::IntoIter<ScanResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a ScanBatch {
    type Item = &'a ScanResult;
    type IntoIter = std::slice::Iter<'a, ScanResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
