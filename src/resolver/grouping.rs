//! Splitting a parsed list into the groups shown to the operator.

use crate::output::SerializedRecord;

/// How consecutive list lines are assigned to one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupingPolicy {
    /// Lines belong together when their full fingerprints are equal.
    #[default]
    Fingerprint,
    /// Lines belong together when the first `n` fingerprint characters are
    /// equal. Weaker than [`GroupingPolicy::Fingerprint`]; kept for lists
    /// produced by older tooling.
    Prefix(usize),
}

impl GroupingPolicy {
    /// Whether `b`, directly following `a`, continues `a`'s group.
    ///
    /// Lines without a fingerprint never group with anything.
    #[must_use]
    pub fn same_group(&self, a: &SerializedRecord, b: &SerializedRecord) -> bool {
        if a.fingerprint.is_empty() || b.fingerprint.is_empty() {
            return false;
        }
        match *self {
            Self::Fingerprint => a.fingerprint == b.fingerprint,
            Self::Prefix(n) => {
                let n = n.max(1);
                let pa = a.fingerprint.get(..n).unwrap_or(&a.fingerprint);
                let pb = b.fingerprint.get(..n).unwrap_or(&b.fingerprint);
                pa == pb
            }
        }
    }
}

/// Split list lines into maximal runs under `policy`.
#[must_use]
pub fn split_groups(records: &[SerializedRecord], policy: GroupingPolicy) -> Vec<Vec<SerializedRecord>> {
    records
        .chunk_by(|a, b| policy.same_group(a, b))
        .map(<[SerializedRecord]>::to_vec)
        .collect()
}
