use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::shared::image_record::Fingerprint;

/// How the run treats images whose fingerprint was already seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Bit-for-bit fingerprint equality marks a duplicate; first occurrence wins.
    #[default]
    ExactMatch,
    /// Every image is kept and no fingerprint is computed.
    Disabled,
}

/// Run-scoped set of fingerprints seen so far.
///
/// The set only grows. Callers must feed fingerprints in walk order for the
/// "first occurrence wins" rule to be deterministic.
pub struct DuplicateFilter {
    policy: DuplicatePolicy,
    seen: HashSet<Fingerprint>,
}

impl DuplicateFilter {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            seen: HashSet::new(),
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub fn is_enabled(&self) -> bool {
        self.policy == DuplicatePolicy::ExactMatch
    }

    /// Returns `true` if `fingerprint` was seen before; otherwise records it.
    pub fn is_duplicate(&mut self, fingerprint: &Fingerprint) -> bool {
        match self.policy {
            DuplicatePolicy::Disabled => false,
            DuplicatePolicy::ExactMatch => {
                if self.seen.contains(fingerprint) {
                    true
                } else {
                    self.seen.insert(fingerprint.clone());
                    false
                }
            }
        }
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}
