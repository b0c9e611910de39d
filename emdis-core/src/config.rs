//! Decoder configuration
//!
//! Defaults come from `.env` or environment variables:
//!
//! - `EMDIS_MAX_STEPS`: step budget per run (default: 100000)
//! - `EMDIS_BRANCH_POLICY`: `enter` or `skip` (default: enter)

use crate::control::BranchPolicy;
use once_cell::sync::Lazy;
use std::env;

// Automatically load .env when config module is accessed
static DOTENV_INIT: Lazy<()> = Lazy::new(|| {
    let _ = dotenv::dotenv();
});

#[inline]
fn ensure_loaded() {
    let _ = &*DOTENV_INIT;
}

/// Load step budget from environment
/// Default: 100000
pub fn max_steps() -> usize {
    ensure_loaded();
    env::var("EMDIS_MAX_STEPS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(100_000)
}

/// Load branch policy from environment
/// Default: enter
pub fn branch_policy() -> BranchPolicy {
    ensure_loaded();
    env::var("EMDIS_BRANCH_POLICY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

/// Cached values
pub static MAX_STEPS: Lazy<usize> = Lazy::new(max_steps);
pub static BRANCH_POLICY: Lazy<BranchPolicy> = Lazy::new(branch_policy);

/// Configuration for one decode run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Decision for conditionals on unknown values
    pub branch_policy: BranchPolicy,

    /// Dispatches allowed before the run is aborted. Backward jumps can
    /// loop forever in static decoding.
    pub max_steps: usize,

    /// Working stack contents at start, bottom first
    pub initial_stack: Vec<i64>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            branch_policy: *BRANCH_POLICY,
            max_steps: *MAX_STEPS,
            initial_stack: Vec::new(),
        }
    }
}

impl DecodeConfig {
    /// Skips undecidable blocks and uses a small budget
    pub fn strict() -> Self {
        Self {
            branch_policy: BranchPolicy::Skip,
            max_steps: 10_000,
            ..Default::default()
        }
    }

    pub fn with_stack(mut self, values: impl IntoIterator<Item = i64>) -> Self {
        self.initial_stack = values.into_iter().collect();
        self
    }

    pub fn with_policy(mut self, policy: BranchPolicy) -> Self {
        self.branch_policy = policy;
        self
    }
}
