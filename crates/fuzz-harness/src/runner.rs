//! Run configuration for property tests
//!
//! Suites pick a case count suited to their cost; `NAV_FUZZ_CASES`
//! overrides it for long soak runs.

use proptest::test_runner::Config as ProptestConfig;
use serde::{Deserialize, Serialize};

pub const CASES_ENV: &str = "NAV_FUZZ_CASES";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzConfig {
    /// Number of test cases to run
    pub cases: u32,
    /// Maximum shrink iterations on failure
    pub max_shrink_iters: u32,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl FuzzConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cases(mut self, n: u32) -> Self {
        self.cases = n;
        self
    }

    pub fn max_shrink_iters(mut self, n: u32) -> Self {
        self.max_shrink_iters = n;
        self
    }

    /// Apply `NAV_FUZZ_CASES` when it holds a positive integer
    pub fn with_env_override(mut self) -> Self {
        if let Some(n) = std::env::var(CASES_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
        {
            self.cases = n;
        }
        self
    }

    pub fn proptest(&self) -> ProptestConfig {
        let mut config = ProptestConfig::with_cases(self.cases);
        config.max_shrink_iters = self.max_shrink_iters;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = FuzzConfig::new().cases(64).max_shrink_iters(10).proptest();
        assert_eq!(config.cases, 64);
        assert_eq!(config.max_shrink_iters, 10);
    }
}
