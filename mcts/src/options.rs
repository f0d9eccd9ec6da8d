use std::time::Duration;

use anyhow::{anyhow, Result};
use common::{Config, ConfigLoader};

#[derive(Clone, Debug, PartialEq)]
pub struct SearchOptions {
    /// Weight of the visit count based exploration term, `c`.
    pub exploration_constant: f32,
    /// Weight of the prior policy, `d`.
    pub policy_weight: f32,
    /// Upper bound on the number of expansions per move.
    pub iterations: usize,
    /// When set, the search also stops once this much time has passed.
    pub time_limit: Option<Duration>,
}

impl SearchOptions {
    pub fn new(exploration_constant: f32, policy_weight: f32, iterations: usize) -> Self {
        Self {
            exploration_constant,
            policy_weight,
            iterations,
            time_limit: None,
        }
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::new(std::f32::consts::SQRT_2, 1.0, 300)
    }
}

impl Config for SearchOptions {
    fn load(config: &ConfigLoader) -> Result<Self> {
        let defaults = Self::default();

        let options = Self {
            exploration_constant: config
                .get("exploration_constant")
                .and_then(|v| v.as_f32())
                .unwrap_or(defaults.exploration_constant),
            policy_weight: config
                .get("policy_weight")
                .and_then(|v| v.as_f32())
                .unwrap_or(defaults.policy_weight),
            iterations: config
                .get("iterations")
                .and_then(|v| v.as_usize())
                .unwrap_or(defaults.iterations),
            time_limit: config
                .get("time_limit_ms")
                .and_then(|v| v.as_usize())
                .map(|ms| Duration::from_millis(ms as u64)),
        };

        if options.exploration_constant < 0.0 || options.policy_weight < 0.0 {
            return Err(anyhow!(
                "exploration_constant and policy_weight must be non-negative: {:?}",
                options
            ));
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_defaults() {
        let options = SearchOptions::default();

        assert_approx_eq!(options.exploration_constant, 2f32.sqrt());
        assert_approx_eq!(options.policy_weight, 1.0);
        assert_eq!(options.iterations, 300);
        assert_eq!(options.time_limit, None);
    }

    #[test]
    fn test_load_from_config() {
        let config = ConfigLoader::parse(
            r#"
            search_options_test {
                exploration_constant = 1.5
                iterations = 50
                time_limit_ms = 250
            }
            "#,
            "search_options_test",
        )
        .unwrap();

        let options: SearchOptions = config.load().unwrap();

        assert_approx_eq!(options.exploration_constant, 1.5);
        assert_approx_eq!(options.policy_weight, 1.0);
        assert_eq!(options.iterations, 50);
        assert_eq!(options.time_limit, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_negative_weights_are_rejected() {
        let config =
            ConfigLoader::parse("policy_weight = -1.0", "search_options_negative_test").unwrap();

        assert!(config.load::<SearchOptions>().is_err());
    }
}
