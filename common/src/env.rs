use anyhow::{anyhow, Result};

/// Reads `key` from the environment as a count. Unset variables are `None`, malformed ones are
/// an error.
pub fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| anyhow!("{} must be a valid number but was '{}'", key, value)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_variable() {
        assert_eq!(env_usize("ENV_USIZE_TEST_UNSET").unwrap(), None);
    }

    #[test]
    fn test_parse_variable() {
        std::env::set_var("ENV_USIZE_TEST_VALID", " 12 ");
        assert_eq!(env_usize("ENV_USIZE_TEST_VALID").unwrap(), Some(12));

        std::env::set_var("ENV_USIZE_TEST_INVALID", "twelve");
        assert!(env_usize("ENV_USIZE_TEST_INVALID").is_err());
    }
}
