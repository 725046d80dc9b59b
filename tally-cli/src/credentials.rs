//! API keys for the external services.
//!
//! Read from the process environment after loading `.env` from the working
//! directory (a missing `.env` is fine). Commands ask for the keys they need
//! and fail before doing any work when one is absent.

use anyhow::{bail, Context, Result};
use tracing::debug;

pub const OPENAI_KEY_VAR: &str = "OAI_GPT_API_KEY";
pub const MAPS_KEY_VAR: &str = "GOOG_MAPS_API_KEY";

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub maps_api_key: Option<String>,
}

impl Credentials {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            openai_api_key: get(OPENAI_KEY_VAR),
            maps_api_key: get(MAPS_KEY_VAR),
        }
    }

    pub fn require_openai(&self) -> Result<&str> {
        match self.openai_api_key.as_deref() {
            Some(k) => Ok(k),
            None => bail!("{OPENAI_KEY_VAR} is not set (add it to .env or the environment)"),
        }
    }

    pub fn require_maps(&self) -> Result<&str> {
        match self.maps_api_key.as_deref() {
            Some(k) => Ok(k),
            None => bail!("{MAPS_KEY_VAR} is not set (add it to .env or the environment)"),
        }
    }
}

pub fn load_credentials() -> Result<Credentials> {
    match dotenvy::dotenv() {
        Ok(path) => debug!("loaded {}", path.display()),
        Err(e) if e.not_found() => debug!("no .env file"),
        Err(e) => return Err(e).context("load .env"),
    }
    Ok(Credentials::from_lookup(|var| std::env::var(var).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_reads_both_keys() {
        let creds = Credentials::from_lookup(lookup(&[
            (OPENAI_KEY_VAR, "sk-test"),
            (MAPS_KEY_VAR, " maps-key \n"),
        ]));
        assert_eq!(creds.require_openai().unwrap(), "sk-test");
        assert_eq!(creds.require_maps().unwrap(), "maps-key");
    }

    #[test]
    fn test_missing_or_blank_keys_are_fatal_when_required() {
        let creds = Credentials::from_lookup(lookup(&[(OPENAI_KEY_VAR, "   ")]));
        let err = creds.require_openai().unwrap_err();
        assert!(err.to_string().contains("OAI_GPT_API_KEY"));
        assert!(creds.require_maps().is_err());
    }
}
