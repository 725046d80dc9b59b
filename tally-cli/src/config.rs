use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// External category sources, in the order they may be tried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackSource {
    LanguageModel,
    WebSearch,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub classifier: ClassifierSection,
    pub llm: LlmSection,
    pub places: PlacesSection,
    pub web_search: WebSearchSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSection {
    /// Sources consulted when the learned map has no match, first to last
    pub fallback: Vec<FallbackSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesSection {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSearchSection {
    pub base_url: String,
    pub user_agent: String,
    /// CSS selector of the element whose text is taken as the category guess
    pub selector: String,
}

impl Default for ClassifierSection {
    fn default() -> Self {
        Self {
            fallback: vec![FallbackSource::LanguageModel],
        }
    }
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            base_url: "https://api.openai.com".to_string(),
            temperature: 0.5,
            max_tokens: 60,
        }
    }
}

impl Default for PlacesSection {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
        }
    }
}

impl Default for WebSearchSection {
    fn default() -> Self {
        Self {
            base_url: "https://www.google.com/search".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            selector: "div.BNeawe".to_string(),
        }
    }
}

/// `~/.tally/config.toml`
pub fn config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".tally").join("config.toml"))
}

/// Load the config from `explicit` (must exist) or the default location
/// (defaults are used when it does not exist yet).
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let p = match explicit {
        Some(p) => {
            if !p.exists() {
                bail!("config not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let p = config_path()?;
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(explicit: Option<&Path>) -> Result<()> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.classifier.fallback, vec![FallbackSource::LanguageModel]);
        assert_eq!(cfg.llm.model, "gpt-4");
        assert_eq!(cfg.llm.max_tokens, 60);
        assert_eq!(cfg.web_search.selector, "div.BNeawe");
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let cfg = parse_config(
            r#"
[classifier]
fallback = ["web-search", "language-model"]

[llm]
model = "gpt-4o-mini"
"#,
        )
        .unwrap();
        assert_eq!(
            cfg.classifier.fallback,
            vec![FallbackSource::WebSearch, FallbackSource::LanguageModel]
        );
        assert_eq!(cfg.llm.model, "gpt-4o-mini");
        assert_eq!(cfg.llm.base_url, "https://api.openai.com");
        assert_eq!(cfg.places.base_url, "https://maps.googleapis.com/maps/api/place");
    }

    #[test]
    fn test_unknown_fallback_is_rejected() {
        assert!(parse_config("[classifier]\nfallback = [\"crystal-ball\"]\n").is_err());
    }

    #[test]
    fn test_defaults_survive_serialization() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let back = parse_config(&s).unwrap();
        assert_eq!(back.classifier.fallback, Config::default().classifier.fallback);
        assert_eq!(back.web_search.user_agent, "Mozilla/5.0");
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".tally").join("config.toml");
        save_config(&path, &Config::default()).unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.llm.model, "gpt-4");
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("config not found"), "{err}");
    }
}
