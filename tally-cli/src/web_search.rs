//! Web-search snippet category source.
//!
//! Fetches a search-results page and takes the text of the first element
//! matching a CSS selector as the category guess. Depends on the result page
//! markup, so any failure simply yields no answer.

use anyhow::{anyhow, Result};
use reqwest::header::USER_AGENT;
use scraper::{Html, Selector};
use tally_core::CategoryLabel;
use tally_finance::{CategorySource, ServiceError};

use crate::blocking::{block_on, success_body};
use crate::config::WebSearchSection;

pub struct WebSearch {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
    selector: Selector,
}

impl WebSearch {
    pub fn new(config: &WebSearchSection) -> Result<Self> {
        let selector = Selector::parse(&config.selector)
            .map_err(|e| anyhow!("invalid web_search.selector {:?}: {:?}", config.selector, e))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            selector,
        })
    }

    async fn fetch(&self, merchant: &str) -> Result<String, ServiceError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("q", merchant)])
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        success_body(resp).await
    }
}

impl CategorySource for WebSearch {
    fn name(&self) -> &str {
        "web-search"
    }

    fn suggest(&self, merchant: &str) -> Result<Option<String>, ServiceError> {
        let html = block_on(self.fetch(merchant))?;
        Ok(first_snippet(&html, &self.selector).map(|s| CategoryLabel::normalized(&s).to_string()))
    }
}

/// Whitespace-collapsed text of the first element matching `selector`
pub fn first_snippet(html: &str, selector: &Selector) -> Option<String> {
    let doc = Html::parse_document(html);
    let el = doc.select(selector).next()?;
    let text = el.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> Selector {
        Selector::parse("div.BNeawe").unwrap()
    }

    #[test]
    fn test_first_matching_element() {
        let html = r#"<html><body>
            <div class="other">Ads</div>
            <div class="BNeawe s3v9rd AP7Wnd">Liquor <b>store</b></div>
            <div class="BNeawe">Second</div>
        </body></html>"#;
        assert_eq!(first_snippet(html, &selector()).as_deref(), Some("Liquor store"));
    }

    #[test]
    fn test_no_match_or_empty_text() {
        assert_eq!(first_snippet("<div class=\"g\">x</div>", &selector()), None);
        assert_eq!(first_snippet("<div class=\"BNeawe\">   </div>", &selector()), None);
    }

    #[test]
    fn test_snippet_becomes_label_text() {
        let snippet = first_snippet(r#"<div class="BNeawe">Coffee Shop</div>"#, &selector()).unwrap();
        assert_eq!(CategoryLabel::normalized(&snippet).as_str(), "coffee_shop");
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let cfg = WebSearchSection {
            selector: "div[".to_string(),
            ..Default::default()
        };
        assert!(WebSearch::new(&cfg).is_err());
    }
}
