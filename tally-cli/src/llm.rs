//! Language-model category source (OpenAI chat completions)

use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tally_finance::{CategorySource, ServiceError};

use crate::blocking::{block_on, success_body};
use crate::config::LlmSection;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that categorizes business names into predefined categories. \
Please return the category and subcategory in this format: 'category:sub_category'. \
Notice the underscores used as spaces and no special characters.\n\
Example categories:\n\
- 'drugs:alcohol'\n\
- 'outings:restaurants'\n\
- 'merchandise:clothes'\n\
- 'outings:movies'\n\
- 'services:linked_in'\n\
- 'drugs:parafenelia'";

#[derive(Debug, Clone, Serialize)]
struct Msg {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct Req {
    model: String,
    messages: Vec<Msg>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: Option<String>,
}

pub struct LanguageModel {
    client: reqwest::Client,
    api_key: String,
    config: LlmSection,
}

impl LanguageModel {
    pub fn new(config: &LlmSection, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            config: config.clone(),
        }
    }

    fn request(&self, merchant: &str) -> Req {
        Req {
            model: self.config.model.clone(),
            messages: vec![
                Msg {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                Msg {
                    role: "user".to_string(),
                    content: user_message(merchant),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    async fn complete(&self, merchant: &str) -> Result<Option<String>, ServiceError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&self.request(merchant))
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let body = success_body(resp).await?;
        parse_chat_response(&body)
    }
}

impl CategorySource for LanguageModel {
    fn name(&self) -> &str {
        "language-model"
    }

    fn suggest(&self, merchant: &str) -> Result<Option<String>, ServiceError> {
        block_on(self.complete(merchant))
    }
}

pub fn user_message(merchant: &str) -> String {
    format!("Please categorize the following business name: \"{merchant}\"")
}

/// First choice's text, trimmed; `None` when the model said nothing.
pub fn parse_chat_response(body: &str) -> Result<Option<String>, ServiceError> {
    let out: Resp = serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))?;
    let content = out
        .choices
        .first()
        .and_then(|c| c.message.content.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_response() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"  outings:restaurants\n"}}]}"#;
        assert_eq!(
            parse_chat_response(body).unwrap().as_deref(),
            Some("outings:restaurants")
        );
    }

    #[test]
    fn test_reply_is_not_validated() {
        let body = r#"{"choices":[{"message":{"content":"Restaurants"}}]}"#;
        assert_eq!(parse_chat_response(body).unwrap().as_deref(), Some("Restaurants"));
    }

    #[test]
    fn test_empty_choices_is_no_answer() {
        assert_eq!(parse_chat_response(r#"{"choices":[]}"#).unwrap(), None);
        assert_eq!(
            parse_chat_response(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap(),
            None
        );
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        assert!(matches!(
            parse_chat_response("<html>rate limited</html>"),
            Err(ServiceError::Decode(_))
        ));
    }

    #[test]
    fn test_request_shape() {
        let llm = LanguageModel::new(&LlmSection::default(), "sk-test");
        let req = serde_json::to_value(llm.request("Thump Coffee")).unwrap();
        assert_eq!(req["model"], "gpt-4");
        assert_eq!(req["max_tokens"], 60);
        assert_eq!(req["messages"][0]["role"], "system");
        assert!(req["messages"][0]["content"].as_str().unwrap().contains("outings:restaurants"));
        assert_eq!(
            req["messages"][1]["content"],
            "Please categorize the following business name: \"Thump Coffee\""
        );
    }
}
