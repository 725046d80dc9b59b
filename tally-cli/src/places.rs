//! Place search + place details over the Google Places HTTP API

use serde::Deserialize;
use tally_finance::{PlaceCandidate, PlaceSearch, ServiceError};

use crate::blocking::{block_on, success_body};
use crate::config::PlacesSection;

#[derive(Deserialize)]
struct FindPlaceResp {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    place_id: Option<String>,
    name: Option<String>,
}

#[derive(Deserialize)]
struct DetailsResp {
    result: Option<DetailsResult>,
}

#[derive(Deserialize)]
struct DetailsResult {
    name: Option<String>,
}

pub struct GooglePlaces {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GooglePlaces {
    pub fn new(config: &PlacesSection, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<String, ServiceError> {
        let resp = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        success_body(resp).await
    }
}

impl PlaceSearch for GooglePlaces {
    fn find_place(&self, query: &str) -> Result<Option<PlaceCandidate>, ServiceError> {
        let body = block_on(self.get(
            "findplacefromtext/json",
            &[
                ("input", query),
                ("inputtype", "textquery"),
                ("fields", "name,place_id"),
            ],
        ))?;
        parse_find_place(&body)
    }

    fn place_name(&self, place_id: &str) -> Result<Option<String>, ServiceError> {
        let body = block_on(self.get("details/json", &[("placeid", place_id)]))?;
        parse_place_details(&body)
    }
}

/// First candidate of a find-place response, if any
pub fn parse_find_place(body: &str) -> Result<Option<PlaceCandidate>, ServiceError> {
    let resp: FindPlaceResp = serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))?;
    Ok(resp.candidates.into_iter().next().map(|c| PlaceCandidate {
        place_id: c.place_id,
        name: c.name,
    }))
}

/// `result.name` of a place-details response
pub fn parse_place_details(body: &str) -> Result<Option<String>, ServiceError> {
    let resp: DetailsResp = serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))?;
    Ok(resp.result.and_then(|r| r.name))
}
