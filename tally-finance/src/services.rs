//! Capabilities the pipeline needs from outside services.
//!
//! Implementations live in the CLI (HTTP clients); tests use fakes.

use thiserror::Error;

/// Failure talking to an external service. Always caught by the caller and
/// turned into an unresolved / uncategorized result.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(String),
}

/// First candidate returned by a place search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceCandidate {
    pub place_id: Option<String>,
    pub name: Option<String>,
}

/// Place lookup service (search by free text, then details by id)
pub trait PlaceSearch {
    /// Free-text search; `Ok(None)` when there are no candidates.
    fn find_place(&self, query: &str) -> Result<Option<PlaceCandidate>, ServiceError>;

    /// Canonical name for a place id; `Ok(None)` when the service has no result.
    fn place_name(&self, place_id: &str) -> Result<Option<String>, ServiceError>;
}

/// Something that can guess a `category:subcategory` label for a merchant
pub trait CategorySource {
    /// Short name used in logs and summaries
    fn name(&self) -> &str;

    fn suggest(&self, merchant: &str) -> Result<Option<String>, ServiceError>;
}

impl<T: PlaceSearch + ?Sized> PlaceSearch for &T {
    fn find_place(&self, query: &str) -> Result<Option<PlaceCandidate>, ServiceError> {
        (**self).find_place(query)
    }

    fn place_name(&self, place_id: &str) -> Result<Option<String>, ServiceError> {
        (**self).place_name(place_id)
    }
}
