use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::http::{self, PulseError};
use crate::models::dec::RegenerateDecResponse;
use crate::models::rooms::GetRoomsResponse;
use crate::room::{self, Rooms};

#[derive(Clone)]
pub struct Pulse {
    client: Client,
    base_url: Url,
    api_key: String,
    org_id: String,
}

// never prints the api key
impl std::fmt::Debug for Pulse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pulse")
            .field("base_url", &self.base_url.as_str())
            .field("org_id", &self.org_id)
            .finish_non_exhaustive()
    }
}

impl Pulse {
    pub fn new(base_url: &str, api_key: &str, org_id: &str) -> Result<Pulse, PulseError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(PulseError::BaseUrl(base_url.to_string()));
        }

        return Ok(Pulse {
            client: Client::new(),
            base_url: base_url,
            api_key: api_key.to_string(),
            org_id: org_id.to_string(),
        });
    }

    pub fn org_id(&self) -> &str {
        return &self.org_id;
    }

    /// Appends percent-encoded path segments to the base url, so ids with
    /// reserved characters stay a single segment.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot-be-a-base urls are rejected in new
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        return url;
    }

    pub async fn rooms(&self) -> Result<Rooms, PulseError> {
        let url = self.url(&["orgs", self.org_id.as_str(), "rooms"]);
        debug!(%url, "listing rooms");

        let response =
            http::get_auth::<GetRoomsResponse>(&self.client, &self.api_key, url).await?;
        return room::rooms_from_response(response);
    }

    pub async fn regenerate_dec(&self, room_id: &str) -> Result<String, PulseError> {
        let url = self.url(&["orgs", self.org_id.as_str(), "rooms", room_id, "regenerate_dec"]);
        debug!(%url, "regenerating device enrollment code");

        let response =
            http::post_auth::<RegenerateDecResponse>(&self.client, &self.api_key, url).await?;
        return response.into_code().ok_or(PulseError::MissingCode);
    }
}
