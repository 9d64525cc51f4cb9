//! Reverse geocoding against Nominatim (OpenStreetMap).
//!
//! Every failure collapses to `None`; the cause is only logged.

use reqwest::{header, Client};
use std::sync::Arc;

use crate::config::Config;
use crate::constants::REVERSE_ZOOM;
use crate::error::FetchError;
use crate::models::{AddressRecord, Coordinate, NominatimResponse};

#[derive(Debug, Clone)]
pub struct AddressResolver {
    client: Arc<Client>,
    base_url: String,
    accept_language: String,
}

impl AddressResolver {
    pub fn new(client: Arc<Client>, config: &Config) -> Self {
        Self {
            client,
            base_url: config.nominatim_base.clone(),
            accept_language: config.accept_language.clone(),
        }
    }

    /// Looks up the address at `coord`, or `None` if nothing usable came back
    pub async fn resolve(&self, coord: Coordinate) -> Option<AddressRecord> {
        match self.fetch(coord).await.and_then(normalize_address) {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                tracing::debug!(%coord, "Address response had no populated fields");
                None
            }
            Err(e) => {
                tracing::warn!(kind = e.kind(), %coord, error = %e, "Address lookup failed");
                None
            }
        }
    }

    fn request_url(&self, coord: Coordinate) -> String {
        format!(
            "{}/reverse?format=json&lat={}&lon={}&zoom={}&addressdetails=1",
            self.base_url, coord.latitude, coord.longitude, REVERSE_ZOOM
        )
    }

    async fn fetch(&self, coord: Coordinate) -> Result<NominatimResponse, FetchError> {
        let url = self.request_url(coord);
        tracing::debug!("Requesting address: {}", url);

        // Status is not checked: error pages fail to decode or lack `address`.
        let body = self
            .client
            .get(&url)
            .header(header::ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await?
            .text()
            .await?;

        Ok(serde_json::from_str(&body)?)
    }
}

/// Maps a Nominatim payload onto an [`AddressRecord`].
///
/// A missing `address` object is a schema error. A present but useless one
/// yields `Ok(None)`, so an empty record never reaches the caller.
pub fn normalize_address(response: NominatimResponse) -> Result<Option<AddressRecord>, FetchError> {
    let address = response.address.ok_or(FetchError::Schema("address"))?;

    let record = AddressRecord {
        full: non_empty(response.display_name),
        province: non_empty(address.state),
        city: non_empty(address.city)
            .or_else(|| non_empty(address.town))
            .or_else(|| non_empty(address.village)),
        district: non_empty(address.suburb).or_else(|| non_empty(address.county)),
        road: non_empty(address.road),
    };

    if record.is_empty() {
        Ok(None)
    } else {
        Ok(Some(record))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
