use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use vitrina_core::{
    Building, BuildingId, BuildingStore, Exhibit, ExhibitId, ExhibitStore, Gateway, HistoryRecord,
    HistoryStore, LifecycleStatus, Location, LocationDraft, LocationId, LocationStore,
};

use crate::error::RestError;
use crate::wire::{
    BuildingDto, Envelope, ExhibitDto, HistoryDto, LifecyclePatch, LocationDto, LocationPayload,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api/v1";

/// Client for the museum inventory REST backend.
pub struct MuseumClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl MuseumClient {
    /// Creates a client without credentials.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.header("Authorization", format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// Sends the request and unwraps the `data` field of the envelope.
    async fn call<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Option<T>, RestError> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|body| body.get("message")?.as_str().map(str::to_string))
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(RestError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&text)?;
        if envelope.data.is_none() {
            debug!(message = ?envelope.message, "response carried no data");
        }
        Ok(envelope.data)
    }

    /// GET of a collection. Null `data` is an empty list; every error,
    /// including 404, is returned as is.
    async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, RestError> {
        Ok(self
            .call(self.request(Method::GET, path))
            .await?
            .unwrap_or_default())
    }

    /// GET of a single resource that maps a 404 to `None`.
    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, RestError> {
        match self.call(self.request(Method::GET, path)).await {
            Err(RestError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                debug!(path, "resource not found");
                Ok(None)
            }
            other => other,
        }
    }

    async fn submit<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, RestError> {
        self.call(self.request(method, path).json(body))
            .await?
            .ok_or_else(|| RestError::Malformed(format!("empty response from {}", path)))
    }
}

impl Gateway for MuseumClient {
    type Error = RestError;
}

impl LocationStore for MuseumClient {
    #[instrument(skip(self))]
    async fn list_locations(&self) -> Result<Vec<Location>, Self::Error> {
        let locations: Vec<LocationDto> = self.list("/location").await?;
        Ok(locations.into_iter().map(Location::from).collect())
    }

    #[instrument(skip_all, fields(exhibit = draft.exhibit))]
    async fn create_location(&self, draft: &LocationDraft) -> Result<Location, Self::Error> {
        let dto: LocationDto = self
            .submit(Method::POST, "/location", &LocationPayload::from(draft))
            .await?;
        Ok(dto.into())
    }

    #[instrument(skip(self, draft), fields(exhibit = draft.exhibit))]
    async fn update_location(
        &self,
        id: LocationId,
        draft: &LocationDraft,
    ) -> Result<Location, Self::Error> {
        let dto: LocationDto = self
            .submit(
                Method::PATCH,
                &format!("/location/{}", id),
                &LocationPayload::from(draft),
            )
            .await?;
        Ok(dto.into())
    }
}

impl ExhibitStore for MuseumClient {
    #[instrument(skip(self))]
    async fn get_exhibit(&self, id: ExhibitId) -> Result<Option<Exhibit>, Self::Error> {
        let dto: Option<ExhibitDto> = self.fetch(&format!("/item-objects/{}", id)).await?;
        Ok(dto.map(Exhibit::from))
    }

    #[instrument(skip(self))]
    async fn set_lifecycle_status(
        &self,
        id: ExhibitId,
        status: LifecycleStatus,
    ) -> Result<Exhibit, Self::Error> {
        let dto: ExhibitDto = self
            .submit(
                Method::PATCH,
                &format!("/item-objects/{}", id),
                &LifecyclePatch {
                    lifecycle_status: status,
                },
            )
            .await?;
        Ok(dto.into())
    }
}

impl HistoryStore for MuseumClient {
    #[instrument(skip_all, fields(exhibit = record.exhibit))]
    async fn append_history(&self, record: &HistoryRecord) -> Result<HistoryRecord, Self::Error> {
        let dto: HistoryDto = self
            .submit(Method::POST, "/history", &HistoryDto::from(record))
            .await?;
        HistoryRecord::try_from(dto)
    }

    #[instrument(skip(self))]
    async fn list_history(&self) -> Result<Vec<HistoryRecord>, Self::Error> {
        let records: Vec<HistoryDto> = self.list("/history").await?;
        records.into_iter().map(HistoryRecord::try_from).collect()
    }
}

impl BuildingStore for MuseumClient {
    #[instrument(skip(self))]
    async fn list_buildings(&self) -> Result<Vec<Building>, Self::Error> {
        let buildings: Vec<BuildingDto> = self.list("/building").await?;
        Ok(buildings.into_iter().map(Building::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_building(&self, id: BuildingId) -> Result<Option<Building>, Self::Error> {
        let dto: Option<BuildingDto> = self.fetch(&format!("/building/{}", id)).await?;
        Ok(dto.map(Building::from))
    }
}
