use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;

use crate::common::{
    ChatRequestPayload, ClientError, DailyTransit, DailyTransitRequest, LocationResponse,
    Portrait, PortraitRequest, Result, StreamEvent,
};

use super::api::ZodiacApi;

const LOCATION_PATH: &str = "/api/v1/location/resolve";
const CHAT_STREAM_PATH: &str = "/api/v1/chat/stream";
const DAILY_TRANSIT_PATH: &str = "/api/v1/divination/zodiac/daily-transit";
const PORTRAIT_PATH: &str = "/api/v1/divination/zodiac/portrait";

/// `ZodiacApi` over HTTP.
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| ClientError::Parse(err.to_string()))
    }
}

#[async_trait]
impl ZodiacApi for HttpApi {
    async fn resolve_location(&self, city: &str) -> Result<String> {
        let response = self
            .client
            .get(self.url(LOCATION_PATH))
            .query(&[("city", city)])
            .send()
            .await?;
        let location: LocationResponse = Self::decode_json(response).await?;
        Ok(location.coordinates)
    }

    async fn stream_chat(&self, payload: ChatRequestPayload, sink: mpsc::Sender<StreamEvent>) {
        let response = match self
            .client
            .post(self.url(CHAT_STREAM_PATH))
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                log::warn!("Chat stream request failed: {err}");
                deliver(&sink, StreamEvent::TransportFailed(err.to_string())).await;
                return;
            }
        };

        let status = response.status().as_u16();
        let mut body = response.bytes_stream();
        let mut attached = true;
        // The body is read to the end even once nobody is listening.
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(bytes) if bytes.is_empty() || !attached => continue,
                Ok(bytes) => {
                    if sink.send(StreamEvent::Chunk(bytes.to_vec())).await.is_err() {
                        log::debug!("Chat transcript detached; draining remaining stream");
                        attached = false;
                    }
                }
                Err(err) => {
                    log::warn!("Chat stream broke after status {status}: {err}");
                    deliver(&sink, StreamEvent::TransportFailed(err.to_string())).await;
                    return;
                }
            }
        }

        log::debug!("Chat stream finished with status {status}");
        deliver(&sink, StreamEvent::Finished { status }).await;
    }

    async fn daily_transit(&self, request: &DailyTransitRequest) -> Result<DailyTransit> {
        let response = self
            .client
            .post(self.url(DAILY_TRANSIT_PATH))
            .json(request)
            .send()
            .await?;
        Self::decode_json(response).await
    }

    async fn portrait(&self, request: &PortraitRequest) -> Result<(Portrait, serde_json::Value)> {
        let response = self
            .client
            .post(self.url(PORTRAIT_PATH))
            .json(request)
            .send()
            .await?;
        let raw: serde_json::Value = Self::decode_json(response).await?;
        let portrait = serde_json::from_value(raw.clone())
            .map_err(|err| ClientError::Parse(err.to_string()))?;
        Ok((portrait, raw))
    }
}

async fn deliver(sink: &mpsc::Sender<StreamEvent>, event: StreamEvent) {
    if let Err(err) = sink.send(event).await {
        log::debug!("Chat transcript detached; dropped {:?}", err.0);
    }
}
