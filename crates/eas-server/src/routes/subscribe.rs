use axum::{
    extract::{Query, State},
    response::sse::{Event as SseEvent, KeepAlive, Sse},
};
use futures::stream::{select_all, StreamExt};
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;

use crate::app_state::{AppState, EVENT_TOPICS};
use crate::error::{Result, ServerError};

#[derive(Debug, Deserialize)]
pub struct SubscribeQuery {
    /// Comma separated event names, all events when absent.
    pub events: Option<String>,
}

impl SubscribeQuery {
    fn topics(&self) -> Result<Vec<&'static str>> {
        let Some(events) = self.events.as_deref() else {
            return Ok(EVENT_TOPICS.to_vec());
        };

        let mut topics = Vec::new();
        let mut unknown = Vec::new();
        for name in events.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match EVENT_TOPICS.iter().find(|topic| **topic == name) {
                Some(topic) if !topics.contains(topic) => topics.push(*topic),
                Some(_) => {}
                None => unknown.push(name),
            }
        }
        if !unknown.is_empty() {
            return Err(ServerError::UnknownTopics(unknown.join(", ")));
        }
        if topics.is_empty() {
            return Ok(EVENT_TOPICS.to_vec());
        }
        Ok(topics)
    }
}

/// Stream committed events as server-sent events named after the event.
pub async fn subscribe_handler(
    State(state): State<AppState>,
    Query(params): Query<SubscribeQuery>,
) -> Result<Sse<impl futures::Stream<Item = core::result::Result<SseEvent, axum::Error>>>> {
    let topics = params.topics()?;
    tracing::info!(?topics, "new event subscription");

    let receivers = state
        .subscription_manager()
        .subscribe_to_topics(&topics)
        .await;

    let streams = receivers.into_iter().map(|rx| {
        BroadcastStream::new(rx).map(|result| {
            result
                .map_err(|e| axum::Error::new(e.to_string()))
                .and_then(|event| {
                    SseEvent::default()
                        .event(event.name())
                        .json_data(&event)
                        .map_err(|e| axum::Error::new(e.to_string()))
                })
        })
    });

    Ok(Sse::new(select_all(streams))
        .keep_alive(KeepAlive::new().interval(std::time::Duration::from_secs(15))))
}
