use std::fmt::Display;
use std::pin::Pin;

use eas_primitives::Event;
use eventsource_stream::Eventsource;
use futures::{future, Stream, StreamExt};

use crate::error::{ClientError, Result};

// type alias for the stream of committed events pushed by the server
pub type EventStream = Pin<Box<dyn Stream<Item = Result<Event>> + Send>>;

/// Decode a `text/event-stream` byte stream into committed events.
///
/// Frames may be split anywhere, including inside a multi-byte character.
/// Keep-alive comments and frames without data are dropped.
pub fn decode_events<S, B, E>(body: S) -> EventStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let stream = body
        .eventsource()
        .filter(|frame| future::ready(!matches!(frame, Ok(f) if f.data.is_empty())))
        .map(|frame| {
            let frame = frame.map_err(|e| ClientError::ServerSubscriptionError(e.to_string()))?;
            serde_json::from_str::<Event>(&frame.data)
                .map_err(|e| ClientError::EventParsingError(e.to_string()))
        });
    Box::pin(stream)
}

/// Turn a streaming response body into a stream of events.
pub fn event_stream(response: reqwest::Response) -> EventStream {
    decode_events(response.bytes_stream())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    use eas_primitives::alloy::primitives::{Address, B256};
    use eas_primitives::SchemaRecord;

    fn chunks(parts: Vec<Vec<u8>>) -> EventStream {
        decode_events(futures::stream::iter(
            parts.into_iter().map(Ok::<_, Infallible>),
        ))
    }

    fn frame(event: &Event) -> Vec<u8> {
        format!(
            "event: {}\ndata: {}\n\n",
            event.name(),
            serde_json::to_string(event).unwrap()
        )
        .into_bytes()
    }

    #[tokio::test]
    async fn decodes_split_frames() {
        let event = Event::Indexed {
            uid: B256::repeat_byte(1),
        };
        let bytes = frame(&event);
        let (head, tail) = bytes.split_at(10);

        let events: Vec<_> = chunks(vec![head.to_vec(), tail.to_vec()]).collect().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_ref().unwrap(), &event);
    }

    #[tokio::test]
    async fn keeps_characters_split_across_chunks() {
        let event = Event::Registered {
            uid: B256::repeat_byte(2),
            registerer: Address::ZERO,
            schema: SchemaRecord {
                uid: B256::repeat_byte(2),
                resolver: Address::ZERO,
                revocable: true,
                schema: "string café".to_string(),
            },
        };
        let bytes = frame(&event);
        let accent = bytes
            .windows(2)
            .position(|pair| pair == "é".as_bytes())
            .unwrap();
        let (head, tail) = bytes.split_at(accent + 1);

        let events: Vec<_> = chunks(vec![head.to_vec(), tail.to_vec()]).collect().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_ref().unwrap(), &event);
    }

    #[tokio::test]
    async fn skips_keep_alive_comments() {
        let event = Event::Indexed {
            uid: B256::repeat_byte(3),
        };
        let events: Vec<_> = chunks(vec![b":\n\n".to_vec(), frame(&event)]).collect().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_ref().unwrap(), &event);
    }

    #[tokio::test]
    async fn reports_malformed_data() {
        let events: Vec<_> = chunks(vec![b"data: {\"event\":\"Minted\"}\n\n".to_vec()])
            .collect()
            .await;
        assert!(matches!(
            events.as_slice(),
            [Err(ClientError::EventParsingError(_))]
        ));
    }
}
