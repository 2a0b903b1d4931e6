use std::{collections::HashMap, sync::Arc};

use tokio::sync::{broadcast, RwLock};

use crate::error::{Result, ServerError};

/// Fan-out of committed events, one broadcast channel per topic.
pub struct SubscriptionManager<M>
where
    M: Clone,
{
    pub channels: Arc<RwLock<HashMap<String, broadcast::Sender<M>>>>,
    pub capacity: usize,
}

impl<M> SubscriptionManager<M>
where
    M: Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// avoids needing a write lock for first time use of a topic
    pub async fn init_channels(&self, topics: &[&str]) {
        let mut map = self.channels.write().await;
        for topic in topics {
            map.entry(topic.to_string())
                .or_insert_with(|| broadcast::channel(self.capacity).0);
        }
    }

    /// Retrieve (or create) the channel sender for a topic.
    pub async fn get_or_create_sender(&self, topic: &str) -> broadcast::Sender<M> {
        if let Some(sender) = self.channels.read().await.get(topic) {
            return sender.clone();
        }
        let mut map = self.channels.write().await;
        map.entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }

    pub async fn subscribe_to_topic(&self, topic: &str) -> broadcast::Receiver<M> {
        self.get_or_create_sender(topic).await.subscribe()
    }

    pub async fn subscribe_to_topics(&self, topics: &[&str]) -> Vec<broadcast::Receiver<M>> {
        let mut receivers = Vec::with_capacity(topics.len());
        for topic in topics {
            let sender = self.get_or_create_sender(topic).await;
            tracing::debug!(topic, receivers = sender.receiver_count(), "new subscriber");
            receivers.push(sender.subscribe());
        }
        receivers
    }

    /// Broadcast a message on one topic, returning the number of receivers.
    pub async fn broadcast(&self, topic: &str, message: M) -> Result<usize> {
        let map = self.channels.read().await;
        let sender = match map.get(topic) {
            Some(sender) => sender.clone(),
            None => {
                return Err(ServerError::BroadcastError(format!(
                    "No channel found for topic {}",
                    topic
                )))
            }
        };
        drop(map);

        if sender.receiver_count() == 0 {
            return Err(ServerError::BroadcastError(format!(
                "No subscribers for topic {}",
                topic
            )));
        }
        sender
            .send(message)
            .map_err(|e| ServerError::BroadcastError(e.to_string()))
    }
}

impl<M> Default for SubscriptionManager<M>
where
    M: Clone,
{
    fn default() -> Self {
        Self::new(1)
    }
}
