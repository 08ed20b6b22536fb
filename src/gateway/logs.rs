use async_trait::async_trait;
use tracing::info;
use crate::core::events::DomainEvent;
use crate::core::library::LibraryError;
use crate::gateway::events::EventPublisher;

// LogPublisher writes every domain event to the structured log under a fixed topic
#[derive(Debug)]
pub(crate) struct LogPublisher {
    topic: String,
}

impl LogPublisher {
    pub(crate) fn new(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
        }
    }
}

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn publish(&self, event: &DomainEvent) -> Result<(), LibraryError> {
        let payload = serde_json::to_string(event)?;
        info!(topic = %self.topic, event_id = %event.event_id, kind = ?event.kind,
            key = %event.key, %payload, "domain event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::events::DomainEvent;
    use crate::gateway::events::EventPublisher;
    use crate::gateway::logs::LogPublisher;

    #[tokio::test]
    async fn test_should_publish_to_log() {
        let publisher = LogPublisher::new("test_events");
        let event = DomainEvent::added("books", "catalog", "b1", &"b1").expect("build event");
        publisher.publish(&event).await.expect("should publish");
    }
}
