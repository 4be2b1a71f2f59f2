//! Actor system integration for inbound messages.
//!
//! Messages picked up from a mediator can be handed to any callback
//! implementing [`OnMessageCallback`]: a closure, or an actix actor through
//! [`ActorCallback`].

use actix::prelude::*;
use wallet_didcomm_core::Message as CoreMessage;

/// A message delivered by the mediator, with the id of the attachment that
/// carried it.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Id of the delivery attachment, used to acknowledge the message
    pub attachment_id: String,
    /// The unpacked message
    pub message: CoreMessage,
}

impl actix::Message for InboundMessage {
    type Result = ();
}

/// Receives messages from a live mailbox subscription.
pub trait OnMessageCallback: Send + Sync {
    /// Called once per inbound message.
    fn on_message(&self, attachment_id: String, message: CoreMessage);
}

impl<F> OnMessageCallback for F
where
    F: Fn(String, CoreMessage) + Send + Sync,
{
    fn on_message(&self, attachment_id: String, message: CoreMessage) {
        self(attachment_id, message);
    }
}

/// Forwards inbound messages to an actor.
pub struct ActorCallback(pub Recipient<InboundMessage>);

impl OnMessageCallback for ActorCallback {
    fn on_message(&self, attachment_id: String, message: CoreMessage) {
        self.0.do_send(InboundMessage {
            attachment_id,
            message,
        });
    }
}

/// A simple logging actor that logs all received messages.
pub struct LoggingActor {
    /// The name of this actor (for logging).
    name: String,
}

impl LoggingActor {
    /// Creates a new logging actor.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of this actor
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Actor for LoggingActor {
    type Context = Context<Self>;
}

impl Handler<InboundMessage> for LoggingActor {
    type Result = ();

    fn handle(&mut self, msg: InboundMessage, _ctx: &mut Self::Context) {
        tracing::info!(
            actor = %self.name,
            attachment_id = %msg.attachment_id,
            message_type = %msg.message.piuri,
            message_id = %msg.message.id,
            "Received message"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Collector {
        received: Vec<String>,
    }

    impl Actor for Collector {
        type Context = Context<Self>;
    }

    impl Handler<InboundMessage> for Collector {
        type Result = ();

        fn handle(&mut self, msg: InboundMessage, _ctx: &mut Self::Context) {
            self.received.push(msg.attachment_id);
        }
    }

    struct Received;

    impl actix::Message for Received {
        type Result = Vec<String>;
    }

    impl Handler<Received> for Collector {
        type Result = MessageResult<Received>;

        fn handle(&mut self, _msg: Received, _ctx: &mut Self::Context) -> Self::Result {
            MessageResult(self.received.clone())
        }
    }

    #[actix_rt::test]
    async fn test_actor_callback() {
        let collector = Collector::default().start();
        let callback = ActorCallback(collector.clone().recipient());

        callback.on_message("a1".into(), CoreMessage::new("test", "{}"));
        callback.on_message("a2".into(), CoreMessage::new("test", "{}"));

        let received = collector.send(Received).await.unwrap();
        assert_eq!(received, vec!["a1", "a2"]);
    }

    #[actix_rt::test]
    async fn test_logging_actor() {
        let actor = LoggingActor::new("test").start();
        let message = CoreMessage::new("test", "{}")
            .from("did:example:alice")
            .to("did:example:bob");

        actor
            .send(InboundMessage {
                attachment_id: "a1".into(),
                message,
            })
            .await
            .unwrap();
    }

    #[test]
    fn test_closure_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback = move |id: String, _message: CoreMessage| sink.lock().unwrap().push(id);

        callback.on_message("x".into(), CoreMessage::new("test", ""));
        assert_eq!(*seen.lock().unwrap(), vec!["x"]);
    }
}
