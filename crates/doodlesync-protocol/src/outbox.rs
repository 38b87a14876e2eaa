//! The sending seam between producers of messages and the transport.

use crate::Message;

/// Something that can accept outbound [`Message`]s.
///
/// The drawing surface depends on this trait instead of a concrete
/// transport, so it can be driven by a live connection in production and
/// by a plain `Vec` in tests. Sending is fire-and-forget: implementations
/// drop the message (and may log) when the channel is not open.
pub trait Outbox {
    /// Returns `true` if a message sent now would reach the wire.
    fn is_open(&self) -> bool;

    /// Queues `message` for delivery.
    fn send(&self, message: Message);
}

impl<T: Outbox + ?Sized> Outbox for &T {
    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn send(&self, message: Message) {
        (**self).send(message);
    }
}
