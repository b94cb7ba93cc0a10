//! Post-commit notification infrastructure.
//!
//! - [`NotificationDispatcher`]: background worker that resolves the
//!   recipient of a committed mutation and delivers through email or the
//!   in-app channel, reporting [`DispatchOutcome`]s on its own channel.
//! - [`EmailDelivery`]: SMTP delivery with plain-text and HTML bodies
//!   rendered from per-recipient template variables.

pub mod dispatcher;
pub mod email;

pub use dispatcher::{
    DeliveryChannel, DispatchError, DispatchOutcome, NotificationDispatcher, NotificationJob,
    NotificationQueue, Recipient,
};
pub use email::{EmailConfig, EmailDelivery, EmailError, EmailSender, OutgoingEmail};
