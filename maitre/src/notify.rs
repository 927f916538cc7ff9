//! Outbound notifications.
//!
//! Delivery is best effort: the reservation writer logs and discards any
//! error a [`Notifier`] returns.

use std::sync::Mutex;

use crate::error::{Error, Result};

/// Delivers messages to customers and guests.
///
/// # Examples
///
/// ```
/// use maitre::notify::{LogNotifier, Notifier};
///
/// let notifier = LogNotifier;
/// notifier
///     .send_email("ada@example.com", "Your table", "See you at 19:00")
///     .unwrap();
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Sends an email.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be handed off for delivery.
    fn send_email(&self, address: &str, subject: &str, body: &str) -> Result<()>;
}

/// Notifier that writes each message to the log instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send_email(&self, address: &str, subject: &str, body: &str) -> Result<()> {
        log::info!("email to {address}: {subject}");
        log::debug!("email body: {body}");
        Ok(())
    }
}

/// A message captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    /// Recipient.
    pub address: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
}

/// In-memory notifier that records every message, optionally failing.
///
/// # Examples
///
/// ```
/// use maitre::notify::{Notifier, RecordingNotifier};
///
/// let notifier = RecordingNotifier::new();
/// notifier.send_email("a@example.com", "hi", "body").unwrap();
/// assert_eq!(notifier.sent().len(), 1);
///
/// let broken = RecordingNotifier::failing();
/// assert!(broken.send_email("a@example.com", "hi", "body").is_err());
/// ```
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentEmail>>,
    fail: bool,
}

impl RecordingNotifier {
    /// Creates a notifier that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a notifier that rejects every message.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Returns the messages accepted so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn send_email(&self, address: &str, subject: &str, body: &str) -> Result<()> {
        if self.fail {
            return Err(Error::Notification {
                address: address.to_string(),
                reason: "delivery disabled".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(SentEmail {
                address: address.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
        Ok(())
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn send_email(&self, address: &str, subject: &str, body: &str) -> Result<()> {
        (**self).send_email(address, subject, body)
    }
}
