//! Out-of-band message dispatch
//!
//! Security codes and invitation tokens leave the system through this
//! seam. Dispatch is best-effort by contract: implementations log and
//! swallow their own failures, and a slow or failed send never fails the
//! enclosing operation.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

/// Template name for security-code mail.
pub const TEMPLATE_SECURITY_CODE: &str = "security_code";

/// Template name for invitation mail.
pub const TEMPLATE_INVITATION: &str = "invitation";

/// Outbound message dispatch seam.
///
/// The transport (SMTP, SMS, push) lives outside this subsystem; consumers
/// only hand over a destination, a template name, and the template
/// context. Implementations must not propagate failure to the caller.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Send one message, best-effort.
    async fn send_message(&self, destination: &str, template: &str, context: Value);
}

/// Dispatcher that drops every message.
///
/// Useful for callers that do not wire a transport (bootstrap, batch
/// jobs).
#[derive(Debug, Default)]
pub struct NullDispatcher;

#[async_trait]
impl Dispatcher for NullDispatcher {
    async fn send_message(&self, destination: &str, template: &str, _context: Value) {
        info!(%destination, %template, "dropping outbound message (null dispatcher)");
    }
}

/// A message recorded by [`MemoryDispatcher`].
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// Destination address
    pub destination: String,
    /// Template name
    pub template: String,
    /// Template context
    pub context: Value,
}

/// Dispatcher that records messages in memory.
///
/// This is the test double: assertions read back what would have been
/// sent.
#[derive(Debug, Default)]
pub struct MemoryDispatcher {
    sent: Arc<RwLock<Vec<OutboundMessage>>>,
}

impl MemoryDispatcher {
    /// Create a new, empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages recorded so far, oldest first.
    pub async fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl Dispatcher for MemoryDispatcher {
    async fn send_message(&self, destination: &str, template: &str, context: Value) {
        self.sent.write().await.push(OutboundMessage {
            destination: destination.to_string(),
            template: template.to_string(),
            context,
        });
    }
}
