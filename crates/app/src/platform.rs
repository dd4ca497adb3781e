//! Host platform bridge.
//!
//! The host (Telegram, or a console when running the CLI) owns a single global
//! back action and can hand over the user's phone number on request. Checkout
//! takes over the back action for as long as it is open through a
//! [`BackBinding`], which gives the previous action back when dropped.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tracing::debug;

/// What the host's back affordance does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BackAction {
    /// No back affordance is shown.
    #[default]
    Hidden,

    /// Navigate to a host route.
    Navigate(String),

    /// Step back through checkout.
    Checkout,
}

/// Errors raised by the host platform.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The host cannot share contacts.
    #[error("contact sharing is not available")]
    Unsupported,

    /// The host reported a failure.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Capabilities of the host platform.
#[automock]
#[async_trait]
pub trait PlatformBridge: Send + Sync {
    /// Install `action` as the back action and return the one it replaced.
    fn bind_back_action(&self, action: BackAction) -> BackAction;

    /// Ask the user to share their phone number. `None` when they decline.
    async fn request_contact(&self) -> Result<Option<String>, BridgeError>;
}

/// Checkout's hold on the back action. Dropping it restores the action that
/// was bound before.
pub struct BackBinding {
    bridge: Arc<dyn PlatformBridge>,
    previous: Option<BackAction>,
}

impl std::fmt::Debug for BackBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackBinding")
            .field("previous", &self.previous)
            .finish_non_exhaustive()
    }
}

impl BackBinding {
    /// Bind `action` until the returned guard is dropped.
    #[must_use]
    pub fn acquire(bridge: Arc<dyn PlatformBridge>, action: BackAction) -> Self {
        let previous = bridge.bind_back_action(action);

        debug!(?previous, "back action bound");

        Self {
            bridge,
            previous: Some(previous),
        }
    }
}

impl Drop for BackBinding {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            debug!(?previous, "back action restored");

            self.bridge.bind_back_action(previous);
        }
    }
}

/// Bridge used by the command line: the back action is only tracked, and the
/// shared contact is whatever phone number was configured up front.
#[derive(Debug, Default)]
pub struct ConsoleBridge {
    back: Mutex<BackAction>,
    phone: Option<String>,
}

impl ConsoleBridge {
    /// Create a bridge that shares `phone` when asked for a contact.
    #[must_use]
    pub fn new(phone: Option<String>) -> Self {
        Self {
            back: Mutex::new(BackAction::default()),
            phone,
        }
    }

    /// Currently bound back action.
    pub fn back_action(&self) -> BackAction {
        self.back
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl PlatformBridge for ConsoleBridge {
    fn bind_back_action(&self, action: BackAction) -> BackAction {
        let mut back = self.back.lock().unwrap_or_else(PoisonError::into_inner);

        std::mem::replace(&mut *back, action)
    }

    async fn request_contact(&self) -> Result<Option<String>, BridgeError> {
        Ok(self.phone.clone())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn binding_restores_previous_action_on_drop() {
        let bridge = Arc::new(ConsoleBridge::new(None));
        bridge.bind_back_action(BackAction::Navigate("/catalog".to_string()));

        let binding = BackBinding::acquire(bridge.clone(), BackAction::Checkout);

        assert_eq!(bridge.back_action(), BackAction::Checkout);

        drop(binding);

        assert_eq!(
            bridge.back_action(),
            BackAction::Navigate("/catalog".to_string())
        );
    }

    #[test]
    fn binding_uses_the_bridge_seam() {
        let mut bridge = MockPlatformBridge::new();
        let mut seq = mockall::Sequence::new();

        bridge
            .expect_bind_back_action()
            .once()
            .in_sequence(&mut seq)
            .withf(|action| *action == BackAction::Checkout)
            .return_const(BackAction::Hidden);
        bridge
            .expect_bind_back_action()
            .once()
            .in_sequence(&mut seq)
            .withf(|action| *action == BackAction::Hidden)
            .return_const(BackAction::Checkout);

        drop(BackBinding::acquire(Arc::new(bridge), BackAction::Checkout));
    }

    #[tokio::test]
    async fn console_shares_configured_phone() -> TestResult {
        let bridge = ConsoleBridge::new(Some("+79001234567".to_string()));

        assert_eq!(
            bridge.request_contact().await?.as_deref(),
            Some("+79001234567")
        );

        Ok(())
    }
}
