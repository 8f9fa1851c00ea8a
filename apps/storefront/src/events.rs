//! Failure classification for the status line.

use client_core::{ControllerError, UiEvent};
use shared::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Missing,
    Busy,
    Partial,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    Startup,
    Staging,
    AddToCart,
    Delete,
    Checkout,
    Refresh,
}

impl UiErrorContext {
    pub fn for_event(event: &UiEvent) -> Self {
        match event {
            UiEvent::Increase(_) | UiEvent::Decrease(_) => UiErrorContext::Staging,
            UiEvent::AddToCart(_) => UiErrorContext::AddToCart,
            UiEvent::Delete(_) => UiErrorContext::Delete,
            UiEvent::Checkout => UiErrorContext::Checkout,
            UiEvent::Refresh => UiErrorContext::Refresh,
        }
    }

    fn label(self) -> &'static str {
        match self {
            UiErrorContext::Startup => "startup",
            UiErrorContext::Staging => "staging",
            UiErrorContext::AddToCart => "add to cart",
            UiErrorContext::Delete => "delete",
            UiErrorContext::Checkout => "checkout",
            UiErrorContext::Refresh => "refresh",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_controller(context: UiErrorContext, err: &ControllerError) -> Self {
        let category = match err {
            ControllerError::UnknownItem(_) => UiErrorCategory::Validation,
            ControllerError::CommitInFlight(_) => UiErrorCategory::Busy,
            ControllerError::Store(StoreError::NotFound(_)) => UiErrorCategory::Missing,
            ControllerError::Store(StoreError::PartialCheckout { .. }) => UiErrorCategory::Partial,
            ControllerError::Store(StoreError::InvalidBaseUrl(_)) => UiErrorCategory::Validation,
            ControllerError::Store(StoreError::Network(_)) => UiErrorCategory::Transport,
        };

        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    /// Staged amounts are never lost on failure, so most errors are retryable as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category,
            UiErrorCategory::Transport | UiErrorCategory::Busy | UiErrorCategory::Partial
        )
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_line(&self) -> String {
        let hint = match self.category {
            UiErrorCategory::Transport => "store unreachable; staged amounts kept, retry",
            UiErrorCategory::Busy => "wait for the pending commit to finish",
            UiErrorCategory::Partial => "some lines remain in the cart; run checkout again",
            UiErrorCategory::Missing => "cart line is gone; try 'refresh'",
            UiErrorCategory::Validation => "check the item id",
        };
        format!("{} failed: {} ({hint})", self.context.label(), self.message())
    }
}
