//! Context configuration

use crate::runtime::RuntimeContext;
use crate::serial::SerialContext;
use settle_core::Context;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;

/// Errors building an execution context
#[derive(Debug, Error)]
pub enum ContextError {
    /// No handle was configured and the caller is not inside a tokio runtime
    #[error("no tokio runtime available for context '{label}'")]
    NoRuntime {
        /// Label of the context being built
        label: String,
    },
}

/// How submitted jobs are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ordering {
    /// Jobs may run in parallel ([`RuntimeContext`])
    #[default]
    Concurrent,
    /// Jobs run one at a time in submission order ([`SerialContext`])
    Serial,
}

/// Builder for execution contexts.
///
/// # Example
///
/// ```ignore
/// // Serial queue for UI-style callbacks
/// let main = ContextBuilder::new().label("main").serial().build()?;
///
/// // Concurrent context on an explicit runtime
/// let pool = ContextBuilder::new()
///     .label("workers")
///     .handle(runtime.handle().clone())
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    label: String,
    ordering: Ordering,
    handle: Option<Handle>,
}

impl ContextBuilder {
    /// Create a builder with default settings (concurrent, label "default").
    pub fn new() -> Self {
        Self {
            label: "default".to_string(),
            ordering: Ordering::Concurrent,
            handle: None,
        }
    }

    /// Set the label used in logs.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Run jobs one at a time in submission order.
    pub fn serial(mut self) -> Self {
        self.ordering = Ordering::Serial;
        self
    }

    /// Let jobs run in parallel (default).
    pub fn concurrent(mut self) -> Self {
        self.ordering = Ordering::Concurrent;
        self
    }

    /// Submit to this runtime instead of the current one.
    ///
    /// The runtime must have its time driver enabled (`enable_time` or
    /// `enable_all`). Without it, delayed jobs are lost and `delay`,
    /// `timeout` and `retry` never fire.
    pub fn handle(mut self, handle: Handle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Build the context.
    ///
    /// Without an explicit handle this must be called from inside a tokio
    /// runtime.
    pub fn build(self) -> Result<Context, ContextError> {
        let handle = match self.handle {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| ContextError::NoRuntime {
                label: self.label.clone(),
            })?,
        };
        Ok(match self.ordering {
            Ordering::Concurrent => Arc::new(RuntimeContext::new(self.label, handle)),
            Ordering::Serial => Arc::new(SerialContext::new(self.label, handle)),
        })
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
