//! Fault boundary around view rendering.

use crate::error::RenderFault;
use serde::{Deserialize, Serialize};

/// What the boundary shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame<T> {
    /// Rendering succeeded.
    Rendered(T),
    /// A fault is latched; show the fallback with a reset action.
    Faulted(RenderFault),
}

impl<T> Frame<T> {
    pub fn is_faulted(&self) -> bool {
        matches!(self, Frame::Faulted(_))
    }
}

/// Isolates render faults from the rest of the session.
///
/// Once a render fails the shell stays faulted, without calling the render
/// closure again, until [`RecoveryShell::reset`]. Resetting clears only the
/// fault flag; catalog and cart are left as they were.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecoveryShell {
    fault: Option<RenderFault>,
}

impl RecoveryShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a render computation inside the boundary.
    pub fn render<T, F>(&mut self, render: F) -> Frame<T>
    where
        F: FnOnce() -> Result<T, RenderFault>,
    {
        if let Some(fault) = &self.fault {
            return Frame::Faulted(fault.clone());
        }
        match render() {
            Ok(view) => Frame::Rendered(view),
            Err(fault) => {
                tracing::error!(error = %fault, "render fault caught by boundary");
                self.fault = Some(fault.clone());
                Frame::Faulted(fault)
            }
        }
    }

    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    pub fn fault(&self) -> Option<&RenderFault> {
        self.fault.as_ref()
    }

    /// Clear the fault flag and resume normal rendering.
    pub fn reset(&mut self) {
        if self.fault.take().is_some() {
            tracing::info!("recovery shell reset");
        }
    }
}
