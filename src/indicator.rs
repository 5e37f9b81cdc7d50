//! Recording indicator side effect
//!
//! The appliance asserts an LED while the recorder is active. The trait
//! keeps the GPIO write outside the core; hosts without hardware log the
//! transitions instead.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Output signal asserted while recording is active
pub trait RecordIndicator: Send {
    fn set_active(&mut self, active: bool);
}

/// Indicator that only logs transitions (no hardware attached)
#[derive(Debug, Default)]
pub struct LogIndicator;

impl RecordIndicator for LogIndicator {
    fn set_active(&mut self, active: bool) {
        tracing::debug!("record indicator {}", if active { "on" } else { "off" });
    }
}

/// Shared-flag indicator, observable from other threads
#[derive(Debug, Clone, Default)]
pub struct SharedIndicator(Arc<AtomicBool>);

impl SharedIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl RecordIndicator for SharedIndicator {
    fn set_active(&mut self, active: bool) {
        self.0.store(active, Ordering::SeqCst);
    }
}
