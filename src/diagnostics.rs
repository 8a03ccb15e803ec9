use crate::constants::LOG_TARGET;
use crate::error::CspWarning;
use parking_lot::Mutex;
use std::sync::Arc;

/// Receives the warnings raised while resolving and applying a policy.
///
/// Implementations must never panic: a diagnostic is informational and the
/// request carries on regardless.
pub trait DiagnosticsSink: Send + Sync {
    fn warn(&self, warning: &CspWarning);
}

impl<T: DiagnosticsSink + ?Sized> DiagnosticsSink for Arc<T> {
    #[inline]
    fn warn(&self, warning: &CspWarning) {
        (**self).warn(warning)
    }
}

impl<T: DiagnosticsSink + ?Sized> DiagnosticsSink for &T {
    #[inline]
    fn warn(&self, warning: &CspWarning) {
        (**self).warn(warning)
    }
}

/// Forwards every warning to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn warn(&self, warning: &CspWarning) {
        log::warn!(target: LOG_TARGET, "{}", warning);
    }
}

/// Keeps warnings in memory so the host can inspect or forward them later.
#[derive(Debug, Default)]
pub struct CollectingSink {
    warnings: Mutex<Vec<CspWarning>>,
}

impl CollectingSink {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<CspWarning> {
        self.warnings.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.warnings.lock().iter().map(ToString::to_string).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.warnings.lock().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.warnings.lock().is_empty()
    }

    pub fn take(&self) -> Vec<CspWarning> {
        std::mem::take(&mut *self.warnings.lock())
    }
}

impl DiagnosticsSink for CollectingSink {
    fn warn(&self, warning: &CspWarning) {
        self.warnings.lock().push(warning.clone());
    }
}
