use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Cooperative cancellation was requested by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("fixed array generation was cancelled")]
pub struct Cancelled;

/// Shared cancellation flag checked before discovery, resolution and synthesis
/// of every candidate.
///
/// Clones observe the same flag. [`Cancellation::never`] (also the `Default`)
/// can not be cancelled.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    flag: Option<Arc<AtomicBool>>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self {
            flag: Some(Arc::new(AtomicBool::new(false))),
        }
    }

    pub fn never() -> Self {
        Self { flag: None }
    }

    pub fn cancel(&self) {
        if let Some(flag) = &self.flag {
            flag.store(true, Ordering::Release);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }

    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = Cancellation::new();
        let observer = token.clone();
        assert_eq!(observer.check(), Ok(()));
        token.cancel();
        assert_eq!(observer.check(), Err(Cancelled));
    }

    #[test]
    fn never_ignores_cancel() {
        let token = Cancellation::never();
        token.cancel();
        assert!(!token.is_cancelled());
    }
}
