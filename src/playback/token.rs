// Cancellation token - one per background playback task

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared stop flag; clones observe the same flag
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flag() {
        let token = CancellationToken::new();
        let task_side = token.clone();
        assert!(!task_side.is_cancelled());

        token.cancel();
        assert!(task_side.is_cancelled());
    }

    #[test]
    fn test_tokens_are_independent() {
        let first = CancellationToken::new();
        let second = CancellationToken::new();
        first.cancel();
        assert!(!second.is_cancelled());
    }
}
