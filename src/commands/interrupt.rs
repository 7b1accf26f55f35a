use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Routes Ctrl-C to whatever is running. A lookup or download in flight is
/// cancelled; with nothing in flight the prompt is told to close.
///
/// Install one listener per run: `tokio::signal` keeps its SIGINT handler
/// for the lifetime of the process.
#[derive(Clone, Default)]
pub struct Interrupts {
    active: Arc<Mutex<Option<CancellationToken>>>,
    idle: Arc<Notify>,
}

impl Interrupts {
    /// Registers a new operation and returns the token Ctrl-C will cancel.
    pub fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Ok(mut active) = self.active.lock() {
            *active = Some(token.clone());
        }
        token
    }

    pub fn finish(&self) {
        if let Ok(mut active) = self.active.lock() {
            active.take();
        }
    }

    pub fn interrupt(&self) {
        let running = self.active.lock().ok().and_then(|mut a| a.take());
        match running {
            Some(token) => {
                tracing::debug!("interrupt: cancelling running operation");
                token.cancel();
            }
            None => self.idle.notify_one(),
        }
    }

    /// Resolves once Ctrl-C arrives while nothing is running.
    pub async fn idle_interrupted(&self) {
        self.idle.notified().await;
    }
}

pub fn listen_for_ctrl_c(interrupts: Interrupts) -> JoinHandle<()> {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            interrupts.interrupt();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn reaches_idle(interrupts: &Interrupts) -> bool {
        tokio::time::timeout(Duration::from_millis(50), interrupts.idle_interrupted())
            .await
            .is_ok()
    }

    #[tokio::test]
    async fn interrupt_cancels_running_operation() {
        let interrupts = Interrupts::default();
        let token = interrupts.begin();

        interrupts.interrupt();

        assert!(token.is_cancelled());
        assert!(!reaches_idle(&interrupts).await);
    }

    #[tokio::test]
    async fn interrupt_with_nothing_running_reaches_prompt() {
        let interrupts = Interrupts::default();
        interrupts.interrupt();
        assert!(reaches_idle(&interrupts).await);
    }

    #[tokio::test]
    async fn interrupts_keep_working_after_a_finished_download() {
        let interrupts = Interrupts::default();

        let first = interrupts.begin();
        interrupts.finish();
        interrupts.interrupt();
        assert!(!first.is_cancelled());
        assert!(reaches_idle(&interrupts).await);

        let second = interrupts.begin();
        interrupts.interrupt();
        assert!(second.is_cancelled());

        interrupts.interrupt();
        assert!(reaches_idle(&interrupts).await);
    }
}
