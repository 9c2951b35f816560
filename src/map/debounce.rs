use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Trailing-edge debouncer.
///
/// Every [`schedule`](Debouncer::schedule) supersedes the tickets handed out
/// before it. A ticket's [`settle`](DebounceTicket::settle) waits out the
/// delay and reports whether nothing newer was scheduled meanwhile.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    latest: Arc<AtomicU64>,
}

#[derive(Debug)]
pub struct DebounceTicket {
    delay: Duration,
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn schedule(&self) -> DebounceTicket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        DebounceTicket {
            delay: self.delay,
            generation,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Supersede every outstanding ticket.
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

impl DebounceTicket {
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }

    /// Wait for the delay, then report whether this ticket is still the latest.
    pub async fn settle(self) -> bool {
        tokio::time::sleep(self.delay).await;
        self.is_current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_last_ticket_settles() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let first = debouncer.schedule();
        let second = debouncer.schedule();

        let (a, b) = tokio::join!(first.settle(), second.settle());
        assert!(!a);
        assert!(b);
    }

    #[tokio::test(start_paused = true)]
    async fn later_schedule_during_wait_supersedes() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let ticket = debouncer.schedule();

        let waiter = tokio::spawn(ticket.settle());
        tokio::time::sleep(Duration::from_millis(20)).await;
        let _newer = debouncer.schedule();

        assert!(!waiter.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_supersedes() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let ticket = debouncer.schedule();
        debouncer.cancel();
        assert!(!ticket.settle().await);
    }
}
