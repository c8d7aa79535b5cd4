//! Ticket queue that admits serialized mutations one at a time, in the order
//! their tickets were issued.
//!
//! Tickets are issued synchronously when a mutation is received, so the queue
//! order never depends on which task the runtime happens to poll first.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

#[derive(Default)]
struct Counter {
    issued: u64,
    released: BTreeSet<u64>,
}

pub(crate) struct Turnstile {
    counter: Mutex<Counter>,
    serving: watch::Sender<u64>,
}

impl Turnstile {
    pub(crate) fn new() -> Arc<Self> {
        let (serving, _) = watch::channel(0);
        Arc::new(Self {
            counter: Mutex::new(Counter::default()),
            serving,
        })
    }

    pub(crate) fn issue(self: &Arc<Self>) -> Ticket {
        let mut counter = self.counter.lock().unwrap_or_else(PoisonError::into_inner);
        let number = counter.issued;
        counter.issued += 1;
        Ticket {
            turnstile: Arc::clone(self),
            number,
        }
    }

    /// Marks `number` done and moves the serving counter past every
    /// consecutive released ticket. Tickets dropped before their turn are
    /// skipped once the queue reaches them.
    fn release(&self, number: u64) {
        let mut counter = self.counter.lock().unwrap_or_else(PoisonError::into_inner);
        counter.released.insert(number);
        let mut serving = *self.serving.borrow();
        while counter.released.remove(&serving) {
            serving += 1;
        }
        self.serving.send_replace(serving);
    }
}

/// Place in the writer queue. Dropping it lets the next ticket through.
pub(crate) struct Ticket {
    turnstile: Arc<Turnstile>,
    number: u64,
}

impl Ticket {
    /// Resolves once every earlier ticket has been released.
    pub(crate) async fn wait_turn(&self) {
        let mut serving = self.turnstile.serving.subscribe();
        // the sender lives as long as this ticket, so the channel stays open
        let _ = serving.wait_for(|next| *next >= self.number).await;
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.turnstile.release(self.number);
    }
}
