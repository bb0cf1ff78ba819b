//! Mailbox Actor primitive
//!
//! Every actor is a plain struct composed with a [`Mailbox`] and driven by
//! [`spawn`] on its own OS thread:
//!
//! ```text
//! Address::post ──┐
//! Address::post ──┼──> [ unbounded FIFO ] ──> Mailbox::receive ──> Actor::handle
//! Address::post ──┘      (crossbeam)            (one worker)
//! ```
//!
//! `Address` is cloneable and may be used from any thread. `Mailbox` is not
//! `Clone`, so a queue can never have more than one consumer.

use std::io;
use std::ops::ControlFlow;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};

/// Create a connected address/mailbox pair.
pub fn mailbox<M>() -> (Address<M>, Mailbox<M>) {
    let (tx, rx) = channel::unbounded();
    (Address { tx }, Mailbox { rx })
}

/// Producer side of an actor's mailbox.
pub struct Address<M> {
    tx: Sender<M>,
}

impl<M> Clone for Address<M> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<M> Address<M> {
    /// Append a message to the tail of the mailbox. Never blocks.
    ///
    /// Posting to an actor that has already exited drops the message.
    pub fn post(&self, msg: M) {
        if self.tx.send(msg).is_err() {
            crate::debug!("actor"; "message dropped: receiver has exited");
        }
    }
}

/// Consumer side of an actor's mailbox.
pub struct Mailbox<M> {
    rx: Receiver<M>,
}

impl<M> Mailbox<M> {
    /// Block until the next message arrives.
    ///
    /// Returns `None` once every [`Address`] has been dropped and the queue
    /// is drained; the actor is being torn down.
    pub fn receive(&self) -> Option<M> {
        self.rx.recv().ok()
    }

    #[cfg(test)]
    pub fn receive_timeout(&self, timeout: std::time::Duration) -> Option<M> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Message-driven component run on a dedicated thread.
pub trait Actor: Send + 'static {
    type Msg: Send + 'static;

    /// Thread name, also used as the log prefix.
    fn name(&self) -> String;

    /// Handle one message. `Break` ends the worker loop.
    fn handle(&mut self, msg: Self::Msg) -> ControlFlow<()>;

    /// Called exactly once after the worker loop ends, however it ended.
    fn stopped(&mut self) {}
}

/// Start `actor` on its own thread, consuming `mailbox` until the actor
/// breaks out of its loop or every address is dropped.
pub fn spawn<A: Actor>(mut actor: A, mailbox: Mailbox<A::Msg>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new().name(actor.name()).spawn(move || {
        while let Some(msg) = mailbox.receive() {
            if actor.handle(msg).is_break() {
                break;
            }
        }
        actor.stopped();
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_fifo_single_producer() {
        let (addr, mb) = mailbox();
        for i in 0..100 {
            addr.post(i);
        }
        let got: Vec<i32> = (0..100).filter_map(|_| mb.receive()).collect();
        assert_eq!(got, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_per_producer_order_preserved() {
        let (addr, mb) = mailbox::<(usize, usize)>();
        let producers: Vec<_> = (0..4)
            .map(|p| {
                let addr = addr.clone();
                thread::spawn(move || {
                    for i in 0..500 {
                        addr.post((p, i));
                    }
                })
            })
            .collect();
        for handle in producers {
            handle.join().unwrap();
        }
        drop(addr);

        let mut next = [0usize; 4];
        while let Some((p, i)) = mb.receive() {
            assert_eq!(i, next[p], "producer {p} out of order");
            next[p] += 1;
        }
        assert_eq!(next, [500; 4]);
    }

    #[test]
    fn test_receive_returns_none_after_teardown() {
        let (addr, mb) = mailbox::<u8>();
        addr.post(7);
        drop(addr);
        assert_eq!(mb.receive(), Some(7));
        assert_eq!(mb.receive(), None);
    }

    #[test]
    fn test_post_after_exit_is_silent() {
        let (addr, mb) = mailbox::<u8>();
        drop(mb);
        addr.post(1);
    }

    struct Counter {
        handled: Arc<AtomicUsize>,
        stopped: Arc<AtomicUsize>,
    }

    impl Actor for Counter {
        type Msg = Option<u32>;

        fn name(&self) -> String {
            "counter".into()
        }

        fn handle(&mut self, msg: Self::Msg) -> ControlFlow<()> {
            match msg {
                Some(_) => {
                    self.handled.fetch_add(1, Ordering::SeqCst);
                    ControlFlow::Continue(())
                }
                None => ControlFlow::Break(()),
            }
        }

        fn stopped(&mut self) {
            self.stopped.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counter() -> (Counter, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let handled = Arc::new(AtomicUsize::new(0));
        let stopped = Arc::new(AtomicUsize::new(0));
        let actor = Counter {
            handled: Arc::clone(&handled),
            stopped: Arc::clone(&stopped),
        };
        (actor, handled, stopped)
    }

    #[test]
    fn test_spawn_break_stops_once() {
        let (actor, handled, stopped) = counter();
        let (addr, mb) = mailbox();
        let handle = spawn(actor, mb).unwrap();

        addr.post(Some(1));
        addr.post(Some(2));
        addr.post(None);
        addr.post(Some(3));
        handle.join().unwrap();

        assert_eq!(handled.load(Ordering::SeqCst), 2);
        assert_eq!(stopped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_spawn_teardown_stops_once() {
        let (actor, handled, stopped) = counter();
        let (addr, mb) = mailbox();
        let handle = spawn(actor, mb).unwrap();

        addr.post(Some(1));
        drop(addr);
        handle.join().unwrap();

        assert_eq!(handled.load(Ordering::SeqCst), 1);
        assert_eq!(stopped.load(Ordering::SeqCst), 1);
    }
}
