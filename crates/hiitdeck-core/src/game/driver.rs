//! Runs a [`GameSession`] with a delayed, cancellable AI reply.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::ai::RandomSource;
use super::session::{GameMode, GameSession};
use crate::events::Event;

/// Pause before the AI answers a human move.
pub const AI_DELAY: Duration = Duration::from_millis(500);

type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

struct Inner<R> {
    session: GameSession,
    rng: R,
}

pub struct GameDriver<R> {
    inner: Arc<Mutex<Inner<R>>>,
    delay: Duration,
    listener: Listener,
    handle: Option<JoinHandle<()>>,
}

impl<R: RandomSource + Send + 'static> GameDriver<R> {
    pub fn new(mode: GameMode, rng: R) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                session: GameSession::new(mode),
                rng,
            })),
            delay: AI_DELAY,
            listener: Arc::new(|_: &Event| {}),
            handle: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn on_update(mut self, listener: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        self.listener = Arc::new(listener);
        self
    }

    /// Human move. Schedules the AI reply when one is due. Must be called
    /// from within a tokio runtime.
    pub fn click(&mut self, index: usize) {
        let (events, ticket, snapshot) = {
            let mut inner = lock(&self.inner);
            let (events, ticket) = inner.session.click(index);
            (events, ticket, inner.session.snapshot())
        };
        notify(&self.listener, &events, &snapshot);

        let Some(ticket) = ticket else {
            return;
        };
        let inner = Arc::clone(&self.inner);
        let listener = Arc::clone(&self.listener);
        let delay = self.delay;
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let (events, snapshot) = {
                let mut guard = lock(&inner);
                let Inner { session, rng } = &mut *guard;
                let events = session.resolve_ai(ticket, rng);
                (events, session.snapshot())
            };
            notify(&listener, &events, &snapshot);
        }));
    }

    pub fn reset(&mut self) {
        let (event, snapshot) = {
            let mut inner = lock(&self.inner);
            (inner.session.reset(), inner.session.snapshot())
        };
        self.cancel();
        notify(&self.listener, &[event], &snapshot);
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        let changed = {
            let mut inner = lock(&self.inner);
            inner
                .session
                .set_mode(mode)
                .map(|event| (event, inner.session.snapshot()))
        };
        if let Some((event, snapshot)) = changed {
            self.cancel();
            notify(&self.listener, &[event], &snapshot);
        }
    }

    /// Resolves once a scheduled AI reply has been played or dropped.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::error!("AI task failed: {e}");
                }
            }
        }
    }

    pub fn snapshot(&self) -> Event {
        lock(&self.inner).session.snapshot()
    }

    /// Read the session under the lock.
    pub fn with_session<T>(&self, f: impl FnOnce(&GameSession) -> T) -> T {
        f(&lock(&self.inner).session)
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl<R> Drop for GameDriver<R> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

fn notify(listener: &Listener, events: &[Event], snapshot: &Event) {
    if events.is_empty() {
        return;
    }
    for event in events {
        listener(event);
    }
    listener(snapshot);
}

fn lock<R>(inner: &Mutex<Inner<R>>) -> MutexGuard<'_, Inner<R>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}
