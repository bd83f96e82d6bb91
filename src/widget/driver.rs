//! Tokio host for [`SearchBox`].
//!
//! Owns the debounce timer task and the cancellation token of the request in
//! flight. Starting a fetch always cancels the previous token first.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    task::JoinHandle,
    time::sleep,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{
    Effect, Event, SearchBox,
    client::{FetchError, SuggestionClient},
};

struct Host {
    search: SearchBox,
    debounce: Option<JoinHandle<()>>,
    fetch: Option<CancellationToken>,
}

struct Inner {
    host: Mutex<Host>,
    client: Arc<dyn SuggestionClient>,
    navigation: UnboundedSender<String>,
}

#[derive(Clone)]
pub struct SearchBoxDriver {
    inner: Arc<Inner>,
}

impl SearchBoxDriver {
    /// Routes the search box navigates to arrive on the returned receiver.
    pub fn new(
        initial_query: &str,
        client: Arc<dyn SuggestionClient>,
    ) -> (Self, UnboundedReceiver<String>) {
        let (navigation, routes) = unbounded_channel();

        let driver = Self {
            inner: Arc::new(Inner {
                host: Mutex::new(Host {
                    search: SearchBox::new(initial_query),
                    debounce: None,
                    fetch: None,
                }),
                client,
                navigation,
            }),
        };

        (driver, routes)
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> SearchBox {
        self.inner.lock().search.clone()
    }

    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, event: Event) {
        self.inner.dispatch(event);
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        if let Some(timer) = self.debounce.take() {
            timer.abort();
        }
        if let Some(token) = self.fetch.take() {
            token.cancel();
        }
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Host> {
        self.host.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(self: &Arc<Self>, event: Event) {
        let mut host = self.lock();
        let effects = host.search.handle(event);

        for effect in effects {
            self.apply(&mut host, effect);
        }
    }

    fn apply(self: &Arc<Self>, host: &mut Host, effect: Effect) {
        match effect {
            Effect::StartDebounce { generation, delay } => {
                if let Some(timer) = host.debounce.take() {
                    timer.abort();
                }

                let inner = Arc::downgrade(self);
                host.debounce = Some(tokio::spawn(async move {
                    sleep(delay).await;

                    if let Some(inner) = inner.upgrade() {
                        inner.dispatch(Event::DebounceElapsed(generation));
                    }
                }));
            }
            Effect::CancelDebounce => {
                if let Some(timer) = host.debounce.take() {
                    timer.abort();
                }
            }
            Effect::CancelFetch => {
                if let Some(token) = host.fetch.take() {
                    token.cancel();
                }
            }
            Effect::Fetch { generation, query } => {
                let token = CancellationToken::new();
                if let Some(previous) = host.fetch.replace(token.clone()) {
                    previous.cancel();
                }

                let inner = Arc::downgrade(self);
                let client = self.client.clone();
                tokio::spawn(async move {
                    let result = tokio::select! {
                        _ = token.cancelled() => Err(FetchError::Cancelled),
                        result = client.suggest(&query) => result,
                    };

                    let Some(inner) = inner.upgrade() else {
                        return;
                    };

                    let event = match result {
                        Ok(items) => Event::FetchSucceeded { generation, items },
                        Err(FetchError::Cancelled) => {
                            debug!("Suggestion request for {query:?} superseded");
                            Event::FetchFailed { generation, cancelled: true }
                        }
                        Err(e) => {
                            warn!("Suggestion request for {query:?} failed: {e}");
                            Event::FetchFailed { generation, cancelled: false }
                        }
                    };

                    inner.dispatch(event);
                });
            }
            Effect::Navigate(route) => {
                if self.navigation.send(route).is_err() {
                    debug!("Navigation receiver dropped");
                }
            }
        }
    }
}
