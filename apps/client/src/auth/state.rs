use tokio::sync::watch;
use tracing::warn;

use super::routes::{guard, nav_links, NavLink, Route};
use super::token_store::TokenStore;

/// Single source of the "signed in" flag.
///
/// The flag is re-derived from the token store on every read and navigation,
/// so there is never a cached value that disagrees with storage. Listeners
/// that want to react to changes can `subscribe`.
pub struct AuthState {
    store: TokenStore,
    tx: watch::Sender<bool>,
}

impl AuthState {
    pub fn new(store: TokenStore) -> Self {
        let signed_in = token_present(&store);
        let (tx, _rx) = watch::channel(signed_in);
        Self { store, tx }
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    pub fn is_authenticated(&self) -> bool {
        self.refresh()
    }

    /// Re-reads storage and notifies subscribers if the flag changed.
    pub fn refresh(&self) -> bool {
        let now = token_present(&self.store);
        self.tx.send_if_modified(|current| {
            if *current == now {
                false
            } else {
                *current = now;
                true
            }
        });
        now
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    pub fn navigate(&self, requested: Route) -> Route {
        guard(requested, self.refresh())
    }

    pub fn nav_links(&self) -> Vec<NavLink> {
        nav_links(self.refresh())
    }
}

fn token_present(store: &TokenStore) -> bool {
    match store.load() {
        Ok(token) => token.is_some(),
        Err(e) => {
            warn!("Token store unreadable, treating as signed out: {e}");
            false
        }
    }
}
