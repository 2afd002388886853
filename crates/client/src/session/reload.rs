//! Full-reload hook fired on account switch.
//!
//! Switching accounts does not try to patch the state of every live
//! resource. The host throws its client state away and rebuilds it under
//! the new token, so no resource can ever mix data from two identities.

use tokio::sync::watch;
use tracing::info;

/// Something that can rebuild the consuming application.
pub trait Reloader: Send + Sync {
    /// Discard client state and start over under the current token.
    fn reload(&self);
}

/// Broadcasts reload requests as an increasing epoch.
///
/// Hosts hold a [`watch::Receiver`] from [`ReloadSignal::subscribe`] and
/// rebuild whenever it changes.
#[derive(Debug)]
pub struct ReloadSignal {
    tx: watch::Sender<u64>,
}

impl ReloadSignal {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    /// Receiver that observes every reload epoch from now on.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }

    /// Number of reloads requested so far.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        *self.tx.borrow()
    }
}

impl Default for ReloadSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl Reloader for ReloadSignal {
    fn reload(&self) {
        self.tx.send_modify(|epoch| *epoch += 1);
        info!(epoch = self.epoch(), "Reload requested");
    }
}

/// Reloader for hosts with nothing to rebuild, such as one-shot CLI commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReload;

impl Reloader for NoReload {
    fn reload(&self) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_see_each_reload() {
        let signal = ReloadSignal::new();
        let mut rx = signal.subscribe();

        signal.reload();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);

        signal.reload();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 2);
        assert_eq!(signal.epoch(), 2);
    }

    #[test]
    fn test_reload_without_subscribers() {
        let signal = ReloadSignal::new();
        signal.reload();
        assert_eq!(signal.epoch(), 1);
    }
}
