//! Debounced draft persistence.
//!
//! Every edit schedules a save; a background task coalesces the edits that
//! arrive within the debounce window and writes only the latest draft per
//! guest and property. Save failures are logged and dropped (last write wins).

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::{mpsc, oneshot};

use crate::{
    error::DraftStoreError,
    models::draft::{BookingDraft, DraftKey},
    services::draft_store::DraftStore,
};

enum Command {
    Save(DraftKey, BookingDraft),
    Flush(oneshot::Sender<()>),
    Clear(DraftKey, oneshot::Sender<Result<(), DraftStoreError>>),
}

#[derive(Clone)]
pub struct DraftSaver {
    tx: mpsc::UnboundedSender<Command>,
    store: Arc<dyn DraftStore>,
}

impl DraftSaver {
    /// Start the background writer. Must be called inside a tokio runtime.
    pub fn spawn(store: Arc<dyn DraftStore>, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(store.clone(), debounce, rx));
        Self { tx, store }
    }

    pub fn schedule(&self, key: DraftKey, draft: BookingDraft) {
        if self.tx.send(Command::Save(key, draft)).is_err() {
            log::warn!("Draft saver stopped; dropping draft update");
        }
    }

    /// Write any pending drafts now.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    /// Read the stored draft, including edits that are still pending.
    pub async fn load(&self, key: &DraftKey) -> Result<Option<BookingDraft>, DraftStoreError> {
        self.flush().await;
        self.store.load(key).await
    }

    /// Drop any pending save for the key and delete its stored draft.
    pub async fn clear(&self, key: &DraftKey) -> Result<(), DraftStoreError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(Command::Clear(*key, done_tx))
            .map_err(|_| DraftStoreError::SaverStopped)?;
        done_rx.await.map_err(|_| DraftStoreError::SaverStopped)?
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }
}

async fn run(
    store: Arc<dyn DraftStore>,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    let mut pending: HashMap<DraftKey, BookingDraft> = HashMap::new();

    loop {
        let command = if pending.is_empty() {
            match rx.recv().await {
                Some(command) => command,
                None => break,
            }
        } else {
            match tokio::time::timeout(debounce, rx.recv()).await {
                Ok(Some(command)) => command,
                Ok(None) => {
                    persist(store.as_ref(), &mut pending).await;
                    break;
                }
                Err(_) => {
                    persist(store.as_ref(), &mut pending).await;
                    continue;
                }
            }
        };

        match command {
            Command::Save(key, draft) => {
                pending.insert(key, draft);
            }
            Command::Flush(done) => {
                persist(store.as_ref(), &mut pending).await;
                let _ = done.send(());
            }
            Command::Clear(key, done) => {
                pending.remove(&key);
                let _ = done.send(store.clear(&key).await);
            }
        }
    }

    log::debug!("Draft saver shut down");
}

async fn persist(store: &dyn DraftStore, pending: &mut HashMap<DraftKey, BookingDraft>) {
    for (key, draft) in pending.drain() {
        match store.save(&key, &draft).await {
            Ok(()) => log::debug!("Saved booking draft for resort {}", key.resort_id),
            Err(e) => log::error!(
                "Failed to save booking draft for resort {}: {}",
                key.resort_id,
                e
            ),
        }
    }
}
