use std::fmt;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use taplist_core::{BeerKey, TabularDocument};
use taplist_logging::{tap_debug, tap_error};

use crate::decode::decode_page;
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::identity::ActorIdentity;
use crate::overlay::{load_availability, toggle_availability};
use crate::store::AvailabilityStore;
use crate::table::parse_table_document;
use crate::{EngineEvent, FetchError};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub source_url: String,
    pub store: Option<Arc<dyn AvailabilityStore>>,
    pub actor: ActorIdentity,
    pub clock: Clock,
}

impl EngineConfig {
    pub fn new(source_url: impl Into<String>, actor: ActorIdentity) -> Self {
        Self {
            fetch: FetchSettings::default(),
            source_url: source_url.into(),
            store: None,
            actor,
            clock: Arc::new(Utc::now),
        }
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("fetch", &self.fetch)
            .field("source_url", &self.source_url)
            .field("store", &self.store.is_some())
            .field("actor", &self.actor)
            .finish_non_exhaustive()
    }
}

enum EngineCommand {
    FetchDocument,
    LoadAvailability,
    ToggleAvailability { key: BeerKey },
}

struct Worker {
    fetcher: ReqwestFetcher,
    source_url: String,
    store: Option<Arc<dyn AvailabilityStore>>,
    actor: ActorIdentity,
    clock: Clock,
}

pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("taplist-engine")
            .build()?;
        let worker = Arc::new(Worker {
            fetcher: ReqwestFetcher::new(config.fetch),
            source_url: config.source_url,
            store: config.store,
            actor: config.actor,
            clock: config.clock,
        });

        thread::Builder::new()
            .name("taplist-dispatch".into())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let worker = worker.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        let event = worker.handle(command).await;
                        if event_tx.send(event).is_err() {
                            tap_debug!("Engine event dropped; front end has gone away");
                        }
                    });
                }
                runtime.shutdown_timeout(Duration::from_secs(1));
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn fetch_document(&self) {
        self.send(EngineCommand::FetchDocument);
    }

    pub fn load_availability(&self) {
        self.send(EngineCommand::LoadAvailability);
    }

    pub fn toggle_availability(&self, key: BeerKey) {
        self.send(EngineCommand::ToggleAvailability { key });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            tap_error!("Engine dispatch thread is gone; command dropped");
        }
    }
}

impl Worker {
    async fn handle(&self, command: EngineCommand) -> EngineEvent {
        match command {
            EngineCommand::FetchDocument => {
                match load_document(&self.fetcher, &self.source_url).await {
                    Ok(doc) => EngineEvent::DocumentFetched(doc),
                    Err(err) => EngineEvent::DocumentFailed(err),
                }
            }
            EngineCommand::LoadAvailability => {
                match load_availability(self.store.as_deref()).await {
                    Ok(map) => EngineEvent::AvailabilityLoaded(map),
                    Err(err) => EngineEvent::AvailabilityFailed(err),
                }
            }
            EngineCommand::ToggleAvailability { key } => {
                let now = (self.clock)();
                let result =
                    toggle_availability(self.store.as_deref(), &key, self.actor.as_str(), now)
                        .await;
                EngineEvent::ToggleFinished { key, result }
            }
        }
    }
}

/// Fetches the beer-list page and flattens its tables into rows.
pub async fn load_document(
    fetcher: &dyn Fetcher,
    source_url: &str,
) -> Result<TabularDocument, FetchError> {
    let output = fetcher.fetch(source_url).await?;
    let page = decode_page(&output.bytes, output.metadata.content_type.as_deref())?;
    tap_debug!(
        "Decoded {} bytes from {} as {}",
        output.metadata.byte_len,
        output.metadata.final_url,
        page.encoding_label
    );
    Ok(parse_table_document(&page.html))
}
