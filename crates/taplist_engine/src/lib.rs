//! Taplist engine: page fetching, table parsing, availability store
//! clients and the background executor behind the core's effects.
mod decode;
mod engine;
mod fetch;
mod identity;
mod overlay;
mod persist;
mod store;
mod table;
mod types;

pub use decode::{decode_page, DecodeError, DecodedPage};
pub use engine::{load_document, Clock, EngineConfig, EngineHandle};
pub use fetch::{FetchSettings, Fetcher, ProxyMode, ReqwestFetcher};
pub use identity::{ActorIdentity, IdentityError, ACTOR_FILE_NAME};
pub use overlay::{load_availability, toggle_availability};
pub use persist::{ensure_data_dir, AtomicFileWriter, PersistError};
pub use store::{
    AvailabilityRow, AvailabilityStore, MemoryAvailabilityStore, RestAvailabilityStore, StoreError,
};
pub use table::parse_table_document;
pub use types::{EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput};
