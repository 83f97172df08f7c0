//! sessioncache - timestamped values in a session store
//!
//! Wraps values in a [`CacheEnvelope`] with creation and update times,
//! stores them in a [`SessionStorage`], and hands them back only while they
//! are fresh. Reads of stale or malformed entries remove them.
//!
//! ```
//! use sessioncache::{MemoryStorage, SessionCache};
//!
//! let cache = SessionCache::new(MemoryStorage::new());
//! assert!(cache.write("greeting", "hello"));
//!
//! let envelope = cache.read::<String>("greeting", 5.0).unwrap();
//! assert_eq!(envelope.data, "hello");
//! assert!(envelope.created_at <= envelope.updated_at);
//! ```

pub mod cache;
pub mod cli;
pub mod client;
pub mod clock;
pub mod config;
pub mod envelope;
pub mod error;
pub mod session;
pub mod storage;
pub mod ui;

pub use cache::SessionCache;
pub use client::{invalidate_cache, read_cache, write_cache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use envelope::{CacheEnvelope, ONE_DAY_MS};
pub use error::{CacheError, CacheResult};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
