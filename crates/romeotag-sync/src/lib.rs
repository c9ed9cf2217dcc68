//! romeotag sync: Zotero and SHERPA/RoMEO clients, policy reconciliation.

pub mod error;
pub mod http;
pub mod reconcile;
pub mod romeo;
pub mod source;
pub mod zotero;

pub use error::{Result, SyncError};
pub use reconcile::{Outcome, RecordOutcome, Reconciler, RunOptions, RunReport, scoped_query};
pub use romeo::RomeoClient;
pub use source::{ItemQuery, PolicyRegistry, RecordSource, RecordWriter, RegistryQuery};
pub use zotero::ZoteroClient;
