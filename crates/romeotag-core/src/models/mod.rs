pub mod library;
pub mod policy;
pub mod record;

pub use library::{Collection, LibraryScope, ScopeKind, resolve_collection_key};
pub use policy::{PolicyLookup, Publisher};
pub use record::{ConcurrencyToken, IdentityKey, Record};
