//! Seed resolution for map companion tools.
//!
//! A fixed catalog of seeds (map layout + nightlord + the building in every slot) is
//! narrowed down as the user reports what they see. [`core`] holds the catalog and
//! the engine, [`session`] the surface presentation code talks to.

pub mod config;
pub mod core;
pub mod session;

pub use crate::config::{ConfigError, ResolverConfig};
pub use crate::core::catalog::{CatalogError, Seed, SeedCatalog};
pub use crate::core::engine::Engine;
pub use crate::core::types::{MapType, NightlordKey, Phase, SeedId, SlotId};
pub use crate::session::url_state::{UrlState, UrlStateError};
pub use crate::session::{Session, SessionObserver, Snapshot};
