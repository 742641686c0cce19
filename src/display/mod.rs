//! Display Router Module
//!
//! Four independent output regions fed by display intents: Terminal and
//! Profile as append-only histories, WorksList and WorkDetail as replaced
//! current-result views.

pub mod intent;
pub mod router;

pub use intent::{DisplayIntent, IntentKind, Region, Style};
pub use router::{DisplayRouter, RegionEntry, RegionLog};
