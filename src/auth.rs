//! Auth-domain models: token kinds, redacted secrets, cached token records, and credentials.

pub mod bundle;
pub mod kind;
pub mod record;
pub mod secret;

pub use bundle::*;
pub use kind::*;
pub use record::*;
pub use secret::*;
