// Application layer - the session that owns the current sheet and the
// snapshots handed to whatever renders it (console, exporter).

pub mod error;
pub mod session;
pub mod snapshot;

pub use error::*;
pub use session::*;
pub use snapshot::*;
