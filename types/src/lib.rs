mod error;
pub mod format;
pub mod loyalty;
pub mod models;
pub mod role;
pub mod session;
pub mod table;
pub mod upload;

pub use error::{Error, Result};
pub use role::{Role, RouteError, dashboard_path};
pub use session::{CurrentUser, Section};

// FIXME: We can do this better I think.
#[doc(hidden)]
pub use anyhow::anyhow as internal_anyhow_dont_use;
