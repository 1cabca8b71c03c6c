//! Command implementations.

pub mod family;
pub mod profile;
pub mod refresh;
pub mod relationships;
pub mod suggestions;

pub use self::family::{execute_family, execute_graph};
pub use self::profile::execute_profile;
pub use self::refresh::{execute_refresh, execute_types};
pub use self::relationships::execute_relationships;
pub use self::suggestions::{execute_approve, execute_reject, execute_suggestions};
