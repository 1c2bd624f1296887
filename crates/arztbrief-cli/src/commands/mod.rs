//! Command implementations.

pub mod audit;
pub mod extract;

pub use self::audit::execute_audit;
pub use self::extract::execute_extract;
