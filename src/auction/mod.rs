// The bid-acceptance rule engine: pure decision functions over product and
// bid snapshots. Nothing in this module touches the database; handlers fetch
// state, call in here, and persist only after a clean verdict.
pub mod error;
pub mod lifecycle;
pub mod ranking;
pub mod validator;

pub use error::Rejection;
pub use lifecycle::ProductStatus;
