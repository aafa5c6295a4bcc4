//! Transfer strategy for streaming request bodies.
//!
//! [`TransferConfiguration`] carries the per-operation flags, [`decide`] maps them plus the
//! known body length to a [`HeaderMutation`].

mod config;
pub use config::AuthType;
pub use config::OperationTraits;
pub use config::TransferConfiguration;

mod policy;
pub use policy::HeaderEdit;
pub use policy::HeaderMutation;
pub use policy::decide;
pub use policy::decide_for;
