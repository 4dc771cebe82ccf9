//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ApolloAdapter, NeverBounceAdapter, NppesAdapter, ServerDeps};
pub use test_dependencies::{
    MockEmailVerifier, MockMatchFinder, MockRegistrySearch, TestDependencies,
};
pub use traits::*;
