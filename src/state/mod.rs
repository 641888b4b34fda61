pub mod registries;
pub mod rpc;
#[cfg(test)]
pub mod stub;

pub use registries::{PubVoteRead, RentRegistryReader, SpectateRegistryReader, StateReadError};
pub use rpc::RpcStateRegistry;
