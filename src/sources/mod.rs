//! Fee source client implementations

pub mod etherscan;
pub mod mempool;
pub mod solana;

pub use etherscan::EtherscanGasSource;
pub use mempool::MempoolFeeSource;
pub use solana::SolanaPerfSource;
