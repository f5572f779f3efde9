//! Constants for the network fee tracker
//!
//! Endpoints, timeouts and preference defaults are centralized here. Endpoints
//! can be overridden at runtime through the environment variables listed below
//! (see [`crate::source::SourceConfig::from_env`]).

use crate::types::{DisplayUnit, RefreshInterval};

/// Per-request timeout handed to the HTTP transport (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 8;

/// Overall budget for one source fetch, including reading the body (in seconds)
pub const RESOURCE_TIMEOUT_SECS: u64 = 10;

/// Delay before the next cycle after a failed one (in minutes)
pub const FAILURE_RETRY_MINUTES: i64 = 5;

/// Display unit used when the preference store cannot be read
pub const DEFAULT_DISPLAY_UNIT: DisplayUnit = DisplayUnit::Native;

/// Refresh interval used when the preference store cannot be read
pub const DEFAULT_REFRESH_INTERVAL: RefreshInterval = RefreshInterval::TenMinutes;

/// Etherscan gas oracle endpoint (Ethereum mainnet)
pub const ETHERSCAN_GAS_ORACLE_URL: &str =
    "https://api.etherscan.io/v2/api?chainid=1&module=gastracker&action=gasoracle";

/// mempool.space recommended fees endpoint
pub const MEMPOOL_FEES_URL: &str = "https://mempool.space/api/v1/fees/recommended";

/// Solana mainnet JSON-RPC endpoint
pub const SOLANA_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Environment variable overriding the Etherscan endpoint
pub const ETHERSCAN_URL_ENV: &str = "NETWORK_FEE_ETHERSCAN_URL";

/// Environment variable holding the Etherscan API key
pub const ETHERSCAN_API_KEY_ENV: &str = "ETHERSCAN_API_KEY";

/// Environment variable overriding the mempool.space endpoint
pub const MEMPOOL_URL_ENV: &str = "NETWORK_FEE_MEMPOOL_URL";

/// Environment variable overriding the Solana RPC endpoint
pub const SOLANA_RPC_URL_ENV: &str = "NETWORK_FEE_SOLANA_RPC_URL";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "network-fee-sdk/0.1.0";
