use std::sync::Arc;

use solana_client::nonblocking::rpc_client::RpcClient;

/// Async RPC client shared between tasks
pub type AsyncAtomicRpcClient = Arc<RpcClient>;
