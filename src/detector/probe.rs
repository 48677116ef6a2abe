//! Liquidity Probe - Uniswap V2 / V3 factory lookups
//!
//! Asks each configured factory whether a pool pairing the token with the
//! chain's wrapped native asset exists:
//! - V2: `getPair(token, weth)`
//! - V3: `getPool(token, weth, fee)` for each fee tier, first hit wins
//!
//! A zero factory address means "not deployed on this chain" and is never
//! called. Call failures inside a generation count as "no pool there".

use alloy_primitives::{aliases::U24, Address};
use alloy_sol_types::{sol, SolCall};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::ScanError;
use crate::findings::LiquidityStatus;
use crate::rpc::ChainSession;

// ============================================
// SOLIDITY INTERFACES
// ============================================

sol! {
    #[derive(Debug)]
    interface IUniswapV2Factory {
        function getPair(address tokenA, address tokenB) external view returns (address pair);
    }

    #[derive(Debug)]
    interface IUniswapV3Factory {
        function getPool(address tokenA, address tokenB, uint24 fee) external view returns (address pool);
    }
}

/// V3 fee tiers in probe order: 0.05%, 0.3%, 1%
pub const V3_FEE_TIERS: [u32; 3] = [500, 3000, 10000];

/// Determine whether `token_address` already has a V2 or V3 pool against WETH
pub async fn probe(session: &ChainSession, token_address: &str) -> LiquidityStatus {
    if token_address.is_empty() {
        return LiquidityStatus::no_address();
    }

    let token = match parse_token(token_address) {
        Ok(token) => token,
        Err(e) => {
            warn!("⚠️ LP check error for {}: {}", token_address, e);
            return LiquidityStatus::error();
        }
    };

    let v2 = check_v2(session, token).await;
    let v3 = check_v3(session, token).await;

    LiquidityStatus::from_checks(v2, v3)
}

fn parse_token(token_address: &str) -> Result<Address, ScanError> {
    Address::from_str(token_address.trim())
        .map_err(|e| ScanError::Probe(format!("invalid token address {}: {}", token_address, e)))
}

async fn check_v2(session: &ChainSession, token: Address) -> bool {
    let config = session.config();
    if !config.has_v2_factory() {
        return false;
    }

    let calldata = IUniswapV2Factory::getPairCall {
        tokenA: token,
        tokenB: config.weth_address,
    }
    .abi_encode();

    let output = match session
        .rpc()
        .call(config.uniswap_v2_factory, calldata.into())
        .await
    {
        Ok(output) => output,
        Err(e) => {
            warn!("⚠️ V2 LP check error: {}", e);
            return false;
        }
    };

    match IUniswapV2Factory::getPairCall::abi_decode_returns(&output) {
        Ok(pair) => !pair.is_zero(),
        Err(e) => {
            warn!("⚠️ V2 LP check error: failed to decode getPair: {}", e);
            false
        }
    }
}

async fn check_v3(session: &ChainSession, token: Address) -> bool {
    let config = session.config();
    if !config.has_v3_factory() {
        return false;
    }

    for fee in V3_FEE_TIERS {
        let calldata = IUniswapV3Factory::getPoolCall {
            tokenA: token,
            tokenB: config.weth_address,
            fee: U24::from(fee),
        }
        .abi_encode();

        let pool = match session
            .rpc()
            .call(config.uniswap_v3_factory, calldata.into())
            .await
            .and_then(|output| {
                IUniswapV3Factory::getPoolCall::abi_decode_returns(&output)
                    .map_err(|e| eyre::eyre!("failed to decode getPool: {}", e))
            }) {
            Ok(pool) => pool,
            Err(e) => {
                debug!("V3 fee tier {} lookup failed: {}", fee, e);
                continue;
            }
        };

        if !pool.is_zero() {
            debug!("V3 pool {} found at fee tier {}", pool, fee);
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::{ChainConfig, ChainRegistry};
    use crate::findings::LpStatus;
    use crate::rpc::mock::MockRpc;
    use alloy_primitives::address;
    use alloy_sol_types::SolValue;
    use std::sync::Arc;

    const TOKEN: Address = address!("1111111111111111111111111111111111111111");
    const POOL: Address = address!("2222222222222222222222222222222222222222");

    fn encode_address(addr: Address) -> Vec<u8> {
        (addr,).abi_encode_params()
    }

    fn get_pair(chain: &ChainConfig) -> Vec<u8> {
        IUniswapV2Factory::getPairCall {
            tokenA: TOKEN,
            tokenB: chain.weth_address,
        }
        .abi_encode()
    }

    fn get_pool(chain: &ChainConfig, fee: u32) -> Vec<u8> {
        IUniswapV3Factory::getPoolCall {
            tokenA: TOKEN,
            tokenB: chain.weth_address,
            fee: U24::from(fee),
        }
        .abi_encode()
    }

    fn session(chain: &ChainConfig, rpc: Arc<MockRpc>) -> ChainSession {
        ChainSession::new(chain.clone(), rpc, 0)
    }

    fn chain(name: &str) -> ChainConfig {
        ChainRegistry::default().get(name).unwrap().clone()
    }

    #[tokio::test]
    async fn test_empty_address() {
        let base = chain("base");
        let rpc = Arc::new(MockRpc::new(8453, 0));
        let status = probe(&session(&base, rpc.clone()), "").await;

        assert_eq!(status, LiquidityStatus::no_address());
        assert!(rpc.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_factories_make_no_calls() {
        let zora = chain("zora");
        let rpc = Arc::new(MockRpc::new(7777777, 0));
        let status = probe(&session(&zora, rpc.clone()), &TOKEN.to_string()).await;

        assert_eq!(
            status,
            LiquidityStatus {
                v2: false,
                v3: false,
                status: LpStatus::Absent
            }
        );
        assert!(rpc.calls().is_empty());
    }

    #[tokio::test]
    async fn test_v2_pair_found() {
        let base = chain("base");
        let rpc = Arc::new(
            MockRpc::new(8453, 0).with_call(base.uniswap_v2_factory, get_pair(&base), encode_address(POOL)),
        );
        let status = probe(&session(&base, rpc), &TOKEN.to_string()).await;

        assert!(status.v2);
        assert!(!status.v3);
        assert_eq!(status.status, LpStatus::Present);
    }

    #[tokio::test]
    async fn test_v3_short_circuits_after_first_pool() {
        let base = chain("base");
        let rpc = Arc::new(
            MockRpc::new(8453, 0)
                .with_call(base.uniswap_v2_factory, get_pair(&base), encode_address(Address::ZERO))
                .with_call(base.uniswap_v3_factory, get_pool(&base, 500), encode_address(Address::ZERO))
                .with_call(base.uniswap_v3_factory, get_pool(&base, 3000), encode_address(POOL)),
        );
        let status = probe(&session(&base, rpc.clone()), &TOKEN.to_string()).await;

        assert!(!status.v2);
        assert!(status.v3);
        assert_eq!(status.status, LpStatus::Present);

        let v3_calls = rpc.calls_to(base.uniswap_v3_factory);
        assert_eq!(v3_calls.len(), 2);
        assert!(!v3_calls.iter().any(|c| c.as_ref() == get_pool(&base, 10000).as_slice()));
    }

    #[tokio::test]
    async fn test_tier_errors_are_swallowed() {
        let base = chain("base");
        // 500 and 3000 revert (unmatched), 10000 returns a pool
        let rpc = Arc::new(
            MockRpc::new(8453, 0)
                .with_call(base.uniswap_v3_factory, get_pool(&base, 10000), encode_address(POOL)),
        );
        let status = probe(&session(&base, rpc.clone()), &TOKEN.to_string()).await;

        assert!(!status.v2);
        assert!(status.v3);
        assert_eq!(rpc.calls_to(base.uniswap_v3_factory).len(), 3);
    }

    #[tokio::test]
    async fn test_no_pools_is_absent() {
        let base = chain("base");
        let rpc = Arc::new(
            MockRpc::new(8453, 0)
                .with_call(base.uniswap_v2_factory, get_pair(&base), encode_address(Address::ZERO))
                .with_call(base.uniswap_v3_factory, get_pool(&base, 500), encode_address(Address::ZERO))
                .with_call(base.uniswap_v3_factory, get_pool(&base, 3000), encode_address(Address::ZERO))
                .with_call(base.uniswap_v3_factory, get_pool(&base, 10000), encode_address(Address::ZERO)),
        );
        let status = probe(&session(&base, rpc), &TOKEN.to_string()).await;

        assert_eq!(status, LiquidityStatus::from_checks(false, false));
    }

    #[tokio::test]
    async fn test_malformed_address_is_error() {
        let base = chain("base");
        let rpc = Arc::new(MockRpc::new(8453, 0));
        let status = probe(&session(&base, rpc.clone()), "0xnot-an-address").await;

        assert_eq!(status, LiquidityStatus::error());
        assert!(rpc.calls().is_empty());
    }
}
