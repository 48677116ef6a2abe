//! ERC-20 metadata introspection
//!
//! Reads `name`, `symbol`, `decimals` and `totalSupply` as four independent
//! calls. A contract that is not a token (or only partly one) still yields a
//! full [`TokenMetadata`]; each failed read falls back to its own default.

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use tracing::debug;

use crate::error::ScanError;
use crate::findings::TokenMetadata;
use crate::rpc::ChainRpc;

sol! {
    #[derive(Debug)]
    interface IERC20Metadata {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
    }
}

/// Read whatever token metadata `contract` exposes
pub async fn introspect(rpc: &dyn ChainRpc, contract: Address) -> TokenMetadata {
    let mut metadata = TokenMetadata::default();

    match read(rpc, contract, "name", IERC20Metadata::nameCall {}).await {
        Ok(name) => metadata.name = name,
        Err(e) => debug!("{} {}", contract, e),
    }

    match read(rpc, contract, "symbol", IERC20Metadata::symbolCall {}).await {
        Ok(symbol) => metadata.symbol = symbol,
        Err(e) => debug!("{} {}", contract, e),
    }

    match read(rpc, contract, "decimals", IERC20Metadata::decimalsCall {}).await {
        Ok(decimals) => metadata.decimals = decimals,
        Err(e) => debug!("{} {}", contract, e),
    }

    // Scaled by whatever decimals ended up as, default included
    match read(rpc, contract, "totalSupply", IERC20Metadata::totalSupplyCall {}).await {
        Ok(raw) => metadata.total_supply = scale_supply(raw, metadata.decimals).unwrap_or(0.0),
        Err(e) => debug!("{} {}", contract, e),
    }

    metadata
}

async fn read<C>(
    rpc: &dyn ChainRpc,
    contract: Address,
    field: &'static str,
    call: C,
) -> Result<C::Return, ScanError>
where
    C: SolCall + Send,
    C::Return: Send,
{
    let calldata = call.abi_encode();
    let output = rpc
        .call(contract, calldata.into())
        .await
        .map_err(|e| ScanError::field(field, e))?;

    C::abi_decode_returns(&output).map_err(|e| ScanError::field(field, e))
}

/// Convert a raw integer supply to token units
fn scale_supply(raw: U256, decimals: u8) -> Option<f64> {
    let raw: f64 = raw.to_string().parse().ok()?;
    let scaled = raw / 10f64.powi(i32::from(decimals));
    scaled.is_finite().then_some(scaled)
}
