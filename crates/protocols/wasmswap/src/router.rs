//! Route Resolver
//!
//! Pools only pair against the base token, so a pair has at most one
//! viable path: identity, a direct pool, or two hops through the base.
//! Selection is by topology, never by price.

use crate::registry::PoolRegistry;
use crate::state::{Hop, Pool, Route, SwapError, Token};

/// Find the path from `from` to `to` over `registry`.
///
/// Direct pools always win over routing through `base`, even when both exist.
pub fn resolve_route(
    registry: &PoolRegistry,
    from: &Token,
    to: &Token,
    base: &Token,
) -> Result<Route, SwapError> {
    if from.id() == to.id() {
        return Ok(Route::identity(from.clone()));
    }

    if let Some(pool) = registry.get_pool(from.id(), to.id()) {
        let hop = hop_from(pool, from)?;
        tracing::debug!(
            from = %from.symbol,
            to = %to.symbol,
            pool = %pool.swap_address,
            "Direct route"
        );
        return Ok(Route {
            from: from.clone(),
            to: to.clone(),
            hops: vec![hop],
        });
    }

    if from.id() != base.id() && to.id() != base.id() {
        if let (Some(first), Some(second)) = (
            registry.get_pool(from.id(), base.id()),
            registry.get_pool(base.id(), to.id()),
        ) {
            let hop1 = hop_from(first, from)?;
            let hop2 = hop_from(second, base)?;
            tracing::debug!(
                from = %from.symbol,
                to = %to.symbol,
                via = %base.symbol,
                "Two-hop route"
            );
            return Ok(Route {
                from: from.clone(),
                to: to.clone(),
                hops: vec![hop1, hop2],
            });
        }
    }

    Err(SwapError::NoRoute {
        from: from.symbol.clone(),
        to: to.symbol.clone(),
    })
}

/// Like [`resolve_route`], looking token metadata up by id in the registry
pub fn resolve_route_by_id(
    registry: &PoolRegistry,
    from: &str,
    to: &str,
    base: &str,
) -> Result<Route, SwapError> {
    let lookup = |id: &str| {
        registry
            .find_token(id)
            .cloned()
            .ok_or_else(|| SwapError::InvalidToken(id.to_string()))
    };
    let from = lookup(from)?;
    let to = lookup(to)?;
    let base = lookup(base)?;
    resolve_route(registry, &from, &to, &base)
}

fn hop_from(pool: &Pool, token_in: &Token) -> Result<Hop, SwapError> {
    let direction = pool
        .direction_from(token_in.id())
        .ok_or_else(|| SwapError::InvalidToken(token_in.id().to_string()))?;
    Ok(Hop {
        pool: pool.clone(),
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::make_pool;
    use crate::state::HopDirection;

    fn base() -> Token {
        Token::native("BASE", "ubase", 6)
    }
    fn usdx() -> Token {
        Token::cw20("USDX", "juno1usdx", 6)
    }
    fn atom() -> Token {
        Token::cw20("ATOM", "juno1atom", 6)
    }

    fn two_pools() -> Vec<Pool> {
        vec![
            make_pool("juno1usdxpool", base(), usdx(), 1_000, 2_000),
            make_pool("juno1atompool", base(), atom(), 1_000, 3_000),
        ]
    }

    #[test]
    fn test_two_hop_through_base_then_direct_when_added() {
        let registry = PoolRegistry::new(two_pools());
        let route = resolve_route(&registry, &usdx(), &atom(), &base()).unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route.hops[0].pool.swap_address.as_str(), "juno1usdxpool");
        assert_eq!(route.hops[0].direction, HopDirection::Token2ToToken1);
        assert_eq!(route.hops[1].pool.swap_address.as_str(), "juno1atompool");
        assert_eq!(route.hops[1].direction, HopDirection::Token1ToToken2);
        assert_eq!(route.hops[0].token_out().id(), "ubase");
        assert_eq!(route.to_string(), "USDX -> BASE -> ATOM");

        let mut pools = two_pools();
        pools.push(make_pool("juno1direct", usdx(), atom(), 500, 500));
        let registry = PoolRegistry::new(pools);
        let route = resolve_route(&registry, &usdx(), &atom(), &base()).unwrap();
        assert_eq!(route.len(), 1);
        assert_eq!(route.hops[0].pool.swap_address.as_str(), "juno1direct");
    }

    #[test]
    fn test_identity_route() {
        let registry = PoolRegistry::default();
        let route = resolve_route(&registry, &atom(), &atom(), &base()).unwrap();
        assert!(route.is_identity());
    }

    #[test]
    fn test_base_side_is_single_hop() {
        let registry = PoolRegistry::new(two_pools());
        let route = resolve_route(&registry, &base(), &atom(), &base()).unwrap();
        assert_eq!(route.len(), 1);
        let route = resolve_route(&registry, &usdx(), &base(), &base()).unwrap();
        assert_eq!(route.len(), 1);
        assert_eq!(route.hops[0].direction, HopDirection::Token2ToToken1);
    }

    #[test]
    fn test_no_route() {
        let registry = PoolRegistry::new(vec![make_pool("juno1p", base(), usdx(), 1, 1)]);
        let err = resolve_route(&registry, &usdx(), &atom(), &base()).unwrap_err();
        assert!(matches!(err, SwapError::NoRoute { .. }));

        let err = resolve_route(&registry, &base(), &atom(), &base()).unwrap_err();
        assert!(matches!(err, SwapError::NoRoute { .. }));
    }

    #[test]
    fn test_resolve_by_id_rejects_unknown_token() {
        let registry = PoolRegistry::new(two_pools());
        let route = resolve_route_by_id(&registry, "juno1usdx", "juno1atom", "ubase").unwrap();
        assert_eq!(route.len(), 2);
        let err = resolve_route_by_id(&registry, "juno1nope", "juno1atom", "ubase").unwrap_err();
        assert!(matches!(err, SwapError::InvalidToken(_)));
    }
}
