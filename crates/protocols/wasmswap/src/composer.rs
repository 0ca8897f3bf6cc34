//! Message Composer
//!
//! Turns a swap intent into the ordered execute messages of one atomic
//! transaction. A hop spending a CW20 token is preceded, immediately, by
//! an allowance for exactly that hop's input; a hop spending a native
//! coin attaches it as funds instead. Only the final hop carries the
//! slippage bound.

use serde::{Deserialize, Serialize};
use wasm_client::{Coin, ExecuteContract, FeePolicy, Operation, StdFee};
use wasmswap_core::{Address, Uint128};

use crate::calculator::{calculate_output, quote};
use crate::msg::{encode_all, ExecuteMsg, OrderedMessage};
use crate::state::{Hop, Quote, SwapDirection, SwapError, SwapIntent, TokenFunding, TwoHopMode};

/// Composed, unsigned swap transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapBundle {
    pub sender: Address,
    pub quote: Quote,
    pub messages: Vec<OrderedMessage>,
    pub operation: Operation,
    pub fee: StdFee,
}

impl SwapBundle {
    /// Signer-facing messages in bundle order
    pub fn encode(&self) -> Result<Vec<ExecuteContract>, SwapError> {
        encode_all(&self.messages, &self.sender)
    }
}

/// Amount sent into the first hop, and the bound on the final output
fn execution_bounds(quote: &Quote) -> (Uint128, Uint128) {
    match quote.direction {
        SwapDirection::ExactIn => (quote.amount_in, quote.limit),
        SwapDirection::ExactOut => (quote.limit, quote.amount_out),
    }
}

/// Push the funding step for `hop` (if any) and return the funds to attach
fn fund_hop(messages: &mut Vec<OrderedMessage>, hop: &Hop, amount: Uint128) -> Vec<Coin> {
    match hop.token_in().funding() {
        TokenFunding::Native { denom } => vec![Coin::new(amount, denom)],
        TokenFunding::Contract { token_address } => {
            messages.push(OrderedMessage::increase_allowance(
                &token_address,
                &hop.pool.swap_address,
                amount,
            ));
            Vec::new()
        }
    }
}

fn swap_message(
    hop: &Hop,
    input_amount: Uint128,
    min_output: Uint128,
    funds: Vec<Coin>,
) -> OrderedMessage {
    OrderedMessage::new(
        hop.pool.swap_address.clone(),
        ExecuteMsg::Swap {
            input_token: hop.direction.input_select(),
            input_amount,
            min_output,
        },
    )
    .with_funds(funds)
}

fn compose_with_quote(
    intent: &SwapIntent,
    quote: &Quote,
) -> Result<Vec<OrderedMessage>, SwapError> {
    let (input_amount, min_output) = execution_bounds(quote);
    let mut messages = Vec::with_capacity(4);

    match intent.route.hops.as_slice() {
        [] => {}
        [hop] => {
            let funds = fund_hop(&mut messages, hop, input_amount);
            messages.push(swap_message(hop, input_amount, min_output, funds));
        }
        [first, second] => match intent.two_hop_mode {
            TwoHopMode::PassThrough => {
                let funds = fund_hop(&mut messages, first, input_amount);
                messages.push(
                    OrderedMessage::new(
                        first.pool.swap_address.clone(),
                        ExecuteMsg::PassThroughSwap {
                            output_amm_address: second.pool.swap_address.clone(),
                            input_token: first.direction.input_select(),
                            input_token_amount: input_amount,
                            output_min_token: min_output,
                        },
                    )
                    .with_funds(funds),
                );
            }
            TwoHopMode::Sequential => {
                let (reserve_in, reserve_out) = first.pool.reserves(first.direction);
                let intermediate = Uint128::new(calculate_output(
                    reserve_in,
                    reserve_out,
                    input_amount.u128(),
                    first.pool.fee,
                )?);
                if intermediate.is_zero() {
                    return Err(SwapError::InsufficientLiquidity);
                }

                let funds = fund_hop(&mut messages, first, input_amount);
                messages.push(swap_message(first, input_amount, Uint128::ZERO, funds));

                let funds = fund_hop(&mut messages, second, intermediate);
                messages.push(swap_message(second, intermediate, min_output, funds));
            }
        },
        hops => {
            return Err(SwapError::TxBuild(format!(
                "Routes of {} hops are not supported",
                hops.len()
            )))
        }
    }

    Ok(messages)
}

/// Quote the intent and apply its slippage tolerance
pub fn quote_intent(intent: &SwapIntent) -> Result<Quote, SwapError> {
    Ok(quote(&intent.route, intent.amount, intent.direction)?.with_slippage(intent.slippage))
}

/// Ordered messages executing `intent`. The identity route needs none.
///
/// Exact-out intents are executed as exact-in swaps spending at most the
/// slippage-adjusted maximum input, bounded below by the requested output.
pub fn compose(intent: &SwapIntent) -> Result<Vec<OrderedMessage>, SwapError> {
    let quote = quote_intent(intent)?;
    compose_with_quote(intent, &quote)
}

/// Fee class for a route
pub fn operation_for(intent: &SwapIntent) -> Operation {
    match intent.route.hops.as_slice() {
        [hop] if hop.token_in().is_native() => Operation::Swap,
        [_] => Operation::SwapWithAllowance,
        _ => Operation::PassThroughSwap,
    }
}

/// Quote, compose, and price a swap transaction
pub fn compose_swap(intent: &SwapIntent, fees: &FeePolicy) -> Result<SwapBundle, SwapError> {
    if intent.route.is_identity() {
        return Err(SwapError::TxBuild(
            "Source and destination are the same token; nothing to execute".to_string(),
        ));
    }

    let quote = quote_intent(intent)?;
    let messages = compose_with_quote(intent, &quote)?;
    let operation = operation_for(intent);

    tracing::info!(
        route = %intent.route,
        sender = %intent.sender,
        amount_in = %quote.amount_in,
        amount_out = %quote.amount_out,
        limit = %quote.limit,
        messages = messages.len(),
        "Composed swap"
    );

    Ok(SwapBundle {
        sender: intent.sender.clone(),
        quote,
        messages,
        operation,
        fee: fees.fee_for(operation),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::calculator::minimum_output_for;
    use crate::msg::{Cw20ExecuteMsg, WasmMsg};
    use crate::registry::tests::make_pool;
    use crate::registry::PoolRegistry;
    use crate::router::resolve_route;
    use crate::state::{Route, Slippage, Token};

    fn juno() -> Token {
        Token::native("JUNO", "ujuno", 6)
    }
    fn raw() -> Token {
        Token::cw20("RAW", "juno1raw", 6)
    }
    fn atom() -> Token {
        Token::native("ATOM", "ibc/atom", 6)
    }
    fn neta() -> Token {
        Token::cw20("NETA", "juno1neta", 6)
    }

    pub(crate) fn intent(route: Route, amount: u128, bps: u32, mode: TwoHopMode) -> SwapIntent {
        SwapIntent {
            sender: Address::new("juno1sender"),
            route,
            direction: SwapDirection::ExactIn,
            amount: Uint128::new(amount),
            slippage: Slippage::from_bps(bps).unwrap(),
            two_hop_mode: mode,
        }
    }

    fn route(from: Token, to: Token, base: Token) -> Route {
        let registry = PoolRegistry::new(vec![
            make_pool("juno1rawpool", juno(), raw(), 1_000_000, 500_000),
            make_pool("juno1atompool", juno(), atom(), 2_000_000, 400_000),
            make_pool("juno1netapool", juno(), neta(), 3_000_000, 9_000),
        ]);
        resolve_route(&registry, &from, &to, &base).unwrap()
    }

    fn allowance_target(msg: &OrderedMessage) -> Option<(&Address, &Address, Uint128)> {
        match &msg.msg {
            WasmMsg::Cw20(Cw20ExecuteMsg::IncreaseAllowance { amount, spender }) => {
                Some((&msg.contract, spender, *amount))
            }
            _ => None,
        }
    }

    #[test]
    fn test_native_single_hop_attaches_funds() {
        let intent = intent(route(juno(), raw(), juno()), 1_000, 100, TwoHopMode::default());
        let msgs = compose(&intent).unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].contract.as_str(), "juno1rawpool");
        assert_eq!(msgs[0].funds, vec![Coin::new(1_000u128, "ujuno")]);
        // 498 * 0.99 = 493.02
        assert_eq!(
            msgs[0].msg,
            WasmMsg::Pool(ExecuteMsg::Swap {
                input_token: crate::msg::TokenSelect::Token1,
                input_amount: Uint128::new(1_000),
                min_output: Uint128::new(493),
            })
        );
        assert_eq!(operation_for(&intent), Operation::Swap);
    }

    #[test]
    fn test_cw20_single_hop_allowance_first() {
        let intent = intent(route(raw(), juno(), juno()), 2_000, 50, TwoHopMode::default());
        let msgs = compose(&intent).unwrap();
        assert_eq!(msgs.len(), 2);
        let (token, spender, amount) = allowance_target(&msgs[0]).unwrap();
        assert_eq!(token.as_str(), "juno1raw");
        assert_eq!(spender.as_str(), "juno1rawpool");
        assert_eq!(amount, Uint128::new(2_000));
        assert_eq!(msgs[1].name(), "swap");
        assert!(msgs[1].funds.is_empty());
        assert_eq!(operation_for(&intent), Operation::SwapWithAllowance);
    }

    #[test]
    fn test_two_hop_pass_through() {
        let intent = intent(route(raw(), neta(), juno()), 10_000, 100, TwoHopMode::PassThrough);
        let quote = quote_intent(&intent).unwrap();
        let msgs = compose(&intent).unwrap();

        assert_eq!(
            msgs.iter().map(|m| m.name()).collect::<Vec<_>>(),
            vec!["increase_allowance", "pass_through_swap"]
        );
        match &msgs[1].msg {
            WasmMsg::Pool(ExecuteMsg::PassThroughSwap {
                output_amm_address,
                input_token,
                input_token_amount,
                output_min_token,
            }) => {
                assert_eq!(output_amm_address.as_str(), "juno1netapool");
                assert_eq!(*input_token, crate::msg::TokenSelect::Token2);
                assert_eq!(*input_token_amount, Uint128::new(10_000));
                assert_eq!(
                    *output_min_token,
                    minimum_output_for(&quote, Slippage::from_bps(100).unwrap())
                );
            }
            other => panic!("unexpected message {:?}", other),
        }
        assert_eq!(msgs[1].contract.as_str(), "juno1rawpool");
        assert_eq!(operation_for(&intent), Operation::PassThroughSwap);
    }

    #[test]
    fn test_sequential_ordering_invariant() {
        let tokens = [raw(), atom(), neta()];
        for from in &tokens {
            for to in &tokens {
                if from.id() == to.id() {
                    continue;
                }
                let intent = intent(
                    route(from.clone(), to.clone(), juno()),
                    50_000,
                    300,
                    TwoHopMode::Sequential,
                );
                let quote = quote_intent(&intent).unwrap();
                let msgs = compose(&intent).unwrap();
                let hops = &intent.route.hops;

                let expected = if from.is_native() { 2 } else { 3 };
                assert_eq!(msgs.len(), expected, "{} -> {}", from.symbol, to.symbol);

                let swaps: Vec<usize> = msgs
                    .iter()
                    .enumerate()
                    .filter(|(_, m)| m.name() == "swap")
                    .map(|(i, _)| i)
                    .collect();
                assert_eq!(swaps.len(), 2);
                assert_eq!(msgs[swaps[0]].contract, hops[0].pool.swap_address);
                assert_eq!(msgs[swaps[1]].contract, hops[1].pool.swap_address);
                assert_eq!(*swaps.last().unwrap(), msgs.len() - 1);

                // every allowance sits immediately before the swap on its spender
                for (i, m) in msgs.iter().enumerate() {
                    if let Some((token, spender, amount)) = allowance_target(m) {
                        let next = &msgs[i + 1];
                        assert_eq!(next.name(), "swap");
                        assert_eq!(&next.contract, spender);
                        let hop = hops.iter().find(|h| &h.pool.swap_address == spender).unwrap();
                        assert_eq!(hop.token_in().id(), token.as_str());
                        match &next.msg {
                            WasmMsg::Pool(ExecuteMsg::Swap { input_amount, .. }) => {
                                assert_eq!(*input_amount, amount)
                            }
                            _ => unreachable!(),
                        }
                    }
                }

                // only the final hop is bounded
                match (&msgs[swaps[0]].msg, &msgs[swaps[1]].msg) {
                    (
                        WasmMsg::Pool(ExecuteMsg::Swap { min_output: first, .. }),
                        WasmMsg::Pool(ExecuteMsg::Swap {
                            min_output: last,
                            input_amount,
                            ..
                        }),
                    ) => {
                        assert_eq!(*first, Uint128::ZERO);
                        assert_eq!(*last, quote.limit);
                        assert_eq!(*input_amount, quote.hops[0].amount_out);
                    }
                    _ => unreachable!(),
                }
            }
        }
    }

    #[test]
    fn test_cw20_base_gets_second_allowance() {
        let base = Token::cw20("BASE", "juno1base", 6);
        let registry = PoolRegistry::new(vec![
            make_pool("juno1p1", base.clone(), raw(), 1_000_000, 1_000_000),
            make_pool("juno1p2", base.clone(), neta(), 1_000_000, 1_000_000),
        ]);
        let route = resolve_route(&registry, &raw(), &neta(), &base).unwrap();
        let msgs = compose(&intent(route, 1_000, 0, TwoHopMode::Sequential)).unwrap();
        assert_eq!(
            msgs.iter().map(|m| m.name()).collect::<Vec<_>>(),
            vec!["increase_allowance", "swap", "increase_allowance", "swap"]
        );
        assert_eq!(msgs[2].contract.as_str(), "juno1base");
    }

    #[test]
    fn test_exact_out_spends_max_input() {
        let mut intent = intent(route(juno(), raw(), juno()), 400, 100, TwoHopMode::default());
        intent.direction = SwapDirection::ExactOut;
        let quote = quote_intent(&intent).unwrap();
        let msgs = compose(&intent).unwrap();
        match &msgs[0].msg {
            WasmMsg::Pool(ExecuteMsg::Swap {
                input_amount,
                min_output,
                ..
            }) => {
                assert_eq!(*min_output, Uint128::new(400));
                assert_eq!(*input_amount, quote.limit);
                assert!(quote.limit > quote.amount_in);
            }
            other => panic!("unexpected message {:?}", other),
        }
        assert_eq!(msgs[0].funds[0].amount, quote.limit);
    }

    #[test]
    fn test_compose_swap_fee_and_identity() {
        let fees = FeePolicy::default();
        let bundle = compose_swap(
            &intent(route(raw(), neta(), juno()), 10_000, 100, TwoHopMode::default()),
            &fees,
        )
        .unwrap();
        assert_eq!(bundle.operation, Operation::PassThroughSwap);
        assert_eq!(bundle.fee.gas, 800_000);
        let encoded = bundle.encode().unwrap();
        assert_eq!(encoded.len(), 2);
        assert!(encoded.iter().all(|m| m.sender.as_str() == "juno1sender"));

        let identity = intent(Route::identity(raw()), 10, 0, TwoHopMode::default());
        assert!(compose(&identity).unwrap().is_empty());
        assert!(matches!(
            compose_swap(&identity, &fees),
            Err(SwapError::TxBuild(_))
        ));
    }

    #[test]
    fn test_zero_amount_rejected_before_composition() {
        let intent = intent(route(juno(), raw(), juno()), 0, 100, TwoHopMode::default());
        assert!(matches!(compose(&intent), Err(SwapError::ZeroAmount)));
    }
}
