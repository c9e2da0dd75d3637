//! Order Workflow
//!
//! An order moves from creation to completion, with cancellation allowed
//! until it ships.
//!
//! Key concepts:
//! - Transition table loaded from JSON configuration
//! - Per-state before-hook that aborts unpaid orders
//! - Managed vs propagated hook failures
//! - Transition log fed from the post-transition hook
//!
//! Run with: RUST_LOG=turnstile=debug cargo run --example order_workflow

use tracing_subscriber::EnvFilter;
use turnstile::engine::{AbortTransition, ErrorPolicy, Outcome, StateMachine, Stateful};
use turnstile::{state_enum, TransitionTable};

state_enum! {
    enum OrderState {
        Created = "created",
        WaitingForPayment = "waiting_for_payment",
        Processing = "processing",
        Shipping = "shipping",
        Completed = "completed",
        Canceled = "canceled",
    }
}

const TRANSITIONS: &str = r#"{
    "created": ["waiting_for_payment", "canceled"],
    "waiting_for_payment": ["processing", "canceled"],
    "processing": ["shipping", "canceled"],
    "shipping": ["completed"],
    "canceled": [],
    "completed": []
}"#;

#[derive(Debug, thiserror::Error)]
#[error("order {0} is on hold")]
struct OnHold(u64);

struct Order {
    id: u64,
    state: OrderState,
    paid: bool,
    transitions: Vec<(OrderState, OrderState)>,
}

impl Stateful for Order {
    type State = OrderState;
    type Args = ();
    type Error = OnHold;
    type Recovery = String;

    fn current_state(&self) -> OrderState {
        self.state.clone()
    }

    fn set_state(&mut self, state: OrderState) {
        self.state = state;
    }

    fn on_change_state(
        &mut self,
        previous: &OrderState,
        next: &OrderState,
        _args: &(),
    ) -> Result<(), OnHold> {
        println!("  [Order {}] {} -> {}", self.id, previous, next);
        self.transitions.push((previous.clone(), next.clone()));
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Order Workflow ===\n");

    let table = match TransitionTable::<OrderState>::from_json(TRANSITIONS) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Invalid transition table: {}", e);
            return;
        }
    };

    let machine = StateMachine::<Order>::builder()
        .table(table)
        .before(OrderState::Processing, |order, _| {
            if order.paid {
                Ok(())
            } else {
                Err(AbortTransition::with_reason("payment missing").into())
            }
        })
        .on_aborted(OrderState::Processing, |order, _| {
            format!("order {} still waiting for payment", order.id)
        })
        .build()
        .expect("hooks only target declared states");

    let mut order = Order {
        id: 42,
        state: OrderState::Created,
        paid: false,
        transitions: Vec::new(),
    };

    println!("Valid from created: {:?}", machine.valid_transitions(&order));

    if let Err(e) = machine.change_state(
        &mut order,
        OrderState::WaitingForPayment,
        ErrorPolicy::Propagate,
        &(),
    ) {
        println!("  Error: {}", e);
        return;
    }

    match machine.change_state(&mut order, OrderState::Processing, ErrorPolicy::Manage, &()) {
        Ok(Outcome::Aborted(Some(note))) => println!("  Aborted: {}", note),
        other => println!("  Unexpected: {:?}", other.map(|_| ())),
    }

    order.paid = true;
    for next in [
        OrderState::Processing,
        OrderState::Shipping,
        OrderState::Completed,
    ] {
        if let Err(e) = machine.change_state(&mut order, next, ErrorPolicy::Propagate, &()) {
            println!("  Error: {}", e);
        }
    }

    let late_cancel =
        machine.change_state(&mut order, OrderState::Canceled, ErrorPolicy::Manage, &());
    if let Err(e) = late_cancel {
        println!("  Rejected: {}", e);
    }

    println!("\nFinal state: {}", order.state);
    let steps: Vec<String> = order
        .transitions
        .iter()
        .map(|(from, to)| format!("{} -> {}", from, to))
        .collect();
    println!("Transitions: {}", steps.join(", "));
}
