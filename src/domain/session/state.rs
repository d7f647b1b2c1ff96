//! Conversation flow states and the transition table.
//!
//! The table is data: `collection_path` lists the ordered collecting
//! states per command kind, and `valid_transitions` is derived from it
//! plus the search/delivery tail. Handlers never hard-code "what comes
//! next".

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;
use crate::domain::search::CommandKind;
use crate::domain::validation::FieldKind;

/// Where a user's conversation currently stands.
///
/// `Idle` is the implicit no-active-flow tag: a cleared session reads as
/// `Idle`. Collecting states each accept exactly one field kind;
/// `Searching` and `Delivering` accept only their specific trigger (and
/// cancel, which is handled before state dispatch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    #[default]
    Idle,
    AwaitingCity,
    AwaitingEnterDate,
    AwaitingExitDate,
    AwaitingAdults,
    AwaitingChildren,
    AwaitingInfants,
    AwaitingPets,
    AwaitingCurrency,
    AwaitingMaxPrice,
    AwaitingConfirm,
    /// Provider call in flight; no input is processed until it resolves.
    Searching,
    /// Batches going out; a continuation trigger resumes the cursor.
    Delivering,
}

/// Collection order for the short path (lowprice/highprice/bestdeals).
const SIMPLE_PATH: &[FlowState] = &[
    FlowState::AwaitingCity,
    FlowState::AwaitingEnterDate,
    FlowState::AwaitingExitDate,
    FlowState::AwaitingAdults,
    FlowState::AwaitingConfirm,
];

/// Collection order for the custom-filter path.
const CUSTOM_PATH: &[FlowState] = &[
    FlowState::AwaitingCity,
    FlowState::AwaitingEnterDate,
    FlowState::AwaitingExitDate,
    FlowState::AwaitingAdults,
    FlowState::AwaitingChildren,
    FlowState::AwaitingInfants,
    FlowState::AwaitingPets,
    FlowState::AwaitingCurrency,
    FlowState::AwaitingMaxPrice,
    FlowState::AwaitingConfirm,
];

/// The ordered collecting states for a command kind.
pub fn collection_path(kind: CommandKind) -> &'static [FlowState] {
    if kind.is_custom() {
        CUSTOM_PATH
    } else {
        SIMPLE_PATH
    }
}

impl FlowState {
    /// The single field kind this state collects, if it is a collecting
    /// state.
    pub fn expected_field(&self) -> Option<FieldKind> {
        match self {
            FlowState::AwaitingCity => Some(FieldKind::City),
            FlowState::AwaitingEnterDate => Some(FieldKind::EnterDate),
            FlowState::AwaitingExitDate => Some(FieldKind::ExitDate),
            FlowState::AwaitingAdults => Some(FieldKind::Adults),
            FlowState::AwaitingChildren => Some(FieldKind::Children),
            FlowState::AwaitingInfants => Some(FieldKind::Infants),
            FlowState::AwaitingPets => Some(FieldKind::Pets),
            FlowState::AwaitingCurrency => Some(FieldKind::Currency),
            FlowState::AwaitingMaxPrice => Some(FieldKind::MaxPrice),
            _ => None,
        }
    }

    /// The state that follows `self` on the collection path of `kind`.
    ///
    /// Returns `None` when `self` is not on the path or is its last
    /// entry. This is where the adults branch lives: the simple path
    /// jumps straight to `AwaitingConfirm`, the custom path continues
    /// through the optional-field chain.
    pub fn next_on_path(&self, kind: CommandKind) -> Option<FlowState> {
        let path = collection_path(kind);
        let index = path.iter().position(|state| state == self)?;
        path.get(index + 1).copied()
    }
}

impl StateMachine for FlowState {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use FlowState::*;
        match self {
            Idle => vec![AwaitingCity],
            AwaitingCity => vec![AwaitingEnterDate],
            AwaitingEnterDate => vec![AwaitingExitDate],
            AwaitingExitDate => vec![AwaitingAdults],
            // Branch point: simple flows confirm, custom flows continue.
            AwaitingAdults => vec![AwaitingConfirm, AwaitingChildren],
            AwaitingChildren => vec![AwaitingInfants],
            AwaitingInfants => vec![AwaitingPets],
            AwaitingPets => vec![AwaitingCurrency],
            AwaitingCurrency => vec![AwaitingMaxPrice],
            AwaitingMaxPrice => vec![AwaitingConfirm],
            AwaitingConfirm => vec![Searching],
            Searching => vec![Delivering, Idle],
            Delivering => vec![Idle],
        }
    }
}
