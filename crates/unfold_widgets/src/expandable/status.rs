//! Expand status lifecycle

use unfold_core::StateMachine;

/// Where an expandable is in its transition lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExpandStatus {
    #[default]
    Collapsed,
    Expanding,
    Expanded,
    Collapsing,
}

/// Inputs to the status machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StatusTrigger {
    BeginExpand,
    BeginCollapse,
    Settle,
}

pub(crate) type StatusMachine = StateMachine<ExpandStatus, StatusTrigger>;

/// Collapsed → Expanding → Expanded → Collapsing → Collapsed, where a newer
/// request may turn a transition around midway.
pub(crate) fn status_machine() -> StatusMachine {
    use ExpandStatus::*;
    use StatusTrigger::*;

    StateMachine::builder(Collapsed)
        .on(Collapsed, BeginExpand, Expanding)
        .on(Collapsing, BeginExpand, Expanding)
        .on(Expanded, BeginExpand, Expanding)
        .on(Expanding, BeginExpand, Expanding)
        .on(Expanded, BeginCollapse, Collapsing)
        .on(Expanding, BeginCollapse, Collapsing)
        .on(Collapsed, BeginCollapse, Collapsing)
        .on(Collapsing, BeginCollapse, Collapsing)
        .on(Expanding, Settle, Expanded)
        .on(Collapsing, Settle, Collapsed)
        .build()
}
