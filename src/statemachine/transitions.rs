use crate::domain::payment::PaymentStatus;

/// What applying an incoming gateway status to the current payment status
/// should do. `Duplicate` covers redelivered callbacks: the handler treats
/// them as no-op success rather than re-running side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPlan {
    Apply(PaymentStatus),
    Duplicate,
    Rejected,
}

/// Payment status is monotonic: `Pending -> {Paid, Failed, Expired}` and
/// nothing leaves a terminal state. Re-delivery of the current status is a
/// duplicate; any other combination (terminal to terminal, anything back
/// to pending) is rejected.
pub fn plan_transition(current: PaymentStatus, incoming: PaymentStatus) -> TransitionPlan {
    use PaymentStatus::*;
    match (current, incoming) {
        (Pending, Paid) | (Pending, Failed) | (Pending, Expired) => TransitionPlan::Apply(incoming),
        (c, i) if c == i => TransitionPlan::Duplicate,
        _ => TransitionPlan::Rejected,
    }
}
