/// Minimum complete caller/receiver cycles before a call is classified
pub const MIN_CYCLES: usize = 2;

/// Outcome of the interaction gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Enough conversation to summarize and classify
    Proceed,
    /// Too little conversation; no backend call is made
    Insufficient,
}

/// Decide whether a transcript with `cycles` exchanges is worth classifying
pub fn evaluate_gate(cycles: usize) -> GateDecision {
    evaluate_gate_with(cycles, MIN_CYCLES)
}

/// Same as [`evaluate_gate`] with an explicit threshold
pub fn evaluate_gate_with(cycles: usize, min_cycles: usize) -> GateDecision {
    if cycles >= min_cycles {
        GateDecision::Proceed
    } else {
        GateDecision::Insufficient
    }
}
