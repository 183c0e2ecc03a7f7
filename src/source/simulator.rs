//! Simulated torque station.

use super::{SignalSource, SignalSpec, SignalType, SignalValue, SourceError};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Torque band of a healthy door closer, in N·m.
const TORQUE_MIN: f64 = 10.0;
const TORQUE_MAX: f64 = 15.0;

/// Torque above which the paired status bit is set.
const STATUS_THRESHOLD: f64 = 12.0;

const BOOL_TOGGLE_PROBABILITY: f64 = 0.1;
const INT_STEP_PROBABILITY: f64 = 0.2;

struct SimState {
    rng: StdRng,
    values: HashMap<String, SignalValue>,
}

/// Generates readings without any hardware attached.
///
/// - float signals draw uniformly from the torque band (10.0-15.0)
/// - a `<Prefix>Status` bool paired with a `<Prefix>Value` float reports
///   whether the last float exceeded 12.0
/// - other bools toggle occasionally
/// - ints random-walk by one, never below zero
pub struct Simulator {
    state: Mutex<SimState>,
}

impl Simulator {
    /// Create a simulator; a seed makes the sequence reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            state: Mutex::new(SimState {
                rng,
                values: HashMap::new(),
            }),
        }
    }

    fn paired_float_name(name: &str) -> Option<String> {
        name.strip_suffix("Status")
            .filter(|prefix| !prefix.is_empty())
            .map(|prefix| format!("{}Value", prefix))
    }

    fn next_value(state: &mut SimState, signal: &SignalSpec) -> SignalValue {
        let previous = state.values.get(&signal.name).copied();
        match signal.signal_type {
            SignalType::Float => {
                let raw = state.rng.gen_range(TORQUE_MIN..TORQUE_MAX);
                SignalValue::Float((raw * 100.0).round() / 100.0)
            }
            SignalType::Bool => {
                let paired = Self::paired_float_name(&signal.name)
                    .and_then(|float_name| state.values.get(&float_name).copied())
                    .and_then(|value| value.as_f64());
                if let Some(torque) = paired {
                    return SignalValue::Bool(torque > STATUS_THRESHOLD);
                }
                let current = matches!(previous, Some(SignalValue::Bool(true)));
                if state.rng.gen_bool(BOOL_TOGGLE_PROBABILITY) {
                    SignalValue::Bool(!current)
                } else {
                    SignalValue::Bool(current)
                }
            }
            SignalType::Int => {
                let current = match previous {
                    Some(SignalValue::Int(i)) => i,
                    _ => 0,
                };
                if state.rng.gen_bool(INT_STEP_PROBABILITY) {
                    let step = if state.rng.gen_bool(0.5) { 1 } else { -1 };
                    SignalValue::Int((current + step).max(0))
                } else {
                    SignalValue::Int(current)
                }
            }
        }
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl SignalSource for Simulator {
    fn name(&self) -> &str {
        "simulator"
    }

    async fn read(&self, signal: &SignalSpec) -> Result<SignalValue, SourceError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let value = Self::next_value(&mut state, signal);
        state.values.insert(signal.name.clone(), value);
        Ok(value)
    }
}
