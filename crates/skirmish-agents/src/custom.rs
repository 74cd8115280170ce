//! Operator-supplied steering programs.
//!
//! The command surface lets operators attach custom behavior to an agent.
//! Instead of loading executable code, a program is a declarative list of
//! weighted steering terms evaluated against read-only views -- a
//! capability-restricted interpreter. Programs cannot touch any agent's
//! mutable state, weights are clamped, term count is bounded, and any
//! malformed or non-finite program degrades to wandering for that agent
//! only.

use rand::Rng as _;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use skirmish_types::{Vec2, ZoneKind};

use crate::awareness::{centroid_of, nearest_to, ZoneBuckets};
use crate::context::AgentView;

/// Maximum number of terms a program may hold.
pub const MAX_TERMS: usize = 16;

/// Absolute bound applied to every term weight.
pub const MAX_WEIGHT: f64 = 4.0;

/// Errors produced when validating a steering program.
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// The program contains no terms.
    #[error("steering program has no terms")]
    Empty,

    /// The program exceeds the term budget.
    #[error("steering program has {count} terms (limit {MAX_TERMS})")]
    TooManyTerms {
        /// Number of terms in the rejected program.
        count: usize,
    },

    /// A term weight is NaN or infinite.
    #[error("steering term {index} has non-finite weight")]
    NonFiniteWeight {
        /// Index of the offending term.
        index: usize,
    },
}

/// One primitive steering impulse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SteeringTerm {
    /// Unit pull toward the nearest enemy in a zone.
    SeekNearestEnemy {
        /// The zone searched for enemies.
        zone: ZoneKind,
    },
    /// Unit push away from the centroid of enemies in a zone.
    AvoidEnemies {
        /// The zone searched for enemies.
        zone: ZoneKind,
    },
    /// Unit pull toward the centroid of allies in a zone.
    CohereAllies {
        /// The zone searched for allies.
        zone: ZoneKind,
    },
    /// A fresh random unit direction each tick.
    Wander,
    /// No impulse.
    Hold,
}

/// One weighted steering term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringRule {
    /// The steering primitive.
    pub term: SteeringTerm,
    /// Blend weight, clamped to `[-MAX_WEIGHT, MAX_WEIGHT]` at
    /// evaluation time.
    pub weight: f64,
}

/// A declarative steering program: the custom-behavior contract.
///
/// Evaluation is a pure function of the agent view, the zone buckets,
/// and the tick's randomness; the resulting force is capped at the
/// agent's `max_force`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteeringProgram {
    /// Optional human-readable program name.
    #[serde(default)]
    pub name: Option<String>,
    /// The weighted terms, summed in order.
    pub terms: Vec<SteeringRule>,
}

impl SteeringProgram {
    /// Check the program against the interpreter's budgets.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramError`] if the program is empty, oversized, or
    /// carries a non-finite weight.
    pub fn validate(&self) -> Result<(), ProgramError> {
        if self.terms.is_empty() {
            return Err(ProgramError::Empty);
        }
        if self.terms.len() > MAX_TERMS {
            return Err(ProgramError::TooManyTerms {
                count: self.terms.len(),
            });
        }
        for (index, rule) in self.terms.iter().enumerate() {
            if !rule.weight.is_finite() {
                return Err(ProgramError::NonFiniteWeight { index });
            }
        }
        Ok(())
    }

    /// Evaluate the program to a steering force.
    ///
    /// Returns `None` when the result is non-finite, signalling the
    /// caller to fall back to the default behavior.
    pub fn evaluate(
        &self,
        view: &AgentView,
        buckets: &ZoneBuckets,
        rng: &mut dyn RngCore,
    ) -> Option<Vec2> {
        let mut total = Vec2::ZERO;

        for rule in &self.terms {
            let weight = rule.weight.clamp(-MAX_WEIGHT, MAX_WEIGHT);
            let impulse = match rule.term {
                SteeringTerm::SeekNearestEnemy { zone } => {
                    nearest_to(&buckets.enemies_in(zone, view.team), view.position)
                        .map_or(Vec2::ZERO, |enemy| {
                            (enemy.position - view.position).normalize()
                        })
                }
                SteeringTerm::AvoidEnemies { zone } => {
                    centroid_of(&buckets.enemies_in(zone, view.team))
                        .map_or(Vec2::ZERO, |center| (view.position - center).normalize())
                }
                SteeringTerm::CohereAllies { zone } => {
                    centroid_of(&buckets.allies_in(zone, view.team))
                        .map_or(Vec2::ZERO, |center| (center - view.position).normalize())
                }
                SteeringTerm::Wander => {
                    Vec2::from_angle(rng.random_range(0.0..std::f64::consts::TAU))
                }
                SteeringTerm::Hold => Vec2::ZERO,
            };
            total += impulse * weight;
        }

        if !total.is_finite() {
            return None;
        }

        Some(total.limit(view.max_force))
    }
}
