//! The priority cascade selecting a behavior from a context.
//!
//! Rules are evaluated in fixed order and the first match wins:
//!
//! 1. **Flee** -- low health, or outnumbered while below 70% health.
//! 2. **Attack** -- a visible enemy, adequate health, and either not
//!    outnumbered or at least one nearby ally.
//! 3. **Wander Together** -- allies nearby and no visible enemy.
//! 4. **Wander** -- the default.
//!
//! The cascade only picks a kind; execution is the behavior's job. New
//! behavior variants extend the rule table here without touching the
//! variants themselves.

use skirmish_types::{BehaviorKind, ZoneKind};

use crate::context::BehaviorContext;

/// Health percentage below which an outnumbered agent disengages.
const OUTNUMBERED_FLEE_PERCENT: f64 = 70.0;

/// Select the behavior for the acting agent.
pub fn evaluate(ctx: &BehaviorContext<'_>) -> BehaviorKind {
    // Priority 1: survival.
    if ctx.has_low_health()
        || (ctx.is_outnumbered() && ctx.health_percentage() < OUTNUMBERED_FLEE_PERCENT)
    {
        return BehaviorKind::Flee;
    }

    // Priority 2: combat.
    if !ctx.enemies_in(ZoneKind::Visual).is_empty()
        && !ctx.has_low_health()
        && (!ctx.is_outnumbered() || ctx.has_allies_nearby())
    {
        return BehaviorKind::Attack;
    }

    // Priority 3: group cohesion.
    if ctx.has_allies_nearby() && ctx.enemies_in(ZoneKind::Visual).is_empty() {
        return BehaviorKind::WanderTogether;
    }

    BehaviorKind::Wander
}
