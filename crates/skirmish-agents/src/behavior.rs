//! The [`Behavior`] capability trait and the four built-in behaviors.
//!
//! A behavior is a single capability: given a context, produce a steering
//! force. The decision cascade picks *which* behavior runs; behaviors
//! themselves never re-decide. New variants plug in through the trait
//! without touching the cascade.

use rand::Rng as _;
use rand::RngCore;

use skirmish_types::{Vec2, ZoneKind};

use crate::agent::Agent;
use crate::awareness::{centroid_of, nearest_to};
use crate::context::BehaviorContext;

/// Maximum per-tick perturbation of the wander heading, in radians.
const WANDER_JITTER: f64 = 0.3;

/// Fraction of attack range an attacker tries to hold at.
///
/// Holding slightly inside attack range keeps the cooldown-gated strike
/// connecting instead of oscillating through the target.
const IDEAL_RANGE_FACTOR: f64 = 0.8;

/// Force multiplier applied when chasing a visible but unengaged enemy.
const PURSUIT_GAIN: f64 = 1.2;

/// Blend weight between ally-centroid attraction and wandering.
const GROUP_BLEND: f64 = 0.5;

/// A steering capability: produce a force for one agent on one tick.
pub trait Behavior {
    /// Compute the steering force for the acting agent.
    ///
    /// Implementations may update the acting agent's wander heading and
    /// target reference through the context, and nothing else.
    fn execute(&self, ctx: &mut BehaviorContext<'_>, rng: &mut dyn RngCore) -> Vec2;
}

/// Random directional drift with a persistent heading.
#[derive(Debug, Clone, Copy, Default)]
pub struct WanderBehavior;

impl Behavior for WanderBehavior {
    fn execute(&self, ctx: &mut BehaviorContext<'_>, rng: &mut dyn RngCore) -> Vec2 {
        let angle = ctx.agent.wander_angle + rng.random_range(-WANDER_JITTER..=WANDER_JITTER);
        ctx.agent.wander_angle = angle;
        Vec2::from_angle(angle) * ctx.agent.movement.max_force
    }
}

/// Wander biased toward the centroid of Recognition-zone allies.
///
/// Degrades to plain wandering when no allies are near.
#[derive(Debug, Clone, Copy, Default)]
pub struct WanderTogetherBehavior;

impl Behavior for WanderTogetherBehavior {
    fn execute(&self, ctx: &mut BehaviorContext<'_>, rng: &mut dyn RngCore) -> Vec2 {
        let Some(center) = centroid_of(&ctx.allies_in(ZoneKind::Recognition)) else {
            return WanderBehavior.execute(ctx, rng);
        };

        let agent = &ctx.agent;
        let to_center =
            (center - agent.physics.position).normalize() * (agent.movement.max_force * GROUP_BLEND);
        let wander = WanderBehavior.execute(ctx, rng) * GROUP_BLEND;
        to_center + wander
    }
}

/// Close on and strike the nearest enemy.
///
/// Prefers a Combat-zone enemy, holding position once inside the ideal
/// attack distance. Falls back to pursuing the nearest Visual-zone enemy
/// when pursuit conditions hold. Records the chosen enemy as the agent's
/// target in both cases.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttackBehavior;

impl Behavior for AttackBehavior {
    fn execute(&self, ctx: &mut BehaviorContext<'_>, _rng: &mut dyn RngCore) -> Vec2 {
        let agent_pos = ctx.agent.physics.position;

        let combat_target = nearest_to(&ctx.enemies_in(ZoneKind::Combat), agent_pos)
            .map(|t| (t.id, t.position));
        if let Some((id, target_pos)) = combat_target {
            ctx.agent.target_id = Some(id);
            return attack_force(ctx.agent, target_pos);
        }

        if ctx.should_pursue() {
            let visual_target = nearest_to(&ctx.enemies_in(ZoneKind::Visual), agent_pos)
                .map(|t| (t.id, t.position));
            if let Some((id, target_pos)) = visual_target {
                ctx.agent.target_id = Some(id);
                return pursuit_force(ctx.agent, target_pos);
            }
        }

        Vec2::ZERO
    }
}

/// Force toward a combat target: advance while beyond the ideal attack
/// distance, hold once inside it.
fn attack_force(agent: &Agent, target_pos: Vec2) -> Vec2 {
    let to_target = target_pos - agent.physics.position;
    let ideal_distance = agent.combat.attack_range * IDEAL_RANGE_FACTOR;

    if to_target.magnitude() > ideal_distance {
        to_target.normalize() * agent.movement.max_force
    } else {
        Vec2::ZERO
    }
}

/// Force chasing a distant target at boosted strength.
fn pursuit_force(agent: &Agent, target_pos: Vec2) -> Vec2 {
    (target_pos - agent.physics.position).normalize() * (agent.movement.max_force * PURSUIT_GAIN)
}

/// Steer directly away from the centroid of Visual-zone enemies.
#[derive(Debug, Clone, Copy, Default)]
pub struct FleeBehavior;

impl Behavior for FleeBehavior {
    fn execute(&self, ctx: &mut BehaviorContext<'_>, _rng: &mut dyn RngCore) -> Vec2 {
        let Some(danger_center) = centroid_of(&ctx.enemies_in(ZoneKind::Visual)) else {
            return Vec2::ZERO;
        };

        let agent = &ctx.agent;
        (agent.physics.position - danger_center).normalize() * agent.movement.max_force
    }
}

/// Look up the built-in behavior for a kind.
///
/// Returns `None` for [`BehaviorKind::Custom`], which is resolved through
/// the steering-program registry instead.
pub fn built_in(kind: skirmish_types::BehaviorKind) -> Option<&'static dyn Behavior> {
    use skirmish_types::BehaviorKind;

    static WANDER: WanderBehavior = WanderBehavior;
    static WANDER_TOGETHER: WanderTogetherBehavior = WanderTogetherBehavior;
    static ATTACK: AttackBehavior = AttackBehavior;
    static FLEE: FleeBehavior = FleeBehavior;

    match kind {
        BehaviorKind::Wander => Some(&WANDER),
        BehaviorKind::WanderTogether => Some(&WANDER_TOGETHER),
        BehaviorKind::Attack => Some(&ATTACK),
        BehaviorKind::Flee => Some(&FLEE),
        BehaviorKind::Custom => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use skirmish_types::{AgentId, BehaviorKind, Team};

    use crate::agent::NeighborView;
    use crate::awareness::ZoneSet;

    use super::*;

    const EPSILON: f64 = 1e-9;

    fn make_agent() -> Agent {
        let mut rng = SmallRng::seed_from_u64(4);
        Agent::spawn(Team::Red, Vec2::ZERO, 0.0, &mut rng)
    }

    fn neighbor(team: Team, x: f64, y: f64) -> NeighborView {
        NeighborView {
            id: AgentId::new(),
            team,
            position: Vec2::new(x, y),
            health: 100.0,
        }
    }

    fn context_with<'a>(agent: &'a mut Agent, neighbors: &[NeighborView]) -> BehaviorContext<'a> {
        let buckets = ZoneSet::default().classify(agent.id, agent.physics.position, neighbors);
        BehaviorContext {
            agent,
            buckets,
            current_behavior: BehaviorKind::Wander,
            time_in_behavior: 0,
        }
    }

    #[test]
    fn wander_magnitude_equals_max_force() {
        let mut agent = make_agent();
        let max_force = agent.movement.max_force;
        let mut ctx = context_with(&mut agent, &[]);
        let mut rng = SmallRng::seed_from_u64(11);

        for _ in 0..50 {
            let force = WanderBehavior.execute(&mut ctx, &mut rng);
            assert!((force.magnitude() - max_force).abs() < EPSILON);
        }
    }

    #[test]
    fn wander_perturbs_heading_within_bounds() {
        let mut agent = make_agent();
        let before = agent.wander_angle;
        let mut ctx = context_with(&mut agent, &[]);
        let mut rng = SmallRng::seed_from_u64(12);

        let _ = WanderBehavior.execute(&mut ctx, &mut rng);
        let after = ctx.agent.wander_angle;
        assert!((after - before).abs() <= WANDER_JITTER + EPSILON);
    }

    #[test]
    fn wander_together_without_allies_is_plain_wander() {
        let mut agent = make_agent();
        let max_force = agent.movement.max_force;
        let mut ctx = context_with(&mut agent, &[]);
        let mut rng = SmallRng::seed_from_u64(13);

        let force = WanderTogetherBehavior.execute(&mut ctx, &mut rng);
        assert!((force.magnitude() - max_force).abs() < EPSILON);
    }

    #[test]
    fn wander_together_blend_stays_within_budget() {
        let mut agent = make_agent();
        let max_force = agent.movement.max_force;
        let allies = [neighbor(Team::Red, 50.0, 0.0), neighbor(Team::Red, 60.0, 0.0)];
        let mut ctx = context_with(&mut agent, &allies);
        let mut rng = SmallRng::seed_from_u64(14);

        let force = WanderTogetherBehavior.execute(&mut ctx, &mut rng);
        // Half-weight seek plus half-weight wander never exceeds max_force.
        assert!(force.magnitude() <= max_force + EPSILON);
    }

    #[test]
    fn attack_holds_inside_ideal_distance() {
        let mut agent = make_agent();
        let enemy = neighbor(Team::Blue, 20.0, 0.0);
        let mut ctx = context_with(&mut agent, &[enemy]);
        let mut rng = SmallRng::seed_from_u64(15);

        // 20 < 0.8 * 30: inside the ideal distance, hold position.
        let force = AttackBehavior.execute(&mut ctx, &mut rng);
        assert_eq!(force, Vec2::ZERO);
        assert_eq!(ctx.agent.target_id, Some(enemy.id));
    }

    #[test]
    fn attack_advances_beyond_ideal_distance() {
        let mut agent = make_agent();
        let max_force = agent.movement.max_force;
        let enemy = neighbor(Team::Blue, 28.0, 0.0);
        let mut ctx = context_with(&mut agent, &[enemy]);
        let mut rng = SmallRng::seed_from_u64(16);

        let force = AttackBehavior.execute(&mut ctx, &mut rng);
        assert!((force.magnitude() - max_force).abs() < EPSILON);
        assert!(force.x > 0.0);
        assert_eq!(ctx.agent.target_id, Some(enemy.id));
    }

    #[test]
    fn attack_prefers_nearest_combat_enemy() {
        let mut agent = make_agent();
        let near = neighbor(Team::Blue, 25.0, 0.0);
        let far = neighbor(Team::Blue, 29.0, 0.0);
        let mut ctx = context_with(&mut agent, &[far, near]);
        let mut rng = SmallRng::seed_from_u64(17);

        let _ = AttackBehavior.execute(&mut ctx, &mut rng);
        assert_eq!(ctx.agent.target_id, Some(near.id));
    }

    #[test]
    fn attack_pursues_visual_enemy_at_boosted_force() {
        let mut agent = make_agent();
        let max_force = agent.movement.max_force;
        let enemy = neighbor(Team::Blue, 80.0, 0.0);
        let mut ctx = context_with(&mut agent, &[enemy]);
        let mut rng = SmallRng::seed_from_u64(18);

        let force = AttackBehavior.execute(&mut ctx, &mut rng);
        assert!((force.magnitude() - max_force * PURSUIT_GAIN).abs() < EPSILON);
        assert_eq!(ctx.agent.target_id, Some(enemy.id));
    }

    #[test]
    fn wounded_agent_does_not_pursue() {
        let mut agent = make_agent();
        agent.combat.health = 40.0;
        let enemy = neighbor(Team::Blue, 80.0, 0.0);
        let mut ctx = context_with(&mut agent, &[enemy]);
        let mut rng = SmallRng::seed_from_u64(19);

        let force = AttackBehavior.execute(&mut ctx, &mut rng);
        assert_eq!(force, Vec2::ZERO);
        assert_eq!(ctx.agent.target_id, None);
    }

    #[test]
    fn flee_steers_away_from_danger_centroid() {
        let mut agent = make_agent();
        let max_force = agent.movement.max_force;
        let enemies = [neighbor(Team::Blue, 50.0, 0.0), neighbor(Team::Blue, 70.0, 0.0)];
        let mut ctx = context_with(&mut agent, &enemies);
        let mut rng = SmallRng::seed_from_u64(20);

        let force = FleeBehavior.execute(&mut ctx, &mut rng);
        // Danger centroid is at +X; flight goes to -X at full force.
        assert!(force.x < 0.0);
        assert!((force.magnitude() - max_force).abs() < EPSILON);
    }

    #[test]
    fn flee_with_no_visible_enemy_is_zero() {
        let mut agent = make_agent();
        let mut ctx = context_with(&mut agent, &[]);
        let mut rng = SmallRng::seed_from_u64(21);

        assert_eq!(FleeBehavior.execute(&mut ctx, &mut rng), Vec2::ZERO);
    }

    #[test]
    fn built_in_lookup_covers_all_but_custom() {
        assert!(built_in(BehaviorKind::Wander).is_some());
        assert!(built_in(BehaviorKind::WanderTogether).is_some());
        assert!(built_in(BehaviorKind::Attack).is_some());
        assert!(built_in(BehaviorKind::Flee).is_some());
        assert!(built_in(BehaviorKind::Custom).is_none());
    }
}
