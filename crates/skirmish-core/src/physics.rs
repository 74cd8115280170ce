//! The two-pass physics sweep: integrate every agent, then resolve wall
//! contacts from the pre-integration snapshot.
//!
//! Pass 1 records each agent's position and velocity. Pass 2 integrates
//! all agents (pending force, velocity clamp, position update). Pass 3
//! queries the closest wall contact per agent; on a hit, the corrected
//! state is recomputed from the *pre-integration* snapshot rather than
//! clamping the already-penetrating state -- the correction is always
//! reachable from the last known-good position, which avoids tunneling
//! and repeated double-penetration.

use std::collections::BTreeMap;

use skirmish_agents::Agent;
use skirmish_types::{AgentId, Vec2};
use skirmish_world::collision::resolve_contact;
use skirmish_world::{Arena, DEFAULT_FRICTION, DEFAULT_RESTITUTION};

/// Integrate one simulation step for all agents against the arena.
pub fn step(roster: &mut BTreeMap<AgentId, Agent>, arena: &Arena) {
    // Pass 1: snapshot pre-integration state.
    let snapshots: BTreeMap<AgentId, (Vec2, Vec2)> = roster
        .iter()
        .map(|(id, agent)| (*id, (agent.physics.position, agent.physics.velocity)))
        .collect();

    // Pass 2: integrate.
    for agent in roster.values_mut() {
        let max_speed = agent.movement.max_speed;
        agent.physics.integrate(max_speed);
    }

    // Pass 3: resolve the closest wall contact per agent, rolling back
    // to the pre-step state.
    for (id, agent) in roster.iter_mut() {
        let Some(contact) = arena.closest_contact(agent.physics.position, agent.physics.radius)
        else {
            continue;
        };
        let Some((old_position, old_velocity)) = snapshots.get(id).copied() else {
            continue;
        };

        let (position, velocity) = resolve_contact(
            old_position,
            old_velocity,
            &contact,
            DEFAULT_RESTITUTION,
            DEFAULT_FRICTION,
        );
        agent.physics.position = position;
        agent.physics.velocity = velocity;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use skirmish_types::Team;
    use skirmish_world::Wall;

    use super::*;

    fn arena_with_wall() -> Arena {
        let mut arena = Arena::new([0.0, 0.0, 800.0, 600.0]).unwrap();
        arena.add_wall(Wall::new("Block", Vec2::new(200.0, 100.0), 50.0, 50.0));
        arena
    }

    fn roster_with(agent: Agent) -> BTreeMap<AgentId, Agent> {
        let mut roster = BTreeMap::new();
        roster.insert(agent.id, agent);
        roster
    }

    fn still_agent(position: Vec2) -> Agent {
        let mut rng = SmallRng::seed_from_u64(40);
        let mut agent = Agent::spawn(Team::Red, position, 0.0, &mut rng);
        agent.physics.velocity = Vec2::ZERO;
        // The spawn roll caps speed in [2, 4); tests drive faster.
        agent.movement.max_speed = 10.0;
        agent
    }

    #[test]
    fn clear_agent_moves_by_physics_only() {
        let arena = arena_with_wall();
        let mut agent = still_agent(Vec2::new(50.0, 50.0));
        agent.physics.velocity = Vec2::new(1.0, 0.5);
        let id = agent.id;
        let mut roster = roster_with(agent);

        step(&mut roster, &arena);

        let moved = roster.get(&id).unwrap();
        assert_eq!(moved.physics.position, Vec2::new(51.0, 50.5));
        assert_eq!(moved.physics.velocity, Vec2::new(1.0, 0.5));
    }

    #[test]
    fn pending_force_is_consumed_once() {
        let arena = Arena::new([0.0, 0.0, 800.0, 600.0]).unwrap();
        let mut agent = still_agent(Vec2::new(50.0, 50.0));
        agent.physics.pending_force = Some(Vec2::new(0.5, 0.0));
        let id = agent.id;
        let mut roster = roster_with(agent);

        step(&mut roster, &arena);
        let after_first = roster.get(&id).unwrap().physics.velocity;
        assert!((after_first.x - 0.5).abs() < 1e-9);
        assert!(roster.get(&id).unwrap().physics.pending_force.is_none());

        // No new force: velocity stays, position keeps drifting.
        step(&mut roster, &arena);
        let after_second = roster.get(&id).unwrap().physics.velocity;
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn resting_agent_is_untouched_by_repeated_steps() {
        // Clear of walls before and after integration: the collision
        // branch must not fire, and running the sweep twice with no
        // force input converges (no oscillation).
        let arena = arena_with_wall();
        let agent = still_agent(Vec2::new(400.0, 400.0));
        let id = agent.id;
        let mut roster = roster_with(agent);

        step(&mut roster, &arena);
        let first = roster.get(&id).unwrap().physics.position;
        step(&mut roster, &arena);
        let second = roster.get(&id).unwrap().physics.position;

        assert_eq!(first, Vec2::new(400.0, 400.0));
        assert_eq!(second, Vec2::new(400.0, 400.0));
    }

    #[test]
    fn wall_hit_rolls_back_to_pre_step_state() {
        let arena = arena_with_wall();
        // Agent just left of the wall (wall spans x in [200, 250]),
        // radius 10, heading straight into it.
        let mut agent = still_agent(Vec2::new(185.0, 125.0));
        agent.physics.velocity = Vec2::new(8.0, 0.0);
        let id = agent.id;
        let mut roster = roster_with(agent);

        step(&mut roster, &arena);

        let hit = roster.get(&id).unwrap();
        // Integration lands at (193, 125), 3 units into the collision
        // envelope. The resolve runs from the pre-step snapshot (185, 125):
        // pushed out along -X with the X velocity reflected.
        assert_eq!(hit.physics.position, Vec2::new(182.0, 125.0));
        assert!(hit.physics.velocity.x < 0.0);
    }

    #[test]
    fn only_closest_wall_is_resolved() {
        let mut arena = Arena::new([0.0, 0.0, 800.0, 600.0]).unwrap();
        arena.add_wall(Wall::new("Near", Vec2::new(200.0, 100.0), 20.0, 100.0));
        arena.add_wall(Wall::new("Far", Vec2::new(240.0, 100.0), 20.0, 100.0));

        let mut agent = still_agent(Vec2::new(185.0, 150.0));
        agent.physics.velocity = Vec2::new(10.0, 0.0);
        let id = agent.id;
        let mut roster = roster_with(agent);

        step(&mut roster, &arena);

        // Resolution pushed the agent back out of "Near"; it never
        // reached "Far".
        let hit = roster.get(&id).unwrap();
        assert!(hit.physics.position.x < 200.0);
    }
}
