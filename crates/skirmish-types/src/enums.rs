//! Core enumerations: teams, behavior kinds, and awareness zones.

use serde::{Deserialize, Serialize};

/// One of the two opposing teams in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// The red team.
    Red,
    /// The blue team.
    Blue,
}

impl Team {
    /// Return the opposing team.
    pub const fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// Return the lowercase wire name of the team.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
        }
    }
}

impl core::fmt::Display for Team {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The behavior an agent is currently executing.
///
/// The decision cascade only ever selects one of the four built-in kinds;
/// [`BehaviorKind::Custom`] is assigned when an operator has attached a
/// steering program to the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorKind {
    /// Random directional drift with a persistent heading.
    Wander,
    /// Wander biased toward the centroid of nearby allies.
    WanderTogether,
    /// Close on and strike the nearest enemy.
    Attack,
    /// Steer directly away from the centroid of visible enemies.
    Flee,
    /// An operator-supplied steering program.
    Custom,
}

impl BehaviorKind {
    /// The four built-in behaviors, in declaration order.
    pub const BUILT_IN: [Self; 4] = [Self::Wander, Self::WanderTogether, Self::Attack, Self::Flee];

    /// Return the snake_case wire identifier of the behavior.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wander => "wander",
            Self::WanderTogether => "wander_together",
            Self::Attack => "attack",
            Self::Flee => "flee",
            Self::Custom => "custom",
        }
    }

    /// Return a human-readable title-case name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Wander => "Wander",
            Self::WanderTogether => "Wander Together",
            Self::Attack => "Attack",
            Self::Flee => "Flee",
            Self::Custom => "Custom",
        }
    }
}

impl core::fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named perception radius used to bucket nearby agents by distance.
///
/// Zones are independent range thresholds, not exclusive rings: an agent
/// 20 units away sits in all three buckets under the default ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    /// The widest zone: everything the agent can see.
    Visual,
    /// Mid-range: agents close enough to be identified as friend or foe.
    Recognition,
    /// Close range: agents within reach of an attack.
    Combat,
}

impl ZoneKind {
    /// Return the lowercase wire name of the zone.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Recognition => "recognition",
            Self::Combat => "combat",
        }
    }
}

impl core::fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn opponent_is_involutive() {
        assert_eq!(Team::Red.opponent(), Team::Blue);
        assert_eq!(Team::Blue.opponent().opponent(), Team::Blue);
    }

    #[test]
    fn team_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Team::Red).unwrap(), "\"red\"");
        let back: Team = serde_json::from_str("\"blue\"").unwrap();
        assert_eq!(back, Team::Blue);
    }

    #[test]
    fn behavior_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&BehaviorKind::WanderTogether).unwrap(),
            "\"wander_together\""
        );
        assert_eq!(BehaviorKind::Flee.to_string(), "flee");
        assert_eq!(BehaviorKind::WanderTogether.display_name(), "Wander Together");
    }

    #[test]
    fn built_in_excludes_custom() {
        assert!(!BehaviorKind::BUILT_IN.contains(&BehaviorKind::Custom));
    }
}
