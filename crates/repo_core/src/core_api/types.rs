use serde::{Deserialize, Serialize};

/// World progression as stored in `runStats` plus the team name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldRecord {
    pub team_name: String,
    pub level: i64,
    pub currency: i64,
    pub lives: i64,
    pub charging_station: i64,
    pub total_haul: i64,
}

/// The nine per-player upgrade counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerUpgrades {
    pub health: i64,
    pub stamina: i64,
    pub extra_jump: i64,
    pub launch: i64,
    pub map_player_count: i64,
    pub speed: i64,
    pub strength: i64,
    pub range: i64,
    pub throw: i64,
}

impl PlayerUpgrades {
    pub fn uniform(value: i64) -> Self {
        Self {
            health: value,
            stamina: value,
            extra_jump: value,
            launch: value,
            map_player_count: value,
            speed: value,
            strength: value,
            range: value,
            throw: value,
        }
    }

    /// Field name/value pairs in declaration order.
    pub fn named(&self) -> [(&'static str, i64); 9] {
        [
            ("health", self.health),
            ("stamina", self.stamina),
            ("extra_jump", self.extra_jump),
            ("launch", self.launch),
            ("map_player_count", self.map_player_count),
            ("speed", self.speed),
            ("strength", self.strength),
            ("range", self.range),
            ("throw", self.throw),
        ]
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.named()
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| *value)
    }

    /// Returns false when `name` is not an upgrade field.
    pub fn set(&mut self, name: &str, value: i64) -> bool {
        let slot = match name {
            "health" => &mut self.health,
            "stamina" => &mut self.stamina,
            "extra_jump" => &mut self.extra_jump,
            "launch" => &mut self.launch,
            "map_player_count" => &mut self.map_player_count,
            "speed" => &mut self.speed,
            "strength" => &mut self.strength,
            "range" => &mut self.range,
            "throw" => &mut self.throw,
            _ => return false,
        };
        *slot = value;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub health: i64,
    pub upgrades: PlayerUpgrades,
}

/// A player present in `playerNames` that could not be fully projected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkippedPlayer {
    pub id: String,
    pub name: String,
    pub reason: String,
}

/// Player enumeration result: records in `playerNames` insertion order plus
/// the players that had to be skipped, with the reason for each omission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerRoster {
    pub players: Vec<PlayerRecord>,
    pub skipped: Vec<SkippedPlayer>,
}

/// Summary of a loaded save file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileInfo {
    pub team_name: String,
    pub player_count: usize,
    pub level: i64,
    pub currency: i64,
    pub lives: i64,
}
