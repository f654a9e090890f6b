use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

use crate::core_api::{
    FileInfo, PlayerRecord, PlayerRoster, PlayerUpgrades, SaveError, SaveErrorKind, SkippedPlayer,
    WorldRecord,
};

const KEY_TEAM_NAME: &str = "teamName";
const KEY_PLAYER_NAMES: &str = "playerNames";
const KEY_DICTIONARIES: &str = "dictionaryOfDictionaries";
const KEY_VALUE: &str = "value";
const KEY_RUN_STATS: &str = "runStats";
const KEY_PLAYER_HEALTH: &str = "playerHealth";

const KEY_LEVEL: &str = "level";
const KEY_CURRENCY: &str = "currency";
const KEY_LIVES: &str = "lives";
const KEY_CHARGING_STATION: &str = "chargingStationCharge";
const KEY_TOTAL_HAUL: &str = "totalHaul";

/// The nine upgrade mappings, in schema order.
const UPGRADE_KEYS: [&str; 9] = [
    "playerUpgradeHealth",
    "playerUpgradeStamina",
    "playerUpgradeExtraJump",
    "playerUpgradeLaunch",
    "playerUpgradeMapPlayerCount",
    "playerUpgradeSpeed",
    "playerUpgradeStrength",
    "playerUpgradeRange",
    "playerUpgradeThrow",
];

/// One decrypted save, held as the game's order-preserving JSON tree.
///
/// All raw string-keyed lookups are confined to this module; callers only see
/// the typed records from `core_api::types`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDocument {
    root: Map<String, Value>,
}

impl SaveDocument {
    pub fn parse(bytes: &[u8]) -> Result<Self, SaveError> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            SaveError::new(
                SaveErrorKind::MalformedDocument,
                format!("save plaintext is not UTF-8: {e}"),
            )
        })?;
        let value: Value = serde_json::from_str(text).map_err(|e| {
            SaveError::new(
                SaveErrorKind::MalformedDocument,
                format!("save plaintext is not valid JSON: {e}"),
            )
        })?;
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(SaveError::new(
                SaveErrorKind::MalformedDocument,
                "top level of the save document is not an object",
            )),
        }
    }

    /// Structure-encodes the tree with stable 4-space indentation, the same
    /// shape the game writes. Used for both display and re-encryption.
    pub fn serialize(&self) -> Result<Vec<u8>, SaveError> {
        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(&mut out, formatter);
        self.root.serialize(&mut serializer).map_err(|e| {
            SaveError::new(
                SaveErrorKind::MalformedDocument,
                format!("failed to serialize save document: {e}"),
            )
        })?;
        Ok(out)
    }

    /// World projection. `None` when any required key is absent, so callers
    /// can tell "unavailable" apart from "present with zero values".
    pub fn world(&self) -> Option<WorldRecord> {
        let team_name = self.team_name()?;
        let stats = self.run_stats()?;
        Some(WorldRecord {
            team_name,
            level: int_field(stats, KEY_LEVEL)?,
            currency: int_field(stats, KEY_CURRENCY)?,
            lives: int_field(stats, KEY_LIVES)?,
            charging_station: int_field(stats, KEY_CHARGING_STATION)?,
            total_haul: int_field(stats, KEY_TOTAL_HAUL)?,
        })
    }

    /// Enumerates players in `playerNames` insertion order, joining across
    /// the health and upgrade mappings. A player missing any required entry
    /// is skipped with the reason recorded, not dropped silently.
    pub fn players(&self) -> PlayerRoster {
        let mut roster = PlayerRoster::default();
        let Some(names) = self.wrapped_object(KEY_PLAYER_NAMES) else {
            return roster;
        };

        let dictionaries = self.wrapped_object(KEY_DICTIONARIES);
        for (id, name) in names {
            let display_name = name.as_str().unwrap_or_default().to_string();
            let Some(dictionaries) = dictionaries else {
                roster.skipped.push(SkippedPlayer {
                    id: id.clone(),
                    name: display_name,
                    reason: format!("{KEY_DICTIONARIES} is missing"),
                });
                continue;
            };

            match project_player(dictionaries, id, name) {
                Ok(player) => roster.players.push(player),
                Err(reason) => roster.skipped.push(SkippedPlayer {
                    id: id.clone(),
                    name: display_name,
                    reason,
                }),
            }
        }
        roster
    }

    pub fn file_info(&self) -> Option<FileInfo> {
        let team_name = self.team_name()?;
        let player_count = self.wrapped_object(KEY_PLAYER_NAMES)?.len();
        let stats = self.run_stats()?;
        Some(FileInfo {
            team_name,
            player_count,
            level: int_field(stats, KEY_LEVEL)?,
            currency: int_field(stats, KEY_CURRENCY)?,
            lives: int_field(stats, KEY_LIVES)?,
        })
    }

    pub fn has_player(&self, id: &str) -> bool {
        self.wrapped_object(KEY_PLAYER_NAMES)
            .is_some_and(|names| names.contains_key(id))
    }

    /// Writes all six world fields. Does not validate ranges; that is the
    /// validator's job, run by the facade before this is reached.
    pub fn update_world(&mut self, record: &WorldRecord) -> Result<(), SaveError> {
        if self.team_name().is_none() {
            return Err(missing_mapping(KEY_TEAM_NAME));
        }

        let stats = self
            .run_stats_mut()
            .ok_or_else(|| missing_mapping(KEY_RUN_STATS))?;
        stats.insert(KEY_LEVEL.to_string(), Value::from(record.level));
        stats.insert(KEY_CURRENCY.to_string(), Value::from(record.currency));
        stats.insert(KEY_LIVES.to_string(), Value::from(record.lives));
        stats.insert(
            KEY_CHARGING_STATION.to_string(),
            Value::from(record.charging_station),
        );
        stats.insert(KEY_TOTAL_HAUL.to_string(), Value::from(record.total_haul));

        let team = self
            .root
            .get_mut(KEY_TEAM_NAME)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| missing_mapping(KEY_TEAM_NAME))?;
        team.insert(
            KEY_VALUE.to_string(),
            Value::from(record.team_name.clone()),
        );
        Ok(())
    }

    /// Writes the ten per-player values for `id`. Does not check that `id`
    /// exists in `playerNames`; calling this with an unknown id creates
    /// dangling entries, which is why the facade validates first.
    pub fn update_player(
        &mut self,
        id: &str,
        health: i64,
        upgrades: &PlayerUpgrades,
    ) -> Result<(), SaveError> {
        let dictionaries = self
            .wrapped_object_mut(KEY_DICTIONARIES)
            .ok_or_else(|| missing_mapping(KEY_DICTIONARIES))?;

        set_player_int(dictionaries, KEY_PLAYER_HEALTH, id, health)?;
        let values = upgrades.named();
        for (map_key, (_, value)) in UPGRADE_KEYS.iter().copied().zip(values) {
            set_player_int(dictionaries, map_key, id, value)?;
        }
        Ok(())
    }

    fn team_name(&self) -> Option<String> {
        self.root
            .get(KEY_TEAM_NAME)?
            .get(KEY_VALUE)?
            .as_str()
            .map(str::to_string)
    }

    fn run_stats(&self) -> Option<&Map<String, Value>> {
        self.wrapped_object(KEY_DICTIONARIES)?
            .get(KEY_RUN_STATS)?
            .as_object()
    }

    fn run_stats_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.wrapped_object_mut(KEY_DICTIONARIES)?
            .get_mut(KEY_RUN_STATS)?
            .as_object_mut()
    }

    fn wrapped_object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.root.get(key)?.get(KEY_VALUE)?.as_object()
    }

    fn wrapped_object_mut(&mut self, key: &str) -> Option<&mut Map<String, Value>> {
        self.root.get_mut(key)?.get_mut(KEY_VALUE)?.as_object_mut()
    }
}

fn project_player(
    dictionaries: &Map<String, Value>,
    id: &str,
    name: &Value,
) -> Result<PlayerRecord, String> {
    let name = name
        .as_str()
        .ok_or_else(|| format!("{KEY_PLAYER_NAMES}.{id} is not a string"))?;

    let health = player_int(dictionaries, KEY_PLAYER_HEALTH, id)?;
    let upgrades = PlayerUpgrades {
        health: player_int(dictionaries, UPGRADE_KEYS[0], id)?,
        stamina: player_int(dictionaries, UPGRADE_KEYS[1], id)?,
        extra_jump: player_int(dictionaries, UPGRADE_KEYS[2], id)?,
        launch: player_int(dictionaries, UPGRADE_KEYS[3], id)?,
        map_player_count: player_int(dictionaries, UPGRADE_KEYS[4], id)?,
        speed: player_int(dictionaries, UPGRADE_KEYS[5], id)?,
        strength: player_int(dictionaries, UPGRADE_KEYS[6], id)?,
        range: player_int(dictionaries, UPGRADE_KEYS[7], id)?,
        throw: player_int(dictionaries, UPGRADE_KEYS[8], id)?,
    };

    Ok(PlayerRecord {
        id: id.to_string(),
        name: name.to_string(),
        health,
        upgrades,
    })
}

fn player_int(dictionaries: &Map<String, Value>, map_key: &str, id: &str) -> Result<i64, String> {
    let mapping = dictionaries
        .get(map_key)
        .and_then(Value::as_object)
        .ok_or_else(|| format!("{map_key} mapping is missing"))?;
    mapping
        .get(id)
        .and_then(Value::as_i64)
        .ok_or_else(|| format!("{map_key}.{id} is missing or not an integer"))
}

fn set_player_int(
    dictionaries: &mut Map<String, Value>,
    map_key: &str,
    id: &str,
    value: i64,
) -> Result<(), SaveError> {
    let mapping = dictionaries
        .get_mut(map_key)
        .and_then(Value::as_object_mut)
        .ok_or_else(|| missing_mapping(map_key))?;
    mapping.insert(id.to_string(), Value::from(value));
    Ok(())
}

fn int_field(map: &Map<String, Value>, key: &str) -> Option<i64> {
    map.get(key)?.as_i64()
}

fn missing_mapping(key: &str) -> SaveError {
    SaveError::new(
        SaveErrorKind::MalformedDocument,
        format!("{key} mapping is missing from the save document"),
    )
}
