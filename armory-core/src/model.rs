use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Race {
    Human,
    Dwarf,
    Elf,
    Giant,
    Orc,
    Troll,
    Hobbit,
}

impl Race {
    /// Symbolic name used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Race::Human => "HUMAN",
            Race::Dwarf => "DWARF",
            Race::Elf => "ELF",
            Race::Giant => "GIANT",
            Race::Orc => "ORC",
            Race::Troll => "TROLL",
            Race::Hobbit => "HOBBIT",
        }
    }
}

impl FromStr for Race {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "HUMAN" => Ok(Race::Human),
            "DWARF" => Ok(Race::Dwarf),
            "ELF" => Ok(Race::Elf),
            "GIANT" => Ok(Race::Giant),
            "ORC" => Ok(Race::Orc),
            "TROLL" => Ok(Race::Troll),
            "HOBBIT" => Ok(Race::Hobbit),
            other => Err(UnknownVariant {
                kind: "race",
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Profession {
    Warrior,
    Rogue,
    Sorcerer,
    Cleric,
    Paladin,
    Nazgul,
    Warlock,
    Druid,
}

impl Profession {
    /// Symbolic name used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Profession::Warrior => "WARRIOR",
            Profession::Rogue => "ROGUE",
            Profession::Sorcerer => "SORCERER",
            Profession::Cleric => "CLERIC",
            Profession::Paladin => "PALADIN",
            Profession::Nazgul => "NAZGUL",
            Profession::Warlock => "WARLOCK",
            Profession::Druid => "DRUID",
        }
    }
}

impl FromStr for Profession {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "WARRIOR" => Ok(Profession::Warrior),
            "ROGUE" => Ok(Profession::Rogue),
            "SORCERER" => Ok(Profession::Sorcerer),
            "CLERIC" => Ok(Profession::Cleric),
            "PALADIN" => Ok(Profession::Paladin),
            "NAZGUL" => Ok(Profession::Nazgul),
            "WARLOCK" => Ok(Profession::Warlock),
            "DRUID" => Ok(Profession::Druid),
            other => Err(UnknownVariant {
                kind: "profession",
                value: other.to_owned(),
            }),
        }
    }
}

/// Single-key sort orders for the list operation. Each maps to exactly
/// one stored column; the default sorts by identifier ascending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlayerOrder {
    #[default]
    Id,
    Name,
    Experience,
    Birthday,
    Level,
}

impl PlayerOrder {
    pub fn column(self) -> &'static str {
        match self {
            PlayerOrder::Id => "id",
            PlayerOrder::Name => "name",
            PlayerOrder::Experience => "experience",
            PlayerOrder::Birthday => "birthday",
            PlayerOrder::Level => "level",
        }
    }
}

impl FromStr for PlayerOrder {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ID" => Ok(PlayerOrder::Id),
            "NAME" => Ok(PlayerOrder::Name),
            "EXPERIENCE" => Ok(PlayerOrder::Experience),
            "BIRTHDAY" => Ok(PlayerOrder::Birthday),
            "LEVEL" => Ok(PlayerOrder::Level),
            other => Err(UnknownVariant {
                kind: "order",
                value: other.to_owned(),
            }),
        }
    }
}

/// A stored player. `level` and `until_next_level` are derived from
/// `experience` on every write and are never taken from the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    /// Epoch milliseconds.
    pub birthday: i64,
    pub banned: bool,
    pub experience: i32,
    pub level: i32,
    pub until_next_level: i32,
}

/// Client-supplied fields for create and partial update. Every field is
/// optional; create requires presence, update merges what is present.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerDraft {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    pub birthday: Option<i64>,
    pub banned: Option<bool>,
    pub experience: Option<i32>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{PlayerOrder, Profession, Race};

    #[test]
    fn enum_names_round_trip() {
        for race in [
            Race::Human,
            Race::Dwarf,
            Race::Elf,
            Race::Giant,
            Race::Orc,
            Race::Troll,
            Race::Hobbit,
        ] {
            assert_eq!(Race::from_str(race.as_str()).unwrap(), race);
        }

        for profession in [
            Profession::Warrior,
            Profession::Rogue,
            Profession::Sorcerer,
            Profession::Cleric,
            Profession::Paladin,
            Profession::Nazgul,
            Profession::Warlock,
            Profession::Druid,
        ] {
            assert_eq!(
                Profession::from_str(profession.as_str()).unwrap(),
                profession
            );
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(Race::from_str("VULCAN").is_err());
        assert!(Profession::from_str("warrior").is_err());
        assert!(PlayerOrder::from_str("AGE").is_err());
    }

    #[test]
    fn order_defaults_to_id() {
        assert_eq!(PlayerOrder::default(), PlayerOrder::Id);
        assert_eq!(PlayerOrder::default().column(), "id");
        assert_eq!(PlayerOrder::Birthday.column(), "birthday");
    }

    #[test]
    fn enums_serialize_as_uppercase_names() {
        assert_eq!(
            serde_json::to_string(&Race::Hobbit).unwrap(),
            "\"HOBBIT\""
        );
        assert_eq!(
            serde_json::to_string(&Profession::Nazgul).unwrap(),
            "\"NAZGUL\""
        );
        assert_eq!(
            serde_json::from_str::<PlayerOrder>("\"LEVEL\"").unwrap(),
            super::PlayerOrder::Level
        );
    }
}
