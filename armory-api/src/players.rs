use serde::{Deserialize, Serialize};
use tracing::info;

use armory_core::filter::{PageRequest, PlayerFilter};
use armory_core::model::{Player, PlayerDraft, PlayerOrder, Profession, Race};
use armory_core::validate;
use armory_database::{Database, players};

use crate::error::ApiError;

/// Query parameters for the list and count operations, using the wire
/// names of the HTTP surface. Unknown enum names fail deserialization
/// before any predicate is built.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerQuery {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    pub after: Option<i64>,
    pub before: Option<i64>,
    pub banned: Option<bool>,
    pub min_experience: Option<i32>,
    pub max_experience: Option<i32>,
    pub min_level: Option<i32>,
    pub max_level: Option<i32>,
    pub page_number: Option<i32>,
    pub page_size: Option<i32>,
    pub order: Option<PlayerOrder>,
}

impl PlayerQuery {
    fn filter(&self) -> PlayerFilter {
        PlayerFilter {
            name: self.name.clone(),
            title: self.title.clone(),
            race: self.race,
            profession: self.profession,
            min_experience: self.min_experience,
            max_experience: self.max_experience,
            min_level: self.min_level,
            max_level: self.max_level,
            after: self.after,
            before: self.before,
            banned: self.banned,
        }
    }

    fn page(&self) -> Result<PageRequest, ApiError> {
        Ok(PageRequest::new(self.page_number, self.page_size)?)
    }

    fn order(&self) -> PlayerOrder {
        self.order.unwrap_or_default()
    }
}

/// A stored player as serialized on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    pub birthday: i64,
    pub banned: bool,
    pub experience: i32,
    pub level: i32,
    pub until_next_level: i32,
}

impl From<Player> for PlayerDto {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            name: player.name,
            title: player.title,
            race: player.race,
            profession: player.profession,
            birthday: player.birthday,
            banned: player.banned,
            experience: player.experience,
            level: player.level,
            until_next_level: player.until_next_level,
        }
    }
}

/// List players matching the query, sorted and paginated. Returns the
/// page content only, no metadata envelope.
pub async fn list(db: &Database, query: &PlayerQuery) -> Result<Vec<PlayerDto>, ApiError> {
    let page = query.page()?;
    let found = players::find_all(db, &query.filter(), page, query.order()).await?;

    Ok(found.into_iter().map(PlayerDto::from).collect())
}

/// Count players matching the query, ignoring pagination.
pub async fn count(db: &Database, query: &PlayerQuery) -> Result<i64, ApiError> {
    Ok(players::count(db, &query.filter()).await?)
}

/// Validate a full payload, derive level fields, and persist. Nothing
/// is written when validation fails.
pub async fn create(db: &Database, draft: &PlayerDraft) -> Result<PlayerDto, ApiError> {
    let candidate = validate::validate_new(draft)?;
    let stored = players::insert(db, &candidate).await?;
    info!(id = stored.id, "Player created.");

    Ok(stored.into())
}

pub async fn get(db: &Database, id: i64) -> Result<PlayerDto, ApiError> {
    validate::check_id(id)?;

    players::find_by_id(db, id)
        .await?
        .map(PlayerDto::from)
        .ok_or(ApiError::NotFound)
}

/// Merge a partial payload into the stored player, re-derive the level
/// fields from the final experience, and persist the candidate. An
/// invalid supplied field rejects the request with the stored record
/// untouched.
pub async fn update(db: &Database, id: i64, draft: &PlayerDraft) -> Result<PlayerDto, ApiError> {
    validate::check_id(id)?;

    let existing = players::find_by_id(db, id).await?.ok_or(ApiError::NotFound)?;
    let candidate = validate::merge(&existing, draft)?;
    let stored = players::update(db, &candidate)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(id, "Player updated.");

    Ok(stored.into())
}

/// Delete by id and report the removed player. A non-positive id is a
/// validation failure, not a missing record.
pub async fn delete(db: &Database, id: i64) -> Result<PlayerDto, ApiError> {
    validate::check_id(id)?;

    let removed = players::delete(db, id).await?.ok_or(ApiError::NotFound)?;
    info!(id, "Player deleted.");

    Ok(removed.into())
}
