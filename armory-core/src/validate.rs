use chrono::{DateTime, Datelike};

use crate::error::ValidationError;
use crate::model::{Player, PlayerDraft};

pub const NAME_MAX_LEN: usize = 12;
pub const TITLE_MAX_LEN: usize = 30;
pub const EXPERIENCE_MAX: i32 = 10_000_000;
pub const BIRTHDAY_MIN_YEAR: i32 = 2000;
pub const BIRTHDAY_MAX_YEAR: i32 = 3000;

/// Current level for a given experience total:
/// `floor((sqrt(2500 + 200·exp) − 50) / 100)`.
pub fn derive_level(experience: i32) -> i32 {
    (((2500.0 + 200.0 * f64::from(experience)).sqrt() - 50.0) / 100.0) as i32
}

/// Experience left until the next level:
/// `50·(level+1)·(level+2) − exp`. Pure in its inputs; may go negative
/// when the pair is inconsistent, no clamping.
pub fn until_next_level(experience: i32, level: i32) -> i32 {
    50 * (level + 1) * (level + 2) - experience
}

pub fn check_id(id: i64) -> Result<(), ValidationError> {
    if id <= 0 {
        return Err(ValidationError::InvalidField("id"));
    }
    Ok(())
}

fn check_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() || name.chars().count() > NAME_MAX_LEN {
        return Err(ValidationError::InvalidField("name"));
    }
    Ok(())
}

fn check_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() || title.chars().count() > TITLE_MAX_LEN {
        return Err(ValidationError::InvalidField("title"));
    }
    Ok(())
}

fn check_birthday(millis: i64) -> Result<(), ValidationError> {
    let year = DateTime::from_timestamp_millis(millis)
        .ok_or(ValidationError::OutOfRange("birthday"))?
        .year();
    if year < BIRTHDAY_MIN_YEAR || year > BIRTHDAY_MAX_YEAR {
        return Err(ValidationError::OutOfRange("birthday"));
    }
    Ok(())
}

fn check_experience(experience: i32) -> Result<(), ValidationError> {
    if experience < 0 || experience > EXPERIENCE_MAX {
        return Err(ValidationError::InvalidField("experience"));
    }
    Ok(())
}

/// Validate a create payload. Every field must be present and within
/// bounds; an absent `banned` is normalized to false. The returned
/// candidate has id 0 until the store assigns one, and its derived
/// fields are computed here.
pub fn validate_new(draft: &PlayerDraft) -> Result<Player, ValidationError> {
    let name = draft
        .name
        .as_deref()
        .ok_or(ValidationError::InvalidField("name"))?;
    check_name(name)?;

    let title = draft
        .title
        .as_deref()
        .ok_or(ValidationError::InvalidField("title"))?;
    check_title(title)?;

    let race = draft.race.ok_or(ValidationError::InvalidField("race"))?;
    let profession = draft
        .profession
        .ok_or(ValidationError::InvalidField("profession"))?;

    let birthday = draft
        .birthday
        .ok_or(ValidationError::InvalidField("birthday"))?;
    check_birthday(birthday)?;

    let experience = draft
        .experience
        .ok_or(ValidationError::InvalidField("experience"))?;
    check_experience(experience)?;

    let level = derive_level(experience);

    Ok(Player {
        id: 0,
        name: name.to_owned(),
        title: title.to_owned(),
        race,
        profession,
        birthday,
        banned: draft.banned.unwrap_or(false),
        experience,
        level,
        until_next_level: until_next_level(experience, level),
    })
}

/// Merge a partial update into an existing player. Supplied fields
/// overwrite stored ones, unsupplied fields are kept, and the derived
/// fields are recomputed from the final experience. Any invalid
/// supplied field rejects the whole merge, so the stored record is
/// never partially updated.
pub fn merge(existing: &Player, patch: &PlayerDraft) -> Result<Player, ValidationError> {
    let mut candidate = existing.clone();

    if let Some(name) = patch.name.as_deref() {
        check_name(name)?;
        candidate.name = name.to_owned();
    }

    if let Some(title) = patch.title.as_deref() {
        check_title(title)?;
        candidate.title = title.to_owned();
    }

    if let Some(race) = patch.race {
        candidate.race = race;
    }

    if let Some(profession) = patch.profession {
        candidate.profession = profession;
    }

    if let Some(birthday) = patch.birthday {
        check_birthday(birthday)?;
        candidate.birthday = birthday;
    }

    if let Some(banned) = patch.banned {
        candidate.banned = banned;
    }

    if let Some(experience) = patch.experience {
        check_experience(experience)?;
        candidate.experience = experience;
    }

    candidate.level = derive_level(candidate.experience);
    candidate.until_next_level = until_next_level(candidate.experience, candidate.level);

    Ok(candidate)
}
