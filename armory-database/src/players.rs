use anyhow::Context as _;
use sqlx::{Postgres, QueryBuilder};

use armory_core::filter::{Op, Operand, PageRequest, PlayerFilter, Predicate};
use armory_core::model::{Player, PlayerOrder};

use crate::database::Database;

#[derive(sqlx::FromRow)]
struct PlayerRow {
    id: i64,
    name: String,
    title: String,
    race: String,
    profession: String,
    birthday: i64,
    banned: bool,
    experience: i32,
    level: i32,
    until_next_level: i32,
}

/// Return the filtered, sorted page of players.
pub async fn find_all(
    db: &Database,
    filter: &PlayerFilter,
    page: PageRequest,
    order: PlayerOrder,
) -> anyhow::Result<Vec<Player>> {
    let mut query = build_list_query(filter, page, order);
    let rows: Vec<PlayerRow> = query.build_query_as().fetch_all(db.pool()).await?;

    rows.into_iter().map(to_player).collect()
}

/// Return the cardinality of the filtered set, ignoring pagination.
pub async fn count(db: &Database, filter: &PlayerFilter) -> anyhow::Result<i64> {
    let mut query = build_count_query(filter);
    let total: i64 = query.build_query_scalar().fetch_one(db.pool()).await?;

    Ok(total)
}

pub async fn find_by_id(db: &Database, id: i64) -> anyhow::Result<Option<Player>> {
    let row: Option<PlayerRow> = sqlx::query_as(
        "SELECT id, name, title, race, profession, birthday, banned, experience, level, until_next_level
         FROM players
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_player).transpose()
}

/// Insert a validated candidate and return the stored row with its
/// assigned id.
pub async fn insert(db: &Database, player: &Player) -> anyhow::Result<Player> {
    let row: PlayerRow = sqlx::query_as(
        "INSERT INTO players (name, title, race, profession, birthday, banned, experience, level, until_next_level)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING id, name, title, race, profession, birthday, banned, experience, level, until_next_level",
    )
    .bind(&player.name)
    .bind(&player.title)
    .bind(player.race.as_str())
    .bind(player.profession.as_str())
    .bind(player.birthday)
    .bind(player.banned)
    .bind(player.experience)
    .bind(player.level)
    .bind(player.until_next_level)
    .fetch_one(db.pool())
    .await?;

    to_player(row)
}

/// Overwrite a stored player with a merged candidate. Returns None if
/// the row disappeared between fetch and write.
pub async fn update(db: &Database, player: &Player) -> anyhow::Result<Option<Player>> {
    let row: Option<PlayerRow> = sqlx::query_as(
        "UPDATE players
         SET name = $1, title = $2, race = $3, profession = $4, birthday = $5, banned = $6, experience = $7, level = $8, until_next_level = $9
         WHERE id = $10
         RETURNING id, name, title, race, profession, birthday, banned, experience, level, until_next_level",
    )
    .bind(&player.name)
    .bind(&player.title)
    .bind(player.race.as_str())
    .bind(player.profession.as_str())
    .bind(player.birthday)
    .bind(player.banned)
    .bind(player.experience)
    .bind(player.level)
    .bind(player.until_next_level)
    .bind(player.id)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_player).transpose()
}

/// Delete by id and return the removed row, or None if it was absent.
pub async fn delete(db: &Database, id: i64) -> anyhow::Result<Option<Player>> {
    let row: Option<PlayerRow> = sqlx::query_as(
        "DELETE FROM players
         WHERE id = $1
         RETURNING id, name, title, race, profession, birthday, banned, experience, level, until_next_level",
    )
    .bind(id)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_player).transpose()
}

fn build_list_query(
    filter: &PlayerFilter,
    page: PageRequest,
    order: PlayerOrder,
) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(
        "SELECT id, name, title, race, profession, birthday, banned, experience, level, until_next_level FROM players",
    );
    push_predicates(&mut query, filter.predicates());
    query.push(" ORDER BY ");
    query.push(order.column());
    query.push(" LIMIT ");
    query.push_bind(page.limit());
    query.push(" OFFSET ");
    query.push_bind(page.offset());
    query
}

fn build_count_query(filter: &PlayerFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT COUNT(*) FROM players");
    push_predicates(&mut query, filter.predicates());
    query
}

/// Conjoin predicate fragments into a WHERE clause. Every operand is a
/// bind parameter; column and operator text come from the closed
/// `Field`/`Op` sets, never from the request.
fn push_predicates(query: &mut QueryBuilder<'static, Postgres>, predicates: Vec<Predicate>) {
    let mut separator = " WHERE ";

    for predicate in predicates {
        query.push(separator);
        separator = " AND ";

        query.push(predicate.field.column());
        match predicate.op {
            Op::Contains => query.push(" LIKE "),
            Op::Eq => query.push(" = "),
            Op::Ge => query.push(" >= "),
            Op::Le => query.push(" <= "),
        };

        match (predicate.op, predicate.operand) {
            (Op::Contains, Operand::Text(value)) => {
                query.push_bind(format!("%{value}%"));
            }
            (_, Operand::Text(value)) => {
                query.push_bind(value);
            }
            (_, Operand::Int(value)) => {
                query.push_bind(value);
            }
            (_, Operand::Millis(value)) => {
                query.push_bind(value);
            }
            (_, Operand::Bool(value)) => {
                query.push_bind(value);
            }
        };
    }
}

fn to_player(row: PlayerRow) -> anyhow::Result<Player> {
    let race = row.race.parse().context("race column outside the closed set")?;
    let profession = row
        .profession
        .parse()
        .context("profession column outside the closed set")?;

    Ok(Player {
        id: row.id,
        name: row.name,
        title: row.title,
        race,
        profession,
        birthday: row.birthday,
        banned: row.banned,
        experience: row.experience,
        level: row.level,
        until_next_level: row.until_next_level,
    })
}

#[cfg(test)]
mod tests {
    use armory_core::filter::{PageRequest, PlayerFilter};
    use armory_core::model::{PlayerOrder, Race};

    use super::{build_count_query, build_list_query};

    const SELECT: &str = "SELECT id, name, title, race, profession, birthday, banned, experience, level, until_next_level FROM players";

    fn default_page() -> PageRequest {
        PageRequest::new(None, None).unwrap()
    }

    #[test]
    fn empty_filter_has_no_where_clause() {
        let sql = build_list_query(&PlayerFilter::default(), default_page(), PlayerOrder::Id)
            .into_sql();
        assert_eq!(sql, format!("{SELECT} ORDER BY id LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn present_criteria_are_conjoined_with_and() {
        let filter = PlayerFilter {
            name: Some("do".to_owned()),
            banned: Some(false),
            ..PlayerFilter::default()
        };

        let sql = build_list_query(&filter, default_page(), PlayerOrder::Level).into_sql();
        assert_eq!(
            sql,
            format!(
                "{SELECT} WHERE name LIKE $1 AND banned = $2 ORDER BY level LIMIT $3 OFFSET $4"
            )
        );
    }

    #[test]
    fn range_bounds_are_inclusive_comparisons() {
        let filter = PlayerFilter {
            min_experience: Some(100),
            max_experience: Some(900),
            after: Some(10),
            before: Some(20),
            ..PlayerFilter::default()
        };

        let sql = build_count_query(&filter).into_sql();
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM players WHERE experience >= $1 AND experience <= $2 \
             AND birthday >= $3 AND birthday <= $4"
        );
    }

    #[test]
    fn enum_criterion_compares_the_stored_name() {
        let filter = PlayerFilter {
            race: Some(Race::Troll),
            ..PlayerFilter::default()
        };

        let sql = build_count_query(&filter).into_sql();
        assert_eq!(sql, "SELECT COUNT(*) FROM players WHERE race = $1");
    }

    #[test]
    fn count_query_carries_no_pagination() {
        let sql = build_count_query(&PlayerFilter::default()).into_sql();
        assert_eq!(sql, "SELECT COUNT(*) FROM players");
    }

    #[test]
    fn sort_key_maps_to_a_single_column() {
        for (order, column) in [
            (PlayerOrder::Id, "id"),
            (PlayerOrder::Name, "name"),
            (PlayerOrder::Experience, "experience"),
            (PlayerOrder::Birthday, "birthday"),
            (PlayerOrder::Level, "level"),
        ] {
            let sql =
                build_list_query(&PlayerFilter::default(), default_page(), order).into_sql();
            assert!(sql.contains(&format!(" ORDER BY {column} ")), "{sql}");
        }
    }
}
