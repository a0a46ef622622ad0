//! SeaORM adapter for the games table - generic over ConnectionTrait.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entities::games;
use crate::infra::db_errors::OPTIMISTIC_LOCK_PREFIX;

pub mod dto;

pub use dto::{GameCreate, GameFields, GameUpdate};

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

/// Apply optimistic update with version check, then refetch.
///
/// Writes all mutable columns, bumps `version` and `updated_at`, and filters
/// on `(id, expected_version)`. Zero affected rows is resolved into either
/// RecordNotFound or the structured OPTIMISTIC_LOCK payload.
async fn optimistic_update_then_fetch<C>(
    conn: &C,
    dto: GameUpdate,
) -> Result<games::Model, sea_orm::DbErr>
where
    C: ConnectionTrait + Send + Sync,
{
    use sea_orm::sea_query::Expr;

    let now = time::OffsetDateTime::now_utc();
    let GameUpdate {
        id,
        expected_version,
        fields,
    } = dto;

    let result = games::Entity::update_many()
        .col_expr(games::Column::Board, Expr::value(fields.board))
        .col_expr(games::Column::CurrentTeam, Expr::value(fields.current_team))
        .col_expr(games::Column::CurrentClue, Expr::value(fields.current_clue))
        .col_expr(
            games::Column::GuessesRemaining,
            Expr::value(fields.guesses_remaining),
        )
        .col_expr(games::Column::RedRemaining, Expr::value(fields.red_remaining))
        .col_expr(
            games::Column::BlueRemaining,
            Expr::value(fields.blue_remaining),
        )
        .col_expr(games::Column::Winner, Expr::value(fields.winner))
        .col_expr(games::Column::UpdatedAt, Expr::value(now))
        .col_expr(
            games::Column::Version,
            Expr::col(games::Column::Version).add(1),
        )
        .filter(games::Column::Id.eq(id.as_str()))
        .filter(games::Column::Version.eq(expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        // Distinguish a missing game from a version mismatch
        return match games::Entity::find_by_id(id.clone()).one(conn).await? {
            Some(game) => Err(sea_orm::DbErr::Custom(format!(
                "{OPTIMISTIC_LOCK_PREFIX}{{\"expected\":{},\"actual\":{}}}",
                expected_version, game.version
            ))),
            None => Err(sea_orm::DbErr::RecordNotFound(format!(
                "Game {id} not found"
            ))),
        };
    }

    require_game(conn, &id).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find()
        .filter(games::Column::Id.eq(game_id))
        .one(conn)
        .await
}

/// Find game by ID or return RecordNotFound error.
pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<games::Model, sea_orm::DbErr> {
    find_by_id(conn, game_id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound(format!("Game {game_id} not found")))
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameCreate,
) -> Result<games::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let GameCreate { id, fields } = dto;
    let game_active = games::ActiveModel {
        id: Set(id),
        board: Set(fields.board),
        current_team: Set(fields.current_team),
        current_clue: Set(fields.current_clue),
        guesses_remaining: Set(fields.guesses_remaining),
        red_remaining: Set(fields.red_remaining),
        blue_remaining: Set(fields.blue_remaining),
        winner: Set(fields.winner),
        version: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
    };

    game_active.insert(conn).await
}

pub async fn update_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameUpdate,
) -> Result<games::Model, sea_orm::DbErr> {
    optimistic_update_then_fetch(conn, dto).await
}
