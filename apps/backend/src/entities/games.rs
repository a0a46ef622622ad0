use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Ordered array of `{word, team, revealed}` cells.
    #[sea_orm(column_type = "Json")]
    pub board: Json,
    #[sea_orm(column_name = "current_team")]
    pub current_team: String,
    #[sea_orm(column_name = "current_clue", column_type = "Json", nullable)]
    pub current_clue: Option<Json>,
    #[sea_orm(column_name = "guesses_remaining")]
    pub guesses_remaining: i32,
    #[sea_orm(column_name = "red_remaining", column_type = "SmallInteger")]
    pub red_remaining: i16,
    #[sea_orm(column_name = "blue_remaining", column_type = "SmallInteger")]
    pub blue_remaining: i16,
    pub winner: Option<String>,
    pub version: i32,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
