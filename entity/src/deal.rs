use std::fmt;

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "deal")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub value: f64,
    #[sea_orm(indexed)]
    pub stage: Stage,
    pub probability: i32,
    pub expected_close_date: Option<Date>,
    pub owner: Option<String>,
    pub notes: Option<String>,
    #[sea_orm(indexed)]
    pub company_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id",
        on_delete = "Cascade"
    )]
    Company,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

/// Sales pipeline stage, declared in pipeline order.
///
/// Persisted as the raw identifier string so rows can be inspected and
/// migrated without a lookup table.
#[derive(
    Copy, Clone, Debug, Default, EnumIter, DeriveActiveEnum, Eq, PartialEq, Ord, PartialOrd, Hash,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum Stage {
    #[default]
    #[sea_orm(string_value = "prospeccao")]
    Prospeccao,
    #[sea_orm(string_value = "oportunidade")]
    Oportunidade,
    #[sea_orm(string_value = "identificacao")]
    Identificacao,
    #[sea_orm(string_value = "viabilidade")]
    Viabilidade,
    #[sea_orm(string_value = "precificacao")]
    Precificacao,
    #[sea_orm(string_value = "proposta")]
    Proposta,
    #[sea_orm(string_value = "contrato")]
    Contrato,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Prospeccao,
        Stage::Oportunidade,
        Stage::Identificacao,
        Stage::Viabilidade,
        Stage::Precificacao,
        Stage::Proposta,
        Stage::Contrato,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Prospeccao => "prospeccao",
            Stage::Oportunidade => "oportunidade",
            Stage::Identificacao => "identificacao",
            Stage::Viabilidade => "viabilidade",
            Stage::Precificacao => "precificacao",
            Stage::Proposta => "proposta",
            Stage::Contrato => "contrato",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ActiveModelBehavior for ActiveModel {}
