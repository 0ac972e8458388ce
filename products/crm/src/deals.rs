use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use entity::{Stage, deal};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, Condition,
    DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Select,
    TransactionTrait,
};
use tracing::{info, instrument};

use crate::companies::ensure_company;
use crate::error::{CrmError, CrmResult};
use crate::filter::contains_ci;
use crate::pagination::Page;
use crate::stage::validate_stage;
use crate::validate;

/// Fields for a new deal. `stage` is validated; `None` means the first stage.
#[derive(Clone, Debug, PartialEq)]
pub struct NewDeal {
    pub title: String,
    pub value: f64,
    pub stage: Option<String>,
    pub probability: i32,
    pub expected_close_date: Option<NaiveDate>,
    pub owner: Option<String>,
    pub notes: Option<String>,
    pub company_id: i32,
}

impl NewDeal {
    pub fn new(title: impl Into<String>, company_id: i32) -> Self {
        Self {
            title: title.into(),
            value: 0.0,
            stage: None,
            probability: 0,
            expected_close_date: None,
            owner: None,
            notes: None,
            company_id,
        }
    }
}

/// Partial update. Outer `None` leaves the stored value untouched; for the
/// nullable columns `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DealPatch {
    pub title: Option<String>,
    pub value: Option<f64>,
    pub stage: Option<String>,
    pub probability: Option<i32>,
    pub expected_close_date: Option<Option<NaiveDate>>,
    pub owner: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub company_id: Option<i32>,
}

impl DealPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DealOrder {
    #[default]
    Id,
    Value,
    ExpectedCloseDate,
    Probability,
}

impl DealOrder {
    /// Unknown keys fall back to [`DealOrder::Id`] instead of failing.
    pub fn from_key(key: &str) -> Self {
        match key {
            "value" => Self::Value,
            "expected_close_date" => Self::ExpectedCloseDate,
            "probability" => Self::Probability,
            _ => Self::Id,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Value => "value",
            Self::ExpectedCloseDate => "expected_close_date",
            Self::Probability => "probability",
        }
    }

    fn column(self) -> deal::Column {
        match self {
            Self::Id => deal::Column::Id,
            Self::Value => deal::Column::Value,
            Self::ExpectedCloseDate => deal::Column::ExpectedCloseDate,
            Self::Probability => deal::Column::Probability,
        }
    }
}

/// Independent optional filters, ANDed together. `q` matches title OR notes,
/// case-insensitively.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DealFilter {
    pub company_id: Option<i32>,
    pub stage: Option<String>,
    pub q: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub order_by: Option<String>,
    pub descending: bool,
    pub page: Page,
}

impl DealFilter {
    pub fn order(&self) -> DealOrder {
        self.order_by
            .as_deref()
            .map(DealOrder::from_key)
            .unwrap_or_default()
    }

    /// Build the select statement; fails before touching the database when a
    /// filter value is invalid.
    pub fn to_select(&self) -> CrmResult<Select<deal::Entity>> {
        let (limit, offset) = self.page.resolve()?;
        let min_value = validate::value_bound("min_value", self.min_value)?;
        let max_value = validate::value_bound("max_value", self.max_value)?;

        let mut query = deal::Entity::find();
        if let Some(company_id) = self.company_id {
            query = query.filter(deal::Column::CompanyId.eq(company_id));
        }
        if let Some(stage) = self.stage.as_deref() {
            query = query.filter(deal::Column::Stage.eq(validate_stage(stage)?));
        }
        if let Some(term) = validate::search_term(self.q.as_deref()) {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(deal::Column::Title, &term))
                    .add(contains_ci(deal::Column::Notes, &term)),
            );
        }
        if let Some(min) = min_value {
            query = query.filter(deal::Column::Value.gte(min));
        }
        if let Some(max) = max_value {
            query = query.filter(deal::Column::Value.lte(max));
        }

        let order = self.order();
        let direction = if self.descending { Order::Desc } else { Order::Asc };
        query = query.order_by(order.column(), direction);
        if order != DealOrder::Id {
            query = query.order_by(deal::Column::Id, Order::Asc);
        }
        Ok(query.limit(limit).offset(offset))
    }
}

/// Stage-validated deal store.
#[derive(Clone)]
pub struct DealStore {
    db: DatabaseConnection,
}

impl DealStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[instrument(name = "crm.deals.create", skip_all, fields(company_id = input.company_id))]
    pub async fn create(&self, input: NewDeal) -> CrmResult<deal::Model> {
        let stage = match input.stage.as_deref() {
            Some(candidate) => validate_stage(candidate)?,
            None => Stage::default(),
        };
        let title = validate::required_text("title", &input.title, validate::MAX_TITLE)?;
        let value = validate::deal_value(input.value)?;
        let probability = validate::probability(input.probability)?;
        let owner = validate::optional_text("owner", input.owner, validate::MAX_NAME)?;

        let txn = self.db.begin().await?;
        ensure_company(&txn, input.company_id).await?;
        let now: DateTimeWithTimeZone = Utc::now().into();
        let model = deal::ActiveModel {
            id: NotSet,
            title: Set(title),
            value: Set(value),
            stage: Set(stage),
            probability: Set(probability),
            expected_close_date: Set(input.expected_close_date),
            owner: Set(owner),
            notes: Set(input.notes),
            company_id: Set(input.company_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(deal_id = model.id, stage = %model.stage, "deal created");
        Ok(model)
    }

    pub async fn get(&self, id: i32) -> CrmResult<deal::Model> {
        deal::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CrmError::NotFound { entity: "deal", id })
    }

    #[instrument(
        name = "crm.deals.list",
        skip_all,
        fields(
            stage = filter.stage.as_deref().unwrap_or(""),
            has_company = filter.company_id.is_some(),
            has_q = filter.q.is_some(),
            order = filter.order().as_str(),
            desc = filter.descending,
        )
    )]
    pub async fn list(&self, filter: &DealFilter) -> CrmResult<Vec<deal::Model>> {
        let query = filter.to_select()?;
        Ok(query.all(&self.db).await?)
    }

    #[instrument(name = "crm.deals.update", skip(self, patch))]
    pub async fn update(&self, id: i32, patch: DealPatch) -> CrmResult<deal::Model> {
        if patch.is_empty() {
            return self.get(id).await;
        }
        // Updates that omit `stage` keep the stored, already-valid value.
        let stage = patch.stage.as_deref().map(validate_stage).transpose()?;
        let title = patch
            .title
            .as_deref()
            .map(|t| validate::required_text("title", t, validate::MAX_TITLE))
            .transpose()?;
        let value = patch.value.map(validate::deal_value).transpose()?;
        let probability = patch.probability.map(validate::probability).transpose()?;
        let owner = match patch.owner {
            Some(owner) => Some(validate::optional_text("owner", owner, validate::MAX_NAME)?),
            None => None,
        };

        let txn = self.db.begin().await?;
        let existing = deal::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(CrmError::NotFound { entity: "deal", id })?;

        if let Some(company_id) = patch.company_id {
            if company_id != existing.company_id {
                ensure_company(&txn, company_id).await?;
            }
        }

        let previous_stage = existing.stage;
        let mut active: deal::ActiveModel = existing.into();
        if let Some(title) = title {
            active.title = Set(title);
        }
        if let Some(value) = value {
            active.value = Set(value);
        }
        if let Some(stage) = stage {
            active.stage = Set(stage);
        }
        if let Some(probability) = probability {
            active.probability = Set(probability);
        }
        if let Some(date) = patch.expected_close_date {
            active.expected_close_date = Set(date);
        }
        if let Some(owner) = owner {
            active.owner = Set(owner);
        }
        if let Some(notes) = patch.notes {
            active.notes = Set(notes);
        }
        if let Some(company_id) = patch.company_id {
            active.company_id = Set(company_id);
        }
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        if updated.stage != previous_stage {
            info!(deal_id = id, from = %previous_stage, to = %updated.stage, "deal stage changed");
        }
        Ok(updated)
    }

    #[instrument(name = "crm.deals.delete", skip(self))]
    pub async fn delete(&self, id: i32) -> CrmResult<()> {
        let txn = self.db.begin().await?;
        let res = deal::Entity::delete_by_id(id).exec(&txn).await?;
        if res.rows_affected == 0 {
            return Err(CrmError::NotFound { entity: "deal", id });
        }
        txn.commit().await?;
        info!(deal_id = id, "deal deleted");
        Ok(())
    }

    /// Number of deals per stage; every stage is present, empty ones as 0.
    #[instrument(name = "crm.deals.stage_counts", skip_all)]
    pub async fn counts_by_stage(&self) -> CrmResult<BTreeMap<Stage, u64>> {
        let rows: Vec<(Stage, i64)> = deal::Entity::find()
            .select_only()
            .column(deal::Column::Stage)
            .column_as(Expr::col(deal::Column::Id).count(), "total")
            .group_by(deal::Column::Stage)
            .into_tuple()
            .all(&self.db)
            .await?;
        let mut counts: BTreeMap<Stage, u64> = Stage::ALL.into_iter().map(|s| (s, 0)).collect();
        for (stage, total) in rows {
            counts.insert(stage, u64::try_from(total).unwrap_or(0));
        }
        Ok(counts)
    }

    /// Sum of `value` per stage; every stage is present, empty ones as 0.0.
    #[instrument(name = "crm.deals.stage_values", skip_all)]
    pub async fn total_value_by_stage(&self) -> CrmResult<BTreeMap<Stage, f64>> {
        let rows: Vec<(Stage, Option<f64>)> = deal::Entity::find()
            .select_only()
            .column(deal::Column::Stage)
            .column_as(Expr::col(deal::Column::Value).sum(), "total")
            .group_by(deal::Column::Stage)
            .into_tuple()
            .all(&self.db)
            .await?;
        let mut totals: BTreeMap<Stage, f64> = Stage::ALL.into_iter().map(|s| (s, 0.0)).collect();
        for (stage, total) in rows {
            totals.insert(stage, total.unwrap_or(0.0));
        }
        Ok(totals)
    }
}
