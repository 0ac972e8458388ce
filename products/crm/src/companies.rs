use chrono::Utc;
use entity::{company, contact, deal};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Select,
    TransactionTrait,
};
use tracing::{info, instrument};

use crate::error::{CrmError, CrmResult};
use crate::filter::contains_ci;
use crate::pagination::Page;
use crate::validate;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewCompany {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
}

impl NewCompany {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl CompanyPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompanyOrder {
    #[default]
    Id,
    Name,
}

impl CompanyOrder {
    pub fn from_key(key: &str) -> Self {
        match key {
            "name" => Self::Name,
            _ => Self::Id,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompanyFilter {
    pub q: Option<String>,
    pub order_by: Option<String>,
    pub descending: bool,
    pub page: Page,
}

impl CompanyFilter {
    pub fn to_select(&self) -> CrmResult<Select<company::Entity>> {
        let (limit, offset) = self.page.resolve()?;
        let mut query = company::Entity::find();
        if let Some(term) = validate::search_term(self.q.as_deref()) {
            query = query.filter(contains_ci(company::Column::Name, &term));
        }
        let direction = if self.descending { Order::Desc } else { Order::Asc };
        let order = self
            .order_by
            .as_deref()
            .map(CompanyOrder::from_key)
            .unwrap_or_default();
        query = match order {
            CompanyOrder::Id => query.order_by(company::Column::Id, direction),
            CompanyOrder::Name => query
                .order_by(company::Column::Name, direction)
                .order_by(company::Column::Id, Order::Asc),
        };
        Ok(query.limit(limit).offset(offset))
    }
}

/// Rows removed together with a company.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompanyDeletion {
    pub contacts: u64,
    pub deals: u64,
}

/// Fails with `Referential` unless the company exists on `conn`.
pub(crate) async fn ensure_company<C: ConnectionTrait>(conn: &C, company_id: i32) -> CrmResult<()> {
    company::Entity::find_by_id(company_id)
        .one(conn)
        .await?
        .map(|_| ())
        .ok_or_else(|| CrmError::missing_company(company_id))
}

#[derive(Clone)]
pub struct CompanyStore {
    db: DatabaseConnection,
}

impl CompanyStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[instrument(name = "crm.companies.create", skip_all)]
    pub async fn create(&self, input: NewCompany) -> CrmResult<company::Model> {
        let name = validate::required_text("name", &input.name, validate::MAX_NAME)?;
        let email = validate::email(input.email)?;
        let phone = validate::optional_text("phone", input.phone, validate::MAX_PHONE)?;
        let website = validate::optional_text("website", input.website, validate::MAX_SHORT_TEXT)?;

        let txn = self.db.begin().await?;
        let now: DateTimeWithTimeZone = Utc::now().into();
        let model = company::ActiveModel {
            id: NotSet,
            name: Set(name),
            email: Set(email),
            phone: Set(phone),
            website: Set(website),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(company_id = model.id, "company created");
        Ok(model)
    }

    pub async fn get(&self, id: i32) -> CrmResult<company::Model> {
        company::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CrmError::NotFound { entity: "company", id })
    }

    #[instrument(name = "crm.companies.list", skip_all, fields(has_q = filter.q.is_some()))]
    pub async fn list(&self, filter: &CompanyFilter) -> CrmResult<Vec<company::Model>> {
        Ok(filter.to_select()?.all(&self.db).await?)
    }

    #[instrument(name = "crm.companies.update", skip(self, patch))]
    pub async fn update(&self, id: i32, patch: CompanyPatch) -> CrmResult<company::Model> {
        if patch.is_empty() {
            return self.get(id).await;
        }
        let name = patch
            .name
            .as_deref()
            .map(|n| validate::required_text("name", n, validate::MAX_NAME))
            .transpose()?;
        let email = match patch.email {
            Some(email) => Some(validate::email(email)?),
            None => None,
        };
        let phone = match patch.phone {
            Some(phone) => Some(validate::optional_text("phone", phone, validate::MAX_PHONE)?),
            None => None,
        };
        let website = match patch.website {
            Some(site) => Some(validate::optional_text("website", site, validate::MAX_SHORT_TEXT)?),
            None => None,
        };

        let txn = self.db.begin().await?;
        let existing = company::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(CrmError::NotFound { entity: "company", id })?;

        let mut active: company::ActiveModel = existing.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(email) = email {
            active.email = Set(email);
        }
        if let Some(phone) = phone {
            active.phone = Set(phone);
        }
        if let Some(website) = website {
            active.website = Set(website);
        }
        if let Some(notes) = patch.notes {
            active.notes = Set(notes);
        }
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes the company with its contacts and deals in one transaction.
    #[instrument(name = "crm.companies.delete", skip(self))]
    pub async fn delete(&self, id: i32) -> CrmResult<CompanyDeletion> {
        let txn = self.db.begin().await?;
        ensure_found(&txn, id).await?;
        let deals = deal::Entity::delete_many()
            .filter(deal::Column::CompanyId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        let contacts = contact::Entity::delete_many()
            .filter(contact::Column::CompanyId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        company::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(company_id = id, deals, contacts, "company deleted");
        Ok(CompanyDeletion { contacts, deals })
    }
}

async fn ensure_found<C: ConnectionTrait>(conn: &C, id: i32) -> CrmResult<()> {
    company::Entity::find_by_id(id)
        .one(conn)
        .await?
        .map(|_| ())
        .ok_or(CrmError::NotFound { entity: "company", id })
}
