use chrono::Utc;
use entity::contact;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, Condition,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    TransactionTrait,
};
use tracing::{info, instrument};

use crate::companies::ensure_company;
use crate::error::{CrmError, CrmResult};
use crate::filter::contains_ci;
use crate::pagination::Page;
use crate::validate;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub company_id: i32,
}

impl NewContact {
    pub fn new(name: impl Into<String>, company_id: i32) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
            role: None,
            company_id,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub role: Option<Option<String>>,
    pub company_id: Option<i32>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// `q` matches name OR email.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub company_id: Option<i32>,
    pub q: Option<String>,
    pub page: Page,
}

impl ContactFilter {
    pub fn to_select(&self) -> CrmResult<Select<contact::Entity>> {
        let (limit, offset) = self.page.resolve()?;
        let mut query = contact::Entity::find();
        if let Some(company_id) = self.company_id {
            query = query.filter(contact::Column::CompanyId.eq(company_id));
        }
        if let Some(term) = validate::search_term(self.q.as_deref()) {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(contact::Column::Name, &term))
                    .add(contains_ci(contact::Column::Email, &term)),
            );
        }
        Ok(query
            .order_by_asc(contact::Column::Id)
            .limit(limit)
            .offset(offset))
    }
}

#[derive(Clone)]
pub struct ContactStore {
    db: DatabaseConnection,
}

impl ContactStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[instrument(name = "crm.contacts.create", skip_all, fields(company_id = input.company_id))]
    pub async fn create(&self, input: NewContact) -> CrmResult<contact::Model> {
        let name = validate::required_text("name", &input.name, validate::MAX_NAME)?;
        let email = validate::email(input.email)?;
        let phone = validate::optional_text("phone", input.phone, validate::MAX_PHONE)?;
        let role = validate::optional_text("role", input.role, validate::MAX_ROLE)?;

        let txn = self.db.begin().await?;
        ensure_company(&txn, input.company_id).await?;
        let now: DateTimeWithTimeZone = Utc::now().into();
        let model = contact::ActiveModel {
            id: NotSet,
            name: Set(name),
            email: Set(email),
            phone: Set(phone),
            role: Set(role),
            company_id: Set(input.company_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(contact_id = model.id, "contact created");
        Ok(model)
    }

    pub async fn get(&self, id: i32) -> CrmResult<contact::Model> {
        contact::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CrmError::NotFound { entity: "contact", id })
    }

    #[instrument(name = "crm.contacts.list", skip_all, fields(company_id = filter.company_id))]
    pub async fn list(&self, filter: &ContactFilter) -> CrmResult<Vec<contact::Model>> {
        Ok(filter.to_select()?.all(&self.db).await?)
    }

    #[instrument(name = "crm.contacts.update", skip(self, patch))]
    pub async fn update(&self, id: i32, patch: ContactPatch) -> CrmResult<contact::Model> {
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
        let role = match patch.role {
            Some(role) => Some(validate::optional_text("role", role, validate::MAX_ROLE)?),
            None => None,
        };

        let txn = self.db.begin().await?;
        let existing = contact::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(CrmError::NotFound { entity: "contact", id })?;
        if let Some(company_id) = patch.company_id {
            if company_id != existing.company_id {
                ensure_company(&txn, company_id).await?;
            }
        }

        let mut active: contact::ActiveModel = existing.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(email) = email {
            active.email = Set(email);
        }
        if let Some(phone) = phone {
            active.phone = Set(phone);
        }
        if let Some(role) = role {
            active.role = Set(role);
        }
        if let Some(company_id) = patch.company_id {
            active.company_id = Set(company_id);
        }
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    #[instrument(name = "crm.contacts.delete", skip(self))]
    pub async fn delete(&self, id: i32) -> CrmResult<()> {
        let txn = self.db.begin().await?;
        let res = contact::Entity::delete_by_id(id).exec(&txn).await?;
        if res.rows_affected == 0 {
            return Err(CrmError::NotFound { entity: "contact", id });
        }
        txn.commit().await?;
        info!(contact_id = id, "contact deleted");
        Ok(())
    }
}
