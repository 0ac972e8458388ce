use anyhow::anyhow;
use async_graphql::{
    Context, Error, ErrorExtensions, ID, InputObject, MaybeUndefined, Object, Result, SimpleObject,
};
use chrono::{DateTime, NaiveDate, Utc};
use entity::{Stage, company, contact, deal};
use platform_api::ApiError;
use products_crm::{
    CompanyFilter, CompanyPatch, ContactFilter, ContactPatch, CrmError, DealFilter, DealPatch,
    NewCompany, NewContact, NewDeal, Page, stage::suggested_probability,
};
use tracing::instrument;

use super::CrmStores;

#[derive(Default)]
pub struct CrmQuery;

#[derive(Default)]
pub struct CrmMutation;

#[Object]
impl CrmQuery {
    #[instrument(name = "graphql.crm.deals", skip_all)]
    async fn deals(
        &self,
        ctx: &Context<'_>,
        filter: Option<DealFilterInput>,
        first: Option<i32>,
        offset: Option<i32>,
    ) -> Result<Vec<DealNode>> {
        let stores = stores(ctx)?;
        let filter = filter.unwrap_or_default().into_filter(page(first, offset)?)?;
        let rows = stores.deals.list(&filter).await.map_err(crm_error)?;
        Ok(rows.into_iter().map(DealNode::from).collect())
    }

    async fn deal(&self, ctx: &Context<'_>, id: ID) -> Result<Option<DealNode>> {
        let stores = stores(ctx)?;
        match stores.deals.get(parse_id(&id)?).await {
            Ok(model) => Ok(Some(model.into())),
            Err(CrmError::NotFound { .. }) => Ok(None),
            Err(err) => Err(crm_error(err)),
        }
    }

    /// Deal count per stage, every stage included, in pipeline order.
    #[instrument(name = "graphql.crm.deal_stage_counts", skip_all)]
    async fn deal_stage_counts(&self, ctx: &Context<'_>) -> Result<Vec<StageCount>> {
        let counts = stores(ctx)?
            .deals
            .counts_by_stage()
            .await
            .map_err(crm_error)?;
        Ok(counts
            .into_iter()
            .map(|(stage, count)| StageCount {
                stage: stage.as_str().to_string(),
                count,
            })
            .collect())
    }

    /// Sum of deal values per stage, every stage included, in pipeline order.
    #[instrument(name = "graphql.crm.deal_stage_values", skip_all)]
    async fn deal_stage_values(&self, ctx: &Context<'_>) -> Result<Vec<StageTotal>> {
        let totals = stores(ctx)?
            .deals
            .total_value_by_stage()
            .await
            .map_err(crm_error)?;
        Ok(totals
            .into_iter()
            .map(|(stage, total)| StageTotal {
                stage: stage.as_str().to_string(),
                total,
            })
            .collect())
    }

    async fn pipeline_stages(&self) -> Vec<PipelineStage> {
        Stage::ALL
            .into_iter()
            .zip(1..)
            .map(|(stage, position)| PipelineStage {
                key: stage.as_str().to_string(),
                position,
                probability: suggested_probability(stage),
            })
            .collect()
    }

    #[instrument(name = "graphql.crm.companies", skip_all)]
    async fn companies(
        &self,
        ctx: &Context<'_>,
        q: Option<String>,
        order_by: Option<String>,
        descending: Option<bool>,
        first: Option<i32>,
        offset: Option<i32>,
    ) -> Result<Vec<CompanyNode>> {
        let filter = CompanyFilter {
            q,
            order_by,
            descending: descending.unwrap_or(false),
            page: page(first, offset)?,
        };
        let rows = stores(ctx)?
            .companies
            .list(&filter)
            .await
            .map_err(crm_error)?;
        Ok(rows.into_iter().map(CompanyNode::from).collect())
    }

    async fn company(&self, ctx: &Context<'_>, id: ID) -> Result<Option<CompanyNode>> {
        match stores(ctx)?.companies.get(parse_id(&id)?).await {
            Ok(model) => Ok(Some(model.into())),
            Err(CrmError::NotFound { .. }) => Ok(None),
            Err(err) => Err(crm_error(err)),
        }
    }

    #[instrument(name = "graphql.crm.contacts", skip_all)]
    async fn contacts(
        &self,
        ctx: &Context<'_>,
        company_id: Option<ID>,
        q: Option<String>,
        first: Option<i32>,
        offset: Option<i32>,
    ) -> Result<Vec<ContactNode>> {
        let filter = ContactFilter {
            company_id: company_id.as_ref().map(parse_id).transpose()?,
            q,
            page: page(first, offset)?,
        };
        let rows = stores(ctx)?
            .contacts
            .list(&filter)
            .await
            .map_err(crm_error)?;
        Ok(rows.into_iter().map(ContactNode::from).collect())
    }

    async fn contact(&self, ctx: &Context<'_>, id: ID) -> Result<Option<ContactNode>> {
        match stores(ctx)?.contacts.get(parse_id(&id)?).await {
            Ok(model) => Ok(Some(model.into())),
            Err(CrmError::NotFound { .. }) => Ok(None),
            Err(err) => Err(crm_error(err)),
        }
    }
}

#[Object]
impl CrmMutation {
    #[instrument(name = "graphql.crm.create_deal", skip_all)]
    async fn create_deal(&self, ctx: &Context<'_>, input: CreateDealInput) -> Result<DealNode> {
        let input = NewDeal {
            title: input.title,
            value: input.value.unwrap_or(0.0),
            stage: input.stage,
            probability: input.probability.unwrap_or(0),
            expected_close_date: input.expected_close_date,
            owner: input.owner,
            notes: input.notes,
            company_id: parse_id(&input.company_id)?,
        };
        let model = stores(ctx)?.deals.create(input).await.map_err(crm_error)?;
        Ok(model.into())
    }

    #[instrument(name = "graphql.crm.update_deal", skip_all)]
    async fn update_deal(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateDealInput,
    ) -> Result<DealNode> {
        let patch = DealPatch {
            title: input.title,
            value: input.value,
            stage: input.stage,
            probability: input.probability,
            expected_close_date: tristate(input.expected_close_date),
            owner: tristate(input.owner),
            notes: tristate(input.notes),
            company_id: input.company_id.as_ref().map(parse_id).transpose()?,
        };
        let model = stores(ctx)?
            .deals
            .update(parse_id(&id)?, patch)
            .await
            .map_err(crm_error)?;
        Ok(model.into())
    }

    #[instrument(name = "graphql.crm.delete_deal", skip_all)]
    async fn delete_deal(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        stores(ctx)?
            .deals
            .delete(parse_id(&id)?)
            .await
            .map_err(crm_error)?;
        Ok(true)
    }

    #[instrument(name = "graphql.crm.create_company", skip_all)]
    async fn create_company(
        &self,
        ctx: &Context<'_>,
        input: CreateCompanyInput,
    ) -> Result<CompanyNode> {
        let input = NewCompany {
            name: input.name,
            email: input.email,
            phone: input.phone,
            website: input.website,
            notes: input.notes,
        };
        let model = stores(ctx)?
            .companies
            .create(input)
            .await
            .map_err(crm_error)?;
        Ok(model.into())
    }

    #[instrument(name = "graphql.crm.update_company", skip_all)]
    async fn update_company(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateCompanyInput,
    ) -> Result<CompanyNode> {
        let patch = CompanyPatch {
            name: input.name,
            email: tristate(input.email),
            phone: tristate(input.phone),
            website: tristate(input.website),
            notes: tristate(input.notes),
        };
        let model = stores(ctx)?
            .companies
            .update(parse_id(&id)?, patch)
            .await
            .map_err(crm_error)?;
        Ok(model.into())
    }

    /// Removes the company together with its contacts and deals.
    #[instrument(name = "graphql.crm.delete_company", skip_all)]
    async fn delete_company(&self, ctx: &Context<'_>, id: ID) -> Result<CompanyDeletionPayload> {
        let removed = stores(ctx)?
            .companies
            .delete(parse_id(&id)?)
            .await
            .map_err(crm_error)?;
        Ok(CompanyDeletionPayload {
            deleted_contacts: removed.contacts,
            deleted_deals: removed.deals,
        })
    }

    #[instrument(name = "graphql.crm.create_contact", skip_all)]
    async fn create_contact(
        &self,
        ctx: &Context<'_>,
        input: CreateContactInput,
    ) -> Result<ContactNode> {
        let input = NewContact {
            name: input.name,
            email: input.email,
            phone: input.phone,
            role: input.role,
            company_id: parse_id(&input.company_id)?,
        };
        let model = stores(ctx)?
            .contacts
            .create(input)
            .await
            .map_err(crm_error)?;
        Ok(model.into())
    }

    #[instrument(name = "graphql.crm.update_contact", skip_all)]
    async fn update_contact(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateContactInput,
    ) -> Result<ContactNode> {
        let patch = ContactPatch {
            name: input.name,
            email: tristate(input.email),
            phone: tristate(input.phone),
            role: tristate(input.role),
            company_id: input.company_id.as_ref().map(parse_id).transpose()?,
        };
        let model = stores(ctx)?
            .contacts
            .update(parse_id(&id)?, patch)
            .await
            .map_err(crm_error)?;
        Ok(model.into())
    }

    #[instrument(name = "graphql.crm.delete_contact", skip_all)]
    async fn delete_contact(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        stores(ctx)?
            .contacts
            .delete(parse_id(&id)?)
            .await
            .map_err(crm_error)?;
        Ok(true)
    }
}

#[derive(InputObject, Default, Clone)]
pub struct DealFilterInput {
    pub company_id: Option<ID>,
    pub stage: Option<String>,
    /// Case-insensitive match on title or notes.
    pub q: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    /// `id`, `value`, `expected_close_date` or `probability`; anything else sorts by id.
    pub order_by: Option<String>,
    pub descending: Option<bool>,
}

impl DealFilterInput {
    fn into_filter(self, page: Page) -> Result<DealFilter> {
        Ok(DealFilter {
            company_id: self.company_id.as_ref().map(parse_id).transpose()?,
            stage: self.stage,
            q: self.q,
            min_value: self.min_value,
            max_value: self.max_value,
            order_by: self.order_by,
            descending: self.descending.unwrap_or(false),
            page,
        })
    }
}

#[derive(InputObject, Clone)]
pub struct CreateDealInput {
    pub title: String,
    pub value: Option<f64>,
    pub stage: Option<String>,
    pub probability: Option<i32>,
    pub expected_close_date: Option<NaiveDate>,
    pub owner: Option<String>,
    pub notes: Option<String>,
    pub company_id: ID,
}

#[derive(InputObject, Default, Clone)]
pub struct UpdateDealInput {
    pub title: Option<String>,
    pub value: Option<f64>,
    pub stage: Option<String>,
    pub probability: Option<i32>,
    pub expected_close_date: MaybeUndefined<NaiveDate>,
    pub owner: MaybeUndefined<String>,
    pub notes: MaybeUndefined<String>,
    pub company_id: Option<ID>,
}

#[derive(InputObject, Clone)]
pub struct CreateCompanyInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
}

#[derive(InputObject, Default, Clone)]
pub struct UpdateCompanyInput {
    pub name: Option<String>,
    pub email: MaybeUndefined<String>,
    pub phone: MaybeUndefined<String>,
    pub website: MaybeUndefined<String>,
    pub notes: MaybeUndefined<String>,
}

#[derive(InputObject, Clone)]
pub struct CreateContactInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub company_id: ID,
}

#[derive(InputObject, Default, Clone)]
pub struct UpdateContactInput {
    pub name: Option<String>,
    pub email: MaybeUndefined<String>,
    pub phone: MaybeUndefined<String>,
    pub role: MaybeUndefined<String>,
    pub company_id: Option<ID>,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Deal")]
pub struct DealNode {
    pub id: ID,
    pub title: String,
    pub value: f64,
    pub stage: String,
    pub probability: i32,
    pub expected_close_date: Option<NaiveDate>,
    pub owner: Option<String>,
    pub notes: Option<String>,
    pub company_id: ID,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<deal::Model> for DealNode {
    fn from(model: deal::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            title: model.title,
            value: model.value,
            stage: model.stage.as_str().to_string(),
            probability: model.probability,
            expected_close_date: model.expected_close_date,
            owner: model.owner,
            notes: model.notes,
            company_id: ID::from(model.company_id.to_string()),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Company")]
pub struct CompanyNode {
    pub id: ID,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<company::Model> for CompanyNode {
    fn from(model: company::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            name: model.name,
            email: model.email,
            phone: model.phone,
            website: model.website,
            notes: model.notes,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Contact")]
pub struct ContactNode {
    pub id: ID,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub company_id: ID,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<contact::Model> for ContactNode {
    fn from(model: contact::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            name: model.name,
            email: model.email,
            phone: model.phone,
            role: model.role,
            company_id: ID::from(model.company_id.to_string()),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct StageCount {
    pub stage: String,
    pub count: u64,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct StageTotal {
    pub stage: String,
    pub total: f64,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct PipelineStage {
    pub key: String,
    pub position: i32,
    pub probability: i32,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct CompanyDeletionPayload {
    pub deleted_contacts: u64,
    pub deleted_deals: u64,
}

fn stores<'a>(ctx: &Context<'a>) -> Result<&'a CrmStores> {
    ctx.data::<CrmStores>()
        .map_err(|_| ApiError::internal(anyhow!("crm stores missing from schema data")).extend())
}

fn parse_id(id: &ID) -> Result<i32> {
    id.as_str()
        .parse::<i32>()
        .map_err(|_| ApiError::InvalidInput(format!("invalid id `{}`", id.as_str())).extend())
}

fn page(first: Option<i32>, offset: Option<i32>) -> Result<Page> {
    let limit = first
        .map(u64::try_from)
        .transpose()
        .map_err(|_| ApiError::InvalidInput("first must be between 1 and 200".into()).extend())?;
    let offset = offset
        .map(u64::try_from)
        .transpose()
        .map_err(|_| ApiError::InvalidInput("offset must be non-negative".into()).extend())?;
    Ok(Page { limit, offset })
}

fn tristate<T>(value: MaybeUndefined<T>) -> Option<Option<T>> {
    match value {
        MaybeUndefined::Undefined => None,
        MaybeUndefined::Null => Some(None),
        MaybeUndefined::Value(v) => Some(Some(v)),
    }
}

fn crm_error(err: CrmError) -> Error {
    let api = match err {
        CrmError::InvalidStage { candidate, valid } => ApiError::InvalidStage {
            candidate,
            valid: valid.into_iter().map(String::from).collect(),
        },
        CrmError::Validation(message) => ApiError::InvalidInput(message),
        err @ CrmError::NotFound { .. } => ApiError::NotFound(err.to_string()),
        CrmError::Referential(message) => ApiError::Referential(message),
        CrmError::Database(source) => ApiError::internal(source.into()),
    };
    api.extend()
}

#[cfg(test)]
mod tests {
    use async_graphql::{Request, Value, Variables};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;
    use serde_json::json;

    use crate::graphql::{SchemaType, build_schema};

    async fn schema() -> SchemaType {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        build_schema(db)
    }

    async fn run(schema: &SchemaType, query: &str, vars: serde_json::Value) -> async_graphql::Response {
        schema
            .execute(Request::new(query).variables(Variables::from_json(vars)))
            .await
    }

    fn code(resp: &async_graphql::Response) -> Option<Value> {
        resp.errors
            .first()
            .and_then(|e| e.extensions.as_ref())
            .and_then(|ext| ext.get("code"))
            .cloned()
    }

    async fn company_id(schema: &SchemaType) -> String {
        let resp = run(
            schema,
            "mutation($input: CreateCompanyInput!) { crm { createCompany(input: $input) { id } } }",
            json!({ "input": { "name": "Acme" } }),
        )
        .await;
        assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
        resp.data.into_json().unwrap()["crm"]["createCompany"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    const CREATE_DEAL: &str = r#"
        mutation($input: CreateDealInput!) {
            crm { createDeal(input: $input) { id title value stage probability } }
        }
    "#;

    #[tokio::test]
    async fn create_deal_and_report_by_stage() {
        let schema = schema().await;
        let company = company_id(&schema).await;
        for (title, value, stage) in [("A", 100.0, "prospeccao"), ("B", 50.0, "prospeccao"), ("C", 200.0, "contrato")] {
            let resp = run(
                &schema,
                CREATE_DEAL,
                json!({ "input": { "title": title, "value": value, "stage": stage, "companyId": company } }),
            )
            .await;
            assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
        }

        let resp = run(
            &schema,
            "{ crm { dealStageCounts { stage count } dealStageValues { stage total } } }",
            json!({}),
        )
        .await;
        assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
        let body = resp.data.into_json().unwrap();
        let counts = body["crm"]["dealStageCounts"].as_array().unwrap();
        assert_eq!(counts.len(), 7);
        assert_eq!(counts[0], json!({ "stage": "prospeccao", "count": 2 }));
        assert_eq!(counts[6], json!({ "stage": "contrato", "count": 1 }));
        let totals = body["crm"]["dealStageValues"].as_array().unwrap();
        assert_eq!(totals[6], json!({ "stage": "contrato", "total": 200.0 }));
        assert_eq!(totals[1], json!({ "stage": "oportunidade", "total": 0.0 }));
    }

    #[tokio::test]
    async fn invalid_stage_is_coded_with_choices() {
        let schema = schema().await;
        let company = company_id(&schema).await;
        let resp = run(
            &schema,
            CREATE_DEAL,
            json!({ "input": { "title": "X", "stage": "won", "companyId": company } }),
        )
        .await;
        assert_eq!(code(&resp), Some(Value::from("INVALID_STAGE")));
        let valid = resp.errors[0]
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("validStages"))
            .cloned();
        match valid {
            Some(Value::List(items)) => assert_eq!(items.len(), 7),
            other => panic!("unexpected validStages: {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_kinds_map_to_codes() {
        let schema = schema().await;
        let company = company_id(&schema).await;

        let resp = run(
            &schema,
            CREATE_DEAL,
            json!({ "input": { "title": "X", "value": -3.0, "companyId": company } }),
        )
        .await;
        assert_eq!(code(&resp), Some(Value::from("VALIDATION")));

        let resp = run(
            &schema,
            CREATE_DEAL,
            json!({ "input": { "title": "X", "companyId": "999" } }),
        )
        .await;
        assert_eq!(code(&resp), Some(Value::from("REFERENTIAL")));

        let resp = run(
            &schema,
            "mutation { crm { deleteDeal(id: \"41\") } }",
            json!({}),
        )
        .await;
        assert_eq!(code(&resp), Some(Value::from("NOT_FOUND")));

        let resp = run(&schema, "{ crm { deals(first: 0) { id } } }", json!({})).await;
        assert_eq!(code(&resp), Some(Value::from("VALIDATION")));
    }

    #[tokio::test]
    async fn update_deal_distinguishes_null_from_omitted() {
        let schema = schema().await;
        let company = company_id(&schema).await;
        let resp = run(
            &schema,
            CREATE_DEAL,
            json!({ "input": { "title": "Pilot", "stage": "proposta", "companyId": company } }),
        )
        .await;
        let id = resp.data.into_json().unwrap()["crm"]["createDeal"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let update = r#"
            mutation($id: ID!, $input: UpdateDealInput!) {
                crm { updateDeal(id: $id, input: $input) { stage owner notes } }
            }
        "#;
        let resp = run(
            &schema,
            update,
            json!({ "id": id, "input": { "owner": "Marcos", "notes": "call back" } }),
        )
        .await;
        assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);

        let resp = run(&schema, update, json!({ "id": id, "input": { "notes": null } })).await;
        assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
        let body = resp.data.into_json().unwrap();
        assert_eq!(
            body["crm"]["updateDeal"],
            json!({ "stage": "proposta", "owner": "Marcos", "notes": null })
        );
    }

    #[tokio::test]
    async fn deals_query_filters_and_missing_deal_is_null() {
        let schema = schema().await;
        let company = company_id(&schema).await;
        for (title, stage) in [("ERP rollout", "contrato"), ("Support", "contrato"), ("Hardware", "proposta")] {
            run(
                &schema,
                CREATE_DEAL,
                json!({ "input": { "title": title, "stage": stage, "companyId": company } }),
            )
            .await;
        }

        let resp = run(
            &schema,
            r#"{ crm { deals(filter: { stage: "contrato", q: "erp" }) { title } deal(id: "99") { id } } }"#,
            json!({}),
        )
        .await;
        assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
        let body = resp.data.into_json().unwrap();
        assert_eq!(body["crm"]["deals"], json!([{ "title": "ERP rollout" }]));
        assert_eq!(body["crm"]["deal"], json!(null));

        let resp = run(&schema, r#"{ crm { deals(filter: { stage: "Contrato" }) { id } } }"#, json!({})).await;
        assert_eq!(code(&resp), Some(Value::from("INVALID_STAGE")));
    }

    #[tokio::test]
    async fn deleting_company_reports_cascade() {
        let schema = schema().await;
        let company = company_id(&schema).await;
        run(
            &schema,
            CREATE_DEAL,
            json!({ "input": { "title": "A", "companyId": company } }),
        )
        .await;
        let resp = run(
            &schema,
            "mutation($id: ID!) { crm { deleteCompany(id: $id) { deletedDeals deletedContacts } } }",
            json!({ "id": company }),
        )
        .await;
        assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
        assert_eq!(
            resp.data.into_json().unwrap()["crm"]["deleteCompany"],
            json!({ "deletedDeals": 1, "deletedContacts": 0 })
        );
    }

    #[tokio::test]
    async fn pipeline_stages_in_order() {
        let schema = schema().await;
        let resp = run(&schema, "{ crm { pipelineStages { key position probability } } }", json!({})).await;
        let body = resp.data.into_json().unwrap();
        let stages = body["crm"]["pipelineStages"].as_array().unwrap();
        assert_eq!(stages.len(), 7);
        assert_eq!(stages[0], json!({ "key": "prospeccao", "position": 1, "probability": 10 }));
        assert_eq!(stages[6]["key"], "contrato");
    }
}
