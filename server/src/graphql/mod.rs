mod crm;

use async_graphql::{EmptySubscription, Object, Schema, SchemaBuilder};
use products_crm::{CompanyStore, ContactStore, DatabaseConnection, DealStore};
use tracing::instrument;

pub use crm::{CrmMutation, CrmQuery};

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Stores shared by every resolver.
#[derive(Clone)]
pub struct CrmStores {
    pub deals: DealStore,
    pub companies: CompanyStore,
    pub contacts: ContactStore,
}

impl CrmStores {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            deals: DealStore::new(db.clone()),
            companies: CompanyStore::new(db.clone()),
            contacts: ContactStore::new(db),
        }
    }
}

/// Schema without data; enough to print SDL.
pub fn schema_builder() -> SchemaBuilder<QueryRoot, MutationRoot, EmptySubscription> {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
}

pub fn build_schema(db: DatabaseConnection) -> SchemaType {
    schema_builder().data(CrmStores::new(db)).finish()
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn crm(&self) -> CrmQuery {
        CrmQuery
    }

    #[instrument(name = "graphql.version", skip_all)]
    async fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn crm(&self) -> CrmMutation {
        CrmMutation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdl_exposes_crm_roots() {
        let sdl = schema_builder().finish().sdl();
        assert!(sdl.contains("dealStageCounts"), "{sdl}");
        assert!(sdl.contains("createDeal"), "{sdl}");
        assert!(sdl.contains("pipelineStages"), "{sdl}");
    }
}
