#![allow(dead_code)]

use migration::{Migrator, MigratorTrait};
use products_crm::{CompanyStore, ContactStore, DatabaseConnection, DealStore, NewCompany, NewDeal};
use sea_orm::Database;

pub struct TestContext {
    pub db: DatabaseConnection,
    pub companies: CompanyStore,
    pub contacts: ContactStore,
    pub deals: DealStore,
}

/// Fresh in-memory SQLite database with the real schema applied.
pub async fn setup() -> TestContext {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    TestContext {
        companies: CompanyStore::new(db.clone()),
        contacts: ContactStore::new(db.clone()),
        deals: DealStore::new(db.clone()),
        db,
    }
}

impl TestContext {
    pub async fn company(&self, name: &str) -> i32 {
        self.companies.create(NewCompany::new(name)).await.unwrap().id
    }

    pub async fn deal(&self, company_id: i32, title: &str, value: f64, stage: &str) -> i32 {
        let input = NewDeal {
            value,
            stage: Some(stage.to_string()),
            ..NewDeal::new(title, company_id)
        };
        self.deals.create(input).await.unwrap().id
    }
}
