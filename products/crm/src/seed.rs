//! Deterministic demo data. Running it again only tops up what is missing.

use chrono::{Days, Utc};
use entity::{Stage, company, contact, deal};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::{info, instrument};

use crate::companies::{CompanyStore, NewCompany};
use crate::contacts::{ContactStore, NewContact};
use crate::deals::{DealStore, NewDeal};
use crate::error::CrmResult;
use crate::stage::suggested_probability;

pub const TARGET_COMPANIES: u64 = 3;
pub const TARGET_CONTACTS: u64 = 4;
pub const TARGET_DEALS: u64 = 12;

const COMPANIES: [(&str, &str, &str); 3] = [
    ("TechNova", "contato@technova.com", "https://technova.com"),
    ("AgroVale", "vendas@agrovale.com.br", "https://agrovale.com.br"),
    ("Saude+ Clínicas", "comercial@saudemais.com", "https://saudemais.com"),
];

const CONTACTS: [(&str, &str, &str); 4] = [
    ("Ana Silva", "ana@technova.com", "CTO"),
    ("Bruno Souza", "bruno@agrovale.com.br", "Diretor Comercial"),
    ("Carla Lima", "carla@saudemais.com", "Compras"),
    ("Diego Alves", "diego@technova.com", "Financeiro"),
];

const DEAL_OWNER: &str = "Marcos";

/// Rows inserted by one seed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub companies: u64,
    pub contacts: u64,
    pub deals: u64,
}

impl SeedReport {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

#[instrument(name = "crm.seed", skip_all)]
pub async fn seed_demo(db: &DatabaseConnection) -> CrmResult<SeedReport> {
    let mut report = SeedReport::default();
    let companies = CompanyStore::new(db.clone());
    let contacts = ContactStore::new(db.clone());
    let deals = DealStore::new(db.clone());

    let mut existing = company::Entity::find().count(db).await?;
    for (name, email, website) in COMPANIES {
        if existing >= TARGET_COMPANIES {
            break;
        }
        let taken = company::Entity::find()
            .filter(company::Column::Name.eq(name))
            .count(db)
            .await?;
        if taken > 0 {
            continue;
        }
        companies
            .create(NewCompany {
                name: name.to_string(),
                email: Some(email.to_string()),
                website: Some(website.to_string()),
                ..NewCompany::default()
            })
            .await?;
        existing += 1;
        report.companies += 1;
    }

    let owners = company::Entity::find()
        .order_by_asc(company::Column::Id)
        .all(db)
        .await?;
    if owners.is_empty() {
        return Ok(report);
    }

    let have_contacts = contact::Entity::find().count(db).await?;
    for (i, (name, email, role)) in CONTACTS.into_iter().enumerate() {
        if have_contacts + report.contacts >= TARGET_CONTACTS {
            break;
        }
        contacts
            .create(NewContact {
                name: name.to_string(),
                email: Some(email.to_string()),
                phone: None,
                role: Some(role.to_string()),
                company_id: owners[i % owners.len()].id,
            })
            .await?;
        report.contacts += 1;
    }

    let have_deals = deal::Entity::find().count(db).await?;
    let today = Utc::now().date_naive();
    let mut i = 0usize;
    while have_deals + report.deals < TARGET_DEALS {
        let owner = &owners[i % owners.len()];
        let stage = Stage::ALL[i % Stage::ALL.len()];
        let input = NewDeal {
            title: format!("Projeto {} #{}", owner.name, 101 + i),
            value: 5000.0 + 4500.0 * i as f64,
            stage: Some(stage.as_str().to_string()),
            probability: suggested_probability(stage),
            expected_close_date: today.checked_add_days(Days::new(7 + 5 * i as u64)),
            owner: Some(DEAL_OWNER.to_string()),
            notes: None,
            company_id: owner.id,
        };
        deals.create(input).await?;
        report.deals += 1;
        i += 1;
    }

    info!(
        companies = report.companies,
        contacts = report.contacts,
        deals = report.deals,
        "demo data seeded"
    );
    Ok(report)
}
