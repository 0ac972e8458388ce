mod common;

use entity::Stage;
use products_crm::{CompanyFilter, ContactFilter, DealFilter, Page, seed_demo};

use common::setup;

#[tokio::test]
async fn seed_tops_up_and_is_idempotent() {
    let ctx = setup().await;

    let first = seed_demo(&ctx.db).await.unwrap();
    assert_eq!((first.companies, first.contacts, first.deals), (3, 4, 12));

    let second = seed_demo(&ctx.db).await.unwrap();
    assert!(second.is_noop(), "{second:?}");

    let companies = ctx.companies.list(&CompanyFilter::default()).await.unwrap();
    assert_eq!(companies.len(), 3);
    let contacts = ctx.contacts.list(&ContactFilter::default()).await.unwrap();
    assert_eq!(contacts.len(), 4);

    let all = DealFilter {
        page: Page::new(200, 0),
        ..DealFilter::default()
    };
    let deals = ctx.deals.list(&all).await.unwrap();
    assert_eq!(deals.len(), 12);

    let counts = ctx.deals.counts_by_stage().await.unwrap();
    assert_eq!(counts[&Stage::Prospeccao], 2);
    assert_eq!(counts[&Stage::Contrato], 1);
    assert_eq!(counts.values().sum::<u64>(), 12);
}

#[tokio::test]
async fn seed_keeps_existing_rows() {
    let ctx = setup().await;
    ctx.company("TechNova").await;

    let report = seed_demo(&ctx.db).await.unwrap();
    assert_eq!(report.companies, 2);
    let companies = ctx.companies.list(&CompanyFilter::default()).await.unwrap();
    let technova = companies.iter().filter(|c| c.name == "TechNova").count();
    assert_eq!(technova, 1);
}
