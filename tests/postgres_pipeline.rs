use anyhow::Result;
use crm_tests::fresh_postgres;
use entity::Stage;
use products_crm::{
    CompanyStore, CrmError, DealFilter, DealPatch, DealStore, NewCompany, NewDeal, seed_demo,
};

// One test so the shared database is reset exactly once per run.
#[tokio::test]
async fn pipeline_on_postgres() -> Result<()> {
    let Some(pool) = fresh_postgres().await? else {
        return Ok(());
    };
    let companies = CompanyStore::new(pool.clone());
    let deals = DealStore::new(pool.clone());

    let acme = companies.create(NewCompany::new("Acme")).await?.id;
    for (title, value, stage) in [("A", 100.0, "prospeccao"), ("B", 50.0, "prospeccao"), ("C", 200.0, "contrato")] {
        deals
            .create(NewDeal {
                value,
                stage: Some(stage.into()),
                ..NewDeal::new(title, acme)
            })
            .await?;
    }

    let counts = deals.counts_by_stage().await?;
    assert_eq!(counts[&Stage::Prospeccao], 2);
    assert_eq!(counts[&Stage::Oportunidade], 0);
    let totals = deals.total_value_by_stage().await?;
    assert_eq!(totals[&Stage::Contrato], 200.0);
    assert_eq!(totals[&Stage::Prospeccao], 150.0);

    let filter = DealFilter {
        q: Some("a".into()),
        order_by: Some("value".into()),
        descending: true,
        ..DealFilter::default()
    };
    let titles: Vec<String> = deals.list(&filter).await?.into_iter().map(|d| d.title).collect();
    assert_eq!(titles, vec!["A"]);

    let orphan = deals.create(NewDeal::new("Orphan", acme + 1000)).await;
    assert!(matches!(orphan, Err(CrmError::Referential(_))));

    let first = deals.list(&DealFilter::default()).await?[0].id;
    let bad = DealPatch {
        stage: Some("fechado".into()),
        ..DealPatch::default()
    };
    assert!(matches!(deals.update(first, bad).await, Err(CrmError::InvalidStage { .. })));

    let removed = companies.delete(acme).await?;
    assert_eq!(removed.deals, 3);
    assert!(deals.list(&DealFilter::default()).await?.is_empty());

    let report = seed_demo(&pool).await?;
    assert_eq!(report.deals, 12);
    assert!(seed_demo(&pool).await?.is_noop());
    Ok(())
}
