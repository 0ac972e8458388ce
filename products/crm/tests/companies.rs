mod common;

use products_crm::{
    CompanyDeletion, CompanyFilter, CompanyPatch, ContactFilter, CrmError, DealFilter, NewCompany,
    NewContact,
};

use common::setup;

#[tokio::test]
async fn company_crud_roundtrip() {
    let ctx = setup().await;
    let created = ctx
        .companies
        .create(NewCompany {
            email: Some(" Sales@Acme.COM ".into()),
            ..NewCompany::new("Acme")
        })
        .await
        .unwrap();
    assert_eq!(created.email.as_deref(), Some("sales@acme.com"));

    let renamed = ctx
        .companies
        .update(
            created.id,
            CompanyPatch {
                name: Some("Acme Corp".into()),
                email: Some(None),
                ..CompanyPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Acme Corp");
    assert_eq!(renamed.email, None);

    let bad_email = CompanyPatch {
        email: Some(Some("not-an-email".into())),
        ..CompanyPatch::default()
    };
    assert!(matches!(
        ctx.companies.update(created.id, bad_email).await,
        Err(CrmError::Validation(msg)) if msg == "Invalid email address"
    ));
    assert!(matches!(
        ctx.companies.create(NewCompany::new(" ")).await,
        Err(CrmError::Validation(_))
    ));
}

#[tokio::test]
async fn company_search_and_order() {
    let ctx = setup().await;
    for name in ["Globex", "acme labs", "Initech", "ACME Foods"] {
        ctx.company(name).await;
    }

    let filter = CompanyFilter {
        q: Some("acme".into()),
        order_by: Some("name".into()),
        ..CompanyFilter::default()
    };
    let names: Vec<String> = ctx
        .companies
        .list(&filter)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    // byte order: uppercase sorts first
    assert_eq!(names, vec!["ACME Foods", "acme labs"]);
}

#[tokio::test]
async fn deleting_a_company_removes_its_deals_and_contacts() {
    let ctx = setup().await;
    let acme = ctx.company("Acme").await;
    let globex = ctx.company("Globex").await;
    ctx.deal(acme, "A", 10.0, "prospeccao").await;
    ctx.deal(acme, "B", 20.0, "contrato").await;
    ctx.deal(globex, "C", 30.0, "contrato").await;
    ctx.contacts.create(NewContact::new("Ana", acme)).await.unwrap();

    let removed = ctx.companies.delete(acme).await.unwrap();
    assert_eq!(removed, CompanyDeletion { contacts: 1, deals: 2 });

    let deals = ctx.deals.list(&DealFilter::default()).await.unwrap();
    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0].company_id, globex);
    assert!(ctx.contacts.list(&ContactFilter::default()).await.unwrap().is_empty());
    assert!(matches!(
        ctx.companies.get(acme).await,
        Err(CrmError::NotFound { entity: "company", .. })
    ));
    assert!(matches!(ctx.companies.delete(acme).await, Err(CrmError::NotFound { .. })));
}

#[tokio::test]
async fn phone_longer_than_its_column_is_a_validation_error() {
    let ctx = setup().await;
    let input = NewCompany {
        phone: Some("1".repeat(65)),
        ..NewCompany::new("Acme")
    };
    assert!(matches!(
        ctx.companies.create(input).await,
        Err(CrmError::Validation(msg)) if msg == "phone must be at most 64 characters"
    ));

    let id = ctx.company("Globex").await;
    let patch = CompanyPatch {
        phone: Some(Some("9".repeat(100))),
        ..CompanyPatch::default()
    };
    assert!(matches!(ctx.companies.update(id, patch).await, Err(CrmError::Validation(_))));

    let fits = NewCompany {
        phone: Some("1".repeat(64)),
        ..NewCompany::new("Initech")
    };
    assert!(ctx.companies.create(fits).await.is_ok());
}
