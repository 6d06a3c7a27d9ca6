mod common;

use assert_matches::assert_matches;
use common::TestApp;
use rust_decimal_macros::dec;
use storefront::{
    admin::{category_choices, NOTEBOOK_CATEGORY_SLUG},
    catalog::ProductKind,
    errors::ServiceError,
    services::commerce::CategoryInput,
};

#[tokio::test]
async fn deleting_a_category_removes_its_products() {
    let app = TestApp::new().await;
    let doomed = app.category("Gadgets", "gadgets").await;
    let kept = app.category("Notebooks", "notebooks").await;

    app.notebook(doomed.id, "nb-doomed", dec!(100.00)).await;
    app.smartphone(doomed.id, "ph-doomed", dec!(50.00)).await;
    app.notebook(kept.id, "nb-kept", dec!(100.00)).await;

    app.services().categories.delete(doomed.id).await.unwrap();

    let products = &app.services().products;
    for kind in ProductKind::ALL {
        assert!(products.list_by_category(kind, doomed.id).await.unwrap().is_empty());
    }
    assert_eq!(
        products
            .list_by_category(ProductKind::Notebook, kept.id)
            .await
            .unwrap()
            .len(),
        1
    );
    assert_matches!(
        app.services().categories.get(doomed.id).await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn category_slugs_are_unique() {
    let app = TestApp::new().await;
    app.category("Notebooks", "notebooks").await;

    let err = app
        .services()
        .categories
        .create(CategoryInput::new("Laptops", "notebooks"))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn malformed_slug_is_a_validation_error() {
    let app = TestApp::new().await;

    let err = app
        .services()
        .categories
        .create(CategoryInput::new("Phones", "mobile phones"))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
    assert!(app.services().categories.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn categories_list_by_name_and_resolve_by_slug() {
    let app = TestApp::new().await;
    app.category("Smartphones", "smartphones").await;
    app.category("Notebooks", "notebooks").await;

    let names: Vec<String> = app
        .services()
        .categories
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(names, vec!["Notebooks", "Smartphones"]);

    let found = app
        .services()
        .categories
        .get_by_slug("smartphones")
        .await
        .unwrap();
    assert_eq!(found.name, "Smartphones");
}

#[tokio::test]
async fn notebook_admin_only_offers_the_notebooks_category() {
    let app = TestApp::new().await;
    app.category("Smartphones", "smartphones").await;
    let notebooks = app.category("Notebooks", NOTEBOOK_CATEGORY_SLUG).await;
    app.category("Accessories", "accessories").await;

    let for_notebooks = category_choices(&*app.state.db, ProductKind::Notebook)
        .await
        .unwrap();
    assert_eq!(for_notebooks, vec![notebooks]);

    let for_phones = category_choices(&*app.state.db, ProductKind::Smartphone)
        .await
        .unwrap();
    assert_eq!(for_phones.len(), 3);
}
