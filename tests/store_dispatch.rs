mod common;

use std::time::Duration;

use common::next_state;
use stateholder::{Event, Reducer, Scope, State, StateHolder, Store, StoreError};

#[derive(Debug, Clone, PartialEq, Default)]
struct ProductsState {
    page: u32,
    products: Vec<String>,
    loading: bool,
    error: Option<String>,
}

impl State for ProductsState {}

enum ProductsEvent {
    LoadPage(u32),
    PageLoaded(Vec<String>),
    Failed(String),
}

impl Event for ProductsEvent {}

struct ProductsReducer;

impl Reducer for ProductsReducer {
    type State = ProductsState;
    type Event = ProductsEvent;

    fn reduce(state: ProductsState, event: ProductsEvent) -> ProductsState {
        match event {
            ProductsEvent::LoadPage(page) => ProductsState {
                page,
                loading: true,
                error: None,
                ..state
            },
            ProductsEvent::PageLoaded(mut items) => {
                let mut products = state.products;
                products.append(&mut items);
                ProductsState {
                    products,
                    loading: false,
                    ..state
                }
            }
            ProductsEvent::Failed(message) => ProductsState {
                loading: false,
                error: Some(message),
                ..state
            },
        }
    }
}

async fn fetch_page(page: u32) -> anyhow::Result<Vec<String>> {
    tokio::time::sleep(Duration::from_millis(5)).await;
    if page > 2 {
        anyhow::bail!("page {page} out of range");
    }
    Ok((0..2).map(|i| format!("product-{page}-{i}")).collect())
}

fn products_store(scope: &Scope) -> Store<ProductsReducer> {
    let builder = StateHolder::builder(scope.handle(), ProductsState::default).on_failure(
        |failure, holder| {
            let event = ProductsEvent::Failed(failure.to_string());
            let _ = holder.update(|state| ProductsReducer::reduce(state.clone(), event));
        },
    );
    Store::build(builder).unwrap()
}

fn load(store: &Store<ProductsReducer>, page: u32) -> stateholder::GuardedTask {
    store.dispatch(ProductsEvent::LoadPage(page)).unwrap();
    let worker = store.clone();
    store.run_guarded(async move {
        let items = fetch_page(page).await?;
        worker.dispatch(ProductsEvent::PageLoaded(items))?;
        Ok(())
    })
}

#[tokio::test]
async fn loading_pages_appends_products() {
    let scope = Scope::new();
    let store = products_store(&scope);

    assert!(load(&store, 1).join().await.is_completed());
    assert!(load(&store, 2).join().await.is_completed());

    let state = store.state();
    assert_eq!(state.page, 2);
    assert!(!state.loading);
    assert_eq!(
        state.products,
        vec!["product-1-0", "product-1-1", "product-2-0", "product-2-1"]
    );
}

#[tokio::test]
async fn observer_sees_loading_then_result() {
    let scope = Scope::new();
    let store = products_store(&scope);
    let mut states = store.observe();
    assert_eq!(next_state(&mut states).await, Some(ProductsState::default()));

    load(&store, 1).join().await;

    let loading = next_state(&mut states).await.unwrap();
    assert!(loading.loading);
    assert!(loading.products.is_empty());

    let loaded = next_state(&mut states).await.unwrap();
    assert!(!loaded.loading);
    assert_eq!(loaded.products.len(), 2);
}

#[tokio::test]
async fn failed_load_lands_in_error_field() {
    let scope = Scope::new();
    let store = products_store(&scope);

    let outcome = load(&store, 3).join().await;
    assert!(outcome.failure().is_some());

    let state = store.state();
    assert!(!state.loading);
    assert!(state.products.is_empty());
    assert_eq!(state.error.as_deref(), Some("page 3 out of range"));
}

#[tokio::test]
async fn dispatch_after_scope_end_is_rejected() {
    let scope = Scope::new();
    let store = products_store(&scope);
    drop(scope);

    let result = store.dispatch(ProductsEvent::LoadPage(1));
    assert_eq!(result, Err(StoreError::Closed));
    assert_eq!(store.state(), ProductsState::default());
}
