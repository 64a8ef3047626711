mod common;

use common::MockOrders;
use orderdesk_admin::{
    client::GetOptions,
    detail::{DetailView, ViewState},
    models::order::Order,
};

fn new_view(client: &MockOrders) -> DetailView<Order, MockOrders> {
    DetailView::new(client.clone(), &["company"])
}

#[tokio::test]
async fn fetches_with_company_relation_and_loads() {
    let client = MockOrders::new();
    client.insert(common::sample_order("o1"));
    let mut view = new_view(&client);

    assert_eq!(view.state(), &ViewState::Loading);
    let state = view.show(Some("o1")).await;

    match state {
        ViewState::Loaded(order) => {
            assert_eq!(order.id, "o1");
            assert_eq!(order.company.as_ref().unwrap().name, common::COMPANY_NAME);
        }
        other => panic!("expected Loaded, got {:?}", other),
    }
    assert_eq!(
        client.gets(),
        vec![("o1".to_string(), GetOptions::with_relations(["company"]))]
    );
}

#[tokio::test]
async fn missing_record_yields_error_state_without_data() {
    let client = MockOrders::new();
    let mut view = new_view(&client);

    let state = view.show(Some("missing-id")).await;

    match state {
        ViewState::Error(e) => {
            assert!(e.is_not_found());
            assert_eq!(e.message(), "Order missing-id not found");
        }
        other => panic!("expected Error, got {:?}", other),
    }
    assert!(view.state().record().is_none());
    assert_eq!(view.state().label(), "error");
}

#[tokio::test]
async fn same_id_does_not_refetch() {
    let client = MockOrders::new();
    client.insert(common::sample_order("o1"));
    let mut view = new_view(&client);

    view.show(Some("o1")).await;
    view.show(Some("o1")).await;
    view.show(Some("o1")).await;

    assert_eq!(client.gets().len(), 1);
    assert_eq!(view.key(), Some("o1"));
}

#[tokio::test]
async fn new_id_triggers_exactly_one_new_fetch() {
    let client = MockOrders::new();
    client.insert(common::sample_order("o1"));
    client.insert(common::sample_order("o2"));
    let mut view = new_view(&client);

    view.show(Some("o1")).await;
    view.show(Some("o2")).await;

    let ids: Vec<String> = client.gets().into_iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["o1", "o2"]);
    assert_eq!(view.state().record().unwrap().id, "o2");
}

#[tokio::test]
async fn no_id_means_no_fetch() {
    let client = MockOrders::new();
    let mut view = new_view(&client);

    assert!(view.request(None).is_none());
    assert!(view.request(Some("")).is_none());
    view.show(None).await;

    assert!(client.gets().is_empty());
    assert_eq!(view.state(), &ViewState::Loading);
}

#[tokio::test]
async fn superseded_result_is_discarded() {
    let client = MockOrders::new();
    client.insert(common::sample_order("o1"));
    client.insert(common::sample_order("o2"));
    let mut view = new_view(&client);

    let first = view.request(Some("o1")).unwrap();
    let second = view.request(Some("o2")).unwrap();
    assert_eq!(first.id(), "o1");

    let first_result = view.run(&first).await;
    let second_result = view.run(&second).await;

    // o2 resolves first, then the stale o1 response arrives
    assert!(view.complete(second, second_result));
    assert!(!view.complete(first, first_result));

    assert_eq!(view.state().record().unwrap().id, "o2");
}

#[tokio::test]
async fn stale_result_cannot_leave_loading_state() {
    let client = MockOrders::new();
    client.insert(common::sample_order("o1"));
    let mut view = new_view(&client);

    let first = view.request(Some("o1")).unwrap();
    let result = view.run(&first).await;
    let _second = view.request(Some("o2")).unwrap();

    assert!(!view.complete(first, result));
    assert_eq!(view.state(), &ViewState::Loading);
}
