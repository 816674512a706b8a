use singalbucks::clients::ActorClient;
use singalbucks::counter_actor::CounterError;
use singalbucks::flows::{BoardUpdate, KitchenScreen, OrderSubmission};
use singalbucks::lifecycle::{OrderSystem, SystemConfig};
use singalbucks::model::{OrderId, OrderStatus, DRINK_PRICE, SET_PRICE, SNACK_PRICE};
use singalbucks::order_actor::OrderError;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::mpsc;

fn start() -> OrderSystem {
    OrderSystem::new(SystemConfig::default())
}

async fn place(system: &OrderSystem, items: &[(&str, u32)]) -> u64 {
    let mut customer = OrderSubmission::new(system.session());
    for (name, quantity) in items {
        customer.set_quantity(name, *quantity).unwrap();
    }
    customer.submit().await.unwrap().order_number
}

async fn open_kitchen(
    system: &OrderSystem,
) -> (KitchenScreen, mpsc::UnboundedReceiver<BoardUpdate>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let screen = KitchenScreen::open(system.session(), move |update| {
        let _ = sender.send(update.clone());
    })
    .await
    .unwrap();
    (screen, receiver)
}

/// Receives board updates until one satisfies `ready`.
async fn wait_for_board(
    updates: &mut mpsc::UnboundedReceiver<BoardUpdate>,
    mut ready: impl FnMut(&BoardUpdate) -> bool,
) -> BoardUpdate {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let update = updates.recv().await.expect("kitchen screen stopped");
            if ready(&update) {
                return update;
            }
        }
    })
    .await
    .expect("board never reached the expected state")
}

/// Full end-to-end test: customer places an order, kitchen sees it and walks it to served.
#[tokio::test]
async fn test_full_order_lifecycle() {
    let system = start();
    let (kitchen, mut updates) = open_kitchen(&system).await;

    let first = wait_for_board(&mut updates, |_| true).await;
    assert!(first.board.is_empty());
    assert!(first.new_arrivals.is_empty());

    let mut customer = OrderSubmission::new(system.session());
    customer.add("Iced Americano").unwrap();
    customer.add("Hot Dog").unwrap();
    customer.add("Cupbokki").unwrap();
    assert_eq!(customer.total(), SET_PRICE + SNACK_PRICE);

    let placed = customer.submit().await.unwrap();
    assert_eq!(placed.order_number, 1);
    assert_eq!(placed.total_amount, SET_PRICE + SNACK_PRICE);
    assert!(customer.cart().is_empty());

    let update = wait_for_board(&mut updates, |u| u.board.pending.len() == 1).await;
    assert_eq!(update.new_arrivals, vec![1]);
    let order = &update.board.pending[0];
    assert_eq!(order.items.get("Hot Dog"), Some(&1));
    assert_eq!(order.total_amount, 9000);
    assert!(order.timestamp > 0);
    assert_eq!(order.formatted_time().len(), 5);

    assert_eq!(kitchen.advance(1).await.unwrap(), OrderStatus::Made);
    let update = wait_for_board(&mut updates, |u| u.board.made.len() == 1).await;
    assert!(update.new_arrivals.is_empty());
    assert!(update.board.pending.is_empty());

    let served = kitchen.mark_served(1).await.unwrap();
    assert_eq!(served.status, OrderStatus::Served);
    assert!(served.is_made() && served.is_served());
    wait_for_board(&mut updates, |u| u.board.numbers(OrderStatus::Served) == vec![1]).await;

    assert_eq!(kitchen.latest().map(|u| u.board.len()), Some(1));

    kitchen.close().await;
    drop(customer);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_sequential_numbers_start_at_one_without_gaps() {
    let system = start();
    let mut numbers = Vec::new();
    for _ in 0..10 {
        numbers.push(system.counter_client.next_order_number().await.unwrap());
    }
    assert_eq!(numbers, (1..=10).collect::<Vec<u64>>());
    assert_eq!(system.counter_client.current().await.unwrap(), 10);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_submissions_get_unique_numbers() {
    let system = start();

    let mut tasks = Vec::new();
    for i in 0..60 {
        let session = system.session();
        tasks.push(tokio::spawn(async move {
            let mut customer = OrderSubmission::new(session);
            customer
                .add(if i % 2 == 0 { "Lemonade" } else { "Hot Dog" })
                .unwrap();
            customer.submit().await.unwrap().order_number
        }));
    }

    let mut numbers = Vec::new();
    for task in tasks {
        numbers.push(task.await.unwrap());
    }
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=60).collect::<Vec<u64>>());

    assert_eq!(system.order_client.list().await.unwrap().len(), 60);
    assert_eq!(system.counter_client.current().await.unwrap(), 60);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_status_must_follow_pending_made_served() {
    let system = start();
    let number = place(&system, &[("Lemonade", 1)]).await;
    let orders = &system.order_client;

    assert_eq!(
        orders.mark_served(number).await.unwrap_err(),
        OrderError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Served
        }
    );
    let stored = orders.get(OrderId(number)).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);

    orders.mark_made(number).await.unwrap();
    assert!(matches!(
        orders.mark_made(number).await,
        Err(OrderError::InvalidTransition { .. })
    ));
    assert_eq!(orders.advance(number).await.unwrap(), OrderStatus::Served);
    assert_eq!(
        orders.advance(number).await.unwrap_err(),
        OrderError::AlreadyServed(number)
    );
    assert_eq!(
        orders.advance(99).await.unwrap_err(),
        OrderError::NotFound("99".into())
    );

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_board_partitions_by_status() {
    let system = start();
    for _ in 0..5 {
        place(&system, &[("Iced Tea", 1)]).await;
    }
    let orders = &system.order_client;
    // 1, 2, 3 served in the order 3, 1, 2; 4 made; 5 pending.
    for number in [3, 1, 2] {
        orders.advance(number).await.unwrap();
        orders.advance(number).await.unwrap();
    }
    orders.mark_made(4).await.unwrap();

    let (kitchen, _updates) = open_kitchen(&system).await;
    let board = kitchen.refresh().await.unwrap();
    assert_eq!(board.numbers(OrderStatus::Pending), vec![5]);
    assert_eq!(board.numbers(OrderStatus::Made), vec![4]);
    assert_eq!(board.numbers(OrderStatus::Served), vec![3, 2, 1]);

    kitchen.close().await;
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_reference_prices_end_to_end() {
    let system = start();
    let cases: [(&[(&str, u32)], u64); 3] = [
        (&[("Lemonade", 1), ("Hot Dog", 1)], SET_PRICE),
        (&[("Lemonade", 2), ("Hot Dog", 1)], SET_PRICE + DRINK_PRICE),
        (&[("Cupbokki", 3)], 3 * SNACK_PRICE),
    ];
    for (items, expected) in cases {
        let number = place(&system, items).await;
        let stored = system.order_client.get(OrderId(number)).await.unwrap().unwrap();
        assert_eq!(stored.total_amount, expected, "{:?}", items);
    }
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_store_rejects_orders_that_disagree_with_the_menu() {
    let system = start();
    let orders = &system.order_client;

    let items = BTreeMap::from([("Lemonade".to_string(), 1), ("Hot Dog".to_string(), 1)]);
    assert!(matches!(
        orders.create_order(1, items.clone(), 6500).await,
        Err(OrderError::ValidationError(_))
    ));
    assert!(matches!(
        orders
            .create_order(2, BTreeMap::from([("Bingsu".to_string(), 1)]), 3000)
            .await,
        Err(OrderError::UnknownItem(name)) if name == "Bingsu"
    ));
    assert!(orders.list().await.unwrap().is_empty());

    orders.create_order(1, items.clone(), SET_PRICE).await.unwrap();
    assert_eq!(
        orders.create_order(1, items, SET_PRICE).await.unwrap_err(),
        OrderError::AlreadyExists("1".into())
    );

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_disconnected_screen_refuses_to_submit() {
    let system = start();
    let mut customer = OrderSubmission::new(system.session());
    customer.add("Hot Americano").unwrap();
    assert!(customer.can_submit());

    system.set_connected(false);
    assert!(!customer.can_submit());
    assert_eq!(customer.submit().await.unwrap_err(), OrderError::Disconnected);
    assert_eq!(system.counter_client.current().await.unwrap(), 0);

    system.set_connected(true);
    assert_eq!(customer.submit().await.unwrap().order_number, 1);

    drop(customer);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_export_and_restore() {
    let system = start();
    place(&system, &[("Lemonade", 1), ("Cupbokki", 1)]).await;
    place(&system, &[("Iced Americano", 2)]).await;
    place(&system, &[("Hot Dog", 1)]).await;
    system.order_client.mark_made(1).await.unwrap();
    system.order_client.mark_served(1).await.unwrap();
    system.order_client.mark_made(2).await.unwrap();

    let tree = system.export().await.unwrap();
    assert_eq!(tree["order_counter"], 3);
    assert_eq!(tree["orders"]["1"]["is_served"], true);
    assert_eq!(tree["orders"]["2"]["is_made"], true);
    assert_eq!(tree["orders"]["3"]["total_amount"], SNACK_PRICE);
    let original = system.order_client.get(OrderId(2)).await.unwrap().unwrap();
    system.shutdown().await.unwrap();

    let restored = OrderSystem::restore(SystemConfig::default(), &tree)
        .await
        .unwrap();
    let copy = restored.order_client.get(OrderId(2)).await.unwrap().unwrap();
    assert_eq!(copy, original);

    assert_eq!(place(&restored, &[("Iced Tea", 1)]).await, 4);
    restored.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_restore_skips_bad_records_and_never_reuses_numbers() {
    let tree = serde_json::json!({
        "orders": {
            "7": {"order_number": 7, "items": {"Lemonade": 1}, "total_amount": 3000,
                  "timestamp": 1700000000000i64},
            "8": {"order_number": 8, "items": "broken"},
        },
        "order_counter": 2
    });
    let system = OrderSystem::restore(SystemConfig::default(), &tree)
        .await
        .unwrap();

    let orders = system.order_client.list().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Pending);
    assert_eq!(system.counter_client.next_order_number().await.unwrap(), 8);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_restored_counter_at_max_refuses_new_numbers() {
    let tree = serde_json::json!({ "orders": {}, "order_counter": u64::MAX });
    let system = OrderSystem::restore(SystemConfig::default(), &tree)
        .await
        .unwrap();

    assert_eq!(
        system.counter_client.next_order_number().await,
        Err(CounterError::Exhausted { last: u64::MAX })
    );

    let mut customer = OrderSubmission::new(system.session());
    customer.add("Lemonade").unwrap();
    assert_eq!(
        customer.submit().await.unwrap_err(),
        OrderError::Counter(CounterError::Exhausted { last: u64::MAX })
    );
    assert_eq!(customer.cart().quantity("Lemonade"), 1);
    assert!(system.order_client.list().await.unwrap().is_empty());
    assert_eq!(system.counter_client.current().await.unwrap(), u64::MAX);

    drop(customer);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_closed_kitchen_screen_stops_receiving() {
    let system = start();
    let (kitchen, mut updates) = open_kitchen(&system).await;
    wait_for_board(&mut updates, |_| true).await;
    assert!(kitchen.is_open());

    kitchen.close().await;
    place(&system, &[("Lemonade", 1)]).await;

    // The sender lived in the observer; closing dropped it.
    assert!(updates.recv().await.is_none());
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_stops_open_observers() {
    let system = start();
    let observer = system
        .session()
        .orders
        .observe(|_| {})
        .await
        .unwrap();
    let watch = system.connection();
    assert!(watch.is_connected());

    system.shutdown().await.unwrap();
    assert!(!watch.is_connected());
    for _ in 0..100 {
        if !observer.is_active() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(!observer.is_active());
}
