//! Demo: one kitchen screen, one customer screen, a handful of orders.

use singalbucks::flows::{KitchenScreen, OrderSubmission};
use singalbucks::lifecycle::{setup_tracing, OrderSystem, SystemConfig};
use singalbucks::model::OrderStatus;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = SystemConfig::from_env()?;
    let system = OrderSystem::new(config);
    info!(state = %system.connection().state(), "Store ready");

    let kitchen = KitchenScreen::open(system.session(), |update| {
        let counts = update.board.counts();
        info!(
            pending = counts.pending,
            made = counts.made,
            served = counts.served,
            new = ?update.new_arrivals,
            at = %update.updated_at.format("%H:%M:%S"),
            "Board updated"
        );
    })
    .instrument(tracing::info_span!("kitchen"))
    .await?;

    let mut customer = OrderSubmission::new(system.session());
    let carts: [&[(&str, u32)]; 3] = [
        &[("Iced Americano", 1), ("Hot Dog", 1)],
        &[("Lemonade", 2), ("Cupbokki", 1)],
        &[("Hot Americano", 1)],
    ];

    let mut placed = Vec::new();
    for cart in carts {
        for (item, quantity) in cart {
            customer.set_quantity(item, *quantity)?;
        }
        info!(summary = %customer.summary(), "Submitting");
        let order = customer
            .submit()
            .instrument(tracing::info_span!("customer"))
            .await?;
        info!(order_number = order.order_number, "{}", order.message());
        placed.push(order.order_number);
    }

    // Kitchen works through the queue: first order served, second made.
    if let [first, second, ..] = placed[..] {
        kitchen.advance(first).await?;
        kitchen.advance(first).await?;
        kitchen.mark_made(second).await?;
    }
    // Serving straight from pending is refused.
    if let Some(&last) = placed.last() {
        if let Err(e) = kitchen.mark_served(last).await {
            info!(error = %e, "Status change refused");
        }
    }

    let board = kitchen.refresh().await?;
    info!(
        pending = ?board.numbers(OrderStatus::Pending),
        made = ?board.numbers(OrderStatus::Made),
        served = ?board.numbers(OrderStatus::Served),
        "Final board"
    );

    let dump = system.export().await?;
    println!("{}", serde_json::to_string_pretty(&dump)?);

    kitchen.close().await;
    drop(customer);
    if let Err(e) = system.shutdown().await {
        error!(error = %e, "Shutdown failed");
        return Err(e.into());
    }
    Ok(())
}
