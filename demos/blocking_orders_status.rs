//! List order statuses of a channel updated since a timestamp.
//!
//! Run:
//! `cargo run --example blocking_orders_status -- <config.json> <channel_id> <since> [status]`
//!
//! The next-page link, when the server sends one, is printed to stderr.

use cpms_connector::{Config, Connector, OrderStatusQuery};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let (Some(config_path), Some(channel_id), Some(since)) = (args.next(), args.next(), args.next())
    else {
        eprintln!("usage: blocking_orders_status <config.json> <channel_id> <since> [status]");
        std::process::exit(2);
    };

    let mut query = OrderStatusQuery::for_channel(channel_id).since(since);
    if let Some(status) = args.next() {
        query = query.order_status(status);
    }

    let connector = Connector::new(&Config::from_path(config_path)?)?;
    let page = connector.get_orders_status(&query)?;
    println!("{}", serde_json::to_string_pretty(&page.orders)?);
    if let Some(next) = page.next_url {
        eprintln!("next page: {next}");
    }
    Ok(())
}
