//! Authenticate and fetch one sales order.
//!
//! Run:
//! `cargo run --example blocking_get_order -- <config.json> <channel_id> <order_id>`

use cpms_connector::{Config, Connector};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let (Some(config_path), Some(channel_id), Some(order_id)) = (args.next(), args.next(), args.next())
    else {
        eprintln!("usage: blocking_get_order <config.json> <channel_id> <order_id>");
        std::process::exit(2);
    };

    let connector = Connector::new(&Config::from_path(config_path)?)?;
    let order = connector.get_order(&channel_id, &order_id)?;
    println!("{}", serde_json::to_string_pretty(&order)?);
    Ok(())
}
