//! List cars command handler

use crate::config::Config;
use crate::db::Store;
use crate::domain::Visibility;
use crate::inventory::RawCarFilter;
use crate::services::{InventoryService, SeaOrmInventoryService};

pub async fn cmd_list_cars(config: &Config, search: &[String]) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let inventory = SeaOrmInventoryService::new(store, config);

    let filter = RawCarFilter {
        search: Some(search.join(" ")),
        ..Default::default()
    }
    .normalize();

    let cars = inventory.search(&filter, Visibility::Public).await?;

    if cars.is_empty() {
        println!("No cars found.");
        return Ok(());
    }

    println!("Available cars ({} total)", cars.len());
    println!("{:-<70}", "");

    for car in cars {
        println!(
            "{} {} {} - ${} ({} mi)",
            car.year, car.make, car.model, car.price, car.mileage
        );
        println!(
            "  ID: {} | {} | {} | {} | {}",
            car.id, car.body_type, car.fuel_type, car.transmission, car.color
        );
    }

    Ok(())
}
