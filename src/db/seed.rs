use rusqlite::Connection;

use crate::db::queries;
use crate::models::listing::{
    AdventureRow, CarRow, EmptyLegRow, HelicopterRow, JetRow, YachtRow,
};

/// Inserts a small demo inventory so a fresh deployment has something to
/// search against. Idempotent: skips when any aircraft already exist.
pub fn seed_demo_inventory(conn: &Connection) -> anyhow::Result<bool> {
    let counts = queries::get_inventory_counts(conn)?;
    if counts.jets > 0 {
        return Ok(false);
    }

    let jets = [
        ("jet-citation-xls", "Citation XLS+", "Zurich", 8, 4200.0),
        ("jet-phenom-300", "Phenom 300E", "Geneva", 7, 3600.0),
        ("jet-global-6000", "Global 6000", "London, United Kingdom", 13, 9800.0),
    ];
    for (id, name, base, capacity, rate) in jets {
        queries::insert_jet(
            conn,
            &JetRow {
                id: id.to_string(),
                name: name.to_string(),
                home_base: Some(base.to_string()),
                capacity,
                hourly_rate: Some(rate),
                price: None,
                currency: "USD".to_string(),
                images: "[]".to_string(),
            },
        )?;
    }

    let legs = [
        ("leg-nce-dxb", "Legacy 600", "Nice", "Dubai", "2026-09-10", 13, 18500.0),
        ("leg-zrh-lon", "Citation CJ3", "Zurich", "London, United Kingdom", "2026-09-04", 6, 7400.0),
        ("leg-gva-ibz", "Phenom 300E", "Geneva", "Ibiza", "2026-09-06", 7, 9100.0),
    ];
    for (id, name, from, to, date, seats, price) in legs {
        queries::insert_empty_leg(
            conn,
            &EmptyLegRow {
                id: id.to_string(),
                aircraft_name: name.to_string(),
                from_location: from.to_string(),
                to_location: to.to_string(),
                departure_date: Some(date.to_string()),
                seats,
                price: Some(price),
                currency: "USD".to_string(),
                images: "[]".to_string(),
            },
        )?;
    }

    let helis = [
        ("heli-aw109", "AgustaWestland AW109", "Monaco", 6, 3200.0),
        ("heli-h125", "Airbus H125", "Zurich", 5, 2400.0),
    ];
    for (id, name, base, capacity, rate) in helis {
        queries::insert_helicopter(
            conn,
            &HelicopterRow {
                id: id.to_string(),
                name: name.to_string(),
                home_base: Some(base.to_string()),
                capacity,
                price_per_hour: Some(rate),
                price: None,
                currency: "USD".to_string(),
                images: "[]".to_string(),
            },
        )?;
    }

    let yachts = [
        ("yacht-azimut-77", "Azimut 77S", "Monaco", 10, 14500.0),
        ("yacht-sunseeker-88", "Sunseeker 88", "Ibiza", 12, 19800.0),
    ];
    for (id, name, port, guests, rate) in yachts {
        queries::insert_yacht(
            conn,
            &YachtRow {
                id: id.to_string(),
                name: name.to_string(),
                home_port: Some(port.to_string()),
                guests,
                price_per_day: Some(rate),
                price: None,
                currency: "USD".to_string(),
                images: "[]".to_string(),
            },
        )?;
    }

    let cars = [
        ("car-phantom", "Rolls-Royce Phantom", "Dubai", 4, 1450.0),
        ("car-s-class", "Mercedes-Maybach S-Class", "Zurich", 4, 780.0),
    ];
    for (id, name, location, seats, rate) in cars {
        queries::insert_car(
            conn,
            &CarRow {
                id: id.to_string(),
                name: name.to_string(),
                location: Some(location.to_string()),
                seats,
                price_per_day: Some(rate),
                price: None,
                currency: "USD".to_string(),
                images: "[]".to_string(),
            },
        )?;
    }

    let adventures = [
        ("adv-desert-safari", "Private Desert Safari", "Dubai", 1900.0),
        ("adv-alps-heliski", "Alps Heli-Skiing Weekend", "Zermatt", 7400.0),
    ];
    for (id, title, location, price) in adventures {
        queries::insert_adventure(
            conn,
            &AdventureRow {
                id: id.to_string(),
                title: title.to_string(),
                location: Some(location.to_string()),
                price: Some(price),
                currency: "USD".to_string(),
                images: "[]".to_string(),
            },
        )?;
    }

    tracing::info!("seeded demo inventory");
    Ok(true)
}
