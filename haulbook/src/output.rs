//! Output formatting module

use crate::cli::OutputFormat;
use crate::commands::AppInfo;
use crate::database::{Depot, FareQuote, RouteFare, Trip};
use crate::error::Result;
use crate::services::{AppSettings, SyncReport};
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

fn opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn output_depots(format: OutputFormat, depots: &[Depot]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(depots);
    }

    println!("ID     NAME");
    for depot in depots {
        println!("{:<6} {}", depot.id, depot.name);
    }
    Ok(())
}

pub fn output_routes(format: OutputFormat, routes: &[RouteFare]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(routes);
    }

    println!("ORIGIN               DESTINATION               PRICE  SOURCE");
    for route in routes {
        println!(
            "{:<20} {:<20} {:>10}  {}",
            route.origin_name,
            route.destination_name,
            opt(route.base_price.map(money)),
            if route.auto_generated { "seeded" } else { "manual" }
        );
    }
    Ok(())
}

pub fn output_quote(format: OutputFormat, quote: &FareQuote) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(quote);
    }

    println!("Base fare:    {:>10}", money(quote.base_fare));
    println!("VAT:          {:>10}", money(quote.vat));
    println!("Withholding:  {:>10}", money(quote.withholding));
    println!("Total:        {:>10}", money(quote.total));
    Ok(())
}

pub fn output_trips(format: OutputFormat, trips: &[Trip]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(trips);
    }

    println!("ID     DATE       CONTAINER    ORIGIN         DESTINATION    SIZE LOAD    EXTRA        TOTAL");
    for trip in trips {
        println!(
            "{:<6} {:<10} {:<12} {:<14} {:<14} {:<4} {:<7} {:<7} {:>10}",
            trip.id,
            trip.trip_date,
            trip.container_no,
            trip.origin,
            trip.destination,
            opt(trip.container_size),
            opt(trip.load_state),
            trip.extra,
            money(trip.total)
        );
    }
    Ok(())
}

pub fn output_trip(format: OutputFormat, trip: &Trip, synced: bool) -> Result<()> {
    if format == OutputFormat::Json {
        #[derive(Serialize)]
        struct TripView<'a> {
            #[serde(flatten)]
            trip: &'a Trip,
            synced: bool,
        }
        return print_json(&TripView { trip, synced });
    }

    println!("Trip {}", trip.id);
    println!("Date:         {}", trip.trip_date);
    println!("Container:    {}", trip.container_no);
    println!("Route:        {} -> {}", trip.origin, trip.destination);
    println!("Size:         {}", opt(trip.container_size));
    println!("Load:         {}", opt(trip.load_state));
    println!("Extra:        {}", trip.extra);
    println!("Plate:        {}", trip.vehicle_plate);
    if !trip.notes.is_empty() {
        println!("Notes:        {}", trip.notes);
    }
    output_quote(format, &trip.quote())?;
    println!("Synced:       {}", if synced { "yes" } else { "pending" });
    Ok(())
}

pub fn output_sync_report(format: OutputFormat, report: &SyncReport) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(report);
    }

    if report.attempted == 0 {
        println!("Nothing to sync");
    } else {
        println!(
            "Pushed {} of {} record(s), {} failed",
            report.pushed, report.attempted, report.failed
        );
    }
    Ok(())
}

pub fn output_info(format: OutputFormat, info: &AppInfo) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(info);
    }

    println!("haulbook {}", info.version);
    println!("Data directory: {}", info.app_data_dir);
    println!(
        "Sync:           {}",
        if info.settings.sync.enabled { "enabled" } else { "disabled" }
    );
    println!(
        "Remote:         {}",
        info.settings.sync.remote.endpoint.as_deref().unwrap_or("-")
    );
    println!("Trips:          {}", info.ledger.trips);
    println!("Revenue:        {}", money(info.ledger.revenue_total));
    println!("Pending sync:   {}", info.ledger.pending_sync);
    println!("Status:         {}", info.status);
    Ok(())
}

pub fn output_settings(format: OutputFormat, settings: &AppSettings) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(settings);
    }

    let sync = &settings.sync;
    println!("Sync:             {}", if sync.enabled { "enabled" } else { "disabled" });
    println!("Endpoint:         {}", sync.remote.endpoint.as_deref().unwrap_or("-"));
    println!("Collection:       {}", sync.remote.collection);
    println!(
        "Credentials file: {}",
        sync.remote.credentials_path.as_deref().unwrap_or("- (keyring)")
    );
    println!("Refresh interval: {:?}", sync.refresh_interval());
    Ok(())
}
