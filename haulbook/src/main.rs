// Haulbook - container haulage trip ledger
// Entry point and command dispatch

use anyhow::Context;
use clap::Parser;
use haulbook::app::{default_data_dir, AppState};
use haulbook::cli::{
    Cli, Commands, CredentialsAction, DepotAction, RouteAction, SettingsAction, TripAction,
};
use haulbook::commands::{self, QuoteRequest, SyncSettingsUpdate};
use haulbook::output;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "haulbook=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn execute(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;

    // Credentials never touch the ledger
    if let Commands::Credentials { action } = &cli.command {
        match action {
            CredentialsAction::Set { token } => {
                commands::set_remote_token(token.clone())?;
                println!("Remote store token saved");
            }
            CredentialsAction::Clear => {
                commands::clear_remote_token()?;
                println!("Remote store token removed");
            }
        }
        return Ok(());
    }

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    tracing::info!("Starting haulbook {}", env!("CARGO_PKG_VERSION"));

    let state = AppState::initialize(&data_dir)
        .await
        .with_context(|| format!("Failed to open ledger in {}", data_dir.display()))?;

    match cli.command {
        Commands::Depot { action } => match action {
            DepotAction::Add { name } => {
                let depot = commands::add_depot(&state, name).await?;
                output::output_depots(format, std::slice::from_ref(&depot))?;
            }
            DepotAction::List => {
                output::output_depots(format, &commands::list_depots(&state).await?)?;
            }
        },
        Commands::Route { action } => match action {
            RouteAction::Set {
                origin,
                destination,
                price,
            } => {
                let route = commands::set_route_price(&state, origin, destination, price).await?;
                output::output_routes(format, std::slice::from_ref(&route))?;
            }
            RouteAction::List => {
                output::output_routes(format, &commands::list_routes(&state).await?)?;
            }
        },
        Commands::Quote {
            origin,
            destination,
            size,
            load,
            extra,
        } => {
            let request = QuoteRequest {
                origin,
                destination,
                container_size: size,
                load_state: load,
                extra,
            };
            output::output_quote(format, &commands::quote_fare(&state, request).await?)?;
        }
        Commands::Trip { action } => match action {
            TripAction::Add(fields) => {
                let trip = commands::create_trip(&state, fields.into()).await?;
                output::output_trip(format, &trip, false)?;
            }
            TripAction::Edit { id, fields } => {
                let trip = commands::update_trip(&state, id, fields.into()).await?;
                let synced = commands::is_trip_synced(&state, id).await?;
                output::output_trip(format, &trip, synced)?;
            }
            TripAction::List => {
                output::output_trips(format, &commands::list_trips(&state).await?)?;
            }
            TripAction::Show { id } => {
                let trip = commands::get_trip(&state, id).await?;
                let synced = commands::is_trip_synced(&state, id).await?;
                output::output_trip(format, &trip, synced)?;
            }
            TripAction::Delete { id } => {
                commands::delete_trip(&state, id).await?;
                println!("Trip {} deleted", id);
            }
        },
        Commands::Sync => {
            let report = commands::sync_once(&state).await?;
            output::output_sync_report(format, &report)?;
        }
        Commands::Run => {
            commands::run_agent(&state, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for Ctrl-C: {}", e);
                }
            })
            .await?;
        }
        Commands::Info => {
            output::output_info(format, &commands::get_app_info(&state).await?)?;
        }
        Commands::Settings { action } => match action {
            SettingsAction::Show => {
                output::output_settings(format, &commands::get_settings(&state))?;
            }
            SettingsAction::Sync {
                enable,
                disable,
                endpoint,
                collection,
                credentials_file,
                refresh_interval,
            } => {
                let enabled = match (enable, disable) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                };
                let update = SyncSettingsUpdate {
                    enabled,
                    endpoint,
                    collection,
                    credentials_path: credentials_file,
                    refresh_interval_secs: refresh_interval,
                };
                let sync = commands::update_sync_settings(&state, update).await?;
                let mut settings = commands::get_settings(&state);
                settings.sync = sync;
                output::output_settings(format, &settings)?;
                eprintln!("Restart haulbook for the changes to take effect");
            }
        },
        Commands::Credentials { .. } => {}
    }

    Ok(())
}
