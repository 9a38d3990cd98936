//! carcheck CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carcheck::cli::{inspection_date, Cli, Commands, OutputFormat};
use carcheck::output::{json, pretty};
use carcheck::storage::SqliteRepository;
use carcheck::{ChangeFeed, ChecklistService, Config, ServiceError};
use carcheck_core::checklist::{
    completion_stats, Checklist, ChecklistItem, CompletionStats, NewChecklist,
};
use carcheck_core::storage::ChecklistStore;

/// JSON shape of the `show` command.
#[derive(Serialize)]
struct ChecklistDetail<'a> {
    checklist: &'a Checklist,
    stats: CompletionStats,
    items: &'a [ChecklistItem],
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays pipeable.
    let (json_layer, text_layer) = if cli.log_json {
        (
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
            None,
        )
    } else {
        (
            None,
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carcheck=info".into()),
        )
        .with(json_layer)
        .with(text_layer)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ServiceError>() {
                Some(service_err) => {
                    tracing::debug!(error = %service_err, "Command failed");
                    eprintln!("Error: {}", service_err.user_message());
                }
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(db) = &cli.db {
        config = config.with_db_path(db.as_str());
    }

    let repo = SqliteRepository::new(&config.db_path)
        .await
        .map_err(ServiceError::from)?;
    let service = ChecklistService::with_feed(
        Arc::new(repo),
        ChangeFeed::new(config.change_feed_capacity),
    );

    execute(&service, cli.command, cli.format, cli.quiet).await
}

async fn execute<R>(
    service: &ChecklistService<R>,
    command: Commands,
    format: OutputFormat,
    quiet: bool,
) -> Result<()>
where
    R: ChecklistStore + 'static,
{
    match command {
        Commands::New {
            car_info,
            vin,
            date,
        } => {
            let new = NewChecklist::new(inspection_date(date))
                .with_car_info(car_info)
                .with_vin(vin);
            let checklist = service.insert_checklist(new).await?;
            match format {
                OutputFormat::Json => println!("{}", json::format_json(&checklist)),
                OutputFormat::Pretty => {
                    println!("Created:\n{}", pretty::format_checklist(&checklist))
                }
            }
        }
        Commands::List => {
            let summaries = service.list_summaries().await?;
            match format {
                OutputFormat::Json => println!("{}", json::format_json(&summaries)),
                OutputFormat::Pretty => println!("{}", pretty::format_summaries(&summaries)),
            }
        }
        Commands::Show { id } => {
            let checklist = service.get_checklist(id).await?;
            let items = service.ensure_items(id).await?;
            match format {
                OutputFormat::Json => {
                    let detail = ChecklistDetail {
                        checklist: &checklist,
                        stats: completion_stats(&items),
                        items: &items,
                    };
                    println!("{}", json::format_json(&detail))
                }
                OutputFormat::Pretty => {
                    println!("{}", pretty::format_checklist_detail(&checklist, &items))
                }
            }
        }
        Commands::Edit {
            id,
            car_info,
            vin,
            date,
        } => {
            let mut checklist = service.get_checklist(id).await?;
            if let Some(car_info) = car_info {
                checklist.car_info = car_info;
            }
            if let Some(vin) = vin {
                checklist.vin = vin;
            }
            if date.is_some() {
                checklist.date = inspection_date(date);
            }
            let checklist = service.update_checklist(checklist).await?;
            match format {
                OutputFormat::Json => println!("{}", json::format_json(&checklist)),
                OutputFormat::Pretty => {
                    println!("Updated:\n{}", pretty::format_checklist(&checklist))
                }
            }
        }
        Commands::Answer { item_id, value } => {
            let item = service.answer_item(item_id, Some(value.as_str())).await?;
            print_item(&item, format, quiet);
        }
        Commands::Clear { item_id } => {
            let item = service.answer_item(item_id, None).await?;
            print_item(&item, format, quiet);
        }
        Commands::Delete { id } => {
            let removed = service.delete_checklist(id).await?;
            if !quiet {
                println!("Deleted checklist {} ({} items removed)", id, removed);
            }
        }
    }

    Ok(())
}

fn print_item(item: &ChecklistItem, format: OutputFormat, quiet: bool) {
    match format {
        OutputFormat::Json => println!("{}", json::format_json(item)),
        OutputFormat::Pretty if !quiet => println!("{}", pretty::format_item(item)),
        OutputFormat::Pretty => {}
    }
}
