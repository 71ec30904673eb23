//! `accountctl` entry point.

mod cli;

use std::sync::Arc;

use accounts_common::{AppResult, Config, init_logging};
use accounts_core::{AccountStatusService, CreateAccountInput};
use accounts_db::repositories::UserRepository;
use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    init_logging(&config.logging)?;

    let db = accounts_db::init(&config.database).await?;

    if matches!(cli.command, Command::Migrate) {
        info!("Running database migrations...");
        accounts_db::migrate(&db).await?;
        return Ok(());
    }

    let service = AccountStatusService::new(UserRepository::new(Arc::new(db)));

    if let Err(err) = run(&service, cli.command).await {
        err.log();
        return Err(err.into());
    }
    Ok(())
}

async fn run(service: &AccountStatusService, command: Command) -> AppResult<()> {
    let changed = match command {
        Command::Migrate => return Ok(()),
        Command::Create { email, name } => {
            service
                .create_account(CreateAccountInput {
                    email,
                    user_name: name,
                })
                .await?
        }
        Command::Show { id } => service.get(&id).await?,
        Command::SoftDelete { id } => service.soft_delete(&id).await?,
        Command::Ban { id } => service.ban_user(&id).await?,
        Command::Suspend { id } => service.suspend_user(&id).await?,
        Command::Activate { id } => service.activate_user(&id).await?,
        Command::Reactivate { id } => service.reactivate(&id).await?,
        Command::HardDelete { id } => {
            service.hard_delete(&id).await?;
            println!("{id} removed");
            return Ok(());
        }
        Command::HardDestroy { id } => {
            service.hard_destroy(&id).await?;
            println!("{id} removed");
            return Ok(());
        }
        Command::List {
            status,
            limit,
            offset,
        } => {
            for user in service.list_by_status(status, limit, offset).await? {
                println!("{}\t{}\t{}", user.id, user.email, user.status);
            }
            return Ok(());
        }
        Command::Stats => {
            for (status, count) in service.status_counts().await? {
                println!("{status:<10} {count}");
            }
            return Ok(());
        }
    };

    print_json(&changed)
}

fn print_json<T: serde::Serialize>(value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| accounts_common::AppError::Internal(e.to_string()))?;
    println!("{json}");
    Ok(())
}
