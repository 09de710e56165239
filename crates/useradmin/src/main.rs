mod cli;
mod commands;
mod config;
mod logging;
mod output;
mod prompt;
mod table;

use anyhow::{anyhow, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use output::output_error;
use rest_backend::RestClient;
use std::process::ExitCode;
use std::time::Duration;
use useradmin_core::{
    FilterState, ListQuery, PaginationState, SortDirection, SortState, UserDirectory,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    output::init_color(cli.color);
    let format = cli.format;

    if let Err(e) = run(cli) {
        output_error(&e, format);
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<()> {
    // Commands that never talk to the backend
    match &cli.command {
        Commands::Completions { shell } => {
            Cli::generate_completions(*shell);
            return Ok(());
        }
        Commands::Config { action } => {
            return commands::config::handle_config(
                action,
                cli.config.clone(),
                cli.url.clone(),
                cli.token.clone(),
                cli.format,
            );
        }
        Commands::Init => {
            let url = cli
                .url
                .as_deref()
                .ok_or_else(|| anyhow!("init requires --url (or USERADMIN_URL)"))?;
            return commands::config::handle_init(url, cli.token.as_deref(), cli.format);
        }
        _ => {}
    }

    let mut config = Config::load(cli.config.clone())?;
    config.merge_with_cli(cli.url.clone(), cli.token.clone());
    config.validate()?;
    logging::init(cli.verbose, &config.log_level);

    let url = config
        .url
        .as_deref()
        .ok_or_else(|| anyhow!("Backend URL not configured"))?;
    tracing::debug!(url, timeout_secs = config.timeout_secs, "connecting");

    let client = RestClient::with_timeout(
        url,
        config.token.as_deref(),
        Duration::from_secs(config.timeout_secs),
    );

    run_with_client(&client, &cli, &config)
}

fn run_with_client(client: &dyn UserDirectory, cli: &Cli, config: &Config) -> Result<()> {
    let format = cli.format;
    match &cli.command {
        Commands::List {
            search,
            status,
            page,
            page_size,
            sort,
            desc,
        } => {
            let direction = if *desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            let query = ListQuery {
                filter: FilterState {
                    search: search.clone(),
                    status: (*status).into(),
                },
                pagination: PaginationState {
                    page_index: (*page - 1) as usize,
                    page_size: page_size.map(|s| s as usize).unwrap_or(config.page_size),
                },
                sort: sort
                    .map(|field| SortState::by(field.into(), direction))
                    .unwrap_or_default(),
            };
            commands::user::handle_list(client, query, format)
        }
        Commands::Create {
            username,
            password,
            confirm_password,
            show_password,
        } => commands::user::handle_create(
            client,
            username,
            password.as_deref(),
            confirm_password.as_deref(),
            *show_password,
            format,
        ),
        Commands::Edit { id, username } => {
            commands::user::handle_edit(client, id, username, format)
        }
        Commands::Toggle { id, current, yes } => commands::user::handle_toggle(
            client,
            id,
            current.map(Into::into),
            *yes,
            format,
        ),
        Commands::Delete { id, yes } => commands::user::handle_delete(client, id, *yes, format),
        Commands::Browse => commands::browse::handle_browse(client, config.page_size, format),
        Commands::Config { .. } | Commands::Init | Commands::Completions { .. } => {
            unreachable!("handled before the client is built")
        }
    }
}
