use std::{io, process, sync::Arc};

use kiosk_admin::{
    application::{
        console::AdminConsole,
        error::AppError,
        ports::{AdminApi, ApiError},
    },
    config::{self, ConsoleArgs, ReorderArgs},
    domain::ordering::{ItemId, ListKind, assign_positions, ensure_dense},
    infra::{http::HttpAdminApi, notify::WriterNotifier, store::TomlRouteStore, telemetry},
    presentation::{
        outline::outline,
        shell::{self, Flow, ShellCommand},
    },
};
use kiosk_admin_api_types::ReorderRequest;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging)?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Console(ConsoleArgs::default()));

    match command {
        config::Command::Console(args) => run_console(settings, args).await,
        config::Command::Reorder(args) => run_reorder(settings, args).await,
    }
}

async fn run_console(settings: config::Settings, args: ConsoleArgs) -> Result<(), AppError> {
    let api = Arc::new(HttpAdminApi::new(&settings.api)?);
    let store = Arc::new(TomlRouteStore::new(settings.state.file.clone()));
    let notifier = Arc::new(WriterNotifier::new(io::stdout()));
    let console = AdminConsole::new(api, store, notifier, settings.ui.clone());

    let opened = match args.route.as_deref() {
        Some(route) => console.open(route).await?,
        None => console.start(None).await?,
    };
    info!(route = %opened.route(), base_url = %settings.api.base_url, "console ready");

    let mut out = io::stdout();
    print!("{}", outline(&console.document()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|err| AppError::Infra(err.into()))?
    {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };
        match shell::execute(&console, command, &mut out).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => eprintln!("{err}"),
        }
    }
    Ok(())
}

async fn run_reorder(settings: config::Settings, args: ReorderArgs) -> Result<(), AppError> {
    let list: ListKind = args.list.parse()?;
    let items = assign_positions(args.ids.into_iter().map(ItemId));
    ensure_dense(&items).map_err(|err| AppError::validation(err.message()))?;

    let api = HttpAdminApi::new(&settings.api)?;
    let count = items.len();
    match api.reorder(list, &ReorderRequest { items }).await {
        Ok(()) => {
            println!("saved order of {count} {}", list.noun());
            Ok(())
        }
        Err(ApiError::MissingEndpoint { path }) => Err(AppError::unexpected(format!(
            "the backend has no `POST /{path}` endpoint; the order was not saved"
        ))),
        Err(err) => Err(err.into()),
    }
}
