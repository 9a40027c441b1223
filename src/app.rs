use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Local};

use crate::{
    api::{self, advisory::AdvisoryRequest, error::ApiError},
    cli::{Cli, Command},
    domain, infra,
    infra::storage_layout::StorageLayout,
    ui::{self, render, terminal::StdTerminal},
    usecases::{
        self,
        bootstrap,
        chat::{chat_location, run_chat},
        context::AppContext,
        dashboard::{load_dashboard, DashboardOutcome},
        login::{run_login, run_register, AuthOutcome, LoginInput, RegisterInput},
        logout::{logout, sign_out, LogoutOutcome},
    },
};

pub fn run(cli: Cli) -> Result<()> {
    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        api = api::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    let command = cli.command_or_default();
    if command == Command::Logout {
        // Must work even when the config no longer loads.
        return run_logout(cli.config.as_deref());
    }

    let context = bootstrap::bootstrap(cli.config.as_deref())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(dispatch(&context, command))
}

async fn dispatch(context: &AppContext, command: Command) -> Result<()> {
    let client = &context.client;
    tracing::debug!(
        base_url = %context.config.api.base_url,
        session = client.session_status().as_label(),
        "dispatching command"
    );

    match command {
        Command::Register {
            username,
            email,
            phone,
            location,
        } => {
            let input = RegisterInput {
                username,
                password: None,
                email,
                phone,
                location,
            };
            announce(run_register(client, &mut StdTerminal, input).await?);
        }
        Command::Login { username } => {
            let input = LoginInput {
                username,
                password: None,
            };
            announce(run_login(client, &mut StdTerminal, input).await?);
        }
        Command::Logout => report_logout(sign_out(client)?),
        Command::Status => print_lines(render::session_status(client.session_status())),
        Command::Profile => show(client.auth().profile().await, render::profile)?,
        Command::Detect { image } => {
            let bytes = fs::read(&image)
                .with_context(|| format!("failed to read image at {}", image.display()))?;
            let file_name = image
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            show(
                client.disease().detect(&file_name, bytes).await,
                render::detection,
            )?;
        }
        Command::Weather { location } => {
            show(client.weather().weather(&location).await, render::weather)?
        }
        Command::Prices { crop } => {
            show(client.market().prices(crop.as_deref()).await, render::prices)?
        }
        Command::History { crop, days } => {
            show(client.market().history(&crop, days).await, render::history)?
        }
        Command::Predict { crop } => {
            show(client.market().predict(&crop).await, render::prediction)?
        }
        Command::Advise {
            location,
            crop,
            disease,
            query,
        } => {
            let request = AdvisoryRequest {
                location: location.unwrap_or_default(),
                crop_type: crop.unwrap_or_default(),
                detected_disease: disease,
                query,
            };
            show(
                client.advisory().comprehensive(&request).await,
                render::advisory,
            )?;
        }
        Command::Seasonal { month } => {
            let month = month.unwrap_or_else(|| Local::now().month());
            show(client.advisory().seasonal(month).await, render::seasonal)?;
        }
        Command::Chat { location } => {
            let location = chat_location(client, location.as_deref()).await;
            run_chat(client, &mut StdTerminal, location.as_deref()).await?;
        }
        Command::Dashboard { location, crop } => {
            let outcome = load_dashboard(client, location.as_deref(), crop.as_deref()).await;
            print_dashboard(outcome)?;
        }
        Command::Search { query, top_k } => {
            show(client.rag().search(&query, top_k).await, render::search)?
        }
        Command::KnowledgeInit => show(client.rag().initialize().await, render::knowledge_status)?,
        Command::Ingest {
            content,
            source,
            id,
        } => show(
            client
                .rag()
                .ingest(&content, source.as_deref(), id.as_deref())
                .await,
            render::ingest_receipt,
        )?,
    }

    Ok(())
}

fn announce(outcome: AuthOutcome) {
    match outcome {
        AuthOutcome::Authenticated { username } => {
            tracing::debug!(username = %username, "session established")
        }
        AuthOutcome::ExitWithGuidance => tracing::debug!("authentication not completed"),
    }
}

fn run_logout(config_path: Option<&Path>) -> Result<()> {
    let outcome = match bootstrap::bootstrap(config_path) {
        Ok(context) => sign_out(&context.client)?,
        Err(error) => {
            tracing::warn!(
                error = ?error,
                "logout fallback: bootstrap failed, continuing with local cleanup"
            );
            logout(&StorageLayout::resolve()?)?
        }
    };

    report_logout(outcome);
    Ok(())
}

fn report_logout(outcome: LogoutOutcome) {
    tracing::info!(
        credentials_removed = outcome.credentials_removed,
        "logout completed"
    );
    println!("Signed out. Run `agrolens login` to sign in again.");
}

fn print_dashboard(outcome: DashboardOutcome) -> Result<()> {
    let dashboard = match outcome {
        DashboardOutcome::Loaded(dashboard) => dashboard,
        DashboardOutcome::NoLocation => {
            println!("No location given and your profile has none. Pass --location.");
            return Ok(());
        }
        DashboardOutcome::ProfileUnavailable(error) => return Err(failure(&error)),
    };

    println!("Dashboard for {}", dashboard.location);
    println!();
    match &dashboard.weather {
        Ok(report) => print_lines(render::weather(report)),
        Err(error) => println!("{}", render::api_failure(error)),
    }
    println!();
    match &dashboard.advisory {
        Ok(advisory) => print_lines(render::advisory(advisory)),
        Err(error) => println!("{}", render::api_failure(error)),
    }
    Ok(())
}

fn show<T>(result: Result<T, ApiError>, lines_for: fn(&T) -> Vec<String>) -> Result<()> {
    let value = result.map_err(|error| failure(&error))?;
    print_lines(lines_for(&value));
    Ok(())
}

fn failure(error: &ApiError) -> anyhow::Error {
    tracing::debug!(
        code = error.code(),
        retryable = error.is_retryable(),
        "command failed"
    );
    anyhow!(render::api_failure(error))
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}
