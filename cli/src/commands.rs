//! Command handlers.
//!
//! Handlers write their rendering to the given writer and return typed
//! errors; `main` decides how failures are reported.

use crate::args::{Command, SetArgs};
use crate::error::AppError;
use engine::discovery::MetadataSource;
use engine::environment::{Environment, builtin};
use engine::resolver::EnvironmentResolver;
use engine::store::EnvironmentStore;
use serde::Serialize;
use std::io::Write;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything a command needs besides its own arguments.
pub struct CommandContext<'a, S: ?Sized, M> {
    pub store: &'a S,
    pub resolver: &'a EnvironmentResolver<M>,
    pub format: OutputFormat,
    pub cancellation: CancellationToken,
}

/// Listing entry: an environment tagged with where it comes from.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListedEnvironment<'a> {
    #[serde(flatten)]
    environment: &'a Environment,
    built_in: bool,
}

pub async fn run_command<S, M, W>(
    command: &Command,
    context: &CommandContext<'_, S, M>,
    out: &mut W,
) -> Result<(), AppError>
where
    S: EnvironmentStore + ?Sized,
    M: MetadataSource,
    W: Write,
{
    match command {
        Command::Set(args) => set_environment(args, context, out).await,
        Command::Get { name } => get_environment(name, context, out).await,
        Command::List => list_environments(context, out).await,
    }
}

/// Resolves the request and stores the result, unless `--what-if` is set.
///
/// With `--what-if` the JSON format prints only the would-be environment.
pub async fn set_environment<S, M, W>(
    args: &SetArgs,
    context: &CommandContext<'_, S, M>,
    out: &mut W,
) -> Result<(), AppError>
where
    S: EnvironmentStore + ?Sized,
    M: MetadataSource,
    W: Write,
{
    let request = args.to_request();
    let environment = context
        .resolver
        .resolve_with_cancellation(context.store, request, &context.cancellation)
        .await?;

    if args.what_if {
        match context.format {
            OutputFormat::Json => render_environment(&environment, OutputFormat::Json, out)?,
            OutputFormat::Text => {
                writeln!(
                    out,
                    "What if: Performing the operation \"Set\" on target \"{}\" with endpoints:",
                    environment.name()
                )?;
                write!(out, "{}", environment.describe())?;
            }
        }
        return Ok(());
    }

    context.store.put(environment.clone()).await?;
    log::info!("Saved environment {}", environment.name());

    render_environment(&environment, context.format, out)
}

/// Shows a built-in or custom environment.
pub async fn get_environment<S, M, W>(
    name: &str,
    context: &CommandContext<'_, S, M>,
    out: &mut W,
) -> Result<(), AppError>
where
    S: EnvironmentStore + ?Sized,
    W: Write,
{
    let environment = match builtin::get(name) {
        Some(environment) => environment,
        None => context
            .store
            .get(name)
            .await?
            .ok_or_else(|| AppError::EnvironmentNotFound {
                name: name.to_string(),
            })?,
    };

    render_environment(&environment, context.format, out)
}

/// Lists built-in environments followed by the custom ones.
pub async fn list_environments<S, M, W>(
    context: &CommandContext<'_, S, M>,
    out: &mut W,
) -> Result<(), AppError>
where
    S: EnvironmentStore + ?Sized,
    W: Write,
{
    let built_in = builtin::built_in_environments();
    let custom = context.store.list().await?;

    let listed: Vec<ListedEnvironment<'_>> = built_in
        .iter()
        .map(|environment| ListedEnvironment {
            environment,
            built_in: true,
        })
        .chain(custom.iter().map(|environment| ListedEnvironment {
            environment,
            built_in: false,
        }))
        .collect();

    match context.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &listed)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for entry in &listed {
                let origin = if entry.built_in { "built-in" } else { "custom" };
                let mode = if entry.environment.on_premise() {
                    "ADFS"
                } else {
                    "AAD"
                };
                writeln!(
                    out,
                    "{:<24} {:<9} {}",
                    entry.environment.name(),
                    origin,
                    mode
                )?;
            }
        }
    }

    Ok(())
}

pub fn render_environment<W: Write>(
    environment: &Environment,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, environment)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            writeln!(out, "Name : {}", environment.name())?;
            writeln!(out, "OnPremise : {}", environment.on_premise())?;
            write!(out, "{}", environment.describe())?;
        }
    }
    Ok(())
}
