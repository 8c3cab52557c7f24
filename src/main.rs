use anyhow::{Context, Result};
use onion::cli::commands::{ListCommand, RunCommand, ValidateCommand};
use onion::cli::output::*;
use onion::cli::{Cli, Command};
use onion::{PipelineConfig, StepRegistry};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let registry = StepRegistry::with_builtins();

    match &cli.command {
        Command::Run(cmd) => run_pipeline(cmd, &registry)?,
        Command::Validate(cmd) => validate_pipeline(cmd, &registry)?,
        Command::List(cmd) => list_registry(cmd, &registry)?,
    }

    Ok(())
}

fn run_pipeline(cmd: &RunCommand, registry: &StepRegistry) -> Result<()> {
    let config = PipelineConfig::from_file(&cmd.file)
        .context("Failed to load pipeline definition")?;

    println!("{} Loaded pipeline: {}", INFO, style(&config.name).bold());

    let mut pipeline = config
        .to_pipeline(registry)
        .context("Failed to build pipeline")?;
    let destination = config
        .destination(registry)
        .context("Failed to resolve destination")?;

    if !cmd.arg.is_empty() {
        pipeline.send(cmd.arg.iter().cloned());
        println!(
            "{} Argument override: {}",
            INFO,
            style(serde_json::Value::from(cmd.arg.clone())).dim()
        );
    }

    if cmd.events {
        let names: Vec<String> = config.steps.iter().map(|step| step.uses.clone()).collect();
        pipeline.add_event_handler(move |event| {
            println!("{}", format_event(event, &names));
        });
    }

    println!();
    match pipeline.then(|args| destination(args)) {
        Ok(result) => {
            println!("{}", format_result(&result));
            println!(
                "\n{} {} completed {}",
                CHECK,
                style(&config.name).bold(),
                style("successfully").green()
            );
            Ok(())
        }
        Err(e) => {
            println!(
                "\n{} {} {}",
                CROSS,
                style(&config.name).bold(),
                style("failed").red()
            );
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

fn validate_pipeline(cmd: &ValidateCommand, registry: &StepRegistry) -> Result<()> {
    println!("{} Validating pipeline...", INFO);

    let result = PipelineConfig::from_file(&cmd.file).and_then(|config| {
        config.resolve(registry)?;
        Ok(config)
    });

    match result {
        Ok(config) => {
            println!("{} Pipeline definition is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            println!("  Steps: {}", style(config.steps.len()).cyan());
            println!("  Arguments: {}", style(config.arguments.len()).cyan());
            println!("  Destination: {}", style(&config.destination.uses).cyan());

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}

fn list_registry(cmd: &ListCommand, registry: &StepRegistry) -> Result<()> {
    if cmd.json {
        let data = serde_json::json!({
            "steps": registry.step_names(),
            "destinations": registry.destination_names(),
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("{} Registered steps:", INFO);
    for name in registry.step_names() {
        println!("  {}", style(name).bold());
    }

    println!("{} Registered destinations:", INFO);
    for name in registry.destination_names() {
        println!("  {}", style(name).bold());
    }

    Ok(())
}
