use careers_intake::config::AppConfig;
use careers_intake::error::AppError;
use careers_intake::forms::{application, login, FormDefinition};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::demo::{run_demo, DemoArgs};
use crate::runner;

#[derive(Parser, Debug)]
#[command(
    name = "Careers Intake",
    about = "Fill in and validate the careers intake forms from the terminal",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the experienced-hire application form (default command)
    Apply(FormArgs),
    /// Open the login form
    Login(FormArgs),
    /// Run a scripted walkthrough of the forms without a terminal UI
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct FormArgs {
    /// Override the configured submission delay in milliseconds
    #[arg(long)]
    pub(crate) delay_ms: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum FormChoice {
    Application,
    Login,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Apply(FormArgs::default()));

    match command {
        Command::Apply(args) => run_interactive(application::definition(), args, false).await,
        Command::Login(args) => run_interactive(login::definition(), args, true).await,
        Command::Demo(args) => run_demo(args).await,
    }
}

async fn run_interactive(
    definition: FormDefinition,
    mut args: FormArgs,
    reset_on_submit: bool,
) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(delay_ms) = args.delay_ms.take() {
        config.submission.delay_ms = delay_ms;
    }

    runner::run_form(definition, config.submission.delay(), reset_on_submit).await
}
