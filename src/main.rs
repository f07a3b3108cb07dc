use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use std::time::Duration;
use steam_bootstrap::{
    plan, provision, telemetry, ui, Distribution, HostPaths, InstallError, ProvisionOptions,
    Recipe, RetryPolicy, SystemRunner,
};

#[derive(Parser)]
#[command(name = "steam-bootstrap")]
#[command(version)]
#[command(about = "Install Steam on Debian, RPM and Arch based Linux distributions", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Attempts per retried command
    #[arg(long, env = "STEAM_BOOTSTRAP_RETRIES", default_value_t = 3)]
    retries: u32,

    /// Seconds to wait between attempts
    #[arg(long, env = "STEAM_BOOTSTRAP_RETRY_DELAY", default_value_t = 5)]
    retry_delay: u64,

    /// Print the detected distribution and its recipe as JSON, then exit
    #[arg(long)]
    print_plan: bool,
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    distribution: &'a Distribution,
    recipe: &'a Recipe,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.verbose);

    let options = ProvisionOptions {
        retry: RetryPolicy::new(cli.retries, Duration::from_secs(cli.retry_delay)),
        paths: HostPaths::default(),
    };
    let runner = SystemRunner::new();

    if cli.print_plan {
        return print_plan(&runner, &options).await;
    }

    match provision(&runner, sudo::check(), &options, |event| ui::progress(&event)).await {
        Ok(report) => {
            for warning in &report.warnings {
                ui::warn(&format!("{} ({})", warning, warning.fix_suggestion()));
            }
            if report.fallback_used {
                ui::dim("Installed from the direct package download");
            }
            ui::success(&format!(
                "Steam is installed at {}",
                report.executable.display()
            ));
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

async fn print_plan(runner: &SystemRunner, options: &ProvisionOptions) -> ExitCode {
    let (distribution, recipe) = match plan(runner, options).await {
        Ok(planned) => planned,
        Err(e) => return fail(&e),
    };

    let output = PlanOutput {
        distribution: &distribution,
        recipe: &recipe,
    };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            ui::error(&format!("Failed to serialize plan: {}", e));
            ExitCode::FAILURE
        }
    }
}

fn fail(error: &InstallError) -> ExitCode {
    ui::error(&error.to_string());
    ui::dim(error.fix_suggestion());
    ExitCode::FAILURE
}
