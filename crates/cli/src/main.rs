mod cli;
mod config;
mod session;
mod terminal;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::time::Duration;
use tracing::{debug, info};

use washdesk_client::{ApiClient, SessionContext};
use washdesk_core::Config;
use washdesk_schedule::{
    build_month_grid, shift_month, SlotContext, WashSchedule, WashScheduleRequest,
};

use crate::cli::{CliArgs, Command, ScheduleArgs};
use crate::config::CliConfig;
use crate::session::SessionStore;
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    washdesk_core::config::load_dotenv();
    let args = CliArgs::parse();
    let terminal = Terminal::new();

    let env = Config::from_env();
    env.log_summary();
    let file = CliConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    let today = chrono::Local::now().date_naive();

    let result = run(&args, &env, &file, &terminal, today).await;
    if let Err(ref e) = result {
        debug!(error = ?e, "Command failed");
        terminal.print_error(&format!("{:#}", e))?;
        std::process::exit(1);
    }
    Ok(())
}

async fn run(
    args: &CliArgs,
    env: &Config,
    file: &CliConfig,
    terminal: &Terminal,
    today: NaiveDate,
) -> Result<()> {
    match &args.command {
        Command::Grid {
            month,
            today: today_override,
            shift,
        } => {
            let today = today_override.unwrap_or(today);
            let reference = month.unwrap_or(today);
            let reference = shift_month(reference, *shift)
                .with_context(|| format!("cannot move {} months from {}", shift, reference))?;
            let grid = build_month_grid(reference, today)
                .with_context(|| format!("no calendar grid for the month of {}", reference))?;
            terminal.print_grid(&grid, &[])
        }
        Command::Schedule(schedule_args) => {
            let schedule = build_schedule(schedule_args, env, file)?;
            if schedule_args.json {
                println!("{}", serde_json::to_string_pretty(schedule.slots())?);
                return Ok(());
            }
            terminal.print_schedule(&schedule)?;
            println!();
            let (start, _) = schedule.window();
            let grid = build_month_grid(start, today)
                .with_context(|| format!("no calendar grid for the month of {}", start))?;
            terminal.print_grid(&grid, schedule.slots())
        }
        Command::Config => {
            let mut summary = env.redacted_summary();
            summary["resolved"] = serde_json::json!({
                "api_url": file.resolve_api_url(env, args.api_url.as_deref()),
                "policy": file.resolve_policy(env, None)?.to_string(),
                "max_span_days": file.resolve_max_span(env, None),
                "profiles": Config::available_profiles(),
                "config_file": match args.config.as_deref() {
                    Some(p) => p.to_string(),
                    None => CliConfig::default_config_path()?.display().to_string(),
                },
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        remote => {
            let url = file.resolve_api_url(env, args.api_url.as_deref());
            let api = ApiClient::new(&url, Duration::from_secs(env.api.timeout_secs))?
                .with_policy(file.access_policy()?);
            let store = SessionStore::new(CliConfig::session_path()?);
            let mut ctx = store.load()?;

            let result = run_remote(remote, &api, &mut ctx, env, file, terminal, today).await;
            // a 401 inside the call has already cleared ctx
            store.save(&ctx)?;
            result
        }
    }
}

async fn run_remote(
    command: &Command,
    api: &ApiClient,
    ctx: &mut SessionContext,
    env: &Config,
    file: &CliConfig,
    terminal: &Terminal,
    today: NaiveDate,
) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            let password = match password {
                Some(p) => p.clone(),
                None => terminal.read_line("Password: ")?,
            };
            let session = api.login(ctx, username, &password).await?;
            terminal.print_info(&format!("Logged in as {} ({}).", session.username, session.role))
        }
        Command::Logout => {
            api.logout(ctx).await;
            terminal.print_info("Logged out.")
        }
        Command::Whoami => {
            terminal.print_session(ctx.current())?;
            match ctx.current() {
                Some(session) => {
                    let caps: Vec<&str> = api
                        .policy()
                        .capabilities_for(session.role)
                        .into_iter()
                        .map(|c| c.as_str())
                        .collect();
                    terminal.print_info(&format!("can: {}", caps.join(", ")))
                }
                None => Ok(()),
            }
        }
        Command::Leads => terminal.print_leads(&api.list_leads(ctx).await?),
        Command::Washers => terminal.print_washers(&api.list_washers(ctx).await?),
        Command::Jobs => terminal.print_jobs(&api.my_jobs(ctx).await?),
        Command::Attendance { date } => {
            let date = date.unwrap_or(today);
            terminal.print_attendance(date, &api.list_attendance(ctx, date).await?)
        }
        Command::Revenue { from, to } => {
            anyhow::ensure!(from <= to, "--from {} is after --to {}", from, to);
            terminal.print_revenue(&api.revenue_summary(ctx, *from, *to).await?)
        }
        Command::Submit { lead, schedule } => {
            let draft = build_schedule(schedule, env, file)?;
            terminal.print_schedule(&draft)?;
            let receipt = api.submit_schedule(ctx, lead, draft.slots()).await?;
            info!(lead = %lead, created = receipt.created, "Submitted");
            terminal.print_info(&format!(
                "Submitted {} washes for lead {}{}.",
                receipt.created,
                lead,
                receipt
                    .schedule_id
                    .map(|id| format!(" (schedule {id})"))
                    .unwrap_or_default()
            ))
        }
        Command::Grid { .. } | Command::Schedule(_) | Command::Config => {
            anyhow::bail!("{:?} does not talk to the backend", command)
        }
    }
}

fn build_schedule(args: &ScheduleArgs, env: &Config, file: &CliConfig) -> Result<WashSchedule> {
    let policy = file.resolve_policy(env, args.policy)?;
    let max_span = file.resolve_max_span(env, args.max_span);
    let request = WashScheduleRequest::new(args.start, args.washes, args.interval)
        .with_interior(args.interior)
        .with_max_span(max_span);
    let context = SlotContext {
        car_name: args.car_name.clone(),
        car_number: args.car_number.clone(),
        assigned_washer: args.washer.clone(),
    };
    let schedule = WashSchedule::generate(request, &context, policy)
        .context("cannot generate schedule")?;
    info!(
        washes = schedule.slots().len(),
        %policy,
        overflow = schedule.request().overflows(),
        "Schedule generated"
    );
    Ok(schedule)
}
