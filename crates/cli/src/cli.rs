use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use washdesk_schedule::CompressionPolicy;

/// Operator console for the car-wash back office.
///
/// Generates wash schedules and month calendars locally, and talks to the
/// backend for leads, washers, attendance and revenue.
#[derive(Parser, Debug)]
#[command(name = "washdesk", about = "Car-wash back-office console")]
pub struct CliArgs {
    /// Path to config file (default: ~/.config/washdesk/config.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Backend base URL (overrides env var and config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the six-week calendar for a month
    Grid {
        /// Month to show as YYYY-MM (default: current month)
        #[arg(long, value_parser = parse_month)]
        month: Option<NaiveDate>,

        /// Override today's date (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Months to move from --month, e.g. -1 for the previous month
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        shift: i32,
    },

    /// Generate a wash schedule locally
    Schedule(ScheduleArgs),

    /// Generate a schedule and submit it for a lead
    Submit {
        /// Lead id the schedule belongs to
        #[arg(long)]
        lead: String,

        #[command(flatten)]
        schedule: ScheduleArgs,
    },

    /// Log in to the backend
    Login {
        #[arg(long)]
        username: String,

        /// Prompted for when not given
        #[arg(long, env = "WASHDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// End the current session
    Logout,

    /// Show the current session
    Whoami,

    /// List leads
    Leads,

    /// List washers
    Washers,

    /// List the logged-in washer's assigned washes
    Jobs,

    /// Show attendance for a day
    Attendance {
        /// Day to show (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show revenue for a date range
    Revenue {
        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,
    },

    /// Print the resolved configuration
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct ScheduleArgs {
    /// First wash date (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Total number of washes
    #[arg(long)]
    pub washes: u32,

    /// Days between washes (standard packages use 3, 5, 7, 10 or 15)
    #[arg(long)]
    pub interval: u32,

    /// How many washes are interior
    #[arg(long, default_value = "0")]
    pub interior: u32,

    /// Maximum schedule span in days
    #[arg(long)]
    pub max_span: Option<u32>,

    /// Overflow policy: spread or reference
    #[arg(long)]
    pub policy: Option<CompressionPolicy>,

    #[arg(long)]
    pub car_name: Option<String>,

    #[arg(long)]
    pub car_number: Option<String>,

    /// Washer id assigned to every wash
    #[arg(long)]
    pub washer: Option<String>,

    /// Print the schedule as JSON
    #[arg(long)]
    pub json: bool,
}

/// Parse `YYYY-MM` into the first day of that month.
pub fn parse_month(s: &str) -> Result<NaiveDate, String> {
    let (year, month) = s
        .split_once('-')
        .ok_or_else(|| format!("expected YYYY-MM, got '{s}'"))?;
    let year: i32 = year.parse().map_err(|_| format!("bad year in '{s}'"))?;
    let month: u32 = month.parse().map_err(|_| format!("bad month in '{s}'"))?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| format!("no such month '{s}'"))
}
