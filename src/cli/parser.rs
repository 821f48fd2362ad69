use clap::{Parser, Subcommand};

/// Command-line interface definition for timereg
/// Employee time registration with overlap validation, on SQLite
#[derive(Parser)]
#[command(
    name = "timereg",
    version = env!("CARGO_PKG_VERSION"),
    about = "Employee time registration: clock in/out, manual entries, approvals and shifts on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Act as this user (personal id); defaults to `current_user` from the config
    #[arg(global = true, long = "as", value_name = "PERSONAL_ID")]
    pub as_user: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "last", help = "Only the last N rows")]
        last: Option<usize>,
    },

    /// Manage users and roles
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage work locations
    Location {
        #[command(subcommand)]
        action: LocationAction,
    },

    /// Manage planned shifts
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },

    /// Manage overtime multipliers (admins); `overtime active` is open to everyone
    Overtime {
        #[command(subcommand)]
        action: OvertimeAction,
    },

    /// Show or change your personal preferences
    Settings {
        #[arg(long, help = "Turn notifications on or off (true/false)")]
        notifications: Option<bool>,

        #[arg(long = "auto-clock-out", help = "Clock out automatically (true/false)")]
        auto_clock_out: Option<bool>,

        #[arg(long = "default-view", help = "dashboard, time-registrations or reports")]
        default_view: Option<String>,

        #[arg(long = "time-format", help = "12h or 24h")]
        time_format: Option<String>,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Start working now
    ClockIn {
        #[arg(long, allow_negative_numbers = true, help = "Latitude of the clock-in position")]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true, help = "Longitude of the clock-in position")]
        lon: Option<f64>,

        /// Pretend "now" is this instant (YYYY-MM-DD HH:MM)
        #[arg(long, hide = true)]
        at: Option<String>,
    },

    /// Stop working now
    ClockOut {
        #[arg(long, allow_negative_numbers = true, help = "Latitude of the clock-out position")]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true, help = "Longitude of the clock-out position")]
        lon: Option<f64>,

        #[arg(long, hide = true)]
        at: Option<String>,
    },

    /// Show whether you are clocked in today
    Status {
        #[arg(long, hide = true)]
        at: Option<String>,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Record a registration by hand
    Add {
        /// Date of the registration (YYYY-MM-DD)
        date: String,

        #[arg(long = "in", help = "Clock-in time (HH:MM)")]
        clock_in: String,

        #[arg(long = "out", help = "Clock-out time (HH:MM); omit for an open registration")]
        clock_out: Option<String>,

        #[arg(long = "user", help = "Register for another user (personal id)")]
        user: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// Correct an existing registration
    Edit {
        id: i64,

        #[arg(long, help = "Move to another date (YYYY-MM-DD)")]
        date: Option<String>,

        #[arg(long = "in", help = "New clock-in time (HH:MM)")]
        clock_in: Option<String>,

        #[arg(long = "out", help = "New clock-out time (HH:MM)")]
        clock_out: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long, help = "pending, approved or rejected (managers only)")]
        status: Option<String>,
    },

    /// Show one registration
    Show {
        id: i64,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// List registrations, newest first
    List {
        #[arg(long = "user", help = "Only this user (personal id)")]
        user: Option<String>,

        #[arg(long, help = "Single day (YYYY-MM-DD)", conflicts_with_all = ["from", "to"])]
        date: Option<String>,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,

        #[arg(long, help = "pending, approved or rejected")]
        status: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long = "per-page")]
        per_page: Option<usize>,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Registrations of every user in a date range (managers)
    Team {
        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Your latest registrations
    Recent {
        #[arg(long)]
        limit: Option<usize>,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Approve a closed registration
    Approve { id: i64 },

    /// Reject a registration
    Reject { id: i64 },

    /// Delete a registration
    Del {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user (the first user of a new database becomes admin)
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long = "pid", help = "Personal id used to log in with --as")]
        personal_id: String,

        #[arg(long, default_value = "employee", help = "employee, manager or admin")]
        role: String,
    },

    /// List users
    List {
        #[arg(long, help = "Only users with this role")]
        role: Option<String>,
    },

    /// Change name or e-mail (your own, or anyone's as admin)
    Edit {
        personal_id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// Change the role of a user
    Role {
        personal_id: String,
        role: String,
    },

    /// Delete a user with all their registrations and shifts
    Del {
        personal_id: String,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum LocationAction {
    Add {
        name: String,

        #[arg(long)]
        address: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    List {
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    Del { id: i64 },

    /// Locations around a position, closest first
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        #[arg(long, help = "Search radius in km (0.1 - 50)")]
        radius: Option<f64>,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Plan a single shift
    Add {
        #[arg(long = "user", help = "Shift owner (personal id); defaults to you")]
        user: Option<String>,

        #[arg(long)]
        date: String,

        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,

        #[arg(long)]
        location: Option<i64>,

        #[arg(long, help = "daily, weekly or monthly")]
        recurrence: Option<String>,
    },

    /// Shifts in a date range (default: this week)
    List {
        #[arg(long = "user")]
        user: Option<String>,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Your shifts from Monday to Sunday of the current week
    Week {
        #[arg(long, hide = true, help = "Any day of the week to show (YYYY-MM-DD)")]
        at: Option<String>,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Change a planned shift; hours are recomputed
    Edit {
        id: i64,

        #[arg(long = "user", help = "Move the shift to another user (personal id)")]
        user: Option<String>,

        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        location: Option<i64>,

        #[arg(long, help = "daily, weekly or monthly")]
        recurrence: Option<String>,
    },

    Del { id: i64 },

    /// One weekly shift for each matching day in a date range
    Generate {
        #[arg(long = "user")]
        user: Option<String>,

        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        #[arg(long, help = "Comma separated weekdays, e.g. mon,tue,fri")]
        days: String,

        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,

        #[arg(long)]
        location: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum OvertimeAction {
    Add {
        #[arg(long)]
        name: String,

        #[arg(long = "type", help = "weekday_evening, weekend, holiday or night_shift")]
        kind: String,

        #[arg(long, help = "Pay multiplier, at least 1 (e.g. 1.5)")]
        multiplier: f64,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, help = "Create the rule disabled")]
        inactive: bool,
    },

    /// All rules, ordered by name
    List {
        #[arg(long, help = "Only active (true) or inactive (false) rules")]
        active: Option<bool>,

        #[arg(long = "type")]
        kind: Option<String>,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    Show {
        id: i64,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long = "type")]
        kind: Option<String>,

        #[arg(long)]
        multiplier: Option<f64>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        active: Option<bool>,
    },

    Del { id: i64 },

    /// Rules currently in force
    Active {
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },
}
