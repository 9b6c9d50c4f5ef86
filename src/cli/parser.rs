use crate::core::views::ViewKind;
use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rParticipation
/// CLI application to track student participation in school events with SQLite
#[derive(Parser)]
#[command(
    name = "rparticipation",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track student participation in school events using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

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
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use")]
        editor: Option<String>,
    },

    /// Database maintenance
    Db {
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
    },

    /// Add a single student
    AddStudent {
        /// Class label (e.g. 1A)
        class: String,

        /// Number of the student in the class
        number: i64,

        /// Student name
        name: String,

        /// Category: C=綜援, F=全免, H=半免, D=經濟困難, S=特殊
        category: String,

        #[arg(long, help = "Print the refreshed student list")]
        show: bool,
    },

    /// Import students, one "class, number, name, category" line each
    ImportStudents {
        #[arg(long, value_name = "FILE", help = "Read lines from FILE instead of stdin")]
        file: Option<String>,

        #[arg(long, help = "All-or-nothing import (overrides batch_mode)")]
        atomic: bool,

        #[arg(long, help = "Print the refreshed student list")]
        show: bool,
    },

    /// Add an event
    AddEvent {
        name: String,

        #[arg(long, help = "Print the refreshed event list")]
        show: bool,
    },

    /// Record attendance: one "class, number, name" line per student
    Attend {
        /// Event name (created when missing)
        event: String,

        #[arg(long, value_name = "FILE", help = "Read lines from FILE instead of stdin")]
        file: Option<String>,

        #[arg(long, short = 'y', help = "Add students to an existing event without asking")]
        yes: bool,

        #[arg(long, help = "All-or-nothing import (overrides batch_mode)")]
        atomic: bool,

        #[arg(long, help = "Print the refreshed participant counts")]
        show: bool,
    },

    /// Delete a student or an event (with its attendance records)
    Del {
        #[arg(
            long,
            value_name = "CLASS,NUMBER,NAME",
            conflicts_with = "event",
            required_unless_present = "event"
        )]
        student: Option<String>,

        #[arg(long, value_name = "NAME")]
        event: Option<String>,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Revert the most recent change
    Undo,

    /// Show the undo history (newest first)
    History {
        #[arg(long, help = "Forget the whole history")]
        clear: bool,
    },

    /// Print a view
    List {
        #[arg(value_enum)]
        view: ViewKind,

        #[arg(long, short, default_value = "all", help = "all, C, F, H, D or S")]
        category: String,

        #[arg(long, help = "Form (leading digits of the class), for the form view")]
        form: Option<String>,

        #[arg(long, help = "Show category codes instead of labels")]
        codes: bool,
    },

    /// Export a view
    Export {
        #[arg(value_enum)]
        view: ViewKind,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short, default_value = "all", help = "all, C, F, H, D or S")]
        category: String,

        #[arg(long, help = "Form (leading digits of the class), for the form view")]
        form: Option<String>,

        #[arg(long, help = "Export category codes instead of labels")]
        codes: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },
}
