pub mod import;
pub mod imports;
pub mod init;
pub mod parse;
pub mod status;
pub mod summary;
pub mod types;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qbimport", about = "Import QuickBooks report exports (CSV/XLSX) into a local store.")]
pub struct Cli {
    /// Log detection and parsing decisions to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up qbimport: choose a data directory and initialize the database.
    Init {
        /// Path for qbimport data (default: ~/Documents/qbimport)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Company name shown on summaries
        #[arg(long)]
        company: Option<String>,
    },
    /// Parse a report export and print the result as JSON.
    Parse {
        /// Path to CSV or XLSX export
        file: String,
        /// MIME type (default: guessed from the file extension)
        #[arg(long)]
        mime: Option<String>,
        /// Report type key (e.g. profit_loss); skips detection
        #[arg(long = "type")]
        report_type: Option<String>,
        /// Print JSON on one line
        #[arg(long)]
        compact: bool,
    },
    /// Show the detected report type, period and data-start row.
    Detect {
        /// Path to CSV or XLSX export
        file: String,
        /// MIME type (default: guessed from the file extension)
        #[arg(long)]
        mime: Option<String>,
    },
    /// Parse a report export and store it.
    Import {
        /// Path to CSV or XLSX export
        file: String,
        /// MIME type (default: guessed from the file extension)
        #[arg(long)]
        mime: Option<String>,
        /// Report type key (e.g. profit_loss); skips detection
        #[arg(long = "type")]
        report_type: Option<String>,
    },
    /// List stored imports.
    Imports {
        /// Only show imports of this report type
        #[arg(long = "type")]
        report_type: Option<String>,
    },
    /// Show one stored import.
    Show {
        /// Import ID (shown in `qbimport imports`)
        id: i64,
        /// Print the stored record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a stored import.
    Delete {
        /// Import ID (shown in `qbimport imports`)
        id: i64,
    },
    /// List known report types.
    Types,
    /// Show settings, database and import counts.
    Status,
}
