use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pilego")]
#[command(about = "Track household batteries, find collection points and earn recycling rewards")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config/default")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tracked batteries
    Inventory {
        /// Filter by status (active, expired, recycled, all)
        #[arg(short, long, default_value = "active")]
        status: String,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Register a new battery
    Add {
        /// Battery type (AA, AAA, 9V, CR2032, Other)
        kind: String,

        /// Brand printed on the battery
        brand: String,

        /// Where the battery is used
        location: String,

        /// Expiry date (YYYY-MM-DD)
        #[arg(short, long)]
        expires: Option<String>,
    },

    /// Mark a battery as recycled
    Recycle {
        /// Battery id
        id: u64,
    },

    /// Remove a battery from the inventory
    Remove {
        /// Battery id
        id: u64,
    },

    /// Search collection points
    Points {
        /// Text to look for in the name or address
        #[arg(short, long, default_value = "")]
        text: String,

        /// Category (store, school, public, event, all)
        #[arg(short = 'k', long, default_value = "all")]
        category: String,

        /// Current latitude (defaults to the configured origin)
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Current longitude
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Process a scanned code
    Scan {
        /// Decoded code content
        payload: String,
    },

    /// Show points, level and achievements
    Profile,

    /// Show the reward catalog and what the balance can afford
    Rewards,

    /// Exchange points for a reward
    Redeem {
        /// Reward id
        id: String,
    },
}
