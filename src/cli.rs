use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::api::{market::DEFAULT_HISTORY_DAYS, rag::DEFAULT_TOP_K};

#[derive(Debug, Parser)]
#[command(
    name = "agrolens",
    about = "Terminal client for the agricultural advisory service"
)]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show whether a session is stored
    Status,
    /// Show the signed-in user's profile
    Profile,
    /// Diagnose a crop disease from a leaf photo
    Detect { image: PathBuf },
    /// Current weather and farming advice for a location
    Weather { location: String },
    /// Market prices for all crops, or one crop with recent history
    Prices {
        #[arg(long)]
        crop: Option<String>,
    },
    /// Daily price history for a crop
    History {
        crop: String,
        #[arg(long, default_value_t = DEFAULT_HISTORY_DAYS)]
        days: u32,
    },
    /// Seven-day price forecast for a crop
    Predict { crop: String },
    /// Combined weather, disease, knowledge and seasonal advice
    Advise {
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        crop: Option<String>,
        #[arg(long)]
        disease: Option<String>,
        #[arg(long)]
        query: Option<String>,
    },
    /// Seasonal planting guide
    Seasonal {
        /// Month number 1-12 (default: current month)
        #[arg(long)]
        month: Option<u32>,
    },
    /// Interactive chat with the advisor
    Chat {
        #[arg(long)]
        location: Option<String>,
    },
    /// Weather snapshot plus advisory for your location
    Dashboard {
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        crop: Option<String>,
    },
    /// Search the agricultural knowledge base
    Search {
        query: String,
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: u8,
    },
    /// Seed the knowledge base with default documents
    KnowledgeInit,
    /// Add a document to the knowledge base
    Ingest {
        content: String,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        id: Option<String>,
    },
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Status)
    }
}
