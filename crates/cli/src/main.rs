//! StoreDesk CLI - Database migrations and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! sd-cli migrate
//!
//! # Print the plan limits table
//! sd-cli plans
//!
//! # Send a team invitation email
//! sd-cli invite -e ana@example.com -n Ana -l https://app.storedesk.app/activate?token=abc \
//!     --store-name "Auto Center Sul" --owner-name Carlos
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `plans` - Print plan limits
//! - `invite` - Send a team invitation

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sd-cli")]
#[command(author, version, about = "StoreDesk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Print plan limits
    Plans {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Send a team invitation email
    Invite {
        /// Invitee email address
        #[arg(short, long)]
        email: String,

        /// Invitee display name
        #[arg(short, long)]
        name: String,

        /// Activation link
        #[arg(short, long)]
        link: String,

        /// Store the invitee is joining
        #[arg(long)]
        store_name: String,

        /// Name of the inviting owner
        #[arg(long)]
        owner_name: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Plans { json } => commands::plans::print(json)?,
        Commands::Invite {
            email,
            name,
            link,
            store_name,
            owner_name,
        } => {
            let request = storedesk_core::InviteRequest {
                email,
                name,
                link,
                store_name,
                owner_name,
            };
            commands::invite::send(&request).await?;
        }
    }
    Ok(())
}
