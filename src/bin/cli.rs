//! sstkv CLI Client
//!
//! Sends one command to a running server and prints the decoded response.

use clap::{Parser, Subcommand};
use sstkv::config::DEFAULT_PORT;
use sstkv::network::Client;
use sstkv::protocol::Command;

/// sstkv CLI
#[derive(Parser, Debug)]
#[command(name = "sstkv-cli")]
#[command(about = "CLI for the sstkv key-value store")]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    #[command(alias = "GET")]
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    #[command(alias = "SET")]
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    #[command(alias = "DELETE")]
    Delete {
        /// The key to delete
        key: String,
    },
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Get { key } => Command::Get { key },
            Commands::Set { key, value } => Command::Set { key, value },
            Commands::Delete { key } => Command::Delete { key },
        }
    }
}

fn main() {
    let args = Args::parse();
    let addr = format!("{}:{}", args.host, args.port);
    let command = Command::from(args.command);

    let response = Client::connect(&addr).and_then(|mut client| client.send(&command));

    match response {
        Ok(response) => {
            let output = serde_json::json!({
                "status": response.status,
                "payload": response.payload.unwrap_or_default(),
            });
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
