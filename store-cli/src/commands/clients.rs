//! Client commands. The backend only exposes the client list.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::Value;
use store_types::Client;

use super::{ListArgs, Session};

/// Client subcommands.
#[derive(Subcommand, Debug)]
pub enum ClientCommand {
    /// List clients
    List(ClientListArgs),
}

/// Flags of `clients list`.
#[derive(Args, Debug, Clone, Default)]
pub struct ClientListArgs {
    #[command(flatten)]
    pub list: ListArgs,

    /// Only clients whose fields contain this text
    #[arg(long)]
    pub search: Option<String>,
}

/// Run a client command.
pub async fn run(session: &Session, command: ClientCommand) -> Result<Value> {
    match command {
        ClientCommand::List(args) => {
            let mut patch = args.list.patch();
            if let Some(search) = &args.search {
                patch = patch.with_filter(search);
            }
            super::list::<Client>(session, patch).await
        }
    }
}
