//! Address commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::Value;
use store_types::{Address, AddressInput};

use super::{ListArgs, Session};

/// Address subcommands.
#[derive(Subcommand, Debug)]
pub enum AddressCommand {
    /// List addresses
    List(ListArgs),

    /// Show one address
    Get {
        /// Address ID
        id: i64,
    },

    /// Create an address
    Create(AddressFields),

    /// Replace an address
    Update {
        /// Address ID
        id: i64,

        #[command(flatten)]
        fields: AddressFields,
    },

    /// Delete an address
    Delete {
        /// Address ID
        id: i64,
    },
}

/// Address form fields.
#[derive(Args, Debug, Clone)]
pub struct AddressFields {
    /// Street and number
    #[arg(long)]
    pub street: String,

    /// City
    #[arg(long)]
    pub city: String,

    /// State or region
    #[arg(long)]
    pub state: Option<String>,

    /// Country
    #[arg(long)]
    pub country: Option<String>,

    /// Postal code
    #[arg(long)]
    pub zip_code: String,

    /// Owning client
    #[arg(long)]
    pub client_id: i64,
}

impl From<AddressFields> for AddressInput {
    fn from(fields: AddressFields) -> Self {
        Self {
            street: fields.street,
            city: fields.city,
            state: fields.state,
            country: fields.country,
            zip_code: fields.zip_code,
            client_id: fields.client_id,
        }
    }
}

/// Run an address command.
pub async fn run(session: &Session, command: AddressCommand) -> Result<Value> {
    match command {
        AddressCommand::List(args) => super::list::<Address>(session, args.patch()).await,
        AddressCommand::Get { id } => super::get::<Address>(session, id).await,
        AddressCommand::Create(fields) => super::create::<Address>(session, fields.into()).await,
        AddressCommand::Update { id, fields } => {
            super::update::<Address>(session, id, fields.into()).await
        }
        AddressCommand::Delete { id } => super::delete::<Address>(session, id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MockBackend;
    use store_client::StoreConfig;

    fn fields(city: &str) -> AddressFields {
        AddressFields {
            street: "1 Main St".into(),
            city: city.into(),
            state: Some("IDF".into()),
            country: None,
            zip_code: "75001".into(),
            client_id: 3,
        }
    }

    #[test]
    fn fields_become_input() {
        let input: AddressInput = fields("Paris").into();
        assert_eq!(input.city, "Paris");
        assert_eq!(input.state.as_deref(), Some("IDF"));
        assert_eq!(input.client_id, 3);
    }

    #[tokio::test]
    async fn full_lifecycle() {
        let backend = MockBackend::default();
        let session = Session::mock(StoreConfig::default(), backend.clone());

        let created = run(&session, AddressCommand::Create(fields("Paris")))
            .await
            .unwrap();
        assert_eq!(created["addressId"], 1);

        let updated = run(
            &session,
            AddressCommand::Update {
                id: 1,
                fields: fields("Lyon"),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated["city"], "Lyon");

        let fetched = run(&session, AddressCommand::Get { id: 1 }).await.unwrap();
        assert_eq!(fetched["city"], "Lyon");

        run(&session, AddressCommand::Delete { id: 1 }).await.unwrap();
        let page = run(&session, AddressCommand::List(ListArgs::default()))
            .await
            .unwrap();
        assert!(page["items"].as_array().unwrap().is_empty());
    }
}
