//! Client order commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::Value;
use store_types::{
    ClientOrder, ClientOrderInput, ClientOrderStatus, OrderItemInput, OrderTransition,
};

use super::{ListArgs, Session};

/// Client order subcommands.
#[derive(Subcommand, Debug)]
pub enum OrderCommand {
    /// List orders, newest first
    List(OrderListArgs),

    /// Show one order
    Get {
        /// Order ID
        id: String,
    },

    /// Place an order
    Create(OrderFields),

    /// Replace an order's client, address and lines
    Update {
        /// Order ID
        id: String,

        #[command(flatten)]
        fields: OrderFields,
    },

    /// Cancel an order
    Cancel {
        /// Order ID
        id: String,
    },
}

/// Flags of `orders list`.
#[derive(Args, Debug, Clone, Default)]
pub struct OrderListArgs {
    #[command(flatten)]
    pub list: ListArgs,

    /// Only orders in this status (EN_PREPARATION, EN_ROUTE, LIVREE, ANNULEE)
    #[arg(long)]
    pub status: Option<ClientOrderStatus>,
}

/// Order form fields.
#[derive(Args, Debug, Clone)]
pub struct OrderFields {
    /// Ordering client
    #[arg(long)]
    pub client_id: String,

    /// Delivery address
    #[arg(long)]
    pub delivery_address_id: Option<String>,

    /// Order line as PRODUCT:QUANTITY (repeatable)
    #[arg(long = "item", value_parser = parse_item, required = true)]
    pub items: Vec<OrderItemInput>,
}

impl From<OrderFields> for ClientOrderInput {
    fn from(fields: OrderFields) -> Self {
        Self {
            client_id: fields.client_id,
            delivery_address_id: fields.delivery_address_id,
            items: fields.items,
        }
    }
}

/// Parse `PRODUCT:QUANTITY`.
fn parse_item(s: &str) -> Result<OrderItemInput, String> {
    let (product, quantity) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected PRODUCT:QUANTITY, got '{}'", s))?;
    if product.is_empty() {
        return Err(format!("missing product in '{}'", s));
    }
    let quantity: u32 = quantity
        .parse()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    if quantity == 0 {
        return Err(format!("quantity must be positive in '{}'", s));
    }
    Ok(OrderItemInput {
        product_id: product.to_string(),
        quantity,
    })
}

/// Run an order command.
pub async fn run(session: &Session, command: OrderCommand) -> Result<Value> {
    match command {
        OrderCommand::List(args) => {
            let mut patch = args.list.patch();
            if let Some(status) = args.status {
                patch = patch.with_filter(status.as_str());
            }
            super::list::<ClientOrder>(session, patch).await
        }
        OrderCommand::Get { id } => super::get::<ClientOrder>(session, id).await,
        OrderCommand::Create(fields) => super::create::<ClientOrder>(session, fields.into()).await,
        OrderCommand::Update { id, fields } => {
            super::update::<ClientOrder>(session, id, fields.into()).await
        }
        OrderCommand::Cancel { id } => {
            super::transition::<ClientOrder>(session, id, OrderTransition::Cancel).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MockBackend;
    use store_client::StoreConfig;

    fn fields() -> OrderFields {
        OrderFields {
            client_id: "c-1".into(),
            delivery_address_id: Some("4".into()),
            items: vec![parse_item("P-10:2").unwrap()],
        }
    }

    // ===========================================
    // Item Parsing Tests
    // ===========================================

    #[test]
    fn parse_item_accepts_product_and_quantity() {
        let item = parse_item("SKU:42:3").unwrap();
        assert_eq!(item.product_id, "SKU:42");
        assert_eq!(item.quantity, 3);
    }

    #[test]
    fn parse_item_rejects_bad_input() {
        assert!(parse_item("P-10").is_err());
        assert!(parse_item(":2").is_err());
        assert!(parse_item("P-10:two").is_err());
        assert!(parse_item("P-10:0").is_err());
    }

    // ===========================================
    // Command Tests
    // ===========================================

    #[tokio::test]
    async fn create_and_cancel() {
        let backend = MockBackend::default();
        let session = Session::mock(StoreConfig::default(), backend.clone());

        let created = run(&session, OrderCommand::Create(fields())).await.unwrap();
        assert_eq!(created["orderId"], "o-1");
        assert_eq!(created["status"], "EN_PREPARATION");

        let cancelled = run(&session, OrderCommand::Cancel { id: "o-1".into() })
            .await
            .unwrap();
        assert_eq!(cancelled["status"], "ANNULEE");

        let err = run(&session, OrderCommand::Cancel { id: "o-1".into() })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad request. Please check your data.");
    }

    #[tokio::test]
    async fn status_filter_is_sent_with_the_query() {
        let backend = MockBackend::default();
        let session = Session::mock(StoreConfig::default(), backend.clone());
        run(&session, OrderCommand::Create(fields())).await.unwrap();

        let args = OrderListArgs {
            list: ListArgs::default(),
            status: Some(ClientOrderStatus::Cancelled),
        };
        let page = run(&session, OrderCommand::List(args)).await.unwrap();
        assert!(page["items"].as_array().unwrap().is_empty());

        let queries = backend.orders.list_queries();
        assert_eq!(queries[0].filter.as_deref(), Some("ANNULEE"));
        assert_eq!(queries[0].sort_field, "createdAt");
    }
}
