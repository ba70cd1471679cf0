//! Ticket price lookup over a fixed table

use async_trait::async_trait;

use crate::tool::{Tool, ToolResult};

/// Return ticket prices by destination city, lowercase keys.
const TICKET_PRICES: [(&str, &str); 4] = [
    ("london", "$799"),
    ("paris", "$899"),
    ("tokyo", "$1400"),
    ("berlin", "$499"),
];

/// Price reported for cities absent from the table.
pub const UNKNOWN_PRICE: &str = "Unknown ticket price";

/// Case-insensitive lookup in the fixed price table.
///
/// Unknown cities are not an error: the reply embeds the unknown-price
/// literal in the same templated sentence.
pub struct TicketPriceTool;

impl TicketPriceTool {
    fn price_for(city: &str) -> &'static str {
        let lowered = city.to_lowercase();
        TICKET_PRICES
            .iter()
            .find(|(name, _)| *name == lowered)
            .map(|(_, price)| *price)
            .unwrap_or(UNKNOWN_PRICE)
    }
}

#[async_trait]
impl Tool for TicketPriceTool {
    fn name(&self) -> &str {
        "get_ticket_price"
    }

    fn description(&self) -> &str {
        "Get the price of a return ticket to the destination city."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "destination_city": {
                    "type": "string",
                    "description": "The city that the customer wants to travel to",
                },
            },
            "required": ["destination_city"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult {
        let city = arguments
            .get("destination_city")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        tracing::debug!(city = %city, "ticket price lookup");

        let price = Self::price_for(city);
        ToolResult::text(format!("The price of a ticket to {} is {}", city, price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn lookup(city: &str) -> String {
        TicketPriceTool
            .execute(serde_json::json!({ "destination_city": city }))
            .await
            .content
    }

    #[tokio::test]
    async fn test_known_cities() {
        assert_eq!(lookup("London").await, "The price of a ticket to London is $799");
        assert_eq!(lookup("paris").await, "The price of a ticket to paris is $899");
        assert_eq!(lookup("TOKYO").await, "The price of a ticket to TOKYO is $1400");
        assert_eq!(lookup("Berlin").await, "The price of a ticket to Berlin is $499");
    }

    #[tokio::test]
    async fn test_unknown_city_is_soft() {
        let reply = lookup("Atlantis").await;
        assert_eq!(
            reply,
            "The price of a ticket to Atlantis is Unknown ticket price"
        );
    }

    #[tokio::test]
    async fn test_result_is_never_an_error() {
        let result = TicketPriceTool
            .execute(serde_json::json!({ "destination_city": "Nowhere" }))
            .await;
        assert!(!result.is_error);
    }
}
