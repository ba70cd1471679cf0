//! Reference tool handlers

pub mod sessions;
pub mod ticket_price;

pub use sessions::{
    ListConversationsTool, LoadConversationTool, SaveConversationTool, StartNewConversationTool,
};
pub use ticket_price::TicketPriceTool;

use std::sync::Arc;

use crate::session::SessionHandle;
use crate::store::SessionStore;
use crate::tool::ToolCatalog;

/// Catalog with the full airline assistant tool set: the price lookup plus
/// the four session-management tools.
pub fn airline_catalog(handle: SessionHandle, store: Arc<SessionStore>) -> ToolCatalog {
    let mut catalog = ToolCatalog::new();
    catalog.add(Arc::new(TicketPriceTool));
    catalog.add(Arc::new(SaveConversationTool::new(
        handle.clone(),
        store.clone(),
    )));
    catalog.add(Arc::new(ListConversationsTool::new(store.clone())));
    catalog.add(Arc::new(LoadConversationTool::new(handle.clone(), store)));
    catalog.add(Arc::new(StartNewConversationTool::new(handle)));
    catalog
}
