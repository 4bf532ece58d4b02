//! Outbound replies

/// Static usage text for `/start` and `/help`
pub const USAGE: &str = "Send your consumer number (example: 85901016297)";

/// A single-page bill ready to be sent as a file
#[derive(Debug, Clone)]
pub struct PageAttachment {
    pub identifier: String,
    /// 1-based page in the reference document
    pub page: u32,
    pub filename: String,
    pub caption: String,
    pub bytes: Vec<u8>,
}

impl PageAttachment {
    pub fn new(identifier: &str, page: u32, bytes: Vec<u8>) -> Self {
        Self {
            identifier: identifier.to_string(),
            page,
            filename: format!("bill_{}.pdf", identifier),
            caption: format!("Bill for {} (page {})", identifier, page),
            bytes,
        }
    }
}

/// What goes back to the chat for one inbound message
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Document(PageAttachment),
}

impl Reply {
    pub fn usage() -> Self {
        Reply::Text(USAGE.to_string())
    }
}
