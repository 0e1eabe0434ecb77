//! Message view transforms.

use glimpse_fake_shared::{Message, RawRequest};

/// Flatten the summary-worthy messages of a batch, preserving order.
pub fn summary(records: &[RawRequest]) -> Vec<Message> {
    records
        .iter()
        .flat_map(|record| record.messages.iter())
        .filter(|message| message.is_summary())
        .cloned()
        .collect()
}

/// Every message of a single record, unfiltered.
pub fn detail(record: &RawRequest) -> Vec<Message> {
    record.messages.clone()
}
