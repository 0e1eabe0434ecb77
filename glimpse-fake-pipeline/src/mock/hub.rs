//! Mocked real-time hub.

use std::fmt;

/// Topics a client may subscribe to on the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubTopic {
    /// Live message summaries.
    SummaryMessage,
}

impl HubTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            HubTopic::SummaryMessage => "summaryMessage",
        }
    }

    pub fn parse(name: &str) -> Option<HubTopic> {
        match name {
            "summaryMessage" => Some(HubTopic::SummaryMessage),
            _ => None,
        }
    }
}

impl fmt::Display for HubTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(HubTopic::parse("summaryMessage"), Some(HubTopic::SummaryMessage));
        assert_eq!(HubTopic::parse("SummaryMessage"), None);
        assert_eq!(HubTopic::SummaryMessage.to_string(), "summaryMessage");
    }
}
