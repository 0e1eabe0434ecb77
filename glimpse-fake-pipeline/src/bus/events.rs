//! Topics and events carried by the bus.

use std::fmt;

use glimpse_fake_shared::{Message, RequestsView};

/// The closed set of topics the fake service publishes or consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// The shell finished loading and is ready for request data.
    ShellRequestReady,
    /// Request summaries read from the local store.
    RequestSummaryFoundLocal,
    /// Message summaries fetched from the remote history.
    MessageSummaryFoundRemote,
    /// Message summaries pushed by the live stream.
    MessageSummaryFoundStream,
    /// Full message list of a single request, fetched from remote.
    MessageDetailFoundRemote,
    /// Local request summaries relayed to the user repository.
    UserDetailFoundInternal,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Topic::ShellRequestReady,
        Topic::RequestSummaryFoundLocal,
        Topic::MessageSummaryFoundRemote,
        Topic::MessageSummaryFoundStream,
        Topic::MessageDetailFoundRemote,
        Topic::UserDetailFoundInternal,
    ];

    /// Dotted topic name as seen by the client application.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::ShellRequestReady => "shell.request.ready",
            Topic::RequestSummaryFoundLocal => "data.request.summary.found.local",
            Topic::MessageSummaryFoundRemote => "data.message.summary.found.remote",
            Topic::MessageSummaryFoundStream => "data.message.summary.found.stream",
            Topic::MessageDetailFoundRemote => "data.message.detail.found.remote",
            Topic::UserDetailFoundInternal => "data.user.detail.found.internal",
        }
    }

    /// Look up a topic by its dotted name.
    pub fn parse(name: &str) -> Option<Topic> {
        Topic::ALL.into_iter().find(|topic| topic.as_str() == name)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event on the bus, tagged by topic and carrying that topic's payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ShellRequestReady,
    RequestSummaryFoundLocal(RequestsView),
    MessageSummaryFoundRemote(Vec<Message>),
    MessageSummaryFoundStream(Vec<Message>),
    MessageDetailFoundRemote(Vec<Message>),
    UserDetailFoundInternal(RequestsView),
}

impl Event {
    /// Get the topic for this event.
    pub fn topic(&self) -> Topic {
        match self {
            Event::ShellRequestReady => Topic::ShellRequestReady,
            Event::RequestSummaryFoundLocal(_) => Topic::RequestSummaryFoundLocal,
            Event::MessageSummaryFoundRemote(_) => Topic::MessageSummaryFoundRemote,
            Event::MessageSummaryFoundStream(_) => Topic::MessageSummaryFoundStream,
            Event::MessageDetailFoundRemote(_) => Topic::MessageDetailFoundRemote,
            Event::UserDetailFoundInternal(_) => Topic::UserDetailFoundInternal,
        }
    }

    /// Number of requests or messages carried by the event.
    pub fn item_count(&self) -> usize {
        match self {
            Event::ShellRequestReady => 0,
            Event::RequestSummaryFoundLocal(view) | Event::UserDetailFoundInternal(view) => {
                view.new_requests.len()
            }
            Event::MessageSummaryFoundRemote(messages)
            | Event::MessageSummaryFoundStream(messages)
            | Event::MessageDetailFoundRemote(messages) => messages.len(),
        }
    }
}

/// Filter for subscribing to specific topics.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to accept. Empty accepts everything.
    topics: Vec<Topic>,
}

impl EventFilter {
    /// Accept every event.
    pub fn all() -> Self {
        Self::default()
    }

    /// Accept only the given topics.
    pub fn topics(topics: Vec<Topic>) -> Self {
        Self { topics }
    }

    /// Accept a single topic.
    pub fn topic(topic: Topic) -> Self {
        Self::topics(vec![topic])
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.topics.is_empty() || self.topics.contains(&event.topic())
    }
}
