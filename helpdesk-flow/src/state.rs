use std::fmt;

use serde::Serialize;

/// Conversation steps. A session with no state has no active conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// Waiting for a problem description.
    AwaitingProblem,
    /// An answer was given; waiting for "solved? si/no".
    Confirming,
    /// Problem solved; waiting for "another problem? si/no".
    AskAnotherProblem,
    /// Connectivity branch; waiting for "cable" or "wifi".
    AskingConnectionType,
    /// Connectivity branch; waiting for "checked? si/no".
    AskingConnectionChecked,
    /// Waiting for "open a ticket? si/no".
    ConfirmingTicket,
    TicketName,
    TicketEmail,
    TicketDescription,
    TicketPriority,
}

impl ConversationState {
    pub const ALL: [ConversationState; 10] = [
        ConversationState::AwaitingProblem,
        ConversationState::Confirming,
        ConversationState::AskAnotherProblem,
        ConversationState::AskingConnectionType,
        ConversationState::AskingConnectionChecked,
        ConversationState::ConfirmingTicket,
        ConversationState::TicketName,
        ConversationState::TicketEmail,
        ConversationState::TicketDescription,
        ConversationState::TicketPriority,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationState::AwaitingProblem => "awaiting_problem",
            ConversationState::Confirming => "confirming",
            ConversationState::AskAnotherProblem => "ask_another_problem",
            ConversationState::AskingConnectionType => "asking_connection_type",
            ConversationState::AskingConnectionChecked => "asking_connection_checked",
            ConversationState::ConfirmingTicket => "confirming_ticket",
            ConversationState::TicketName => "ticket_name",
            ConversationState::TicketEmail => "ticket_email",
            ConversationState::TicketDescription => "ticket_description",
            ConversationState::TicketPriority => "ticket_priority",
        }
    }

    /// States that collect ticket fields.
    pub fn is_ticket_step(&self) -> bool {
        matches!(
            self,
            ConversationState::TicketName
                | ConversationState::TicketEmail
                | ConversationState::TicketDescription
                | ConversationState::TicketPriority
        )
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_name_matches_as_str() {
        for s in ConversationState::ALL {
            let json = serde_json::to_string(&s).unwrap();
            assert_eq!(json, format!("\"{}\"", s.as_str()));
        }
    }

    #[test]
    fn ticket_steps() {
        let n = ConversationState::ALL
            .iter()
            .filter(|s| s.is_ticket_step())
            .count();
        assert_eq!(n, 4);
    }
}
