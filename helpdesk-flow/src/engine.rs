//! Conversation engine: routes one inbound message through the per-user
//! state machine and returns the replies to send.
//!
//! Every `(state, text)` pair maps to exactly one [`Transition`]; invalid
//! answers re-prompt without changing state. Commands are handled before
//! the state machine and work in every state.

use std::sync::Arc;

use knowledge_base::{Matcher, Outcome};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    command::Command,
    errors::Result,
    replies,
    session::{Session, SessionFields, SessionStore},
    state::ConversationState,
    ticket::{Ticket, TicketSink},
    validation::{ConnectionKind, YesNo, is_valid_email, parse_connection_kind, parse_yes_no},
};

/// Outcome of one inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    /// Texts to send, in order. Empty when the message is ignored.
    pub replies: Vec<String>,
    /// State after the message; `None` when no conversation is active.
    pub state: Option<ConversationState>,
}

/// Replies plus the next state for a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub replies: Vec<String>,
    pub next: Option<ConversationState>,
}

impl Transition {
    fn to(next: ConversationState, reply: impl Into<String>) -> Self {
        Self {
            replies: vec![reply.into()],
            next: Some(next),
        }
    }

    fn end(replies: Vec<String>) -> Self {
        Self {
            replies,
            next: None,
        }
    }
}

pub struct ConversationEngine {
    matcher: Arc<Matcher>,
    sessions: Arc<SessionStore>,
    tickets: Arc<dyn TicketSink>,
}

impl ConversationEngine {
    pub fn new(
        matcher: Arc<Matcher>,
        sessions: Arc<SessionStore>,
        tickets: Arc<dyn TicketSink>,
    ) -> Self {
        Self {
            matcher,
            sessions,
            tickets,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Processes one message from `user_id`.
    ///
    /// Only `/start` and `/reset` create a session; anything else from an
    /// unknown user is answered without storing state. A session is dropped
    /// as soon as its conversation ends.
    ///
    /// # Errors
    /// `FlowError::TicketStore` when the final ticket cannot be persisted;
    /// the session then stays in `TicketPriority` so the user can resend.
    #[instrument(skip_all, fields(user_id = %user_id, text_len = text.len()))]
    pub async fn handle(&self, user_id: &str, text: &str) -> Result<Reply> {
        let command = Command::parse(text);
        let opens = matches!(command, Some(Command::Start | Command::Reset));

        loop {
            let handle = if opens {
                Some(self.sessions.get_or_create(user_id).await)
            } else {
                self.sessions.get(user_id).await
            };

            let Some(handle) = handle else {
                let mut idle = Session::default();
                let replies = self.respond(&mut idle, command.as_ref(), text).await?;
                return Ok(Reply {
                    replies,
                    state: None,
                });
            };

            let mut session = handle.lock().await;
            if session.is_retired() {
                continue;
            }

            let replies = self.respond(&mut session, command.as_ref(), text).await?;
            if !session.is_active() {
                self.sessions.retire(user_id, &handle, &mut session).await;
            }
            return Ok(Reply {
                replies,
                state: session.state,
            });
        }
    }

    async fn respond(
        &self,
        session: &mut Session,
        command: Option<&Command>,
        text: &str,
    ) -> Result<Vec<String>> {
        match command {
            Some(cmd) => Ok(on_command(session, cmd)),
            None => match session.state {
                Some(state) => {
                    let transition = self.step(state, text, &mut session.fields).await?;
                    Ok(apply(session, transition))
                }
                None => {
                    debug!("no active conversation; message ignored");
                    Ok(Vec::new())
                }
            },
        }
    }

    /// Drops the session for `user_id` without replying.
    pub async fn forget(&self, user_id: &str) -> bool {
        self.sessions.remove(user_id).await
    }

    /// Single state-machine step. Writes collected values into `fields`.
    pub async fn step(
        &self,
        state: ConversationState,
        text: &str,
        fields: &mut SessionFields,
    ) -> Result<Transition> {
        use ConversationState as S;

        let t = match state {
            S::AwaitingProblem => self.on_problem(text, fields).await,

            S::AskingConnectionType => match parse_connection_kind(text) {
                Some(ConnectionKind::Cable) => {
                    Transition::to(S::AskingConnectionChecked, replies::CABLE_CHECK)
                }
                Some(ConnectionKind::Wifi) => {
                    Transition::to(S::AskingConnectionChecked, replies::WIFI_CHECK)
                }
                None => Transition::to(state, replies::CONNECTION_TYPE_REPROMPT),
            },

            S::AskingConnectionChecked => match parse_yes_no(text) {
                Some(YesNo::Yes) => Transition::to(S::Confirming, replies::CHECKED_YES),
                Some(YesNo::No) => Transition::to(S::Confirming, replies::CHECKED_NO),
                None => Transition::to(state, replies::YES_NO_REPROMPT),
            },

            S::Confirming => match parse_yes_no(text) {
                Some(YesNo::Yes) => {
                    Transition::to(S::AskAnotherProblem, replies::ASK_ANOTHER_PROBLEM)
                }
                Some(YesNo::No) => Transition::to(S::ConfirmingTicket, replies::OFFER_TICKET),
                None => Transition::to(state, replies::YES_NO_REPROMPT),
            },

            S::AskAnotherProblem => match parse_yes_no(text) {
                Some(YesNo::Yes) => Transition::to(S::AwaitingProblem, replies::NEXT_PROBLEM),
                Some(YesNo::No) => Transition::end(vec![replies::GOODBYE.to_string()]),
                None => Transition::to(state, replies::YES_NO_REPROMPT),
            },

            S::ConfirmingTicket => match parse_yes_no(text) {
                Some(YesNo::Yes) => Transition::to(S::TicketName, replies::ASK_NAME),
                Some(YesNo::No) => {
                    Transition::to(S::AwaitingProblem, replies::TICKET_DECLINED)
                }
                None => Transition::to(state, replies::YES_NO_REPROMPT),
            },

            S::TicketName => {
                let name = text.trim();
                if name.is_empty() {
                    Transition::to(state, replies::ASK_NAME)
                } else {
                    fields.name = Some(name.to_string());
                    Transition::to(S::TicketEmail, replies::ASK_EMAIL)
                }
            }

            S::TicketEmail => {
                if is_valid_email(text) {
                    fields.email = Some(text.trim().to_string());
                    Transition::to(S::TicketDescription, replies::ASK_DESCRIPTION)
                } else {
                    Transition::to(state, replies::INVALID_EMAIL)
                }
            }

            S::TicketDescription => {
                fields.description = Some(text.trim().to_string());
                Transition::to(S::TicketPriority, replies::ASK_PRIORITY)
            }

            S::TicketPriority => {
                let ticket = Ticket {
                    name: fields.name.clone().unwrap_or_default(),
                    email: fields.email.clone().unwrap_or_default(),
                    description: fields.description.clone().unwrap_or_default(),
                    priority: text.trim().to_lowercase(),
                };
                self.persist(&ticket).await?;
                Transition::end(vec![
                    replies::ticket_summary(&ticket),
                    replies::SESSION_CLOSED.to_string(),
                ])
            }
        };

        debug!(from = %state, to = ?t.next, "transition");
        Ok(t)
    }

    async fn on_problem(&self, text: &str, fields: &mut SessionFields) -> Transition {
        use ConversationState as S;

        let outcome = match self.matcher.classify(text.trim()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "matcher failed; offering a ticket");
                Outcome::NoMatch
            }
        };

        match outcome {
            Outcome::GuidedFlow { .. } => {
                Transition::to(S::AskingConnectionType, replies::ASK_CONNECTION_TYPE)
            }
            Outcome::DirectAnswer { text, .. } | Outcome::DocumentAnswer { text, .. } => {
                let reply = replies::answer_with_followup(&text);
                fields.last_answer = Some(text);
                Transition::to(S::Confirming, reply)
            }
            Outcome::NoMatch => Transition::to(S::ConfirmingTicket, replies::NO_MATCH),
        }
    }

    async fn persist(&self, ticket: &Ticket) -> Result<()> {
        let sink = Arc::clone(&self.tickets);
        let owned = ticket.clone();
        tokio::task::spawn_blocking(move || sink.append(&owned)).await??;
        Ok(())
    }
}

fn on_command(session: &mut Session, cmd: &Command) -> Vec<String> {
    debug!(command = cmd.as_str(), state = ?session.state, "command");
    match cmd {
        Command::Start => {
            session.restart();
            info!("conversation started");
            vec![replies::START.to_string()]
        }
        Command::Reset => {
            session.restart();
            info!("conversation reset");
            vec![replies::RESET.to_string()]
        }
        Command::Cancel => {
            session.end();
            info!("conversation cancelled");
            vec![replies::CANCEL.to_string()]
        }
        Command::Help => vec![replies::HELP.to_string()],
        Command::Unknown(_) => vec![replies::UNKNOWN_COMMAND.to_string()],
    }
}

fn apply(session: &mut Session, transition: Transition) -> Vec<String> {
    match transition.next {
        Some(next) => session.state = Some(next),
        None => {
            session.end();
            info!("conversation finished");
        }
    }
    transition.replies
}
