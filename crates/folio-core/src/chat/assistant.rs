//! Scripted chat assistant state machine
//!
//! The assistant never sleeps or does I/O itself. [`Assistant::submit`]
//! tells the caller what to schedule (a thinking delay or a relay POST)
//! and the caller reports back through [`Assistant::deliver_reply`] and
//! [`Assistant::finish_relay`].

use std::collections::HashMap;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::chat::rules::ResponseBook;
use crate::error::RelayError;
use crate::state::{ChatMessage, Sender};

pub const SEND_PREFIX: &str = "!send";

/// Wait before focusing the input after opening, so on-screen layout can settle.
pub const FOCUS_SETTLE_DELAY: Duration = Duration::from_millis(300);

const THINKING_MIN_MS: u64 = 1000;
const THINKING_MAX_MS: u64 = 2000;

pub const SEND_ACK: &str = "Attempting to send your message...";
pub const SEND_SUCCESS: &str = "🚀 Your message has been sent successfully! You'll hear back soon.";
pub const SEND_FAILURE: &str =
    "❌ Sorry, I couldn't send the message right now. Please try again later or use the contact form.";
pub const SEND_NEEDS_CONTENT: &str = "Please provide a message after !send. Example: !send hello there!";

/// How a trimmed input line is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Chat(&'a str),
    Send(&'a str),
    SendWithoutContent,
}

pub fn parse_command(text: &str) -> Command<'_> {
    let text = text.trim();
    match text.strip_prefix(SEND_PREFIX) {
        Some(rest) if rest.trim().is_empty() => Command::SendWithoutContent,
        Some(rest) => Command::Send(rest.trim()),
        None => Command::Chat(text),
    }
}

/// What the caller has to do after a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Blank input, nothing recorded.
    Ignored,
    /// `!send` while a relay is still outstanding; the input was not accepted.
    Busy,
    /// `!send` with nothing after it; a corrective reply was appended.
    NeedsContent,
    /// Wait `delay`, then call [`Assistant::deliver_reply`] with `ticket`.
    Think { ticket: u64, delay: Duration },
    /// POST `content` to the chat relay, then call [`Assistant::finish_relay`].
    Relay { content: String },
}

pub struct Assistant {
    book: ResponseBook,
    rng: StdRng,
    open: bool,
    transcript: Vec<ChatMessage>,
    // replies and relays still outstanding; the indicator shows while > 0
    typing: usize,
    unread: bool,
    input_focused: bool,
    focus_pending: bool,
    relay_in_flight: bool,
    pending_replies: HashMap<u64, String>,
    next_ticket: u64,
    scroll_generation: u64,
}

impl Assistant {
    pub fn new(book: ResponseBook) -> Self {
        Self::with_rng(book, StdRng::from_entropy())
    }

    pub fn with_rng(book: ResponseBook, rng: StdRng) -> Self {
        Self {
            book,
            rng,
            open: false,
            transcript: Vec::new(),
            typing: 0,
            unread: true,
            input_focused: false,
            focus_pending: false,
            relay_in_flight: false,
            pending_replies: HashMap::new(),
            next_ticket: 0,
            scroll_generation: 0,
        }
    }

    pub fn book(&self) -> &ResponseBook {
        &self.book
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn is_typing(&self) -> bool {
        self.typing > 0
    }

    /// The "new message" badge on the trigger.
    pub fn has_unread(&self) -> bool {
        self.unread
    }

    pub fn is_input_focused(&self) -> bool {
        self.input_focused
    }

    pub fn is_focus_pending(&self) -> bool {
        self.focus_pending
    }

    pub fn relay_in_flight(&self) -> bool {
        self.relay_in_flight
    }

    /// Bumped whenever the transcript view should jump to its end.
    pub fn scroll_generation(&self) -> u64 {
        self.scroll_generation
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Open the window and clear the badge. Focus follows after
    /// [`FOCUS_SETTLE_DELAY`] via [`Assistant::settle_focus`].
    pub fn open(&mut self) {
        debug!("assistant opened");
        self.open = true;
        self.unread = false;
        self.focus_pending = true;
    }

    pub fn close(&mut self) {
        debug!("assistant closed");
        self.open = false;
        self.focus_pending = false;
        self.input_focused = false;
    }

    /// Escape key. Returns whether it closed the window.
    pub fn handle_escape(&mut self) -> bool {
        if !self.open {
            return false;
        }
        self.close();
        true
    }

    pub fn settle_focus(&mut self) {
        if self.open && self.focus_pending {
            self.input_focused = true;
        }
        self.focus_pending = false;
    }

    pub fn submit(&mut self, input: &str) -> Submission {
        let text = input.trim();
        if text.is_empty() {
            return Submission::Ignored;
        }
        let command = parse_command(text);
        if self.relay_in_flight && matches!(command, Command::Send(_)) {
            debug!("send refused while a relay is outstanding");
            return Submission::Busy;
        }

        self.push(ChatMessage::user(text));

        match command {
            Command::SendWithoutContent => {
                self.push(ChatMessage::bot(SEND_NEEDS_CONTENT));
                Submission::NeedsContent
            }
            Command::Send(content) => {
                self.push(ChatMessage::bot(SEND_ACK));
                self.raise_typing();
                self.relay_in_flight = true;
                Submission::Relay {
                    content: content.to_string(),
                }
            }
            Command::Chat(text) => {
                let ticket = self.next_ticket;
                self.next_ticket += 1;
                self.pending_replies.insert(ticket, text.to_string());
                self.raise_typing();
                let delay = thinking_delay(&mut self.rng);
                debug!(ticket, ?delay, "reply scheduled");
                Submission::Think { ticket, delay }
            }
        }
    }

    /// Classify the input behind `ticket` and append the reply. Unknown
    /// tickets are ignored.
    pub fn deliver_reply(&mut self, ticket: u64) -> Option<&ChatMessage> {
        let input = self.pending_replies.remove(&ticket)?;
        let reply = self.book.classify(&input, &mut self.rng);
        debug!(ticket, topic = ?reply.topic, "reply delivered");
        self.lower_typing();
        self.push(ChatMessage::bot(reply.text));
        self.transcript.last()
    }

    pub fn finish_relay(&mut self, outcome: Result<(), RelayError>) {
        self.relay_in_flight = false;
        self.lower_typing();
        match outcome {
            Ok(()) => self.push(ChatMessage::bot(SEND_SUCCESS)),
            Err(e) => {
                debug!(error = %e, "chat relay failed");
                self.push(ChatMessage::bot(SEND_FAILURE));
            }
        }
    }

    fn push(&mut self, message: ChatMessage) {
        // a bot line landing in a closed window lights the badge again
        if message.sender == Sender::Bot && !self.open {
            self.unread = true;
        }
        self.transcript.push(message);
        self.scroll_generation += 1;
    }

    fn raise_typing(&mut self) {
        self.typing += 1;
        self.scroll_generation += 1;
    }

    fn lower_typing(&mut self) {
        self.typing = self.typing.saturating_sub(1);
    }
}

/// Simulated thinking time, uniform in [1000ms, 2000ms).
pub fn thinking_delay<R: Rng + ?Sized>(rng: &mut R) -> Duration {
    Duration::from_millis(rng.gen_range(THINKING_MIN_MS..THINKING_MAX_MS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::rules::Topic;
    use reqwest::StatusCode;

    fn assistant() -> Assistant {
        Assistant::with_rng(ResponseBook::default(), StdRng::seed_from_u64(11))
    }

    fn texts(a: &Assistant) -> Vec<(Sender, String)> {
        a.transcript().iter().map(|m| (m.sender, m.text.clone())).collect()
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("hello"), Command::Chat("hello"));
        assert_eq!(parse_command("  !send hi there "), Command::Send("hi there"));
        assert_eq!(parse_command("!send    "), Command::SendWithoutContent);
        assert_eq!(parse_command("!send"), Command::SendWithoutContent);
        assert_eq!(parse_command("!sendnow"), Command::Send("now"));
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut a = assistant();
        assert_eq!(a.submit(""), Submission::Ignored);
        assert_eq!(a.submit("   \t "), Submission::Ignored);
        assert!(a.transcript().is_empty());
        assert!(!a.is_typing());
    }

    #[test]
    fn test_chat_input_yields_one_reply() {
        let mut a = assistant();
        let Submission::Think { ticket, delay } = a.submit("tell me about your skills") else {
            panic!("expected a thinking delay");
        };
        assert!(delay >= Duration::from_millis(1000) && delay < Duration::from_millis(2000));
        assert!(a.is_typing());
        assert_eq!(a.transcript().len(), 1);

        let expected = a.book().classify("tell me about your skills", &mut StdRng::seed_from_u64(0));
        assert_eq!(expected.topic, Some(Topic::Skills));

        let reply = a.deliver_reply(ticket).unwrap().text.clone();
        assert_eq!(reply, expected.text);
        assert!(!a.is_typing());
        assert_eq!(a.transcript().len(), 2);

        // a ticket is redeemed once
        assert!(a.deliver_reply(ticket).is_none());
        assert_eq!(a.transcript().len(), 2);
    }

    #[test]
    fn test_overlapping_replies_keep_indicator_up() {
        let mut a = assistant();
        let Submission::Think { ticket: first, .. } = a.submit("hi") else { panic!() };
        let Submission::Think { ticket: second, .. } = a.submit("projects?") else { panic!() };
        a.deliver_reply(first);
        assert!(a.is_typing());
        a.deliver_reply(second);
        assert!(!a.is_typing());
    }

    #[test]
    fn test_send_without_content_is_corrected() {
        let mut a = assistant();
        assert_eq!(a.submit("!send   "), Submission::NeedsContent);
        assert_eq!(
            texts(&a),
            vec![
                (Sender::User, "!send".to_string()),
                (Sender::Bot, SEND_NEEDS_CONTENT.to_string()),
            ]
        );
        assert!(!a.relay_in_flight());
        assert!(!a.is_typing());
    }

    #[test]
    fn test_send_success_sequence() {
        let mut a = assistant();
        let submission = a.submit("!send hello there");
        assert_eq!(submission, Submission::Relay { content: "hello there".to_string() });
        assert!(a.is_typing());
        assert!(a.relay_in_flight());

        a.finish_relay(Ok(()));
        assert!(!a.is_typing());
        assert!(!a.relay_in_flight());
        let log = texts(&a);
        assert_eq!(log.len(), 3);
        assert_eq!(log[1], (Sender::Bot, SEND_ACK.to_string()));
        assert_eq!(log[2], (Sender::Bot, SEND_SUCCESS.to_string()));
    }

    #[test]
    fn test_send_failure_message() {
        let mut a = assistant();
        a.submit("!send ping");
        a.finish_relay(Err(RelayError::Rejected(StatusCode::INTERNAL_SERVER_ERROR)));
        let last = a.transcript().last().unwrap();
        assert_eq!(last.text, SEND_FAILURE);
        assert!(!a.transcript().iter().any(|m| m.text == SEND_SUCCESS));
    }

    #[test]
    fn test_second_send_refused_while_relay_outstanding() {
        let mut a = assistant();
        a.submit("!send first");
        assert_eq!(a.submit("!send second"), Submission::Busy);
        assert_eq!(a.transcript().len(), 2);

        a.finish_relay(Ok(()));
        assert!(matches!(a.submit("!send second"), Submission::Relay { .. }));
    }

    #[test]
    fn test_questions_answered_during_relay() {
        let mut a = assistant();
        a.submit("!send first");
        let Submission::Think { ticket, .. } = a.submit("what projects have you built?") else {
            panic!("expected a thinking delay");
        };
        let reply = a.deliver_reply(ticket).unwrap();
        assert_eq!(reply.sender, Sender::Bot);
        assert!(a.relay_in_flight());
        // the relay still holds the typing indicator up
        assert!(a.is_typing());

        a.finish_relay(Ok(()));
        assert!(!a.is_typing());
        assert_eq!(a.transcript().last().unwrap().text, SEND_SUCCESS);
    }

    #[test]
    fn test_open_clears_badge_and_settles_focus() {
        let mut a = assistant();
        assert!(!a.is_open());
        assert!(a.has_unread());

        a.toggle();
        assert!(a.is_open());
        assert!(!a.has_unread());
        assert!(a.is_focus_pending());
        assert!(!a.is_input_focused());

        a.settle_focus();
        assert!(a.is_input_focused());
    }

    #[test]
    fn test_escape() {
        let mut a = assistant();
        assert!(!a.handle_escape());
        assert!(!a.is_open());

        a.open();
        assert!(a.handle_escape());
        assert!(!a.is_open());
        assert!(!a.is_input_focused());
    }

    #[test]
    fn test_focus_dropped_when_closed_before_settling() {
        let mut a = assistant();
        a.open();
        a.close();
        a.settle_focus();
        assert!(!a.is_input_focused());
    }

    #[test]
    fn test_reply_after_close_lights_badge() {
        let mut a = assistant();
        a.open();
        let Submission::Think { ticket, .. } = a.submit("who are you") else { panic!() };
        a.close();
        a.deliver_reply(ticket);
        assert_eq!(a.transcript().len(), 2);
        assert!(a.has_unread());
    }

    #[test]
    fn test_every_append_requests_scroll() {
        let mut a = assistant();
        let before = a.scroll_generation();
        let Submission::Think { ticket, .. } = a.submit("hey") else { panic!() };
        let after_submit = a.scroll_generation();
        assert!(after_submit >= before + 2);
        a.deliver_reply(ticket);
        assert!(a.scroll_generation() > after_submit);
    }

    #[test]
    fn test_thinking_delay_range() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1_000 {
            let d = thinking_delay(&mut rng);
            assert!(d >= Duration::from_millis(1000));
            assert!(d < Duration::from_millis(2000));
        }
    }
}
