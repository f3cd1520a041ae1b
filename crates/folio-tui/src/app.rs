use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use folio_core::chat::assistant::FOCUS_SETTLE_DELAY;
use folio_core::marquee::default_logos;
use folio_core::typewriter::START_DELAY;
use folio_core::{
    Assistant, Config, ContactFlow, ContainerRegistry, FormRelayClient, LogoEntry, MarqueeEngine,
    RelayError, Submission, Typewriter, LOGO_CONTAINER,
};
use ratatui::layout::Rect;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::ui::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Contact,
}

type RelayTask = JoinHandle<Result<(), RelayError>>;

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub status: Option<String>,
    pub profile_name: String,

    // Marquee
    pub marquee: Option<MarqueeEngine>,
    started: Instant,

    // Headline
    pub typewriter: Typewriter,
    typewriter_due: Instant,

    // Assistant
    pub assistant: Assistant,
    pub chat_input: String,
    pub chat_cursor: usize, // cursor position in chat_input, in chars
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of transcript area for scroll calculations
    pub chat_width: u16,  // Width of transcript area for wrap calculations
    pub seen_scroll_generation: u64,
    focus_due: Option<Instant>,
    reply_tasks: Vec<JoinHandle<u64>>,
    relay_task: Option<RelayTask>,

    // Contact form
    pub contact: ContactFlow,
    contact_task: Option<RelayTask>,

    // Animation state
    pub animation_frame: u8, // 0-2 for the typing dots
    frames_since_dot: u8,
    last_frame: Option<Instant>,

    // Panel areas for mouse hit-testing (updated during render)
    pub marquee_area: Option<Rect>,
    pub chat_area: Option<Rect>,

    // Built on first render
    pub theme: Option<Theme>,

    relay: FormRelayClient,
}

impl App {
    pub fn new(config: Config, mount_marquee: bool) -> Self {
        let mut containers = ContainerRegistry::new();
        if mount_marquee {
            containers.register(LOGO_CONTAINER);
        }

        let mut marquee_options = config.marquee.clone();
        if marquee_options.logos.is_empty() {
            marquee_options.logos = default_logos();
        }
        let marquee = MarqueeEngine::create(&containers, LOGO_CONTAINER, marquee_options);

        let now = Instant::now();
        info!(
            owner = %config.profile.name,
            marquee = marquee.is_some(),
            "folio starting"
        );

        Self {
            should_quit: false,
            screen: Screen::Home,
            status: None,
            profile_name: config.profile.name.clone(),

            marquee,
            started: now,

            typewriter: Typewriter::new(config.profile.roles.clone()),
            typewriter_due: now + START_DELAY,

            assistant: Assistant::new(config.response_book()),
            chat_input: String::new(),
            chat_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            seen_scroll_generation: 0,
            focus_due: None,
            reply_tasks: Vec::new(),
            relay_task: None,

            contact: ContactFlow::new(),
            contact_task: None,

            animation_frame: 0,
            frames_since_dot: 0,
            last_frame: None,

            marquee_area: None,
            chat_area: None,
            theme: None,

            relay: config.relay_client(),
        }
    }

    /// One display frame: advance every time-driven piece of state.
    pub fn on_frame(&mut self, now: Instant) {
        let elapsed = self
            .last_frame
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_frame = Some(now);

        if let Some(marquee) = &mut self.marquee {
            let timestamp_ms = now.saturating_duration_since(self.started).as_secs_f64() * 1000.0;
            marquee.frame(timestamp_ms);
        }

        if now >= self.typewriter_due {
            let delay = self.typewriter.step();
            self.typewriter_due = now + delay;
        }

        if self.focus_due.is_some_and(|due| now >= due) {
            self.focus_due = None;
            self.assistant.settle_focus();
        }

        self.contact.expire_banner(elapsed);

        // typing dots advance every ~300ms
        self.frames_since_dot += 1;
        if self.frames_since_dot >= 9 {
            self.frames_since_dot = 0;
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Assistant actions
    pub fn toggle_assistant(&mut self) {
        if self.assistant.is_open() {
            self.close_assistant();
        } else {
            self.open_assistant();
        }
    }

    pub fn open_assistant(&mut self) {
        self.assistant.open();
        self.focus_due = Some(Instant::now() + FOCUS_SETTLE_DELAY);
    }

    pub fn close_assistant(&mut self) {
        self.assistant.close();
        self.focus_due = None;
    }

    /// Escape while the assistant is open closes it. Returns whether it did.
    pub fn escape_assistant(&mut self) -> bool {
        let closed = self.assistant.handle_escape();
        if closed {
            self.focus_due = None;
        }
        closed
    }

    pub fn submit_chat(&mut self) {
        match self.assistant.submit(&self.chat_input) {
            Submission::Ignored => {}
            Submission::Busy => {
                self.status = Some("Still sending your last message...".to_string());
            }
            Submission::NeedsContent => self.clear_chat_input(),
            Submission::Think { ticket, delay } => {
                self.clear_chat_input();
                self.reply_tasks.push(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    ticket
                }));
            }
            Submission::Relay { content } => {
                self.clear_chat_input();
                let relay = self.relay.clone();
                self.relay_task = Some(tokio::spawn(async move {
                    relay.send_chat(&content).await
                }));
            }
        }
    }

    fn clear_chat_input(&mut self) {
        self.chat_input.clear();
        self.chat_cursor = 0;
        self.status = None;
    }

    // Contact actions
    pub fn open_contact(&mut self) {
        self.screen = Screen::Contact;
    }

    pub fn submit_contact(&mut self) {
        match self.contact.begin_submit() {
            Ok(form) => {
                self.status = None;
                let relay = self.relay.clone();
                self.contact_task = Some(tokio::spawn(async move {
                    relay.send_contact(&form).await
                }));
            }
            Err(e) => {
                debug!(error = %e, "contact form refused");
                self.status = Some(e.to_string());
            }
        }
    }

    /// Apply the results of finished background work.
    pub async fn poll_tasks(&mut self) {
        let mut i = 0;
        while i < self.reply_tasks.len() {
            if self.reply_tasks[i].is_finished() {
                let task = self.reply_tasks.remove(i);
                match task.await {
                    Ok(ticket) => {
                        self.assistant.deliver_reply(ticket);
                    }
                    Err(e) => warn!(error = %e, "reply timer failed"),
                }
            } else {
                i += 1;
            }
        }

        if let Some(outcome) = take_finished(&mut self.relay_task).await {
            self.assistant.finish_relay(outcome);
        }

        if let Some(outcome) = take_finished(&mut self.contact_task).await {
            self.contact.finish(outcome);
        }
    }

    // Marquee hover and links
    pub fn hover_marquee(&mut self, column: u16, row: u16) {
        let inside = self
            .marquee_area
            .is_some_and(|area| point_in_rect(column, row, area));
        if let Some(marquee) = &mut self.marquee {
            if marquee.is_hovered() != inside {
                marquee.set_hovered(inside);
            }
        }
    }

    pub fn logo_at_point(&self, column: u16, row: u16) -> Option<&LogoEntry> {
        let area = self.marquee_area?;
        if !point_in_rect(column, row, area) {
            return None;
        }
        // one cell of border on each side
        let offset = column.saturating_sub(area.x + 1) as usize;
        self.marquee.as_ref()?.logo_at(offset)
    }

    pub fn centre_logo(&self) -> Option<&LogoEntry> {
        let area = self.marquee_area?;
        self.marquee.as_ref()?.logo_at((area.width / 2) as usize)
    }

    pub fn open_logo(&mut self, logo: LogoEntry) {
        if logo.has_link() {
            open_link(&logo.href);
            self.status = Some(format!("Opened {}", logo.href));
        } else {
            self.status = Some(format!("{} has no link", logo.title));
        }
    }

    /// Scroll the transcript so its last line (and the typing indicator) is
    /// visible. `total_lines` is the wrapped height the renderer measured.
    pub fn scroll_chat_to_bottom(&mut self, total_lines: usize) {
        let visible_height = if self.chat_height > 0 {
            self.chat_height as usize
        } else {
            10
        };

        let scroll = total_lines.saturating_sub(visible_height);
        self.chat_scroll = u16::try_from(scroll).unwrap_or(u16::MAX);
        self.seen_scroll_generation = self.assistant.scroll_generation();
    }
}

async fn take_finished(slot: &mut Option<RelayTask>) -> Option<Result<(), RelayError>> {
    if !slot.as_ref().is_some_and(|task| task.is_finished()) {
        return None;
    }
    let task = slot.take()?;
    Some(match task.await {
        Ok(outcome) => outcome,
        Err(e) => Err(RelayError::Interrupted(e.to_string())),
    })
}

/// Check if a point is within a rectangle
pub fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn open_link(href: &str) {
    let opener = if cfg!(target_os = "macos") { "open" } else { "xdg-open" };
    let mut command = Command::new(opener);
    command.arg(href);
    if let Err(e) = spawn_reaped(command) {
        warn!(error = %e, href, "could not open link");
    }
}

/// Spawn a helper process with no stdio and wait on it in the background.
fn spawn_reaped(mut command: Command) -> io::Result<JoinHandle<Option<ExitStatus>>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    Ok(tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => Some(status),
            Err(e) => {
                warn!(error = %e, "helper process wait failed");
                None
            }
        }
    }))
}
