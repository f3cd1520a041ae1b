pub mod chat;
pub mod config;
pub mod contact;
pub mod error;
pub mod marquee;
pub mod page;
pub mod relay;
pub mod state;
pub mod typewriter;

// Re-export main types for convenience
pub use chat::{Assistant, ResponseBook, Submission};
pub use config::Config;
pub use contact::{ContactField, ContactFlow, ContactForm, ContactStatus};
pub use error::{ContactError, RelayError};
pub use marquee::{Direction, LogoEntry, MarqueeEngine, MarqueeOptions};
pub use page::{ContainerRegistry, LOGO_CONTAINER};
pub use relay::FormRelayClient;
pub use state::{ChatMessage, Sender};
pub use typewriter::Typewriter;
