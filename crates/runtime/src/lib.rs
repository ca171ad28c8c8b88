//! Session orchestration around the simulation core.
//!
//! The runtime owns the tick loop and the seams to everything the core
//! treats as a black box: input devices, audio playback, and rendering.
//! Collaborators plug in through the traits in [`api`]; the shipped
//! implementations are no-ops plus a scripted input fixture for tests.

pub mod api;
pub mod error;
pub mod events;
pub mod session;

pub use api::{AudioSink, InputProvider, MemoryAudio, NullAudio, NullInput, NullRenderer,
    Renderer, ScriptedInput};
pub use error::SessionError;
pub use events::RuntimeEvent;
pub use session::Session;
