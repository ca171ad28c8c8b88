//! Collaborator seams between the simulation and the outside world.

mod providers;

pub use providers::{
    AudioSink, InputProvider, MemoryAudio, NullAudio, NullInput, NullRenderer, Renderer,
    ScriptedInput,
};
