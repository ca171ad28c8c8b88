use game_core::GameError;

/// Errors surfaced while bootstrapping or driving a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to enter the starting room")]
    Spawn(#[from] GameError),
}
