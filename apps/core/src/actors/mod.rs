//! Actor layer around the chat pipeline: the supervisor owns the pending bulk
//! operation between turns and talks to the story store.

pub mod messages;
pub mod supervisor;
pub mod traits;
