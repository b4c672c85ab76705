// Process module - Child launch, outcome classification and the supervision loop

pub mod outcome;
pub mod retry;
pub mod spawner;
pub mod supervisor;

pub use outcome::ChildOutcome;
pub use retry::{RepeatLimit, RetryBudget};
pub use spawner::spawn_child;
pub use supervisor::Supervisor;
