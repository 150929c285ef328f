pub mod error;
pub mod macros;
pub mod rng;
pub mod structs;

pub use error::SummonError;
pub use rng::SharedRng;
pub use rng::TieBreaker;
pub use structs::LiftStatus;
pub use structs::MotionState;
