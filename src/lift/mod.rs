pub mod lift;

pub use lift::spawn_lift;
pub use lift::Lift;
pub use lift::LiftHandle;
