/***************************************/
/*        3rd party libraries          */
/***************************************/
use thiserror::Error;

/***************************************/
/*             Error types             */
/***************************************/
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SummonError {
    #[error("invalid floor number {floor}, must be between 0 and {max_floor}")]
    InvalidFloor { floor: i32, max_floor: i32 },

    #[error("no lifts available to dispatch to")]
    NoLifts,
}
