/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;

/***************************************/
/*       Public data structures        */
/***************************************/
pub const MOTION_IDLE: u8 = 0;
pub const MOTION_UP: u8 = 1;
pub const MOTION_DOWN: u8 = 2;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "goingUp")]
    GoingUp,
    #[serde(rename = "goingDown")]
    GoingDown,
}

impl MotionState {
    pub fn to_u8(&self) -> u8 {
        match *self {
            MotionState::Idle => MOTION_IDLE,
            MotionState::GoingUp => MOTION_UP,
            MotionState::GoingDown => MOTION_DOWN,
        }
    }
}

impl From<u8> for MotionState {
    fn from(item: u8) -> Self {
        match item {
            MOTION_UP => MotionState::GoingUp,
            MOTION_DOWN => MotionState::GoingDown,
            _ => MotionState::Idle,
        }
    }
}

/**
 * Point-in-time view of one lift.
 *
 * Fields are read one at a time from the running lift, so a snapshot taken while the
 * lift is moving may mix values from two consecutive ticks.
 */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LiftStatus {
    pub floor: i32,
    pub motion: MotionState,
    #[serde(rename = "destMax")]
    pub dest_max: Option<i32>,
    #[serde(rename = "destMin")]
    pub dest_min: Option<i32>,
    #[serde(rename = "pendingCalls")]
    pub pending_calls: Vec<i32>,
}

/***************************************/
/*             Unit tests              */
/***************************************/
