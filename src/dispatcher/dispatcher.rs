/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{info, warn};
use std::sync::Arc;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::lift::{Lift, LiftHandle};
use crate::shared::{LiftStatus, SummonError};

/***************************************/
/*             Public API              */
/***************************************/

/**
 * Routes floor calls to the cheapest lift in a fixed pool.
 *
 * The dispatcher never touches lift state directly. It reads each lift's cost estimate
 * and appends the call to the winner's summon queue. Estimates are taken from lifts that
 * keep moving while they are compared, so the winner is the cheapest lift as seen a moment
 * ago rather than at a single consistent instant.
 */
pub struct Dispatcher<L: LiftHandle> {
    lifts: Vec<Arc<L>>,
    max_floor: i32,
}

impl<L: LiftHandle> Dispatcher<L> {
    pub fn new(lifts: Vec<Arc<L>>, max_floor: i32) -> Dispatcher<L> {
        Dispatcher { lifts, max_floor }
    }

    /// Send `floor` to the lift with the lowest estimated cost and return its pool index.
    /// Ties go to the lift that comes first in the pool.
    pub fn summon(&self, floor: i32) -> Result<usize, SummonError> {
        if floor < 0 || floor > self.max_floor {
            let error = SummonError::InvalidFloor {
                floor,
                max_floor: self.max_floor,
            };
            warn!("{}", error);
            return Err(error);
        }

        let mut best: Option<(usize, i32)> = None;
        for (index, lift) in self.lifts.iter().enumerate() {
            let cost = lift.estimate_cost(floor);
            match best {
                Some((_, best_cost)) if cost >= best_cost => {}
                _ => best = Some((index, cost)),
            }
        }

        let (index, cost) = best.ok_or(SummonError::NoLifts)?;
        info!("Floor {} assigned to lift {} (cost {})", floor, index, cost);
        self.lifts[index].enqueue(floor);
        Ok(index)
    }

    pub fn lifts(&self) -> &[Arc<L>] {
        &self.lifts
    }

    pub fn max_floor(&self) -> i32 {
        self.max_floor
    }
}

impl Dispatcher<Lift> {
    pub fn statuses(&self) -> Vec<LiftStatus> {
        self.lifts.iter().map(|lift| lift.status()).collect()
    }
}
