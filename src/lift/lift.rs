/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info, trace};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, Builder, JoinHandle};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{LiftStatus, MotionState, TieBreaker};

/***************************************/
/*             Constants               */
/***************************************/
pub const DEFAULT_TICK: Duration = Duration::from_millis(1000);

// Stored in a destination atomic when the bound is absent
const NO_FLOOR: i32 = i32::MIN;

/***************************************/
/*             Public API              */
/***************************************/

/**
 * Capabilities the dispatcher and the entry point need from a lift.
 *
 * `Lift` is the only production implementation; tests substitute fakes.
 */
pub trait LiftHandle: Send + Sync {
    /// Number of floor-moves before the lift could newly arrive at `floor`. Never mutates.
    fn estimate_cost(&self, floor: i32) -> i32;

    /// Queue a floor call. Picked up by the lift's own loop on its next iteration.
    fn enqueue(&self, floor: i32);

    /// Blocking work loop. Returns once `cancel_rx` yields a message or all its senders are gone.
    fn run(&self, cancel_rx: cbc::Receiver<()>);

    fn reset(&self);
}

/**
 * One lift car.
 *
 * Position, motion and destination bounds live in separate atomics so `estimate_cost`
 * can read them from any thread without taking a lock. Only the lift's own loop writes
 * them; a reader racing the loop may see values from two different ticks, and the cost
 * model accepts that.
 *
 * # Fields
 * - `current_floor`:   Authoritative position.
 * - `motion`:          `MotionState` wire code.
 * - `dest_max`:        Highest pending floor above the lift, or `NO_FLOOR`.
 * - `dest_min`:        Lowest pending floor below the lift, or `NO_FLOOR`.
 * - `pending_calls`:   Call flag per requested floor, cleared on arrival.
 * - `summon_tx/rx`:    Multi-producer queue of incoming floor calls, drained by the loop.
 * - `tick`:            Dwell time between two iterations of the loop.
 * - `reset_requested`: Set by `reset`. Has no effect on scheduling.
 * - `tie_breaker`:     Picks a direction when work is pending both above and below.
 */
pub struct Lift {
    current_floor: AtomicI32,
    motion: AtomicU8,
    dest_max: AtomicI32,
    dest_min: AtomicI32,
    pending_calls: Mutex<HashMap<i32, bool>>,
    summon_tx: cbc::Sender<i32>,
    summon_rx: cbc::Receiver<i32>,
    tick: Duration,
    reset_requested: AtomicBool,
    tie_breaker: Arc<dyn TieBreaker>,
}

impl Lift {
    pub fn new(n_floors: i32, tie_breaker: Arc<dyn TieBreaker>) -> Lift {
        let (summon_tx, summon_rx) = cbc::unbounded::<i32>();
        let capacity = usize::try_from(n_floors).unwrap_or(0) + 1;

        Lift {
            current_floor: AtomicI32::new(0),
            motion: AtomicU8::new(MotionState::Idle.to_u8()),
            dest_max: AtomicI32::new(NO_FLOOR),
            dest_min: AtomicI32::new(NO_FLOOR),
            pending_calls: Mutex::new(HashMap::with_capacity(capacity)),
            summon_tx,
            summon_rx,
            tick: DEFAULT_TICK,
            reset_requested: AtomicBool::new(false),
            tie_breaker,
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Lift {
        self.tick = tick;
        self
    }

    pub fn current_floor(&self) -> i32 {
        self.current_floor.load(Ordering::Acquire)
    }

    pub fn motion_state(&self) -> MotionState {
        MotionState::from(self.motion.load(Ordering::Acquire))
    }

    pub fn dest_max(&self) -> Option<i32> {
        load_bound(&self.dest_max)
    }

    pub fn dest_min(&self) -> Option<i32> {
        load_bound(&self.dest_min)
    }

    pub fn is_call_active(&self, floor: i32) -> bool {
        self.calls().get(&floor).copied().unwrap_or(false)
    }

    pub fn reset_requested(&self) -> bool {
        self.reset_requested.load(Ordering::Acquire)
    }

    pub fn status(&self) -> LiftStatus {
        let mut pending_calls: Vec<i32> = self
            .calls()
            .iter()
            .filter(|(_, active)| **active)
            .map(|(floor, _)| *floor)
            .collect();
        pending_calls.sort_unstable();

        LiftStatus {
            floor: self.current_floor(),
            motion: self.motion_state(),
            dest_max: self.dest_max(),
            dest_min: self.dest_min(),
            pending_calls,
        }
    }

    /**
     * One iteration of the work loop, without the dwell pause.
     *
     * Drains the summon queue, settles the direction if idle, moves one floor, opens the
     * doors on an active call and drops any destination bound the lift has reached.
     */
    pub fn step(&self) {
        self.drain_summons();
        let motion = self.resolve_motion();

        let floor = match motion {
            MotionState::GoingUp => self.current_floor() + 1,
            MotionState::GoingDown => self.current_floor() - 1,
            MotionState::Idle => self.current_floor(),
        };
        if motion != MotionState::Idle {
            self.current_floor.store(floor, Ordering::Release);
            info!("{} : Moved {} to floor {}", lift_tag(), direction_word(motion), floor);
        }

        // Open doors if summoned
        {
            let mut calls = self.calls();
            if let Some(active) = calls.get_mut(&floor) {
                if *active {
                    *active = false;
                    debug!("{} : Doors open at floor {}", lift_tag(), floor);
                }
            }
        }

        if self.dest_max() == Some(floor) {
            self.dest_max.store(NO_FLOOR, Ordering::Release);
            self.set_motion(MotionState::Idle);
        }

        if self.dest_min() == Some(floor) {
            self.dest_min.store(NO_FLOOR, Ordering::Release);
            self.set_motion(MotionState::Idle);
        }
    }

    fn drain_summons(&self) {
        for floor in self.summon_rx.try_iter() {
            debug!("{} : Summoned to floor {}", lift_tag(), floor);
            self.calls().insert(floor, true);

            let current = self.current_floor();
            if floor > current {
                let max = self.dest_max().map_or(floor, |max| max.max(floor));
                self.dest_max.store(max, Ordering::Release);
            } else if floor < current {
                let min = self.dest_min().map_or(floor, |min| min.min(floor));
                self.dest_min.store(min, Ordering::Release);
            }
        }
    }

    fn resolve_motion(&self) -> MotionState {
        let motion = self.motion_state();
        if motion != MotionState::Idle {
            return motion;
        }

        let next = match (self.dest_max(), self.dest_min()) {
            (Some(_), Some(_)) => {
                // Work on both sides, either excursion is committed
                if self.tie_breaker.go_up() {
                    MotionState::GoingUp
                } else {
                    MotionState::GoingDown
                }
            }
            (Some(_), None) => MotionState::GoingUp,
            (None, Some(_)) => MotionState::GoingDown,
            (None, None) => {
                trace!("{} : Idling at floor {}", lift_tag(), self.current_floor());
                MotionState::Idle
            }
        };

        if next != MotionState::Idle {
            info!("{} : Going {}", lift_tag(), direction_word(next));
        }
        self.set_motion(next);
        next
    }

    fn set_motion(&self, motion: MotionState) {
        self.motion.store(motion.to_u8(), Ordering::Release);
    }

    fn calls(&self) -> MutexGuard<'_, HashMap<i32, bool>> {
        // Only plain bool flags live behind this lock, a poisoned map is still consistent
        self.pending_calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LiftHandle for Lift {
    fn estimate_cost(&self, floor: i32) -> i32 {
        let current_floor = self.current_floor();

        if floor == current_floor {
            return 0;
        }

        let motion = self.motion_state();

        if floor > current_floor && motion == MotionState::GoingDown {
            // Finish the downward excursion before coming back up
            let dest_min = self.dest_min().unwrap_or(current_floor);
            return (current_floor - dest_min) + floor;
        }

        if floor < current_floor && motion == MotionState::GoingUp {
            // Finish the upward excursion before heading down
            let dest_max = self.dest_max().unwrap_or(current_floor);
            return (dest_max - current_floor) + (current_floor - floor);
        }

        (current_floor - floor).abs()
    }

    fn enqueue(&self, floor: i32) {
        // The lift owns the receiver, so the channel can never be disconnected here
        let _ = self.summon_tx.send(floor);
    }

    fn run(&self, cancel_rx: cbc::Receiver<()>) {
        loop {
            match cancel_rx.try_recv() {
                Ok(()) | Err(cbc::TryRecvError::Disconnected) => break,
                Err(cbc::TryRecvError::Empty) => {}
            }

            self.step();
            thread::sleep(self.tick);
        }
        info!("{} : Stopped at floor {}", lift_tag(), self.current_floor());
    }

    fn reset(&self) {
        self.reset_requested.store(true, Ordering::Release);
        debug!("{} : Reset requested", lift_tag());
    }
}

/**
 * Start `lift.run` on its own named thread.
 */
pub fn spawn_lift<L: LiftHandle + 'static>(
    lift: Arc<L>,
    name: String,
    cancel_rx: cbc::Receiver<()>,
) -> io::Result<JoinHandle<()>> {
    Builder::new().name(name).spawn(move || lift.run(cancel_rx))
}

/***************************************/
/*           Local helpers             */
/***************************************/
fn load_bound(bound: &AtomicI32) -> Option<i32> {
    match bound.load(Ordering::Acquire) {
        NO_FLOOR => None,
        floor => Some(floor),
    }
}

fn lift_tag() -> String {
    thread::current().name().unwrap_or("lift").to_string()
}

fn direction_word(motion: MotionState) -> &'static str {
    match motion {
        MotionState::GoingUp => "up",
        MotionState::GoingDown => "down",
        MotionState::Idle => "nowhere",
    }
}
