/***************************************/
/*        3rd party libraries          */
/***************************************/
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/**
 * Decides which way an idle lift leaves when it has work both above and below.
 *
 * One instance is shared by every lift in the building, so implementations must be
 * safe to call from all lift threads at once.
 */
pub trait TieBreaker: Send + Sync {
    fn go_up(&self) -> bool;
}

/**
 * Mutex-guarded `SmallRng` shared across lift threads.
 */
pub struct SharedRng {
    inner: Mutex<SmallRng>,
}

impl SharedRng {
    pub fn from_seed(seed: u64) -> SharedRng {
        SharedRng {
            inner: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> SharedRng {
        SharedRng {
            inner: Mutex::new(SmallRng::from_entropy()),
        }
    }
}

impl TieBreaker for SharedRng {
    fn go_up(&self) -> bool {
        // A poisoned lock still holds a usable generator
        let mut rng = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_bool(0.5)
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod rng_tests {
    use super::*;

    #[test]
    fn test_same_seed_same_directions() {
        let a = SharedRng::from_seed(42);
        let b = SharedRng::from_seed(42);

        let from_a: Vec<bool> = (0..64).map(|_| a.go_up()).collect();
        let from_b: Vec<bool> = (0..64).map(|_| b.go_up()).collect();

        assert_eq!(from_a, from_b);
    }

    #[test]
    fn test_both_directions_are_picked() {
        let rng = SharedRng::from_seed(7);
        let picks: Vec<bool> = (0..256).map(|_| rng.go_up()).collect();

        assert!(picks.iter().any(|up| *up));
        assert!(picks.iter().any(|up| !*up));
    }
}
