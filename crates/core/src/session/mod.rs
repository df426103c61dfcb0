use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use rand::{rngs::SmallRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    config::{validate_range, validate_speed},
    Algorithm, AppConfig, Container, Coordinator, Lane, Renderer, Result, RunReport, Scheduler,
    SortVizError,
};

/// Whether one canvas is shown or two side by side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneMode {
    #[default]
    Single,
    Dual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneId {
    First,
    Second,
}

/// Coarse input lock held for the whole of a playback. Clones share the flag,
/// so a UI can poll it while the session plays.
#[derive(Debug, Clone, Default)]
pub struct InputLock {
    locked: Arc<AtomicBool>,
}

impl InputLock {
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    pub fn try_acquire(&self) -> Result<InputGuard> {
        self.locked
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SortVizError::PlaybackInProgress)?;
        Ok(InputGuard {
            locked: Arc::clone(&self.locked),
        })
    }
}

/// Releases the [`InputLock`] when dropped.
#[derive(Debug)]
pub struct InputGuard {
    locked: Arc<AtomicBool>,
}

impl Drop for InputGuard {
    fn drop(&mut self) {
        self.locked.store(false, Ordering::Release);
    }
}

/// Reports for the lanes that took part in a playback.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayReport {
    pub first: RunReport,
    pub second: Option<RunReport>,
}

/// Everything a front end needs between plays: configuration, lane mode,
/// both lanes and the input lock. Owned by the caller.
#[derive(Debug)]
pub struct Session<R> {
    config: AppConfig,
    mode: LaneMode,
    lanes: Coordinator<R>,
    lock: InputLock,
    rng: SmallRng,
}

impl<R: Renderer> Session<R> {
    /// Validates `config` and populates the first canvas. The second canvas
    /// stays empty until dual mode is switched on.
    pub fn new(config: AppConfig, first: R, second: R) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.playback.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let array = &config.array;
        let container = Container::create(array.size, array.low_bound, array.high_bound, &mut rng)?;
        let lanes = Coordinator::new(
            Lane::new(container, Algorithm::Selection, first),
            Lane::new(Container::from_values(Vec::new()), Algorithm::Selection, second),
        );
        Ok(Self {
            config,
            mode: LaneMode::Single,
            lanes,
            lock: InputLock::default(),
            rng,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn mode(&self) -> LaneMode {
        self.mode
    }

    pub fn input_lock(&self) -> InputLock {
        self.lock.clone()
    }

    pub fn lane(&self, id: LaneId) -> &Lane<R> {
        match id {
            LaneId::First => self.lanes.first(),
            LaneId::Second => self.lanes.second(),
        }
    }

    fn lane_mut(&mut self, id: LaneId) -> &mut Lane<R> {
        match id {
            LaneId::First => self.lanes.first_mut(),
            LaneId::Second => self.lanes.second_mut(),
        }
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.lock.is_locked() {
            Err(SortVizError::PlaybackInProgress)
        } else {
            Ok(())
        }
    }

    fn active_lanes(&self) -> &'static [LaneId] {
        match self.mode {
            LaneMode::Single => &[LaneId::First],
            LaneMode::Dual => &[LaneId::First, LaneId::Second],
        }
    }

    fn fresh_container(&mut self) -> Result<Container> {
        let array = &self.config.array;
        Container::create(array.size, array.low_bound, array.high_bound, &mut self.rng)
    }

    fn refresh(&mut self, id: LaneId) -> Result<()> {
        let container = self.fresh_container()?;
        self.lane_mut(id).replace_container(container);
        Ok(())
    }

    /// Fresh random values, same length, on every visible canvas.
    pub fn regenerate(&mut self) -> Result<()> {
        self.ensure_unlocked()?;
        for &id in self.active_lanes() {
            self.refresh(id)?;
        }
        Ok(())
    }

    /// Replaces every visible canvas with `len` new values.
    pub fn resize(&mut self, len: usize) -> Result<()> {
        self.ensure_unlocked()?;
        let array = &self.config.array;
        validate_range(len, array.low_bound, array.high_bound)?;
        self.config.array.size = len;
        self.regenerate()
    }

    pub fn set_range(&mut self, low: i64, high: i64) -> Result<()> {
        self.ensure_unlocked()?;
        validate_range(self.config.array.size, low, high)?;
        self.config.array.low_bound = low;
        self.config.array.high_bound = high;
        self.regenerate()
    }

    /// Takes effect on the next [`Session::play`].
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        self.ensure_unlocked()?;
        validate_speed(speed)?;
        self.config.playback.speed = speed;
        Ok(())
    }

    /// Picks the algorithm for a lane and redraws that lane with new values.
    /// A hidden second lane only records the choice.
    pub fn select_algorithm(&mut self, id: LaneId, name: &str) -> Result<()> {
        self.ensure_unlocked()?;
        let algorithm = name.parse::<Algorithm>()?;
        self.lane_mut(id).set_algorithm(algorithm);
        if self.active_lanes().contains(&id) {
            self.refresh(id)?;
        }
        Ok(())
    }

    /// Entering dual mode copies the first canvas into the second, so both
    /// lanes start from the same permutation. Leaving it clears the second.
    pub fn toggle_dual(&mut self) -> Result<LaneMode> {
        self.ensure_unlocked()?;
        self.mode = match self.mode {
            LaneMode::Single => {
                let copy = self.lanes.first().container().to_sequence();
                self.lanes
                    .second_mut()
                    .replace_container(Container::from_values(copy));
                LaneMode::Dual
            }
            LaneMode::Dual => {
                self.lanes
                    .second_mut()
                    .replace_container(Container::from_values(Vec::new()));
                LaneMode::Single
            }
        };
        tracing::debug!(mode = ?self.mode, "lane mode changed");
        Ok(self.mode)
    }

    /// Plays the visible lanes to completion with input locked throughout.
    /// The lock is released when the barrier completes or a lane fails.
    pub async fn play(&mut self) -> Result<PlayReport> {
        let _guard = self.lock.try_acquire()?;
        let scheduler = Scheduler::from_config(&self.config)?;
        match self.mode {
            LaneMode::Single => {
                let first = scheduler.run(self.lanes.first_mut()).await?;
                Ok(PlayReport {
                    first,
                    second: None,
                })
            }
            LaneMode::Dual => {
                let report = self.lanes.run_both(&scheduler).await?;
                Ok(PlayReport {
                    first: report.first,
                    second: Some(report.second),
                })
            }
        }
    }
}
