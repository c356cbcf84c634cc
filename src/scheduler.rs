//! Tick-driven interval scheduler.
//!
//! Two periodic tasks share one 1 ms tick source. Each task keeps its own
//! interval counter; when the counter reaches the task's period the
//! scheduler notifies a [`SchedulerDelegate`] and resets the counter.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                       1 ms tick                           │
//! │                          │                                │
//! │            ┌─────────────┴─────────────┐                  │
//! │            ▼                           ▼                  │
//! │   ┌──────────────────┐       ┌──────────────────┐         │
//! │   │ Temperature task │       │  Humidity task   │         │
//! │   │ Idle(n) ─▶ Fire  │       │ Idle(n) ─▶ Fire  │         │
//! │   │   every 100      │       │   every 200      │         │
//! │   └────────┬─────────┘       └────────┬─────────┘         │
//! │            ▼                           ▼                  │
//! │   ┌───────────────────────────────────────────────────┐   │
//! │   │                SchedulerDelegate                  │   │
//! │   │     (ControllerService runs the task pipeline)    │   │
//! │   └───────────────────────────────────────────────────┘   │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! The tasks are independent: they fire together only when their counters
//! happen to mature on the same tick. Slot order decides who goes first.

use log::debug;

use crate::app::ports::{SchedulerDelegate, TaskId};
use crate::config::ControllerConfig;

// ═══════════════════════════════════════════════════════════════
//  Task types
// ═══════════════════════════════════════════════════════════════

/// A periodic task and its interval counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTask {
    pub id: TaskId,
    /// Ticks between fires.
    pub period_ticks: u32,
    /// Ticks elapsed since the task last fired, `0..period_ticks`.
    elapsed_ticks: u32,
}

impl PeriodicTask {
    pub fn new(id: TaskId, period_ticks: u32) -> Self {
        Self {
            id,
            period_ticks: period_ticks.max(1),
            elapsed_ticks: 0,
        }
    }

    pub fn elapsed_ticks(&self) -> u32 {
        self.elapsed_ticks
    }

    /// Advance by one tick; `true` when the task fires.
    fn advance(&mut self) -> bool {
        self.elapsed_ticks += 1;
        if self.elapsed_ticks >= self.period_ticks {
            self.elapsed_ticks = 0;
            true
        } else {
            false
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Number of task slots.
const TASK_SLOTS: usize = 2;

/// The scheduler engine.
///
/// Decoupled from the pipelines it drives: when a counter matures it
/// invokes the [`SchedulerDelegate`] callback, which makes the tick
/// discipline testable on its own.
#[derive(Debug, Clone)]
pub struct Scheduler {
    tasks: [PeriodicTask; TASK_SLOTS],
    tick_count: u64,
}

impl Scheduler {
    /// Temperature in slot 0, humidity in slot 1.
    pub fn new(temperature_period_ticks: u32, humidity_period_ticks: u32) -> Self {
        Self {
            tasks: [
                PeriodicTask::new(TaskId::Temperature, temperature_period_ticks),
                PeriodicTask::new(TaskId::Humidity, humidity_period_ticks),
            ],
            tick_count: 0,
        }
    }

    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.temperature_period_ticks, config.humidity_period_ticks)
    }

    /// Tick the scheduler. Call once per tick interval.
    ///
    /// Every task's counter is advanced; each task that matures is reported
    /// to `delegate` in slot order, after its counter has been reset.
    pub fn tick(&mut self, delegate: &mut dyn SchedulerDelegate) {
        self.tick_count += 1;
        for task in &mut self.tasks {
            if task.advance() {
                debug!("Scheduler: {:?} fired at tick {}", task.id, self.tick_count);
                delegate.on_task_fired(task.id);
            }
        }
    }

    /// Ticks processed since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn task(&self, id: TaskId) -> Option<&PeriodicTask> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
