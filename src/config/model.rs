// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::Priority;

/// Worker pool settings, the `[pool]` section of a workload file.
///
/// ```toml
/// [pool]
/// total_workers = 4
/// high_priority_workers = 1
/// high_priority_threshold = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PoolConfig {
    /// Total number of worker threads.
    #[serde(default = "default_total_workers")]
    pub total_workers: usize,

    /// How many of those only take tasks at or above
    /// `high_priority_threshold`. Must be smaller than `total_workers`.
    #[serde(default = "default_high_priority_workers")]
    pub high_priority_workers: usize,

    #[serde(default = "default_high_priority_threshold")]
    pub high_priority_threshold: Priority,

    /// Worker threads are named `<prefix>-<index>`.
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,
}

fn default_total_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .max(2)
}

fn default_high_priority_workers() -> usize {
    1
}

fn default_high_priority_threshold() -> Priority {
    100
}

fn default_thread_name_prefix() -> String {
    "ticketpool-worker".to_string()
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            total_workers: default_total_workers(),
            high_priority_workers: default_high_priority_workers(),
            high_priority_threshold: default_high_priority_threshold(),
            thread_name_prefix: default_thread_name_prefix(),
        }
    }
}

impl PoolConfig {
    pub fn new(
        total_workers: usize,
        high_priority_workers: usize,
        high_priority_threshold: Priority,
    ) -> Self {
        Self {
            total_workers,
            high_priority_workers,
            high_priority_threshold,
            ..Self::default()
        }
    }

    /// Workers that accept any priority.
    pub fn general_workers(&self) -> usize {
        self.total_workers.saturating_sub(self.high_priority_workers)
    }
}

/// Workload file exactly as deserialized, before semantic validation.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawWorkloadFile {
    #[serde(default)]
    pub pool: PoolConfig,

    /// All tasks from `[task.<name>]`.
    #[serde(default)]
    pub task: BTreeMap<String, TaskSpec>,
}

/// `[task.<name>]` section of a workload file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct TaskSpec {
    #[serde(default)]
    pub priority: Priority,

    /// Names of tasks this one waits for.
    #[serde(default)]
    pub after: Vec<String>,

    /// Simulated work per instance, in milliseconds.
    #[serde(default)]
    pub work_ms: u64,

    /// Number of instances submitted under one batch ticket.
    #[serde(default = "default_instances")]
    pub instances: usize,

    /// Call `bump_priority` right after submission.
    #[serde(default)]
    pub bump: bool,

    /// No work of its own; finishes when everything in `after` finishes.
    #[serde(default)]
    pub barrier: bool,

    /// Manual ticket, completed by the runner after `complete_after_ms`.
    #[serde(default)]
    pub manual: bool,

    #[serde(default)]
    pub complete_after_ms: u64,
}

fn default_instances() -> usize {
    1
}

impl TaskSpec {
    pub fn kind(&self) -> TaskKind {
        if self.manual {
            TaskKind::Manual
        } else if self.barrier {
            TaskKind::Barrier
        } else if self.instances > 1 {
            TaskKind::Batch
        } else {
            TaskKind::Single
        }
    }
}

/// How a workload task is turned into a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Single,
    Batch,
    Barrier,
    Manual,
}

/// A validated workload.
///
/// Only obtainable through `TryFrom<RawWorkloadFile>`, so holders can rely
/// on: at least one task, known and acyclic `after` references, a valid pool
/// split, and consistent task kinds.
#[derive(Debug, Clone)]
pub struct WorkloadFile {
    pool: PoolConfig,
    task: BTreeMap<String, TaskSpec>,
    /// Task names in dependency order.
    order: Vec<String>,
}

impl WorkloadFile {
    pub(crate) fn new_unchecked(
        pool: PoolConfig,
        task: BTreeMap<String, TaskSpec>,
        order: Vec<String>,
    ) -> Self {
        Self { pool, task, order }
    }

    pub fn pool(&self) -> &PoolConfig {
        &self.pool
    }

    pub fn tasks(&self) -> &BTreeMap<String, TaskSpec> {
        &self.task
    }

    pub fn task(&self, name: &str) -> Option<&TaskSpec> {
        self.task.get(name)
    }

    /// Every task appears after all of the tasks in its `after` list.
    pub fn submission_order(&self) -> &[String] {
        &self.order
    }
}
