#![allow(dead_code)]

use std::collections::BTreeMap;

use ticketpool::config::{PoolConfig, RawWorkloadFile, TaskSpec, WorkloadFile};
use ticketpool::types::Priority;

/// Builder for `WorkloadFile` to simplify test setup.
pub struct WorkloadBuilder {
    workload: RawWorkloadFile,
}

impl WorkloadBuilder {
    pub fn new() -> Self {
        Self {
            workload: RawWorkloadFile {
                pool: PoolConfig::new(2, 0, 100),
                task: BTreeMap::new(),
            },
        }
    }

    pub fn pool(mut self, total: usize, high: usize, threshold: Priority) -> Self {
        self.workload.pool = PoolConfig::new(total, high, threshold);
        self
    }

    pub fn with_task(mut self, name: &str, task: TaskSpec) -> Self {
        self.workload.task.insert(name.to_string(), task);
        self
    }

    pub fn build_raw(self) -> RawWorkloadFile {
        self.workload
    }

    pub fn build(self) -> WorkloadFile {
        WorkloadFile::try_from(self.workload).expect("Failed to build valid workload from builder")
    }
}

impl Default for WorkloadBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskSpec`.
pub struct TaskSpecBuilder {
    task: TaskSpec,
}

impl TaskSpecBuilder {
    pub fn new() -> Self {
        Self {
            task: TaskSpec {
                instances: 1,
                ..TaskSpec::default()
            },
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.task.priority = priority;
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn work_ms(mut self, ms: u64) -> Self {
        self.task.work_ms = ms;
        self
    }

    pub fn instances(mut self, n: usize) -> Self {
        self.task.instances = n;
        self
    }

    pub fn bump(mut self) -> Self {
        self.task.bump = true;
        self
    }

    pub fn barrier(mut self) -> Self {
        self.task.barrier = true;
        self
    }

    pub fn manual(mut self, complete_after_ms: u64) -> Self {
        self.task.manual = true;
        self.task.complete_after_ms = complete_after_ms;
        self
    }

    pub fn build(self) -> TaskSpec {
        self.task
    }
}

impl Default for TaskSpecBuilder {
    fn default() -> Self {
        Self::new()
    }
}
