// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{PoolConfig, RawWorkloadFile, TaskKind, WorkloadFile};
use crate::errors::{Result, TicketPoolError};

impl TryFrom<RawWorkloadFile> for WorkloadFile {
    type Error = TicketPoolError;

    fn try_from(raw: RawWorkloadFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_tasks(&raw)?;
        validate_pool_config(&raw.pool)?;
        validate_task_kinds(&raw)?;
        validate_task_dependencies(&raw)?;
        let order = submission_order(&raw)?;
        Ok(WorkloadFile::new_unchecked(raw.pool, raw.task, order))
    }
}

impl WorkloadFile {
    /// Same workload with a different worker count, revalidated.
    pub fn with_total_workers(self, total_workers: usize) -> Result<Self> {
        let mut pool = self.pool().clone();
        pool.total_workers = total_workers;
        validate_pool_config(&pool)?;

        let order = self.submission_order().to_vec();
        let tasks = self.tasks().clone();
        Ok(WorkloadFile::new_unchecked(pool, tasks, order))
    }
}

/// Check the worker split of a pool configuration.
pub fn validate_pool_config(pool: &PoolConfig) -> Result<()> {
    if pool.total_workers == 0 {
        return Err(TicketPoolError::ConfigError(
            "[pool].total_workers must be >= 1 (got 0)".to_string(),
        ));
    }

    if pool.high_priority_workers >= pool.total_workers {
        return Err(TicketPoolError::ConfigError(format!(
            "[pool].high_priority_workers ({}) must be smaller than total_workers ({})",
            pool.high_priority_workers, pool.total_workers
        )));
    }

    if pool.thread_name_prefix.trim().is_empty() {
        return Err(TicketPoolError::ConfigError(
            "[pool].thread_name_prefix must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn ensure_has_tasks(raw: &RawWorkloadFile) -> Result<()> {
    if raw.task.is_empty() {
        return Err(TicketPoolError::ConfigError(
            "workload must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_task_kinds(raw: &RawWorkloadFile) -> Result<()> {
    for (name, task) in raw.task.iter() {
        if task.manual && task.barrier {
            return Err(TicketPoolError::ConfigError(format!(
                "task '{name}' cannot be both `manual` and `barrier`"
            )));
        }
        if task.instances == 0 {
            return Err(TicketPoolError::ConfigError(format!(
                "task '{name}' must have `instances` >= 1"
            )));
        }
        match task.kind() {
            TaskKind::Barrier if task.after.is_empty() => {
                return Err(TicketPoolError::ConfigError(format!(
                    "barrier task '{name}' needs at least one entry in `after`"
                )));
            }
            TaskKind::Manual if !task.after.is_empty() => {
                return Err(TicketPoolError::ConfigError(format!(
                    "manual task '{name}' cannot have `after` dependencies"
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

fn validate_task_dependencies(raw: &RawWorkloadFile) -> Result<()> {
    for (name, task) in raw.task.iter() {
        for dep in task.after.iter() {
            if dep == name {
                return Err(TicketPoolError::ConfigError(format!(
                    "task '{name}' cannot depend on itself in `after`"
                )));
            }
            if !raw.task.contains_key(dep) {
                return Err(TicketPoolError::UnknownDependency {
                    task: name.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Topological order of the tasks; fails on cycles.
///
/// Tickets can only depend on tickets that already exist, so this is also
/// the order tasks must be submitted in.
fn submission_order(raw: &RawWorkloadFile) -> Result<Vec<String>> {
    // Edge direction: dep -> task.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in raw.task.keys() {
        graph.add_node(name.as_str());
    }

    for (name, task) in raw.task.iter() {
        for dep in task.after.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(order) => Ok(order.into_iter().map(str::to_string).collect()),
        Err(cycle) => Err(TicketPoolError::DagCycle(format!(
            "cycle detected in workload involving task '{}'",
            cycle.node_id()
        ))),
    }
}
