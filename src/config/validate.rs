// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{DagschedError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::DagschedError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.scheduler, raw.executor, raw.task))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_scheduler_section(cfg)?;
    validate_task_ids(cfg)?;
    validate_task_dependencies(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn validate_scheduler_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.scheduler.workers == 0 {
        return Err(DagschedError::ConfigError(
            "[scheduler].workers must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_task_ids(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for task in &cfg.task {
        if task.id.trim().is_empty() {
            return Err(DagschedError::ConfigError(
                "task ids must not be empty".to_string(),
            ));
        }
        if !seen.insert(task.id.as_str()) {
            return Err(DagschedError::DuplicateTaskId(task.id.clone()));
        }
    }
    Ok(())
}

fn validate_task_dependencies(cfg: &RawConfigFile) -> Result<()> {
    let ids: HashSet<&str> = cfg.task.iter().map(|t| t.id.as_str()).collect();

    for task in &cfg.task {
        let mut listed = HashSet::new();
        for dep in &task.after {
            if !ids.contains(dep.as_str()) {
                return Err(DagschedError::ConfigError(format!(
                    "task '{}' has unknown dependency '{}' in `after`",
                    task.id, dep
                )));
            }
            if dep == &task.id {
                return Err(DagschedError::ConfigError(format!(
                    "task '{}' cannot depend on itself in `after`",
                    task.id
                )));
            }
            if !listed.insert(dep.as_str()) {
                return Err(DagschedError::ConfigError(format!(
                    "task '{}' lists dependency '{}' more than once",
                    task.id, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawConfigFile) -> Result<()> {
    // Building the graph runs the same cycle check as interactive edits.
    let trial = ConfigFile::new_unchecked(
        cfg.scheduler.clone(),
        cfg.executor.clone(),
        cfg.task.clone(),
    );
    trial.build_graph().map(|_| ())
}
