//! Sequential, abort-on-first-failure execution of a preload plan.

use crate::errors::{PreloadError, Result};
use crate::plan::PreloadPlan;
use crate::specifier::ResolvedModule;
use tracing::{debug, info};

/// The host's module evaluation engine, seen from the executor
///
/// Loading a module (reading its source, evaluating it in the global
/// context) is entirely the evaluator's business.
pub trait ModuleEvaluator {
    fn evaluate(&mut self, module: &ResolvedModule) -> anyhow::Result<()>;
}

impl<F> ModuleEvaluator for F
where
    F: FnMut(&ResolvedModule) -> anyhow::Result<()>,
{
    fn evaluate(&mut self, module: &ResolvedModule) -> anyhow::Result<()> {
        self(module)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutorState {
    NotStarted,
    Loading(usize),
    Completed,
    Aborted { index: usize, message: String },
}

/// Runs a plan exactly once
#[derive(Debug)]
pub struct PreloadExecutor {
    state: ExecutorState,
}

impl Default for PreloadExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl PreloadExecutor {
    pub fn new() -> Self {
        Self {
            state: ExecutorState::NotStarted,
        }
    }

    pub fn state(&self) -> &ExecutorState {
        &self.state
    }

    /// True only once every module loaded; the entry mode may then start
    pub fn is_completed(&self) -> bool {
        self.state == ExecutorState::Completed
    }

    /// Load every module in plan order. The first failure stops the run and
    /// nothing after it is evaluated.
    pub fn run<E>(&mut self, plan: &PreloadPlan, evaluator: &mut E) -> Result<()>
    where
        E: ModuleEvaluator + ?Sized,
    {
        if self.state != ExecutorState::NotStarted {
            return Err(PreloadError::ExecutorReused);
        }

        for (index, module) in plan.iter().enumerate() {
            self.state = ExecutorState::Loading(index);
            debug!("preloading [{}] {}", index, module.identity());

            if let Err(e) = evaluator.evaluate(module) {
                let message = format!("{:#}", e);
                self.state = ExecutorState::Aborted {
                    index,
                    message: message.clone(),
                };
                return Err(PreloadError::Load {
                    index,
                    module: module.path().to_path_buf(),
                    message,
                });
            }
        }

        self.state = ExecutorState::Completed;
        if !plan.is_empty() {
            info!("preloaded {} module(s)", plan.len());
        }
        Ok(())
    }
}
