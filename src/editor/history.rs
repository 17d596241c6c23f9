//! Linear undo/redo history.

use tracing::{debug, error};

use super::mutation::{Command, GridModel};
use crate::error::Result;

/// Two stacks of executed commands.
///
/// Executing a new command discards the redo stack.
#[derive(Debug, Default)]
pub struct CommandManager {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
}

impl CommandManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `cmd` and record it. A failing command is not recorded.
    pub fn execute(&mut self, mut cmd: Command, model: &mut GridModel) -> Result<()> {
        cmd.execute(model)?;
        debug!(command = cmd.label(), depth = self.undo_stack.len() + 1, "executed");
        self.undo_stack.push(cmd);
        self.redo_stack.clear();
        Ok(())
    }

    /// Revert the most recent command. Returns false when there was none.
    pub fn undo(&mut self, model: &mut GridModel) -> bool {
        let Some(mut cmd) = self.undo_stack.pop() else {
            return false;
        };
        let outcome = cmd.undo(model);
        debug_assert!(outcome.is_ok(), "undo of {} failed: {outcome:?}", cmd.label());
        match outcome {
            Ok(()) => {
                debug!(command = cmd.label(), "undone");
                self.redo_stack.push(cmd);
                true
            }
            Err(e) => {
                error!(command = cmd.label(), error = %e, "undo failed, dropping command");
                false
            }
        }
    }

    /// Re-apply the most recently undone command. Returns false when there was none.
    pub fn redo(&mut self, model: &mut GridModel) -> bool {
        let Some(mut cmd) = self.redo_stack.pop() else {
            return false;
        };
        let outcome = cmd.execute(model);
        debug_assert!(outcome.is_ok(), "redo of {} failed: {outcome:?}", cmd.label());
        match outcome {
            Ok(()) => {
                debug!(command = cmd.label(), "redone");
                self.undo_stack.push(cmd);
                true
            }
            Err(e) => {
                error!(command = cmd.label(), error = %e, "redo failed, dropping command");
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
