//! Undo/Redo system for project mutations.
//!
//! Every committed, user-visible mutation is recorded as a [`Command`]: a
//! display name plus an undo and a redo operation. Both operations are built
//! once, at commit time, from captured values rather than live object state,
//! so replaying them stays correct across repeated undo-redo-undo cycling.
//!
//! Commands never hold references into the target. They receive it as
//! `&mut T` when executed and look up whatever they touch by id.

use std::fmt;

use crate::constants::DEFAULT_MAX_HISTORY;

// ============================================================================
// Command Types
// ============================================================================

/// One half of a reversible command.
pub type Operation<T> = Box<dyn Fn(&mut T)>;

enum CommandKind<T> {
    /// A single reversible pair.
    Single { undo: Operation<T>, redo: Operation<T> },
    /// Several commands undone/redone as one step.
    Batch(Vec<Command<T>>),
}

/// A named reversible operation against a target of type `T`.
pub struct Command<T> {
    name: String,
    kind: CommandKind<T>,
}

impl<T> Command<T> {
    /// Create a command from an undo/redo pair.
    pub fn new(
        name: impl Into<String>,
        undo: impl Fn(&mut T) + 'static,
        redo: impl Fn(&mut T) + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            kind: CommandKind::Single {
                undo: Box::new(undo),
                redo: Box::new(redo),
            },
        }
    }

    /// Group several commands into one undo step.
    pub fn batch(name: impl Into<String>, commands: Vec<Command<T>>) -> Self {
        Self {
            name: name.into(),
            kind: CommandKind::Batch(commands),
        }
    }

    /// Human-readable name for menu labels.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn apply_undo(&self, target: &mut T) {
        match &self.kind {
            CommandKind::Single { undo, .. } => undo(target),
            // Undo batch in reverse order
            CommandKind::Batch(commands) => {
                for cmd in commands.iter().rev() {
                    cmd.apply_undo(target);
                }
            }
        }
    }

    fn apply_redo(&self, target: &mut T) {
        match &self.kind {
            CommandKind::Single { redo, .. } => redo(target),
            CommandKind::Batch(commands) => {
                for cmd in commands {
                    cmd.apply_redo(target);
                }
            }
        }
    }
}

impl<T> fmt::Debug for Command<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CommandKind::Single { .. } => f.debug_struct("Command").field("name", &self.name).finish(),
            CommandKind::Batch(commands) => f
                .debug_struct("Command")
                .field("name", &self.name)
                .field("batch", commands)
                .finish(),
        }
    }
}

// ============================================================================
// Undo Stack
// ============================================================================

#[derive(Debug, Clone)]
pub struct UndoConfig {
    /// Oldest steps beyond this many are dropped
    pub max_history: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

/// An open group collecting commands until [`UndoStack::end_group`].
struct OpenGroup<T> {
    name: String,
    depth: usize,
    commands: Vec<Command<T>>,
}

/// The undo/redo history, newest step last on both stacks.
///
/// Pushing a new command clears the redo stack, except while a group is
/// open: nested registrations join the group and leave the redo branch alone
/// until the group is closed.
pub struct UndoStack<T> {
    undo_stack: Vec<Command<T>>,
    redo_stack: Vec<Command<T>>,
    group: Option<OpenGroup<T>>,
    config: UndoConfig,
}

impl<T> Default for UndoStack<T> {
    fn default() -> Self {
        Self::with_config(UndoConfig::default())
    }
}

impl<T> fmt::Debug for UndoStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoStack")
            .field("undo", &self.undo_stack)
            .field("redo", &self.redo_stack)
            .field("group_open", &self.group.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl<T> UndoStack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: UndoConfig) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            group: None,
            config,
        }
    }

    /// Record an already-performed mutation.
    pub fn push(
        &mut self,
        name: impl Into<String>,
        undo: impl Fn(&mut T) + 'static,
        redo: impl Fn(&mut T) + 'static,
    ) {
        self.push_command(Command::new(name, undo, redo));
    }

    /// Record a prebuilt command.
    pub fn push_command(&mut self, command: Command<T>) {
        if let Some(group) = self.group.as_mut() {
            log::debug!("📝 Undo: '{}' joined group '{}'", command.name(), group.name);
            group.commands.push(command);
            return;
        }

        log::debug!("📝 Undo: pushed '{}'", command.name());
        self.undo_stack.push(command);
        self.redo_stack.clear();

        let excess = self.undo_stack.len().saturating_sub(self.config.max_history);
        if excess > 0 {
            self.undo_stack.drain(..excess);
        }
    }

    /// Start collecting pushes into a single named step.
    ///
    /// Groups nest: an inner `begin_group` joins the outermost group, whose
    /// name is kept.
    pub fn begin_group(&mut self, name: impl Into<String>) {
        match self.group.as_mut() {
            Some(group) => group.depth += 1,
            None => {
                self.group = Some(OpenGroup {
                    name: name.into(),
                    depth: 1,
                    commands: Vec::new(),
                })
            }
        }
    }

    /// Close the innermost open group. When the outermost group closes its
    /// commands are pushed as one batch; an empty group leaves no entry.
    pub fn end_group(&mut self) {
        let Some(group) = self.group.as_mut() else {
            log::warn!("Undo: end_group called without an open group");
            return;
        };
        group.depth -= 1;
        if group.depth > 0 {
            return;
        }
        if let Some(group) = self.group.take() {
            if group.commands.is_empty() {
                log::debug!("Undo: dropped empty group '{}'", group.name);
            } else {
                self.push_command(Command::batch(group.name, group.commands));
            }
        }
    }

    /// Whether a group is currently collecting pushes.
    pub fn is_grouping(&self) -> bool {
        self.group.is_some()
    }

    fn close_all_groups(&mut self) {
        while self.group.is_some() {
            self.end_group();
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Undo the most recent command against `target`.
    /// Returns false if there was nothing to undo.
    pub fn undo(&mut self, target: &mut T) -> bool {
        self.close_all_groups();
        let Some(cmd) = self.undo_stack.pop() else {
            return false;
        };
        log::debug!("⏪ Undo: '{}'", cmd.name());
        cmd.apply_undo(target);
        self.redo_stack.push(cmd);
        true
    }

    /// Redo the most recently undone command against `target`.
    /// Returns false if there was nothing to redo.
    pub fn redo(&mut self, target: &mut T) -> bool {
        self.close_all_groups();
        let Some(cmd) = self.redo_stack.pop() else {
            return false;
        };
        log::debug!("⏩ Redo: '{}'", cmd.name());
        cmd.apply_redo(target);
        self.undo_stack.push(cmd);
        true
    }

    /// Display name for an "Undo ..." menu item.
    pub fn undo_name(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.name())
    }

    pub fn redo_name(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.name())
    }

    /// Drop all history, including an open group.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.group = None;
        log::debug!("🗑️ Undo history cleared");
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
