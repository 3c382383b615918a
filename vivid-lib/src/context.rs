//! State that outlives a single run of the vm: the repository that `label` writes into, and
//! the commands that `prompt` can call.
//!
//! The vm borrows the [`Context`] mutably for a whole run, so two runs can't share one context
//! at the same time. Hosts that want to share a context between threads have to put it behind
//! a lock and hold the lock for the entire run. Since `label` only ever appends, that is enough.

use serde::{Deserialize, Serialize};

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Maps label names to the values that were labeled with them, in the order they were
/// labeled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Repository(BTreeMap<String, Vec<String>>);

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    /// appends to the values of a label, creates the label if it's new
    pub fn append<I>(&mut self, label: &str, values: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.0.entry(label.into()).or_default().extend(values);
    }

    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.0.get(label).map(Vec::as_slice)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// A host function that `prompt` can call. It receives the top frame of the stack and the
/// arguments of the prompt instruction that follow the command name.
pub type Command = Box<dyn FnMut(&[String], &[String])>;

/// Everything a run of the vm can change besides its own stack
#[derive(Default)]
pub struct Context {
    pub repository: Repository,
    commands: HashMap<String, Command>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// registers a command, replaces an existing one with the same name
    pub fn register_command<F>(&mut self, name: impl Into<String>, command: F)
    where
        F: FnMut(&[String], &[String]) + 'static,
    {
        self.commands.insert(name.into(), Box::new(command));
    }

    pub fn remove_command(&mut self, name: &str) -> bool {
        self.commands.remove(name).is_some()
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// calls a command, returns false if there is none with that name
    pub fn call_command(&mut self, name: &str, frame: &[String], args: &[String]) -> bool {
        match self.commands.get_mut(name) {
            Some(command) => {
                command(frame, args);
                true
            }
            None => false,
        }
    }

    /// Clears the repository. Hosts call this between independent runs, commands stay
    /// registered.
    pub fn reset(&mut self) {
        self.repository.clear();
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut commands: Vec<_> = self.commands.keys().collect();
        commands.sort();
        f.debug_struct("Context")
            .field("repository", &self.repository)
            .field("commands", &commands)
            .finish()
    }
}
