#![allow(dead_code)]

use kiln::commands::CommandRunner;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Records commands instead of running them.
pub struct RecordingRunner {
    pub commands: RefCell<Vec<(String, PathBuf)>>,
    pub opened: RefCell<Vec<String>>,
    pub succeed: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self { commands: RefCell::new(Vec::new()), opened: RefCell::new(Vec::new()), succeed: true }
    }

    pub fn failing() -> Self {
        Self { succeed: false, ..Self::new() }
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.commands.borrow().iter().map(|(c, _)| c.clone()).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &str, working_dir: &Path) -> bool {
        self.commands.borrow_mut().push((command.to_string(), working_dir.to_path_buf()));
        self.succeed
    }

    fn open(&self, target: &str) -> bool {
        self.opened.borrow_mut().push(target.to_string());
        self.succeed
    }
}
