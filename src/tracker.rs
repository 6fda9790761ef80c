//! Productivity tracker
//!
//! Tasks earn points; every 100 points is a level. Some tasks are achievements
//! that complete themselves from game snapshots.

use serde::{Deserialize, Serialize};

use crate::sim::RunPhase;
use crate::sim::scroller::ScrollerSnapshot;
use crate::sim::stacker::StackerSnapshot;

/// Points needed per tracker level
pub const POINTS_PER_LEVEL: u32 = 100;

/// Elapsed seconds a scroller run must survive for the pipe-avoidance award
pub const AVOID_PIPES_SECS: u32 = 5;

/// Game condition that completes a task automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Achievement {
    /// Side-scroller score reaches the value
    PassPipes(u32),
    /// Side-scroller clock reaches the value while still running
    SurviveSeconds(u32),
    /// Side-scroller run still alive after `AVOID_PIPES_SECS` seconds
    AvoidPipes,
    /// Block-stacker cleared at least this many lines
    ClearLines(u32),
    /// Block-stacker level reaches the value
    ReachLevel(u32),
}

impl Achievement {
    fn met_by_scroller(&self, snap: &ScrollerSnapshot) -> bool {
        let running = snap.phase == RunPhase::Running;
        match *self {
            Achievement::PassPipes(n) => snap.score >= n,
            Achievement::SurviveSeconds(n) => running && snap.elapsed_secs >= n,
            // Time heuristic only; the end cause is never consulted
            Achievement::AvoidPipes => running && snap.elapsed_secs > AVOID_PIPES_SECS,
            _ => false,
        }
    }

    fn met_by_stacker(&self, snap: &StackerSnapshot) -> bool {
        match *self {
            Achievement::ClearLines(n) => snap.lines_cleared >= n,
            Achievement::ReachLevel(n) => snap.level >= n,
            _ => false,
        }
    }
}

/// A single task on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub name: String,
    pub points: u32,
    pub completed: bool,
    /// Set for tasks the games complete on their own
    pub achievement: Option<Achievement>,
}

/// Error type for tracker operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    UnknownTask(u32),
}

impl std::fmt::Display for TrackerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackerError::UnknownTask(id) => write!(f, "No task with id {}", id),
        }
    }
}

impl std::error::Error for TrackerError {}

/// Read-only view for the level card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerSummary {
    pub total_points: u32,
    pub level: u32,
    pub progress: u32,
    pub points_to_next_level: u32,
    pub level_up: bool,
    pub tasks: Vec<Task>,
}

/// The task list
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaskBoard {
    tasks: Vec<Task>,
}

impl TaskBoard {
    /// Create an empty board
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// The stock work tasks plus game achievements
    pub fn with_default_tasks() -> Self {
        let mut board = Self::new();
        board.add_task("Complete project proposal", 50);
        board.add_task("Daily stand-up meeting", 20);
        board.add_task("Fix UI bug on dashboard", 30);
        board.add_task("Review pull request", 40);
        board.add_task("Write documentation", 25);
        board.add_achievement("Pass 5 pipes", 30, Achievement::PassPipes(5));
        board.add_achievement("Avoid hitting pipes", 20, Achievement::AvoidPipes);
        board.add_achievement("Survive 30 seconds", 25, Achievement::SurviveSeconds(30));
        board.add_achievement("Clear a line", 20, Achievement::ClearLines(1));
        board.add_achievement("Reach level 2", 40, Achievement::ReachLevel(2));
        board
    }

    fn next_id(&self) -> u32 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Add a manual task and return its id
    pub fn add_task(&mut self, name: impl Into<String>, points: u32) -> u32 {
        self.push(name.into(), points, None)
    }

    /// Add a task completed by a game condition and return its id
    pub fn add_achievement(
        &mut self,
        name: impl Into<String>,
        points: u32,
        achievement: Achievement,
    ) -> u32 {
        self.push(name.into(), points, Some(achievement))
    }

    fn push(&mut self, name: String, points: u32, achievement: Option<Achievement>) -> u32 {
        let id = self.next_id();
        self.tasks.push(Task {
            id,
            name,
            points,
            completed: false,
            achievement,
        });
        id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Mark a task done. Returns `Ok(false)` if it was already completed.
    pub fn complete(&mut self, id: u32) -> Result<bool, TrackerError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TrackerError::UnknownTask(id))?;
        if task.completed {
            return Ok(false);
        }
        task.completed = true;
        log::info!("Task completed: {} (+{})", task.name, task.points);
        Ok(true)
    }

    pub fn is_completed(&self, id: u32) -> Result<bool, TrackerError> {
        self.task(id)
            .map(|t| t.completed)
            .ok_or(TrackerError::UnknownTask(id))
    }

    pub fn total_points(&self) -> u32 {
        self.tasks
            .iter()
            .filter(|t| t.completed)
            .map(|t| t.points)
            .sum()
    }

    /// 1-based level
    pub fn level(&self) -> u32 {
        self.total_points() / POINTS_PER_LEVEL + 1
    }

    /// Points into the current level
    pub fn progress(&self) -> u32 {
        self.total_points() % POINTS_PER_LEVEL
    }

    pub fn points_to_next_level(&self) -> u32 {
        POINTS_PER_LEVEL - self.progress()
    }

    /// The banner shows while progress sits exactly on a level boundary
    pub fn level_up(&self) -> bool {
        self.progress() == 0 && self.tasks.iter().any(|t| t.completed)
    }

    /// Complete achievements met by a side-scroller snapshot; returns new ids
    pub fn record_scroller(&mut self, snap: &ScrollerSnapshot) -> Vec<u32> {
        self.record(|a| a.met_by_scroller(snap))
    }

    /// Complete achievements met by a block-stacker snapshot; returns new ids
    pub fn record_stacker(&mut self, snap: &StackerSnapshot) -> Vec<u32> {
        self.record(|a| a.met_by_stacker(snap))
    }

    fn record(&mut self, met: impl Fn(&Achievement) -> bool) -> Vec<u32> {
        let mut newly = Vec::new();
        for task in self.tasks.iter_mut().filter(|t| !t.completed) {
            if task.achievement.as_ref().is_some_and(&met) {
                task.completed = true;
                log::info!("Achievement unlocked: {} (+{})", task.name, task.points);
                newly.push(task.id);
            }
        }
        newly
    }

    pub fn summary(&self) -> TrackerSummary {
        TrackerSummary {
            total_points: self.total_points(),
            level: self.level(),
            progress: self.progress(),
            points_to_next_level: self.points_to_next_level(),
            level_up: self.level_up(),
            tasks: self.tasks.clone(),
        }
    }
}
