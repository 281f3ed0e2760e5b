use crate::domain::task::{Task, TaskId};

/// Per-task mutation state. A task with a request in flight ignores
/// further toggle/delete input until the outcome is applied, so responses
/// for the same task can never race each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    TogglePending,
    DeletePending,
}

#[derive(Debug, Clone)]
struct Entry {
    task: Task,
    phase: Phase,
}

/// Display-side state: the held task list, the pending-create draft text,
/// and one [`Phase`] per task. `begin_*` gates and stages a request,
/// `complete_*` applies its outcome; no I/O happens here.
#[derive(Debug, Clone, Default)]
pub struct TaskListModel {
    entries: Vec<Entry>,
    draft: String,
}

impl TaskListModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.entries.iter().map(|entry| &entry.task)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.entries.get(index).map(|entry| &entry.task)
    }

    pub fn phase(&self, id: TaskId) -> Option<Phase> {
        self.entries.iter().find(|entry| entry.task.id == id).map(|entry| entry.phase)
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn draft_push(&mut self, c: char) {
        self.draft.push(c);
    }

    pub fn draft_pop(&mut self) {
        self.draft.pop();
    }

    pub fn draft_clear(&mut self) {
        self.draft.clear();
    }

    /// Replaces the whole list verbatim, dropping any pending phases.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.entries = tasks.into_iter().map(|task| Entry { task, phase: Phase::Idle }).collect();
    }

    /// The text to create, or `None` when the draft is empty or whitespace.
    /// The draft is kept until the create succeeds.
    pub fn begin_submit(&self) -> Option<String> {
        if self.draft.trim().is_empty() { None } else { Some(self.draft.clone()) }
    }

    pub fn complete_submit(&mut self, task: Task) {
        self.entries.push(Entry { task, phase: Phase::Idle });
        self.draft.clear();
    }

    /// Stages a toggle and returns the value to send, the inverse of the
    /// one on display. `None` if the id is unknown or the task is busy.
    pub fn begin_toggle(&mut self, id: TaskId) -> Option<bool> {
        let entry = self.entry_mut(id)?;
        if entry.phase != Phase::Idle {
            return None;
        }
        entry.phase = Phase::TogglePending;
        Some(!entry.task.completed)
    }

    /// `outcome` is the server's row on success; `None` keeps the old
    /// value on display. Either way the task becomes idle again.
    pub fn complete_toggle(&mut self, id: TaskId, outcome: Option<Task>) {
        let Some(entry) = self.entry_mut(id) else { return };
        if let Some(task) = outcome {
            entry.task = task;
        }
        entry.phase = Phase::Idle;
    }

    pub fn begin_delete(&mut self, id: TaskId) -> bool {
        let Some(entry) = self.entry_mut(id) else { return false };
        if entry.phase != Phase::Idle {
            return false;
        }
        entry.phase = Phase::DeletePending;
        true
    }

    pub fn complete_delete(&mut self, id: TaskId, removed: bool) {
        if removed {
            self.entries.retain(|entry| entry.task.id != id);
        } else if let Some(entry) = self.entry_mut(id) {
            entry.phase = Phase::Idle;
        }
    }

    fn entry_mut(&mut self, id: TaskId) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.task.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, text: &str, completed: bool) -> Task {
        Task { id: TaskId(id), text: text.into(), completed }
    }

    fn model_with(tasks: Vec<Task>) -> TaskListModel {
        let mut model = TaskListModel::new();
        model.replace_all(tasks);
        model
    }

    #[test]
    fn blank_draft_never_submits() {
        let mut model = TaskListModel::new();
        assert_eq!(model.begin_submit(), None);
        for c in "   ".chars() {
            model.draft_push(c);
        }
        assert_eq!(model.begin_submit(), None);
    }

    #[test]
    fn submit_appends_and_clears_draft() {
        let mut model = TaskListModel::new();
        for c in "buy milk".chars() {
            model.draft_push(c);
        }
        let text = model.begin_submit().unwrap();
        assert_eq!(text, "buy milk");
        // failure path: draft survives so the user can retry
        assert_eq!(model.draft(), "buy milk");
        model.complete_submit(task(1, &text, false));
        assert_eq!(model.draft(), "");
        assert_eq!(model.get(0), Some(&task(1, "buy milk", false)));
    }

    #[test]
    fn toggle_sends_inverted_value() {
        let mut model = model_with(vec![task(1, "a", false), task(2, "b", true)]);
        assert_eq!(model.begin_toggle(TaskId(1)), Some(true));
        assert_eq!(model.begin_toggle(TaskId(2)), Some(false));
        assert_eq!(model.begin_toggle(TaskId(9)), None);
    }

    #[test]
    fn busy_task_ignores_further_input() {
        let mut model = model_with(vec![task(1, "a", false)]);
        assert_eq!(model.begin_toggle(TaskId(1)), Some(true));
        assert_eq!(model.phase(TaskId(1)), Some(Phase::TogglePending));
        assert_eq!(model.begin_toggle(TaskId(1)), None);
        assert!(!model.begin_delete(TaskId(1)));
    }

    #[test]
    fn toggle_outcome_replaces_entry() {
        let mut model = model_with(vec![task(1, "a", false)]);
        model.begin_toggle(TaskId(1));
        model.complete_toggle(TaskId(1), Some(task(1, "a", true)));
        assert_eq!(model.get(0), Some(&task(1, "a", true)));
        assert_eq!(model.phase(TaskId(1)), Some(Phase::Idle));
    }

    #[test]
    fn failed_toggle_keeps_old_value_and_unblocks() {
        let mut model = model_with(vec![task(1, "a", false)]);
        model.begin_toggle(TaskId(1));
        model.complete_toggle(TaskId(1), None);
        assert_eq!(model.get(0), Some(&task(1, "a", false)));
        assert_eq!(model.begin_toggle(TaskId(1)), Some(true));
    }

    #[test]
    fn delete_removes_locally_only_on_completion() {
        let mut model = model_with(vec![task(1, "a", false), task(2, "b", false)]);
        assert!(model.begin_delete(TaskId(1)));
        model.complete_delete(TaskId(1), true);
        assert_eq!(model.len(), 1);
        assert!(model.begin_delete(TaskId(2)));
        model.complete_delete(TaskId(2), false);
        assert_eq!(model.len(), 1);
        assert_eq!(model.phase(TaskId(2)), Some(Phase::Idle));
    }

    #[test]
    fn replace_all_resets_phases() {
        let mut model = model_with(vec![task(1, "a", false)]);
        model.begin_toggle(TaskId(1));
        model.replace_all(vec![task(1, "a", false)]);
        assert_eq!(model.phase(TaskId(1)), Some(Phase::Idle));
    }
}
