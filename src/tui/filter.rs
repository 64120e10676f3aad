//! Filter bar state: one selector per filter key.
//!
//! The bar holds only the currently-selected values; it never fetches data.
//! On any control change the app asks for the complete criteria object and
//! triggers a server re-fetch with it.

use crate::api::FilterCriteria;
use crate::fields::{Status, TaskType};
use crate::model::{Project, User};

/// The four filter controls, in display order.
pub const CONTROL_NAMES: [&str; 4] = ["Project", "Assignee", "Status", "Type"];

/// Selector state for the filter strip. Index 0 of every control means
/// "no filtering on this key".
#[derive(Default)]
pub struct FilterBar {
    pub project_sel: usize,
    pub assignee_sel: usize,
    pub status_sel: usize,
    pub type_sel: usize,
    pub focused: usize,
}

impl FilterBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_control(&mut self) {
        self.focused = (self.focused + 1) % CONTROL_NAMES.len();
    }

    pub fn prev_control(&mut self) {
        self.focused = if self.focused == 0 {
            CONTROL_NAMES.len() - 1
        } else {
            self.focused - 1
        };
    }

    /// Cycle the focused control. Returns true when a value actually changed,
    /// so the caller knows to emit the new criteria.
    pub fn cycle(&mut self, right: bool, projects: &[Project], users: &[User]) -> bool {
        let (sel, len) = match self.focused {
            0 => (&mut self.project_sel, projects.len() + 1),
            1 => (&mut self.assignee_sel, users.len() + 1),
            2 => (&mut self.status_sel, Status::ALL.len() + 1),
            _ => (&mut self.type_sel, TaskType::ALL.len() + 1),
        };
        if len <= 1 {
            return false;
        }
        *sel = if right {
            (*sel + 1) % len
        } else if *sel == 0 {
            len - 1
        } else {
            *sel - 1
        };
        true
    }

    /// Reset every control to "all". Returns true when anything was set.
    pub fn clear(&mut self) -> bool {
        let was_set =
            self.project_sel + self.assignee_sel + self.status_sel + self.type_sel > 0;
        self.project_sel = 0;
        self.assignee_sel = 0;
        self.status_sel = 0;
        self.type_sel = 0;
        was_set
    }

    /// The complete current filter-criteria object.
    pub fn criteria(&self, projects: &[Project], users: &[User]) -> FilterCriteria {
        FilterCriteria {
            project_id: self
                .project_sel
                .checked_sub(1)
                .and_then(|i| projects.get(i))
                .map(|p| p.id),
            assignee_id: self
                .assignee_sel
                .checked_sub(1)
                .and_then(|i| users.get(i))
                .map(|u| u.id),
            status: self.status_sel.checked_sub(1).map(|i| Status::ALL[i]),
            task_type: self.type_sel.checked_sub(1).map(|i| TaskType::ALL[i]),
        }
    }

    /// Display value for one control.
    pub fn control_value(&self, control: usize, projects: &[Project], users: &[User]) -> String {
        match control {
            0 => self
                .project_sel
                .checked_sub(1)
                .and_then(|i| projects.get(i))
                .map(|p| p.name.clone())
                .unwrap_or_else(|| "All".into()),
            1 => self
                .assignee_sel
                .checked_sub(1)
                .and_then(|i| users.get(i))
                .map(|u| u.name.clone())
                .unwrap_or_else(|| "All".into()),
            2 => self
                .status_sel
                .checked_sub(1)
                .map(|i| Status::ALL[i].label().to_string())
                .unwrap_or_else(|| "All".into()),
            _ => self
                .type_sel
                .checked_sub(1)
                .map(|i| TaskType::ALL[i].label().to_string())
                .unwrap_or_else(|| "All".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs() -> (Vec<Project>, Vec<User>) {
        (
            vec![Project { id: 7, name: "Website".into() }],
            vec![User { id: 3, name: "Alice".into() }],
        )
    }

    #[test]
    fn cycling_emits_complete_criteria() {
        let (projects, users) = refs();
        let mut bar = FilterBar::new();
        assert!(bar.criteria(&projects, &users).is_empty());

        assert!(bar.cycle(true, &projects, &users));
        let criteria = bar.criteria(&projects, &users);
        assert_eq!(criteria.project_id, Some(7));
        assert_eq!(criteria.assignee_id, None);

        bar.next_control();
        bar.next_control(); // status
        assert!(bar.cycle(true, &projects, &users));
        let criteria = bar.criteria(&projects, &users);
        assert_eq!(criteria.project_id, Some(7));
        assert_eq!(criteria.status, Some(Status::Todo));
    }

    #[test]
    fn clear_resets_every_control() {
        let (projects, users) = refs();
        let mut bar = FilterBar::new();
        assert!(!bar.clear());
        bar.cycle(true, &projects, &users);
        assert!(bar.clear());
        assert!(bar.criteria(&projects, &users).is_empty());
    }
}
