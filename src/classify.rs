//! Classification engine: numeric and flag fields to labels and colors.
//!
//! Every function here is pure, stateless and total: out-of-range input
//! degrades to a default category ("All" / gray) instead of failing, because
//! these run on whatever the API returned, valid or not.

use crate::fields::{ColorToken, DependencyStatus, EffectiveStatus, TaskState};
use crate::task::Task;

/// Priority bucket label. 1 is most urgent; anything outside 1..=5 is the
/// "All" sentinel used by unset filters.
pub fn priority_label(priority: i64) -> &'static str {
    match priority {
        1 => "Critical",
        2 => "High",
        3 => "Medium",
        4 => "Normal",
        5 => "Low",
        _ => "All",
    }
}

/// Badge color for a priority. 3 and 4 share the green mid-low band.
pub fn priority_color(priority: i64) -> ColorToken {
    match priority {
        1 => ColorToken::Red,
        2 => ColorToken::Amber,
        3 | 4 => ColorToken::Green,
        _ => ColorToken::Gray,
    }
}

/// Progress bar color. Tiers are evaluated top-down with inclusive lower
/// bounds: the first matching tier wins.
pub fn progress_color(progress: i64) -> ColorToken {
    if progress >= 80 {
        ColorToken::Green
    } else if progress >= 40 {
        ColorToken::Amber
    } else if progress >= 25 {
        ColorToken::Orange
    } else {
        ColorToken::Red
    }
}

/// Badge color for a raw dependency status string, case-insensitive.
/// Unrecognised input falls back to gray.
pub fn dependency_status_color(status: &str) -> ColorToken {
    match DependencyStatus::parse(status) {
        Some(DependencyStatus::Completed) => ColorToken::Green,
        Some(DependencyStatus::InProcess) => ColorToken::Amber,
        Some(DependencyStatus::Pending) => ColorToken::Orange,
        None => ColorToken::Gray,
    }
}

/// Badge color for a dependency's derived display status. Overdue is the
/// red alarm state; the others match the stored-status palette.
pub fn effective_status_color(status: EffectiveStatus) -> ColorToken {
    match status {
        EffectiveStatus::Completed => ColorToken::Green,
        EffectiveStatus::InProcess => ColorToken::Amber,
        EffectiveStatus::Pending => ColorToken::Orange,
        EffectiveStatus::Overdue => ColorToken::Red,
    }
}

/// Derive the task state from the legacy lifecycle flags.
///
/// Precedence when several flags are set: completed > in progress > to-do.
/// No flag set yields `Unset`, displayed as "All".
pub fn derived_state(task: &Task) -> TaskState {
    if task.completed == Some(true) {
        TaskState::Completed
    } else if task.in_progress == Some(true) {
        TaskState::InProgress
    } else if task.to_do == Some(true) {
        TaskState::Pending
    } else {
        TaskState::Unset
    }
}

/// Display label for a derived task state.
pub fn state_label(state: TaskState) -> &'static str {
    match state {
        TaskState::Completed => "Completed",
        TaskState::InProgress => "In Progress",
        TaskState::Pending => "Pending",
        TaskState::Unset => "All",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(to_do: bool, in_progress: bool, completed: bool) -> Task {
        Task {
            id: "t1".into(),
            title: "Migration".into(),
            client: "Acme".into(),
            priority: 3,
            to_do: Some(to_do),
            in_progress: Some(in_progress),
            completed: Some(completed),
            ..Task::default()
        }
    }

    #[test]
    fn priority_labels_are_total() {
        assert_eq!(priority_label(1), "Critical");
        assert_eq!(priority_label(2), "High");
        assert_eq!(priority_label(3), "Medium");
        assert_eq!(priority_label(4), "Normal");
        assert_eq!(priority_label(5), "Low");
        assert_eq!(priority_label(0), "All");
        assert_eq!(priority_label(6), "All");
        assert_eq!(priority_label(-7), "All");
    }

    #[test]
    fn priority_colors_keep_three_and_four_green() {
        assert_eq!(priority_color(1), ColorToken::Red);
        assert_eq!(priority_color(2), ColorToken::Amber);
        assert_eq!(priority_color(3), ColorToken::Green);
        assert_eq!(priority_color(4), ColorToken::Green);
        assert_eq!(priority_color(99), ColorToken::Gray);
    }

    #[test]
    fn progress_tier_bounds_are_inclusive() {
        assert_eq!(progress_color(100), ColorToken::Green);
        assert_eq!(progress_color(80), ColorToken::Green);
        assert_eq!(progress_color(79), ColorToken::Amber);
        assert_eq!(progress_color(40), ColorToken::Amber);
        assert_eq!(progress_color(39), ColorToken::Orange);
        assert_eq!(progress_color(25), ColorToken::Orange);
        assert_eq!(progress_color(24), ColorToken::Red);
        assert_eq!(progress_color(0), ColorToken::Red);
    }

    #[test]
    fn dependency_colors_accept_both_vocabularies() {
        assert_eq!(dependency_status_color("completado"), ColorToken::Green);
        assert_eq!(dependency_status_color("Completed"), ColorToken::Green);
        assert_eq!(dependency_status_color("EN PROCESO"), ColorToken::Amber);
        assert_eq!(dependency_status_color("pending"), ColorToken::Orange);
        assert_eq!(dependency_status_color("vencido"), ColorToken::Gray);
        assert_eq!(dependency_status_color(""), ColorToken::Gray);
    }

    #[test]
    fn completed_flag_wins_over_the_others() {
        assert_eq!(derived_state(&flags(true, true, true)), TaskState::Completed);
        assert_eq!(derived_state(&flags(true, true, false)), TaskState::InProgress);
        assert_eq!(derived_state(&flags(true, false, false)), TaskState::Pending);
        assert_eq!(derived_state(&flags(false, false, false)), TaskState::Unset);
    }

    #[test]
    fn absent_flags_read_as_unset() {
        let mut t = flags(false, false, false);
        t.to_do = None;
        t.in_progress = None;
        t.completed = None;
        assert_eq!(derived_state(&t), TaskState::Unset);
        assert_eq!(state_label(derived_state(&t)), "All");
    }
}
