//! Task sequencer and tracker view.
//!
//! Tasks are a derived view over section statuses and are never stored. The
//! sequencer walks the tasks in order once, carrying whether the previous task
//! was satisfied (completed or not required). A task is clickable when it has
//! been started, is not required, or its predecessor is satisfied.

use crate::application::Application;
use crate::branching::{BranchFlags, CertificateOutcome};
use crate::constants::{
    SPUTUM_CHECK_PAGE, SPUTUM_COLLECTION_PAGE, SPUTUM_RESULTS_PAGE, SPUTUM_SAMPLE_COUNT,
};
use crate::sections::fields::sample_key;
use crate::sections::{SectionKind, SectionStatus};
use serde::Serialize;
use std::fmt;

/// Status shown against a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskStatus {
    #[serde(rename = "Not yet started")]
    NotYetStarted,
    #[serde(rename = "Cannot start yet")]
    CannotStartYet,
    #[serde(rename = "In progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Not required")]
    NotRequired,
    #[serde(rename = "Certificate issued")]
    CertificateIssued,
    #[serde(rename = "Certificate not issued")]
    CertificateNotIssued,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::NotYetStarted => "Not yet started",
            TaskStatus::CannotStartYet => "Cannot start yet",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::NotRequired => "Not required",
            TaskStatus::CertificateIssued => "Certificate issued",
            TaskStatus::CertificateNotIssued => "Certificate not issued",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input to the sequencer: a task and its stored section status, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskInput {
    pub section: SectionKind,
    pub status: Option<SectionStatus>,
}

/// Sequencer output for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskState {
    pub section: SectionKind,
    pub status: TaskStatus,
    pub clickable: bool,
}

/// Computes the status and clickability of each task, in order.
///
/// Missing section statuses count as not yet started. A task ruled out by a
/// branch is "Not required" whatever its own status, and satisfies the next task.
pub fn sequence_tasks(tasks: &[TaskInput], flags: &BranchFlags) -> Vec<TaskState> {
    let mut previous_completed = true;
    let mut states = Vec::with_capacity(tasks.len());

    for task in tasks {
        let section_status = task.status.unwrap_or_default();
        let (status, clickable) = if flags.forces_not_required(task.section) {
            (TaskStatus::NotRequired, true)
        } else {
            match section_status {
                SectionStatus::Completed => (completed_label(task.section, flags), true),
                SectionStatus::InProgress => (TaskStatus::InProgress, true),
                SectionStatus::NotRequired => (TaskStatus::NotRequired, true),
                SectionStatus::NotYetStarted if previous_completed => {
                    (TaskStatus::NotYetStarted, true)
                }
                SectionStatus::NotYetStarted => (TaskStatus::CannotStartYet, false),
            }
        };

        previous_completed = section_status.is_completed() || status == TaskStatus::NotRequired;
        states.push(TaskState {
            section: task.section,
            status,
            clickable,
        });
    }
    states
}

fn completed_label(kind: SectionKind, flags: &BranchFlags) -> TaskStatus {
    match (kind, flags.certificate_outcome) {
        (SectionKind::TbCertificate, Some(CertificateOutcome::Issued)) => {
            TaskStatus::CertificateIssued
        }
        (SectionKind::TbCertificate, Some(CertificateOutcome::NotIssued)) => {
            TaskStatus::CertificateNotIssued
        }
        _ => TaskStatus::Completed,
    }
}

// ============================================================================
// TRACKER VIEW
// ============================================================================

/// Application-level status shown in the tracker header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScreeningStatus {
    #[serde(rename = "In progress")]
    InProgress,
    #[serde(rename = "Certificate issued")]
    CertificateIssued,
    #[serde(rename = "Certificate not issued")]
    CertificateNotIssued,
}

impl fmt::Display for ScreeningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScreeningStatus::InProgress => "In progress",
            ScreeningStatus::CertificateIssued => "Certificate issued",
            ScreeningStatus::CertificateNotIssued => "Certificate not issued",
        })
    }
}

/// A task row in the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerTask {
    pub section: SectionKind,
    pub name: &'static str,
    pub status: TaskStatus,
    pub clickable: bool,
    pub link: &'static str,
}

/// A numbered group of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskGroup {
    pub heading: &'static str,
    pub tasks: Vec<TrackerTask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tracker {
    pub overall_status: ScreeningStatus,
    pub groups: Vec<TaskGroup>,
}

const HEADINGS: [&str; 3] = [
    "1. Visa applicant information",
    "2. Medical screening",
    "3. Review outcome",
];

fn heading_index(kind: SectionKind) -> usize {
    match kind {
        SectionKind::ApplicantDetails | SectionKind::Travel => 0,
        SectionKind::TbCertificate => 2,
        _ => 1,
    }
}

impl Tracker {
    /// Builds the tracker for `app`.
    pub fn for_application(app: &Application) -> Self {
        let flags = BranchFlags::from_application(app);
        let inputs: Vec<TaskInput> = SectionKind::ALL
            .into_iter()
            .map(|section| TaskInput {
                section,
                status: app.section_ref(section).map(|s| s.status),
            })
            .collect();

        let mut groups: Vec<TaskGroup> = HEADINGS
            .into_iter()
            .map(|heading| TaskGroup {
                heading,
                tasks: Vec::new(),
            })
            .collect();

        let mut overall_status = ScreeningStatus::InProgress;
        for state in sequence_tasks(&inputs, &flags) {
            match state.status {
                TaskStatus::CertificateIssued => overall_status = ScreeningStatus::CertificateIssued,
                TaskStatus::CertificateNotIssued => {
                    overall_status = ScreeningStatus::CertificateNotIssued
                }
                _ => {}
            }
            groups[heading_index(state.section)].tasks.push(TrackerTask {
                section: state.section,
                name: state.section.task_name(),
                status: state.status,
                clickable: state.clickable,
                link: task_link(app, state.section),
            });
        }

        Self {
            overall_status,
            groups,
        }
    }

    /// All task rows, in order.
    pub fn tasks(&self) -> impl Iterator<Item = &TrackerTask> {
        self.groups.iter().flat_map(|group| group.tasks.iter())
    }

    pub fn task(&self, kind: SectionKind) -> Option<&TrackerTask> {
        self.tasks().find(|task| task.section == kind)
    }
}

/// Where a task's link points: the check page once completed, otherwise the form.
pub fn task_link(app: &Application, kind: SectionKind) -> &'static str {
    let completed = app.status(kind).is_completed();
    match kind {
        SectionKind::SputumCollection if completed => SPUTUM_CHECK_PAGE,
        SectionKind::SputumCollection if all_collections_recorded(app) => SPUTUM_RESULTS_PAGE,
        SectionKind::SputumCollection => SPUTUM_COLLECTION_PAGE,
        _ if completed => kind.check_page(),
        _ => kind.entry_page(),
    }
}

fn all_collections_recorded(app: &Application) -> bool {
    let Some(section) = app.section_ref(SectionKind::SputumCollection) else {
        return false;
    };
    (1..=SPUTUM_SAMPLE_COUNT).all(|n| {
        section.date(&sample_key(n, "Date")).is_some()
            && section.text(&sample_key(n, "CollectionMethod")).is_some()
    })
}
