use serde::Deserialize;

use crate::sprint::sheets::error::{Result, SyncError};

/// Endpoint used when reporting malformed milestone payloads.
pub const MILESTONES_ENDPOINT: &str = "/api/v1/milestones";

/// Project as returned by the task tracker. Only the name is relevant; it is
/// both the project's identity and the worksheet it is written to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    pub name: String,
}

/// Embedded summary of the project a milestone belongs to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
}

/// Embedded summary of a user story assignee.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssigneeInfo {
    pub full_name_display: String,
}

/// A user story inside a milestone.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserStory {
    pub is_closed: bool,
    /// Identifier of the assigned user, `None` when the story is unassigned.
    pub assigned_to: Option<u64>,
    pub assigned_to_extra_info: Option<AssigneeInfo>,
    /// Estimated points; stories without an estimate count as zero.
    pub total_points: Option<f64>,
}

/// A milestone (sprint) as returned by the task tracker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Milestone {
    pub name: String,
    pub project_extra_info: ProjectInfo,
    pub total_points: Option<f64>,
    pub user_stories: Vec<UserStory>,
}

/// Completed points of one assignee within a sprint.
#[derive(Debug, Clone, PartialEq)]
pub struct AssigneePoints {
    pub name: String,
    pub points: f64,
}

/// Aggregated numbers for one sprint.
#[derive(Debug, Clone, PartialEq)]
pub struct SprintStats {
    pub name: String,
    /// Per-assignee totals in the order assignees were first encountered.
    pub users: Vec<AssigneePoints>,
    /// Total points declared on the milestone itself.
    pub total_points: Option<f64>,
}

impl SprintStats {
    /// Points completed by `assignee`, if they closed anything in this sprint.
    pub fn points_for(&self, assignee: &str) -> Option<f64> {
        self.users
            .iter()
            .find(|entry| entry.name == assignee)
            .map(|entry| entry.points)
    }

    fn add_points(&mut self, assignee: &str, points: f64) {
        match self.users.iter_mut().find(|entry| entry.name == assignee) {
            Some(entry) => entry.points += points,
            None => self.users.push(AssigneePoints {
                name: assignee.to_string(),
                points,
            }),
        }
    }
}

/// Aggregated sprints of one project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectStats {
    pub name: String,
    pub sprints: Vec<SprintStats>,
}

/// Groups milestones under their projects and sums the points of closed,
/// assigned user stories per assignee.
///
/// Milestones are matched to projects by project name. The order of both
/// collections is preserved as delivered by the tracker.
pub fn aggregate(projects: &[Project], milestones: &[Milestone]) -> Result<Vec<ProjectStats>> {
    let mut stats = Vec::with_capacity(projects.len());

    for project in projects {
        let mut sprints = Vec::new();
        for milestone in milestones
            .iter()
            .filter(|milestone| milestone.project_extra_info.name == project.name)
        {
            sprints.push(sprint_stats(milestone)?);
        }
        stats.push(ProjectStats {
            name: project.name.clone(),
            sprints,
        });
    }

    Ok(stats)
}

fn sprint_stats(milestone: &Milestone) -> Result<SprintStats> {
    let mut sprint = SprintStats {
        name: milestone.name.clone(),
        users: Vec::new(),
        total_points: milestone.total_points,
    };

    for story in &milestone.user_stories {
        if !story.is_closed || story.assigned_to.is_none() {
            continue;
        }
        let assignee = story.assigned_to_extra_info.as_ref().ok_or_else(|| {
            SyncError::malformed(
                MILESTONES_ENDPOINT,
                format!(
                    "assigned story in milestone '{}' lacks assigned_to_extra_info",
                    milestone.name
                ),
            )
        })?;
        sprint.add_points(
            &assignee.full_name_display,
            story.total_points.unwrap_or(0.0),
        );
    }

    Ok(sprint)
}

/// Renders a point value the way it is written into the sheet: whole numbers
/// lose their fractional part, everything else keeps its shortest decimal form.
pub fn normalize_points(points: f64) -> String {
    // Adding positive zero turns -0.0 into 0.0.
    let points = points + 0.0;
    if points.is_finite() && points.fract() == 0.0 {
        format!("{points:.0}")
    } else {
        points.to_string()
    }
}
