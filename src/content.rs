use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

static BUNDLED_PROJECTS: &str = include_str!("../content/projects.json");

#[derive(Debug, Error)]
pub enum ContentError {
  #[error("failed to read {path}: {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },
  #[error("invalid project list: {0}")]
  Parse(#[from] serde_json::Error),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
  Completed,
  InProgress,
  Planned,
}

impl fmt::Display for ProjectStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      ProjectStatus::Completed => "completed",
      ProjectStatus::InProgress => "in-progress",
      ProjectStatus::Planned => "planned",
    })
  }
}

/// A portfolio entry. Each one is drawn as one orbiting planet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
  pub id: String,
  pub title: String,
  pub description: String,
  #[serde(default)]
  pub long_description: String,
  #[serde(default)]
  pub technologies: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub github_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub demo_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
  /// Model asset for the planet; planets that have one are drawn larger
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub model_path: Option<String>,
  pub status: ProjectStatus,
  #[serde(default)]
  pub featured: bool,
}

pub fn parse_projects(json: &str) -> Result<Vec<Project>, ContentError> {
  Ok(serde_json::from_str(json)?)
}

pub fn load_projects(path: impl AsRef<Path>) -> Result<Vec<Project>, ContentError> {
  let path = path.as_ref();
  let json = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
    path: path.display().to_string(),
    source,
  })?;
  parse_projects(&json)
}

/// Projects shipped with the binary.
pub fn bundled_projects() -> Vec<Project> {
  match parse_projects(BUNDLED_PROJECTS) {
    Ok(projects) => projects,
    Err(e) => {
      log::error!("bundled project list is broken: {e}");
      Vec::new()
    }
  }
}

/// Resolve a user query to a project index: an in-range number first,
/// then a case-insensitive title substring or exact id.
pub fn find_project(projects: &[Project], query: &str) -> Option<usize> {
  let query = query.trim();
  if query.is_empty() {
    return None;
  }
  if let Ok(i) = query.parse::<usize>() {
    if i < projects.len() {
      return Some(i);
    }
  }
  let needle = query.to_lowercase();
  projects
    .iter()
    .position(|p| p.title.to_lowercase().contains(&needle) || p.id.to_lowercase() == needle)
}

pub fn project_by_id<'a>(projects: &'a [Project], id: &str) -> Option<&'a Project> {
  projects.iter().find(|p| p.id == id)
}

pub fn projects_by_status(projects: &[Project], status: ProjectStatus) -> Vec<&Project> {
  projects.iter().filter(|p| p.status == status).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bundled_list_parses() {
    let projects = bundled_projects();
    assert!(projects.len() >= 3);
    assert!(projects.iter().all(|p| !p.id.is_empty() && !p.title.is_empty()));
  }

  #[test]
  fn wire_format_is_camel_case() {
    let json = r#"[{
      "id": "dot-txt",
      "title": "Dot TXT",
      "description": "Collaborative notes",
      "longDescription": "Real-time note taking",
      "technologies": ["Socket.io"],
      "githubUrl": "https://example.com/dot",
      "modelPath": "/models/dot.glb",
      "status": "in-progress"
    }]"#;
    let projects = parse_projects(json).unwrap();
    let p = &projects[0];
    assert_eq!(p.long_description, "Real-time note taking");
    assert_eq!(p.github_url.as_deref(), Some("https://example.com/dot"));
    assert_eq!(p.model_path.as_deref(), Some("/models/dot.glb"));
    assert_eq!(p.status, ProjectStatus::InProgress);
    assert!(!p.featured);
    assert!(p.demo_url.is_none());
  }

  #[test]
  fn unknown_status_is_rejected() {
    let json = r#"[{"id": "a", "title": "A", "description": "", "status": "abandoned"}]"#;
    assert!(matches!(parse_projects(json), Err(ContentError::Parse(_))));
  }

  #[test]
  fn missing_file_reports_path() {
    let err = load_projects("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.json"));
  }

  fn sample() -> Vec<Project> {
    parse_projects(
      r#"[
        {"id": "dot-txt", "title": "Dot TXT", "description": "", "status": "completed"},
        {"id": "quiz", "title": "Let Him Quizz", "description": "", "status": "completed"},
        {"id": "zippy", "title": "Zippy the Mousse", "description": "", "status": "planned"}
      ]"#,
    )
    .unwrap()
  }

  #[test]
  fn lookup_by_index_title_or_id() {
    let ps = sample();
    assert_eq!(find_project(&ps, "1"), Some(1));
    assert_eq!(find_project(&ps, "mousse"), Some(2));
    assert_eq!(find_project(&ps, "QUIZ"), Some(1));
    assert_eq!(find_project(&ps, "dot-txt"), Some(0));
    assert_eq!(find_project(&ps, "7"), None);
    assert_eq!(find_project(&ps, "  "), None);
    assert_eq!(find_project(&ps, "nothing"), None);
  }

  #[test]
  fn filter_helpers() {
    let ps = sample();
    assert_eq!(project_by_id(&ps, "zippy").map(|p| p.title.as_str()), Some("Zippy the Mousse"));
    assert_eq!(projects_by_status(&ps, ProjectStatus::Completed).len(), 2);
    assert_eq!(ProjectStatus::InProgress.to_string(), "in-progress");
  }
}
