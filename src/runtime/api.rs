//! Transport seam between action creators and the survey backend.

use crate::questionnaire::Questionnaire;
use crate::respondents::{RespondentGroup, RespondentGroups};
use crate::store::NormalizedResponse;
use crate::survey::{PanelSurvey, Survey};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait SurveyApi: Send + Sync {
    async fn fetch_questionnaire(&self, project_id: i64, id: i64) -> Result<Questionnaire>;

    /// Persist a questionnaire and return the server's copy.
    async fn save_questionnaire(&self, questionnaire: &Questionnaire) -> Result<Questionnaire>;

    async fn fetch_survey(&self, project_id: i64, id: i64) -> Result<Survey>;

    async fn fetch_panel_survey(&self, project_id: i64, id: i64) -> Result<PanelSurvey>;

    async fn fetch_respondent_groups(&self, project_id: i64, survey_id: i64) -> Result<RespondentGroups>;
}

/// Serves normalized responses from JSON files on disk:
///
/// ```text
/// projects/<project>/questionnaires/<id>.json
/// projects/<project>/surveys/<id>.json
/// projects/<project>/surveys/<id>/respondent_groups.json
/// projects/<project>/panel_surveys/<id>.json
/// ```
#[derive(Debug, Clone)]
pub struct FixtureApi {
    root: PathBuf,
}

impl FixtureApi {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_dir(&self, project_id: i64) -> PathBuf {
        self.root.join("projects").join(project_id.to_string())
    }

    async fn read_response(&self, path: &Path) -> Result<NormalizedResponse> {
        log::debug!("Reading fixture {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read fixture: {}", path.display()))?;

        serde_json::from_str(&content).with_context(|| format!("Failed to parse fixture: {}", path.display()))
    }

    async fn read_primary<T: DeserializeOwned>(&self, path: PathBuf, entity_type: &str) -> Result<T> {
        self.read_response(&path).await?.primary(entity_type)
    }

    /// Next free questionnaire id in a project directory.
    async fn next_questionnaire_id(&self, dir: &Path) -> Result<i64> {
        let mut next = 1;
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(next),
            Err(e) => return Err(e).with_context(|| format!("Failed to list {}", dir.display())),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if let Some(id) = path.file_stem().and_then(|s| s.to_str()).and_then(|s| s.parse::<i64>().ok()) {
                next = next.max(id + 1);
            }
        }
        Ok(next)
    }
}

#[async_trait]
impl SurveyApi for FixtureApi {
    async fn fetch_questionnaire(&self, project_id: i64, id: i64) -> Result<Questionnaire> {
        let path = self.project_dir(project_id).join("questionnaires").join(format!("{}.json", id));
        self.read_primary(path, "questionnaires").await
    }

    async fn save_questionnaire(&self, questionnaire: &Questionnaire) -> Result<Questionnaire> {
        let dir = self.project_dir(questionnaire.project_id).join("questionnaires");
        let mut saved = questionnaire.clone();
        if saved.id.is_none() {
            saved.id = Some(self.next_questionnaire_id(&dir).await?);
        }
        let Some(id) = saved.id else {
            bail!("Questionnaire could not be assigned an id");
        };

        let response = NormalizedResponse::single("questionnaires", serde_json::to_value(&saved)?);
        let content = serde_json::to_string_pretty(&response)?;

        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(format!("{}.json", id));
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write fixture: {}", path.display()))?;

        log::info!("Saved questionnaire {} to {}", id, path.display());
        Ok(saved)
    }

    async fn fetch_survey(&self, project_id: i64, id: i64) -> Result<Survey> {
        let path = self.project_dir(project_id).join("surveys").join(format!("{}.json", id));
        self.read_primary(path, "surveys").await
    }

    async fn fetch_panel_survey(&self, project_id: i64, id: i64) -> Result<PanelSurvey> {
        let path = self.project_dir(project_id).join("panel_surveys").join(format!("{}.json", id));
        self.read_primary(path, "panelSurveys").await
    }

    async fn fetch_respondent_groups(&self, project_id: i64, survey_id: i64) -> Result<RespondentGroups> {
        let path = self
            .project_dir(project_id)
            .join("surveys")
            .join(survey_id.to_string())
            .join("respondent_groups.json");
        let groups: Vec<RespondentGroup> = self.read_response(&path).await?.all("respondentGroups")?;
        Ok(RespondentGroups::new(project_id, survey_id, groups))
    }
}
