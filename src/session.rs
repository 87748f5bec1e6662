//! Day session — opens a day, holds the single active exercise, and runs the
//! one generic completion side effect.
//!
//! The active exercise is one discriminated value rather than a flag per
//! exercise kind: beginning a day sets it, completing or abandoning clears it.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::content::{ContentCatalog, Exercise, ExerciseKind};
use crate::error::{Error, SessionError};
use crate::flow::aggregate::AggregatedResult;
use crate::flow::engine::FlowEngine;
use crate::progress::ProgressTracker;
use crate::store::traits::Storage;
use crate::streak::{StreakTracker, StreakUpdate};

/// The exercise currently in progress, if any.
pub enum ActiveExercise {
    Flow(FlowEngine),
    Journal { prompt: String, draft: String },
}

/// Result of opening a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayLookup {
    /// Unknown category, path, or day — shown to the user as "not found".
    NotFound,
    Open(DayView),
}

/// What the host renders for an opened day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
    pub category: String,
    pub path: String,
    pub day: u32,
    pub title: String,
    pub kind: ExerciseKind,
    pub completed: bool,
    pub reflection: Option<String>,
}

/// Summary returned by the completion side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCompletion {
    pub day: u32,
    /// The next day of the path, if there is one.
    pub next_day: Option<u32>,
    pub streak: StreakUpdate,
}

struct OpenedDay {
    category: String,
    path: String,
    day: u32,
}

/// Drives one user's progress through a day of a path.
pub struct DaySession {
    catalog: Arc<ContentCatalog>,
    progress: ProgressTracker,
    streaks: StreakTracker,
    opened: Option<OpenedDay>,
    active: Option<ActiveExercise>,
}

impl DaySession {
    pub fn new(catalog: Arc<ContentCatalog>, store: Arc<dyn Storage>) -> Self {
        Self {
            catalog,
            progress: ProgressTracker::new(store.clone()),
            streaks: StreakTracker::new(store),
            opened: None,
            active: None,
        }
    }

    /// Open a day for viewing. Any previously active exercise is dropped.
    pub async fn open(&mut self, category: &str, path: &str, day: u32) -> DayLookup {
        self.active = None;
        let Some(day_spec) = self.catalog.day(category, path, day) else {
            self.opened = None;
            return DayLookup::NotFound;
        };

        let view = DayView {
            category: category.to_string(),
            path: path.to_string(),
            day,
            title: day_spec.title.clone(),
            kind: day_spec.exercise.kind(),
            completed: self.progress.is_day_complete(category, path, day).await,
            reflection: self.progress.reflection(category, path, day).await,
        };
        self.opened = Some(OpenedDay {
            category: category.to_string(),
            path: path.to_string(),
            day,
        });
        DayLookup::Open(view)
    }

    /// Start the opened day's exercise.
    pub fn begin(&mut self) -> Result<&mut ActiveExercise, Error> {
        let opened = self.opened.as_ref().ok_or(SessionError::NoDayOpen)?;
        let day = self
            .catalog
            .day(&opened.category, &opened.path, opened.day)
            .ok_or(SessionError::NoDayOpen)?;

        let active = match &day.exercise {
            Exercise::Flow(config) => ActiveExercise::Flow(FlowEngine::new(config.clone())?),
            Exercise::Journal { prompt } => ActiveExercise::Journal {
                prompt: prompt.clone(),
                draft: String::new(),
            },
        };
        debug!(
            category = %opened.category,
            path = %opened.path,
            day = opened.day,
            "Exercise started"
        );
        Ok(self.active.insert(active))
    }

    /// The exercise in progress, if any.
    pub fn active(&mut self) -> Option<&mut ActiveExercise> {
        self.active.as_mut()
    }

    /// Drop the exercise in progress without completing it.
    pub fn abandon(&mut self) {
        self.active = None;
    }

    /// Complete the active flow exercise with its confirmed result.
    pub async fn complete_flow(
        &mut self,
        result: AggregatedResult,
        today: NaiveDate,
    ) -> Result<DayCompletion, Error> {
        let (category, path, day) = self.opened_coords()?;
        if !matches!(self.active, Some(ActiveExercise::Flow(_))) {
            return Err(SessionError::NotAFlow.into());
        }
        self.progress
            .save_exercise_result(&category, &path, day, &result)
            .await;
        Ok(self.finish_day(&category, &path, day, today).await)
    }

    /// Complete the active journal exercise; the text becomes the day's
    /// reflection.
    pub async fn complete_journal(
        &mut self,
        text: &str,
        today: NaiveDate,
    ) -> Result<DayCompletion, Error> {
        let (category, path, day) = self.opened_coords()?;
        if !matches!(self.active, Some(ActiveExercise::Journal { .. })) {
            return Err(SessionError::NotAJournal.into());
        }
        self.progress.save_reflection(&category, &path, day, text).await;
        Ok(self.finish_day(&category, &path, day, today).await)
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn streaks(&self) -> &StreakTracker {
        &self.streaks
    }

    fn opened_coords(&self) -> Result<(String, String, u32), Error> {
        let opened = self.opened.as_ref().ok_or(SessionError::NoDayOpen)?;
        Ok((opened.category.clone(), opened.path.clone(), opened.day))
    }

    /// The single generic completion side effect: record the day, advance the
    /// current-day marker, touch the streak, clear the active exercise.
    /// Storage failures inside degrade per the storage discipline; completion
    /// itself always succeeds from the host's perspective.
    async fn finish_day(
        &mut self,
        category: &str,
        path: &str,
        day: u32,
        today: NaiveDate,
    ) -> DayCompletion {
        self.progress.record_day_complete(category, path, day).await;

        let total_days = self
            .catalog
            .path(category, path)
            .map(|path| path.days.len() as u32)
            .unwrap_or(day);
        let next_day = (day < total_days).then_some(day + 1);
        if let Some(next) = next_day {
            self.progress.set_current_day(category, path, next).await;
        }

        let streak = self.streaks.record_activity(today).await;
        self.active = None;
        debug!(category, path, day, "Day completed");

        DayCompletion {
            day,
            next_day,
            streak,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::test_support::small_catalog;
    use crate::flow::engine::Advance;
    use crate::flow::position::ScreenPosition;
    use crate::store::MemoryStorage;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
    }

    fn session() -> DaySession {
        DaySession::new(Arc::new(small_catalog()), Arc::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn unknown_day_is_not_found() {
        let mut session = session();
        assert_eq!(session.open("career", "pivot", 99).await, DayLookup::NotFound);
        assert_eq!(session.open("sports", "pivot", 1).await, DayLookup::NotFound);
        assert!(session.begin().is_err());
    }

    #[tokio::test]
    async fn open_reports_day_state() {
        let mut session = session();
        let DayLookup::Open(view) = session.open("career", "pivot", 1).await else {
            panic!("expected open day");
        };
        assert_eq!(view.title, "What do you value?");
        assert_eq!(view.kind, ExerciseKind::Flow);
        assert!(!view.completed);
        assert_eq!(view.reflection, None);
    }

    #[tokio::test]
    async fn begin_requires_an_open_day() {
        let mut session = session();
        assert!(session.begin().is_err());
        assert!(session.active().is_none());
    }

    #[tokio::test]
    async fn flow_day_runs_to_completion() {
        let mut session = session();
        session.open("career", "pivot", 1).await;

        let ActiveExercise::Flow(engine) = session.begin().unwrap() else {
            panic!("expected flow exercise");
        };
        for _ in 0..engine.card_count() {
            engine.select("a").unwrap();
            assert!(!matches!(engine.advance(), Advance::Blocked { .. }));
        }
        assert_eq!(engine.position(), ScreenPosition::Final);
        let result = engine.confirm().unwrap();

        let completion = session.complete_flow(result.clone(), date(10)).await.unwrap();
        assert_eq!(completion.day, 1);
        assert_eq!(completion.next_day, Some(2));
        assert_eq!(completion.streak.count(), 1);
        assert!(session.active().is_none());

        // Persisted state reflects the completion.
        assert!(session.progress().is_day_complete("career", "pivot", 1).await);
        assert_eq!(session.progress().current_day("career", "pivot").await, 2);
        assert_eq!(
            session.progress().exercise_result("career", "pivot", 1).await,
            Some(result)
        );
    }

    #[tokio::test]
    async fn journal_day_saves_the_reflection() {
        let mut session = session();
        session.open("career", "pivot", 2).await;

        let ActiveExercise::Journal { prompt, draft } = session.begin().unwrap() else {
            panic!("expected journal exercise");
        };
        assert!(prompt.contains("free"));
        draft.push_str("I would move to the coast.");
        let text = draft.clone();

        let completion = session.complete_journal(&text, date(10)).await.unwrap();
        assert_eq!(completion.day, 2);
        // Last day of the path: nothing follows.
        assert_eq!(completion.next_day, None);

        assert_eq!(
            session.progress().reflection("career", "pivot", 2).await,
            Some(text)
        );

        let DayLookup::Open(view) = session.open("career", "pivot", 2).await else {
            panic!("expected open day");
        };
        assert!(view.completed);
        assert!(view.reflection.is_some());
    }

    #[tokio::test]
    async fn completing_wrong_exercise_kind_is_rejected() {
        let mut session = session();
        session.open("career", "pivot", 2).await;
        session.begin().unwrap();

        let result = AggregatedResult::Narrative {
            sentences: Vec::new(),
        };
        assert!(session.complete_flow(result, date(10)).await.is_err());

        session.open("career", "pivot", 1).await;
        session.begin().unwrap();
        assert!(session.complete_journal("text", date(10)).await.is_err());
    }

    #[tokio::test]
    async fn abandon_clears_the_active_exercise() {
        let mut session = session();
        session.open("career", "pivot", 1).await;
        session.begin().unwrap();
        assert!(session.active().is_some());
        session.abandon();
        assert!(session.active().is_none());
    }

    #[tokio::test]
    async fn consecutive_completions_extend_the_streak() {
        let mut session = session();

        session.open("career", "pivot", 1).await;
        session.begin().unwrap();
        let ActiveExercise::Flow(engine) = session.active().unwrap() else {
            panic!("expected flow");
        };
        for _ in 0..engine.card_count() {
            engine.select("b").unwrap();
            engine.advance();
        }
        let result = engine.confirm().unwrap();
        let first = session.complete_flow(result, date(10)).await.unwrap();
        assert_eq!(first.streak, StreakUpdate::Started { count: 1 });

        session.open("career", "pivot", 2).await;
        session.begin().unwrap();
        let second = session.complete_journal("done", date(11)).await.unwrap();
        assert_eq!(second.streak, StreakUpdate::Extended { count: 2 });
    }
}
