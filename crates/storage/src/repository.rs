use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tryout_core::model::{
    Answer, AnswerDraft, AnswerId, MaterialId, Package, PackageId, Question, QuestionId, Session,
    SessionId, SessionScores, SessionStatus, StudyMaterial, UserId,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    /// A conditional write lost against the session lifecycle.
    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Computes frozen scores from a session's full answer set.
///
/// Called by [`SessionRepository::finish_session`] while the session is locked.
/// The callback may borrow from the caller for the duration of the call.
pub type Scorer<'a> = dyn Fn(&Session, &[Answer]) -> SessionScores + Send + Sync + 'a;

/// Fields needed to open a new attempt; storage assigns the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewSession {
    pub user_id: UserId,
    pub package_id: PackageId,
    pub started_at: DateTime<Utc>,
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

#[async_trait]
pub trait PackageRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the package cannot be stored.
    async fn upsert_package(&self, package: &Package) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures. A missing package is `Ok(None)`.
    async fn get_package(&self, id: PackageId) -> Result<Option<Package>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_packages(&self) -> Result<Vec<Package>, StorageError>;
}

/// Read side of the question catalog, plus seeding.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures. A missing question is `Ok(None)`.
    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError>;

    /// Questions of a package ordered by `number`, then id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn questions_for_package(&self, package_id: PackageId)
    -> Result<Vec<Question>, StorageError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new `in_progress` session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be stored.
    async fn insert_session(&self, new: NewSession) -> Result<Session, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures. A missing session is `Ok(None)`.
    async fn get_session(&self, id: SessionId) -> Result<Option<Session>, StorageError>;

    /// Completed sessions of a package, every attempt included.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn completed_sessions_for_package(
        &self,
        package_id: PackageId,
    ) -> Result<Vec<Session>, StorageError>;

    /// All sessions of a user ordered by `started_at`, then id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn sessions_for_user(&self, user_id: UserId) -> Result<Vec<Session>, StorageError>;

    /// Atomically read every answer of an `in_progress` session, score it with
    /// `scorer`, and mark it completed at `finished_at`.
    ///
    /// No answer can be appended to the session between the read and the
    /// status change.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the session does not exist and
    /// `StorageError::Conflict` if it is no longer in progress. Nothing is
    /// written on failure.
    async fn finish_session(
        &self,
        id: SessionId,
        finished_at: DateTime<Utc>,
        scorer: &Scorer<'_>,
    ) -> Result<Session, StorageError>;
}

#[async_trait]
pub trait AnswerRepository: Send + Sync {
    /// Append a submission to an `in_progress` session. Never overwrites.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the session does not exist and
    /// `StorageError::Conflict` if it is already completed.
    async fn append_answer(&self, draft: AnswerDraft) -> Result<Answer, StorageError>;

    /// Every row of a session, superseded ones included, ordered by
    /// `submitted_at`, then id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn answers_for_session(&self, session_id: SessionId) -> Result<Vec<Answer>, StorageError>;

    /// Every row across all of a user's sessions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn answers_for_user(&self, user_id: UserId) -> Result<Vec<Answer>, StorageError>;
}

#[async_trait]
pub trait MaterialRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the material cannot be stored.
    async fn upsert_material(&self, material: &StudyMaterial) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_materials(&self) -> Result<Vec<StudyMaterial>, StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct Catalog {
    packages: BTreeMap<PackageId, Package>,
    questions: HashMap<QuestionId, Question>,
    materials: BTreeMap<MaterialId, StudyMaterial>,
}

/// Sessions and answers share one lock so `finish_session` is atomic.
#[derive(Default)]
struct Attempts {
    sessions: BTreeMap<SessionId, Session>,
    answers: Vec<Answer>,
    next_session: u64,
    next_answer: u64,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    catalog: Arc<Mutex<Catalog>>,
    attempts: Arc<Mutex<Attempts>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn catalog(&self) -> Result<MutexGuard<'_, Catalog>, StorageError> {
        self.catalog
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    fn attempts(&self) -> Result<MutexGuard<'_, Attempts>, StorageError> {
        self.attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

fn sort_answers(answers: &mut [Answer]) {
    answers.sort_by_key(|a| (a.submitted_at, a.id));
}

#[async_trait]
impl PackageRepository for InMemoryRepository {
    async fn upsert_package(&self, package: &Package) -> Result<(), StorageError> {
        self.catalog()?.packages.insert(package.id(), package.clone());
        Ok(())
    }

    async fn get_package(&self, id: PackageId) -> Result<Option<Package>, StorageError> {
        Ok(self.catalog()?.packages.get(&id).cloned())
    }

    async fn list_packages(&self) -> Result<Vec<Package>, StorageError> {
        Ok(self.catalog()?.packages.values().cloned().collect())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        self.catalog()?
            .questions
            .insert(question.id(), question.clone());
        Ok(())
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError> {
        Ok(self.catalog()?.questions.get(&id).cloned())
    }

    async fn questions_for_package(
        &self,
        package_id: PackageId,
    ) -> Result<Vec<Question>, StorageError> {
        let guard = self.catalog()?;
        let mut out: Vec<Question> = guard
            .questions
            .values()
            .filter(|q| q.package_id() == package_id)
            .cloned()
            .collect();
        out.sort_by_key(|q| (q.number(), q.id()));
        Ok(out)
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn insert_session(&self, new: NewSession) -> Result<Session, StorageError> {
        let mut guard = self.attempts()?;
        guard.next_session += 1;
        let session = Session::start(
            SessionId::new(guard.next_session),
            new.user_id,
            new.package_id,
            new.started_at,
        );
        guard.sessions.insert(session.id(), session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<Session>, StorageError> {
        Ok(self.attempts()?.sessions.get(&id).cloned())
    }

    async fn completed_sessions_for_package(
        &self,
        package_id: PackageId,
    ) -> Result<Vec<Session>, StorageError> {
        Ok(self
            .attempts()?
            .sessions
            .values()
            .filter(|s| s.package_id() == package_id && s.is_completed())
            .cloned()
            .collect())
    }

    async fn sessions_for_user(&self, user_id: UserId) -> Result<Vec<Session>, StorageError> {
        let guard = self.attempts()?;
        let mut out: Vec<Session> = guard
            .sessions
            .values()
            .filter(|s| s.user_id() == user_id)
            .cloned()
            .collect();
        out.sort_by_key(|s| (s.started_at(), s.id()));
        Ok(out)
    }

    async fn finish_session(
        &self,
        id: SessionId,
        finished_at: DateTime<Utc>,
        scorer: &Scorer<'_>,
    ) -> Result<Session, StorageError> {
        let mut guard = self.attempts()?;
        let session = guard.sessions.get(&id).ok_or(StorageError::NotFound)?;
        if session.status() != SessionStatus::InProgress {
            return Err(StorageError::Conflict);
        }

        let mut answers: Vec<Answer> = guard
            .answers
            .iter()
            .filter(|a| a.session_id == id)
            .cloned()
            .collect();
        sort_answers(&mut answers);

        let mut finished = session.clone();
        let scores = scorer(&finished, &answers);
        finished
            .complete(scores, finished_at)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        guard.sessions.insert(id, finished.clone());
        Ok(finished)
    }
}

#[async_trait]
impl AnswerRepository for InMemoryRepository {
    async fn append_answer(&self, draft: AnswerDraft) -> Result<Answer, StorageError> {
        let mut guard = self.attempts()?;
        let session = guard
            .sessions
            .get(&draft.session_id)
            .ok_or(StorageError::NotFound)?;
        if session.status() != SessionStatus::InProgress {
            return Err(StorageError::Conflict);
        }
        guard.next_answer += 1;
        let answer = Answer::from_draft(AnswerId::new(guard.next_answer), draft);
        guard.answers.push(answer.clone());
        Ok(answer)
    }

    async fn answers_for_session(&self, session_id: SessionId) -> Result<Vec<Answer>, StorageError> {
        let guard = self.attempts()?;
        let mut out: Vec<Answer> = guard
            .answers
            .iter()
            .filter(|a| a.session_id == session_id)
            .cloned()
            .collect();
        sort_answers(&mut out);
        Ok(out)
    }

    async fn answers_for_user(&self, user_id: UserId) -> Result<Vec<Answer>, StorageError> {
        let guard = self.attempts()?;
        let mut out: Vec<Answer> = guard
            .answers
            .iter()
            .filter(|a| {
                guard
                    .sessions
                    .get(&a.session_id)
                    .is_some_and(|s| s.user_id() == user_id)
            })
            .cloned()
            .collect();
        sort_answers(&mut out);
        Ok(out)
    }
}

#[async_trait]
impl MaterialRepository for InMemoryRepository {
    async fn upsert_material(&self, material: &StudyMaterial) -> Result<(), StorageError> {
        self.catalog()?
            .materials
            .insert(material.id, material.clone());
        Ok(())
    }

    async fn list_materials(&self) -> Result<Vec<StudyMaterial>, StorageError> {
        Ok(self.catalog()?.materials.values().cloned().collect())
    }
}

//
// ─── STORAGE BUNDLE ────────────────────────────────────────────────────────────
//

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub packages: Arc<dyn PackageRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub answers: Arc<dyn AnswerRepository>,
    pub materials: Arc<dyn MaterialRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Wire every repository role to one backend.
    #[must_use]
    pub fn from_repository<R>(repo: R) -> Self
    where
        R: PackageRepository
            + QuestionRepository
            + SessionRepository
            + AnswerRepository
            + MaterialRepository
            + Clone
            + 'static,
    {
        Self {
            packages: Arc::new(repo.clone()),
            questions: Arc::new(repo.clone()),
            sessions: Arc::new(repo.clone()),
            answers: Arc::new(repo.clone()),
            materials: Arc::new(repo),
        }
    }
}
