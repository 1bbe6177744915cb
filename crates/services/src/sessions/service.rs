use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use storage::repository::{
    AnswerRepository, NewSession, PackageRepository, QuestionRepository, SessionRepository,
    StorageError,
};
use tryout_core::model::{
    Answer, AnswerDraft, OptionLetter, PackageId, QuestionId, Session, SessionId, UserId,
};
use tryout_core::scoring::{QuestionIndex, ScoringRules, score_answers};

use super::progress::SessionProgress;
use super::result::SessionResult;
use crate::Clock;
use crate::access::AccessControl;
use crate::error::AssessmentError;

const ALREADY_COMPLETED: &str = "session already completed";

/// Maps a lost lifecycle race in storage onto the caller-facing taxonomy.
fn lifecycle_error(err: StorageError) -> AssessmentError {
    match err {
        StorageError::Conflict => AssessmentError::InvalidState(ALREADY_COMPLETED.into()),
        StorageError::NotFound => AssessmentError::NotFound("session"),
        other => AssessmentError::Storage(other),
    }
}

/// Orchestrates the lifecycle of tryout attempts: start, answer, finish.
#[derive(Clone)]
pub struct AssessmentService {
    clock: Clock,
    rules: ScoringRules,
    packages: Arc<dyn PackageRepository>,
    questions: Arc<dyn QuestionRepository>,
    sessions: Arc<dyn SessionRepository>,
    answers: Arc<dyn AnswerRepository>,
    access: Arc<dyn AccessControl>,
}

impl AssessmentService {
    #[must_use]
    pub fn new(
        clock: Clock,
        packages: Arc<dyn PackageRepository>,
        questions: Arc<dyn QuestionRepository>,
        sessions: Arc<dyn SessionRepository>,
        answers: Arc<dyn AnswerRepository>,
        access: Arc<dyn AccessControl>,
    ) -> Self {
        Self {
            clock,
            rules: ScoringRules::default(),
            packages,
            questions,
            sessions,
            answers,
            access,
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: ScoringRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Open a new attempt for `user_id` on `package_id`.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::AccessDenied` when the user holds no
    /// entitlement and is not privileged, `AssessmentError::InvalidPackage`
    /// when the package does not exist, or a storage error.
    #[instrument(skip(self))]
    pub async fn start_session(
        &self,
        user_id: UserId,
        package_id: PackageId,
    ) -> Result<Session, AssessmentError> {
        if !self.access.can_access(user_id, package_id).await? {
            warn!("session start denied: no entitlement");
            return Err(AssessmentError::AccessDenied);
        }
        if self.packages.get_package(package_id).await?.is_none() {
            warn!("session start rejected: unknown package");
            return Err(AssessmentError::InvalidPackage);
        }

        let session = self
            .sessions
            .insert_session(NewSession {
                user_id,
                package_id,
                started_at: self.clock.now(),
            })
            .await?;
        info!(session = %session.id(), "session started");
        Ok(session)
    }

    /// Record a submission and return its correctness verdict.
    ///
    /// Behavioral questions have no verdict and yield `None`. Earlier
    /// submissions for the same question are kept; the latest one counts.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Validation` for a malformed option letter,
    /// `AssessmentError::NotFound` when the session is missing or owned by
    /// someone else or the question is not part of the session's package, and
    /// `AssessmentError::InvalidState` once the session is completed.
    #[instrument(skip(self))]
    pub async fn submit_answer(
        &self,
        session_id: SessionId,
        question_id: QuestionId,
        selected: &str,
        requester: UserId,
    ) -> Result<Option<bool>, AssessmentError> {
        let selected = OptionLetter::parse(selected)?;
        let session = self.owned_session(session_id, requester).await?;
        let question = self
            .questions
            .get_question(question_id)
            .await?
            .filter(|q| q.package_id() == session.package_id())
            .ok_or(AssessmentError::NotFound("question"))?;
        if session.is_completed() {
            warn!("answer rejected: session completed");
            return Err(AssessmentError::InvalidState(ALREADY_COMPLETED.into()));
        }

        let is_correct = question.check(selected);
        let answer = self
            .answers
            .append_answer(AnswerDraft {
                session_id,
                question_id,
                selected,
                is_correct,
                submitted_at: self.clock.now(),
            })
            .await
            .map_err(lifecycle_error)?;
        debug!(answer = %answer.id, %selected, ?is_correct, "answer recorded");
        Ok(is_correct)
    }

    /// Score the attempt from its authoritative answers and freeze it.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::NotFound` when the session is missing or owned
    /// by someone else and `AssessmentError::InvalidState` when it is already
    /// completed, including when a concurrent finish wins the race.
    #[instrument(skip(self))]
    pub async fn finish_session(
        &self,
        session_id: SessionId,
        requester: UserId,
    ) -> Result<SessionResult, AssessmentError> {
        let session = self.owned_session(session_id, requester).await?;
        if session.is_completed() {
            warn!("finish rejected: session completed");
            return Err(AssessmentError::InvalidState(ALREADY_COMPLETED.into()));
        }

        let index = self.question_index(session.package_id()).await?;
        let rules = self.rules;
        let scorer =
            |_: &Session, answers: &[Answer]| score_answers(&index, answers, &rules).scores;
        let finished = self
            .sessions
            .finish_session(session_id, self.clock.now(), &scorer)
            .await
            .map_err(lifecycle_error)?;

        let result = self.build_result(&finished, &index).await?;
        info!(
            total = result.scores.total,
            passed = result.scores.is_passed,
            "session finished"
        );
        Ok(result)
    }

    /// Frozen scores and per-category breakdown of a completed attempt.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::NotFound` when the session is missing or owned
    /// by someone else and `AssessmentError::InvalidState` while it is still in
    /// progress.
    #[instrument(skip(self))]
    pub async fn get_results(
        &self,
        session_id: SessionId,
        requester: UserId,
    ) -> Result<SessionResult, AssessmentError> {
        let session = self.owned_session(session_id, requester).await?;
        if !session.is_completed() {
            return Err(AssessmentError::InvalidState(
                "session is still in progress".into(),
            ));
        }
        let index = self.question_index(session.package_id()).await?;
        self.build_result(&session, &index).await
    }

    /// # Errors
    ///
    /// Returns `AssessmentError::NotFound` when the session is missing or owned
    /// by someone else, or when its package has disappeared.
    #[instrument(skip(self))]
    pub async fn progress(
        &self,
        session_id: SessionId,
        requester: UserId,
    ) -> Result<SessionProgress, AssessmentError> {
        let session = self.owned_session(session_id, requester).await?;
        let package = self
            .packages
            .get_package(session.package_id())
            .await?
            .ok_or(AssessmentError::NotFound("package"))?;
        let index = self.question_index(session.package_id()).await?;
        let answers = self.answers.answers_for_session(session_id).await?;
        Ok(SessionProgress::compute(
            &session,
            &package,
            &index,
            &answers,
            self.clock.now(),
        ))
    }

    async fn owned_session(
        &self,
        session_id: SessionId,
        requester: UserId,
    ) -> Result<Session, AssessmentError> {
        match self.sessions.get_session(session_id).await? {
            Some(session) if session.user_id() == requester => Ok(session),
            _ => Err(AssessmentError::NotFound("session")),
        }
    }

    async fn question_index(&self, package_id: PackageId) -> Result<QuestionIndex, AssessmentError> {
        let questions = self.questions.questions_for_package(package_id).await?;
        Ok(QuestionIndex::new(questions))
    }

    async fn build_result(
        &self,
        session: &Session,
        index: &QuestionIndex,
    ) -> Result<SessionResult, AssessmentError> {
        let answers = self.answers.answers_for_session(session.id()).await?;
        let sheet = score_answers(index, &answers, &self.rules);
        SessionResult::from_completed(session, &sheet.breakdown)
    }
}
