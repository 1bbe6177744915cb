mod answer;
mod ids;
mod material;
mod option;
mod package;
mod question;
mod session;

pub use answer::{Answer, AnswerDraft, latest_per_question};
pub use ids::{AnswerId, MaterialId, PackageId, ParseIdError, QuestionId, SessionId, UserId};
pub use material::StudyMaterial;
pub use option::{Category, OptionLetter};
pub use package::Package;
pub use question::{AnswerKey, OptionWeights, Question};
pub use session::{Session, SessionScores, SessionStateError, SessionStatus};
