mod participant_name;

pub use guess_battle::series::SeriesPoint;
pub use guess_battle::summary::{LeaderboardSummary, WeekStanding};
pub use participant_name::ParticipantName;
