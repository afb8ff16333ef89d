pub mod commentary;

use chrono::NaiveDate;

use crate::models::{DailyQuestionSet, DifficultyMode, QuestionStatus, UserProgressSnapshot};

/// XP needed to advance one level.
pub const XP_PER_LEVEL: u64 = 100;

/// Levels start at 1; every `XP_PER_LEVEL` points is one level.
pub fn level(total_xp: u64) -> u64 {
    total_xp / XP_PER_LEVEL + 1
}

/// XP accumulated inside the current level.
pub fn xp_into_level(total_xp: u64) -> u64 {
    total_xp % XP_PER_LEVEL
}

/// Progress-bar percentage towards the next level. Resets to 0 at an
/// exact level boundary, never shows 100.
pub fn level_progress_percent(total_xp: u64) -> u64 {
    (total_xp % XP_PER_LEVEL) * 100 / XP_PER_LEVEL
}

/// How many of today's three curated problems are completed.
pub fn daily_solved_count(set: &DailyQuestionSet) -> u32 {
    [&set.easy, &set.medium, &set.hard]
        .into_iter()
        .filter(|q| q.status == QuestionStatus::Completed)
        .count() as u32
}

/// Rounded percentage for the daily progress bar.
pub fn daily_progress_percent(set: &DailyQuestionSet) -> u32 {
    (daily_solved_count(set) as f64 / 3.0 * 100.0).round() as u32
}

/// Whether the separate daily challenge counts as done for `today`.
pub fn daily_challenge_complete(snapshot: &UserProgressSnapshot, today: NaiveDate) -> bool {
    snapshot.last_activity_date == Some(today)
}

/// What a missed challenge would cost right now, in currency.
///
/// Sandbox never charges. Normal charges only once lives are exhausted.
/// Hardcore charges on every miss, and god mode skips lives entirely and
/// charges the full daily risk directly.
pub fn penalty_preview(snapshot: &UserProgressSnapshot) -> u64 {
    match snapshot.difficulty_mode {
        DifficultyMode::Sandbox => 0,
        DifficultyMode::Normal => {
            if snapshot.lives == 0 {
                snapshot.daily_risk_amount
            } else {
                0
            }
        }
        DifficultyMode::Hardcore | DifficultyMode::God => snapshot.daily_risk_amount,
    }
}

/// Lives as the penalty engine sees them: always zero under god mode.
pub fn effective_lives(snapshot: &UserProgressSnapshot) -> u32 {
    if snapshot.difficulty_mode == DifficultyMode::God {
        0
    } else {
        snapshot.lives
    }
}

/// Whether today's powerup usage has hit the mode's cap.
pub fn powerup_limit_reached(snapshot: &UserProgressSnapshot) -> bool {
    snapshot
        .difficulty_mode
        .powerup_cap()
        .is_some_and(|cap| snapshot.powerups_used_today >= cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{sample_daily_set, sample_snapshot};
    use crate::models::QuestionStatus::{Attempted, Completed, Unattempted};

    #[test]
    fn leveling_follows_the_xp_curve() {
        assert_eq!(level(0), 1);
        assert_eq!(level(99), 1);
        assert_eq!(level(100), 2);
        assert_eq!(level(250), 3);

        assert_eq!(level_progress_percent(0), 0);
        assert_eq!(level_progress_percent(100), 0);
        assert_eq!(level_progress_percent(250), 50);
        assert_eq!(xp_into_level(250), 50);
    }

    #[test]
    fn progress_percent_stays_in_range_for_any_xp() {
        for total_xp in 0..1_000 {
            let percent = level_progress_percent(total_xp);
            assert!(percent < 100, "xp {total_xp} gave {percent}%");
            assert_eq!(level(total_xp), total_xp / 100 + 1);
        }
    }

    #[test]
    fn daily_summary_counts_only_completed_problems() {
        let set = sample_daily_set([Completed, Attempted, Unattempted]);
        assert_eq!(daily_solved_count(&set), 1);
        assert_eq!(daily_progress_percent(&set), 33);

        let set = sample_daily_set([Completed, Completed, Unattempted]);
        assert_eq!(daily_progress_percent(&set), 67);

        let set = sample_daily_set([Completed, Completed, Completed]);
        assert_eq!(daily_progress_percent(&set), 100);
    }

    #[test]
    fn penalty_preview_tracks_the_mode() {
        let mut snapshot = sample_snapshot();
        snapshot.daily_risk_amount = 100;

        snapshot.difficulty_mode = DifficultyMode::Sandbox;
        assert_eq!(penalty_preview(&snapshot), 0);

        snapshot.difficulty_mode = DifficultyMode::Normal;
        snapshot.lives = 3;
        assert_eq!(penalty_preview(&snapshot), 0);
        snapshot.lives = 0;
        assert_eq!(penalty_preview(&snapshot), 100);

        snapshot.difficulty_mode = DifficultyMode::Hardcore;
        snapshot.lives = 1;
        assert_eq!(penalty_preview(&snapshot), 100);

        // God mode charges directly no matter what lives claim.
        snapshot.difficulty_mode = DifficultyMode::God;
        snapshot.lives = 5;
        assert_eq!(penalty_preview(&snapshot), 100);
        assert_eq!(effective_lives(&snapshot), 0);
    }

    #[test]
    fn powerup_cap_only_binds_under_hardcore() {
        let mut snapshot = sample_snapshot();
        snapshot.powerups_used_today = 1;

        snapshot.difficulty_mode = DifficultyMode::Hardcore;
        assert!(powerup_limit_reached(&snapshot));
        snapshot.powerups_used_today = 0;
        assert!(!powerup_limit_reached(&snapshot));

        snapshot.difficulty_mode = DifficultyMode::Normal;
        snapshot.powerups_used_today = 10;
        assert!(!powerup_limit_reached(&snapshot));
    }

    #[test]
    fn daily_challenge_compares_against_the_given_day() {
        let mut snapshot = sample_snapshot();
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();

        snapshot.last_activity_date = Some(today);
        assert!(daily_challenge_complete(&snapshot, today));

        snapshot.last_activity_date = today.pred_opt();
        assert!(!daily_challenge_complete(&snapshot, today));

        snapshot.last_activity_date = None;
        assert!(!daily_challenge_complete(&snapshot, today));
    }
}
