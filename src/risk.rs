use crate::api::{DifficultyUpdate, ProgressApi};
use crate::error::{Error, Result};
use crate::models::{DifficultyMode, UserProgressSnapshot};

/// Bounded editor over `(difficulty_mode, daily_risk_amount,
/// risk_locked)`.
///
/// Unlocked, the mode and amount can be edited and committed in one
/// combined write. Once the lock is observed (locally or from the
/// backend) the configurator refuses further edits for the rest of the
/// evaluation period; it can never emit an update that clears the lock.
pub struct RiskConfigurator {
    mode: DifficultyMode,
    amount: u64,
    locked: bool,
}

impl RiskConfigurator {
    pub fn from_snapshot(snapshot: &UserProgressSnapshot) -> Self {
        Self {
            mode: snapshot.difficulty_mode,
            amount: snapshot.daily_risk_amount,
            locked: snapshot.risk_locked,
        }
    }

    pub fn mode(&self) -> DifficultyMode {
        self.mode
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_mode(&mut self, mode: DifficultyMode) -> Result<()> {
        self.ensure_unlocked()?;
        self.mode = mode;
        Ok(())
    }

    pub fn set_amount(&mut self, amount: u64) -> Result<()> {
        self.ensure_unlocked()?;
        self.amount = amount;
        Ok(())
    }

    /// Parses a raw amount as typed by the user. Non-numeric input is
    /// rejected here, before anything reaches the network.
    pub fn set_amount_input(&mut self, raw: &str) -> Result<()> {
        let amount = raw
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::Validation(format!("not a valid risk amount: '{raw}'")))?;
        self.set_amount(amount)
    }

    /// Re-seeds from a freshly fetched snapshot. The lock only latches
    /// tighter: a stale snapshot cannot reopen an already-locked
    /// configurator.
    pub fn absorb(&mut self, snapshot: &UserProgressSnapshot) {
        self.mode = snapshot.difficulty_mode;
        self.amount = snapshot.daily_risk_amount;
        self.locked = self.locked || snapshot.risk_locked;
    }

    /// The combined update a save would send. Never carries
    /// `risk_locked: false` once the lock has been observed.
    pub fn update(&self, lock: bool) -> DifficultyUpdate {
        DifficultyUpdate {
            difficulty_mode: self.mode,
            daily_risk_amount: Some(self.amount),
            risk_locked: Some(self.locked || lock),
        }
    }

    /// Commits mode, amount and (optionally) the lock in a single
    /// write. Saving while already locked is a confirmation no-op: the
    /// period's configuration is immutable, so there is nothing to send.
    pub async fn save<A: ProgressApi>(&mut self, api: &A, lock: bool) -> Result<()> {
        if self.locked {
            log::debug!("[save] risk configuration already locked, nothing to commit");
            return Ok(());
        }

        let update = self.update(lock);
        api.update_difficulty(&update).await?;
        if lock {
            log::info!("[save] risk configuration locked for the period");
            self.locked = true;
        }
        Ok(())
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.locked {
            return Err(Error::Validation(
                "risk configuration is locked for this period".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{sample_snapshot, FakeApi};

    fn unlocked() -> RiskConfigurator {
        let mut snapshot = sample_snapshot();
        snapshot.risk_locked = false;
        RiskConfigurator::from_snapshot(&snapshot)
    }

    #[test]
    fn unlocked_edits_go_through() {
        let mut config = unlocked();
        config.set_mode(DifficultyMode::Hardcore).unwrap();
        config.set_amount_input(" 250 ").unwrap();
        assert_eq!(config.mode(), DifficultyMode::Hardcore);
        assert_eq!(config.amount(), 250);
    }

    #[test]
    fn non_numeric_amount_is_rejected_before_any_network_call() {
        let mut config = unlocked();
        let err = config.set_amount_input("lots").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        // The previous amount survives the rejected edit.
        assert_eq!(config.amount(), sample_snapshot().daily_risk_amount);
    }

    #[test]
    fn observed_lock_refuses_local_edits() {
        let mut snapshot = sample_snapshot();
        snapshot.risk_locked = true;
        let mut config = RiskConfigurator::from_snapshot(&snapshot);

        assert!(config.set_mode(DifficultyMode::Sandbox).is_err());
        assert!(config.set_amount(5).is_err());
    }

    #[test]
    fn the_lock_is_a_one_way_latch() {
        let mut config = unlocked();
        let mut locked_snapshot = sample_snapshot();
        locked_snapshot.risk_locked = true;
        config.absorb(&locked_snapshot);
        assert!(config.is_locked());

        // A stale unlocked snapshot cannot reopen it.
        let mut stale = sample_snapshot();
        stale.risk_locked = false;
        config.absorb(&stale);
        assert!(config.is_locked());

        // And no produced update ever clears the flag.
        assert_eq!(config.update(false).risk_locked, Some(true));
        assert_eq!(config.update(true).risk_locked, Some(true));
    }

    #[tokio::test]
    async fn save_commits_one_combined_update() {
        let api = FakeApi::new();
        let mut config = unlocked();
        config.set_mode(DifficultyMode::Hardcore).unwrap();
        config.set_amount(300).unwrap();

        config.save(&api, true).await.unwrap();
        assert!(config.is_locked());

        let sent = api.last_difficulty_update().unwrap();
        assert_eq!(
            sent,
            DifficultyUpdate {
                difficulty_mode: DifficultyMode::Hardcore,
                daily_risk_amount: Some(300),
                risk_locked: Some(true),
            }
        );
    }

    #[tokio::test]
    async fn saving_while_locked_is_a_no_op_confirmation() {
        let api = FakeApi::new();
        let mut snapshot = sample_snapshot();
        snapshot.risk_locked = true;
        let mut config = RiskConfigurator::from_snapshot(&snapshot);

        config.save(&api, true).await.unwrap();
        assert_eq!(api.difficulty_calls(), 0);
    }

    #[tokio::test]
    async fn save_without_lock_keeps_the_configurator_editable() {
        let api = FakeApi::new();
        let mut config = unlocked();
        config.set_amount(50).unwrap();

        config.save(&api, false).await.unwrap();
        assert!(!config.is_locked());
        assert_eq!(
            api.last_difficulty_update().unwrap().risk_locked,
            Some(false)
        );

        // Still editable after an unlocked save.
        config.set_amount(75).unwrap();
    }
}
