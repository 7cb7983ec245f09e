use core::time::Duration;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No move yet, mines are not placed.
    #[default]
    Ready,
    Active,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Result of a finished game, as handed to a score store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub won: bool,
    pub elapsed: Duration,
    pub size: Size,
    pub mines: CellCount,
    pub revealed: CellCount,
    pub seed: u64,
}

/// One game from the first move to a win or loss.
///
/// Mines are placed on the first reveal, around that point. Once the game is
/// won or lost every further move is rejected, start a new session to play
/// again.
#[derive(Clone, Debug)]
pub struct Session {
    config: GameConfig,
    field: Field,
    seed: u64,
    rng: SmallRng,
    state: EngineState,
    triggered_mine: Option<Point>,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
}

impl Session {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        log::debug!(
            "New {} game with {} mines, seed {}",
            config.size,
            config.mines,
            seed
        );

        Ok(Self {
            config,
            field: Field::new(config.size),
            seed,
            rng: seeded_sampler(seed),
            state: EngineState::default(),
            triggered_mine: None,
            started_at: None,
            ended_at: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_victory(&self) -> bool {
        matches!(self.state, EngineState::Won)
    }

    /// Seed of the mine layout, replaying it with the same first move gives the same field.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn triggered_mine(&self) -> Option<Point> {
        self.triggered_mine
    }

    /// Mines not covered by a flag yet.
    pub fn mines_left(&self) -> CellCount {
        self.config.mines - self.field.flagged().len() as CellCount
    }

    pub fn cell_snapshot(&self, point: Point) -> Result<CellView> {
        self.field.cell_snapshot(point)
    }

    /// Exposes mines for the loss screen.
    pub fn reveal_all_mines(&mut self) {
        self.field.reveal_all_mines();
    }

    pub fn reveal(&mut self, point: Point) -> Result<RevealOutcome> {
        let point = self.field.validate_point(point)?;
        self.check_not_finished()?;

        if self.state.is_ready() {
            self.config
                .placer()
                .place(&mut self.field, point, &mut self.rng)?;
            self.mark_started();
        }

        let outcome = self.field.reveal(point)?;
        match outcome {
            RevealOutcome::MineHit => {
                self.triggered_mine = Some(point);
                self.end_game(false);
            }
            RevealOutcome::Revealed(_) if self.field.is_victory() => self.end_game(true),
            _ => {}
        }
        Ok(outcome)
    }

    pub fn flag(&mut self, point: Point) -> Result<FlagOutcome> {
        let point = self.field.validate_point(point)?;
        self.check_active()?;

        self.field.flag(point)
    }

    /// Time between the first move and the end of the game, or now if still playing.
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started_at) => self.ended_at.unwrap_or_else(Instant::now) - started_at,
            None => Duration::ZERO,
        }
    }

    /// Summary of a finished game, `None` while it is still going.
    pub fn summary(&self) -> Option<GameSummary> {
        self.is_finished().then(|| GameSummary {
            won: self.is_victory(),
            elapsed: self.elapsed(),
            size: self.config.size,
            mines: self.field.mine_count(),
            revealed: self.field.revealed().len() as CellCount,
            seed: self.seed,
        })
    }

    fn mark_started(&mut self) {
        if self.state.is_ready() {
            log::debug!("Game started");
            self.started_at = Some(Instant::now());
            self.state = EngineState::Active;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        self.ended_at = Some(Instant::now());
        log::debug!("Game ended: {:?} after {:?}", self.state, self.elapsed());
    }

    fn check_active(&self) -> Result<()> {
        match self.state {
            EngineState::Active => Ok(()),
            EngineState::Ready => Err(GameError::NotStarted),
            EngineState::Won | EngineState::Lost => Err(GameError::AlreadyEnded),
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
