//! Scene machine: main menu → play → game over → play ...
//!
//! Each scene implements `Scene`; `Game` owns the current one and applies
//! the `Transition` it returns. Data crosses scenes only through the
//! transition value (the round result), never through shared globals.

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::error::Result;
use crate::highscores::HighScores;
use crate::persistence::Storage;
use crate::sim::{GameEvent, GameState, RoundSnapshot, TickInput, tick};

/// Outcome of a finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub score: u64,
}

/// Requested scene change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    StartRound,
    GameOver(RoundResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneKind {
    MainMenu,
    Playing,
    GameOver,
}

/// What the host should draw this frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scene", rename_all = "snake_case")]
pub enum FrameSnapshot {
    MainMenu,
    Playing(RoundSnapshot),
    GameOver {
        score: u64,
        high_scores: HighScores,
        /// Rank achieved on the leaderboard (1-indexed)
        rank: Option<usize>,
    },
}

/// Services a scene may use
pub struct Context<'a> {
    pub config: &'a SessionConfig,
    pub storage: &'a mut dyn Storage,
}

/// A game mode with enter/update/exit hooks
pub trait Scene {
    fn kind(&self) -> SceneKind;

    fn on_enter(&mut self, _ctx: &mut Context<'_>) {}

    /// Advance by `dt` real seconds; return a transition to leave the scene
    fn on_update(&mut self, ctx: &mut Context<'_>, dt: f32, input: &TickInput) -> Option<Transition>;

    fn on_exit(&mut self, _ctx: &mut Context<'_>) {}

    fn snapshot(&self) -> FrameSnapshot;

    /// Gameplay events raised since the last call
    fn drain_events(&mut self) -> Vec<GameEvent> {
        Vec::new()
    }
}

/// Instruction screen; waits for the start key
#[derive(Debug, Default)]
pub struct MainMenu;

impl Scene for MainMenu {
    fn kind(&self) -> SceneKind {
        SceneKind::MainMenu
    }

    fn on_update(&mut self, _ctx: &mut Context<'_>, _dt: f32, input: &TickInput) -> Option<Transition> {
        input.start.then_some(Transition::StartRound)
    }

    fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::MainMenu
    }
}

/// A running round
pub struct PlayScene {
    state: GameState,
    accumulator: f32,
    events: Vec<GameEvent>,
}

impl PlayScene {
    pub fn new(config: &SessionConfig, seed: u64) -> Result<Self> {
        Ok(Self {
            state: GameState::new(config, seed)?,
            accumulator: 0.0,
            events: Vec::new(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }
}

impl Scene for PlayScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Playing
    }

    fn on_enter(&mut self, _ctx: &mut Context<'_>) {
        log::info!("Round started with seed {}", self.state.seed);
        // First piece drops immediately; the spawn timer handles the rest
        self.state.revive_one();
    }

    fn on_update(&mut self, _ctx: &mut Context<'_>, dt: f32, input: &TickInput) -> Option<Transition> {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        self.events.append(&mut self.state.events);

        if self.state.is_playing() {
            None
        } else {
            Some(Transition::GameOver(RoundResult {
                score: self.state.round.score,
            }))
        }
    }

    fn on_exit(&mut self, _ctx: &mut Context<'_>) {
        self.state.shutdown();
    }

    fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::Playing(RoundSnapshot::from(&self.state))
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Final score and leaderboard; start key plays again
#[derive(Debug)]
pub struct GameOverScene {
    result: RoundResult,
    high_scores: HighScores,
    rank: Option<usize>,
}

impl GameOverScene {
    pub fn new(result: RoundResult) -> Self {
        Self {
            result,
            high_scores: HighScores::new(),
            rank: None,
        }
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn rank(&self) -> Option<usize> {
        self.rank
    }
}

impl Scene for GameOverScene {
    fn kind(&self) -> SceneKind {
        SceneKind::GameOver
    }

    fn on_enter(&mut self, ctx: &mut Context<'_>) {
        self.high_scores = HighScores::load(ctx.storage);
        self.rank = self.high_scores.add_score(self.result.score);
        if let Some(rank) = self.rank {
            log::info!("New high score {} at rank {}", self.result.score, rank);
        }
        if let Err(e) = self.high_scores.save(ctx.storage) {
            log::warn!("Failed to save high scores: {}", e);
        }
    }

    fn on_update(&mut self, _ctx: &mut Context<'_>, _dt: f32, input: &TickInput) -> Option<Transition> {
        input.start.then_some(Transition::StartRound)
    }

    fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::GameOver {
            score: self.result.score,
            high_scores: self.high_scores,
            rank: self.rank,
        }
    }
}

/// Top-level game: owns the config, storage and the current scene
pub struct Game {
    config: SessionConfig,
    storage: Box<dyn Storage>,
    scene: Box<dyn Scene>,
    /// Events collected from scenes, including one that just exited
    events: Vec<GameEvent>,
    next_seed: u64,
}

impl Game {
    /// Starts on the main menu. Fails if the config is unusable.
    pub fn new(config: SessionConfig, storage: Box<dyn Storage>, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut game = Self {
            config,
            storage,
            scene: Box::new(MainMenu),
            events: Vec::new(),
            next_seed: seed,
        };
        let mut ctx = Context {
            config: &game.config,
            storage: game.storage.as_mut(),
        };
        game.scene.on_enter(&mut ctx);
        Ok(game)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn scene_kind(&self) -> SceneKind {
        self.scene.kind()
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        self.scene.snapshot()
    }

    /// Take every gameplay event raised since the last call, including those
    /// of a scene that just exited. Events buffer until taken, so hosts must
    /// call this once per frame.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.append(&mut self.scene.drain_events());
        std::mem::take(&mut self.events)
    }

    /// Advance the current scene by `dt` real seconds, switching scenes if asked
    pub fn update(&mut self, dt: f32, input: &TickInput) -> Result<()> {
        let mut ctx = Context {
            config: &self.config,
            storage: self.storage.as_mut(),
        };
        if let Some(transition) = self.scene.on_update(&mut ctx, dt, input) {
            self.events.append(&mut self.scene.drain_events());
            self.apply(transition)?;
        }
        Ok(())
    }

    fn apply(&mut self, transition: Transition) -> Result<()> {
        let next: Box<dyn Scene> = match transition {
            Transition::StartRound => {
                let seed = self.next_seed;
                self.next_seed = self.next_seed.wrapping_add(1);
                Box::new(PlayScene::new(&self.config, seed)?)
            }
            Transition::GameOver(result) => Box::new(GameOverScene::new(result)),
        };

        log::info!("Scene {:?} -> {:?}", self.scene.kind(), next.kind());

        let mut ctx = Context {
            config: &self.config,
            storage: self.storage.as_mut(),
        };
        self.scene.on_exit(&mut ctx);
        self.scene = next;
        self.scene.on_enter(&mut ctx);
        Ok(())
    }
}
