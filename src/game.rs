//! Top-level game state machine
//!
//! ```text
//! Menu --Play--> Countdown --(3, 2, 1, Go!)--> Playing --(health 0)--> GameOver
//!  |  ^                ^                                                  |
//!  v  | Back           +---------------------Retry------------------------+
//! ShipBuilder
//! ```
//!
//! [`Game::frame`] is called once per fixed simulation step and
//! [`Game::handle`] for each UI click. All timing reads the injected clock.

use crate::consts::*;
use crate::highscores::HighScores;
use crate::persistence::Loadout;
use crate::platform::{Clock, PartSlot, UiAction};
use crate::renderer::{FrameView, flash_overlay, shake_offset};
use crate::settings::Settings;
use crate::shipyard::{self, Shipyard};
use crate::sim::{GameEvent, Rgb, TickInput, World, spawn_enemies, tick};
use crate::ui::Hud;
use crate::ui::dialog::{Dialog, boss_taunt, story_for_level};

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title menu
    Menu,
    /// Ship customization, reachable from the menu
    ShipBuilder,
    /// 3-2-1-Go before play starts
    Countdown,
    /// Active gameplay
    Playing,
    /// Player destroyed
    GameOver,
}

/// Countdown progress, anchored to the clock time it started
#[derive(Debug, Clone, Copy)]
struct Countdown {
    started_ms: u64,
    /// Last number announced
    shown: i64,
}

impl Countdown {
    fn new(now_ms: u64) -> Self {
        Self {
            started_ms: now_ms,
            shown: COUNTDOWN_FROM,
        }
    }

    /// 3, 2, 1, then 0 for "Go!", negative once finished
    fn number_at(&self, now_ms: u64) -> i64 {
        let steps = now_ms.saturating_sub(self.started_ms) / COUNTDOWN_STEP_MS;
        COUNTDOWN_FROM - steps as i64
    }
}

pub struct Game<C: Clock> {
    clock: C,
    phase: GamePhase,
    pub world: World,
    pub loadout: Loadout,
    pub high_scores: HighScores,
    settings: Settings,
    shipyard: Shipyard,
    dialog: Dialog,
    countdown: Countdown,
    run_started_ms: u64,
    elapsed_secs: f64,
    /// Set once this run's score has gone into the table
    score_recorded: bool,
    last_rank: Option<usize>,
    quit_requested: bool,
}

impl<C: Clock> Game<C> {
    /// Build a game, loading the save and score files named in `settings`
    pub fn new(settings: Settings, clock: C) -> Self {
        let loadout = Loadout::load(&settings.save_path);
        let high_scores = HighScores::load(&settings.scores_path);
        Self::with_state(settings, clock, loadout, high_scores)
    }

    /// Build a game from already-loaded state
    pub fn with_state(settings: Settings, clock: C, loadout: Loadout, high_scores: HighScores) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut world = World::new(settings.playfield(), seed);
        world.boss_interval = settings.boss_interval;
        loadout.apply_to(&mut world.player);
        log::info!(
            "Game ready: seed {}, {}x{} playfield, {} credits",
            seed,
            world.field.width,
            world.field.height,
            loadout.credits
        );

        let now = clock.now_ms();
        Self {
            shipyard: Shipyard::from_loadout(&loadout),
            clock,
            phase: GamePhase::Menu,
            world,
            loadout,
            high_scores,
            settings,
            dialog: Dialog::new(),
            countdown: Countdown::new(now),
            run_started_ms: now,
            elapsed_secs: 0.0,
            score_recorded: false,
            last_rank: None,
            quit_requested: false,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn shipyard(&self) -> &Shipyard {
        &self.shipyard
    }

    /// Seconds since play started (frozen at game over)
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    /// Leaderboard rank of the last finished run, if it placed
    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Countdown overlay text
    pub fn countdown_text(&self) -> Option<&'static str> {
        if self.phase != GamePhase::Countdown {
            return None;
        }
        match self.countdown.shown {
            3 => Some("3"),
            2 => Some("2"),
            1 => Some("1"),
            _ => Some("Go!"),
        }
    }

    /// Speaker and typed text of the current dialog line
    pub fn dialog_text(&self) -> Option<(&str, &str)> {
        self.dialog.visible(self.clock.now_ms())
    }

    pub fn hud(&self) -> Hud {
        Hud::from_world(&self.world, self.clock.now_ms(), self.elapsed_secs)
    }

    /// Bought paint, or the inverse of the level background
    pub fn ship_tint(&self) -> Rgb {
        self.loadout.ship_rgb(self.world.palette.foreground)
    }

    /// Read-only view for the renderer
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            phase: self.phase,
            world: &self.world,
            hud: self.hud(),
            countdown: self.countdown_text(),
            dialog: self.dialog_text(),
            ship_tint: self.ship_tint(),
            shake: shake_offset(&self.world.effects, self.world.frame),
            flash: flash_overlay(&self.world.effects),
        }
    }

    /// React to a UI button click
    pub fn handle(&mut self, action: UiAction) {
        match (self.phase, action) {
            (GamePhase::Menu, UiAction::Play) | (GamePhase::GameOver, UiAction::Retry) => self.start_run(),
            (GamePhase::Menu, UiAction::OpenShipBuilder) => {
                self.shipyard = Shipyard::from_loadout(&self.loadout);
                self.set_phase(GamePhase::ShipBuilder);
            }
            (GamePhase::Menu | GamePhase::GameOver, UiAction::Quit) => {
                log::info!("Quit requested");
                self.quit_requested = true;
            }
            (GamePhase::GameOver, UiAction::Back) => self.set_phase(GamePhase::Menu),
            (GamePhase::ShipBuilder, action) => self.handle_ship_builder(action),
            (phase, action) => log::debug!("Ignoring {:?} in {:?}", action, phase),
        }
    }

    fn handle_ship_builder(&mut self, action: UiAction) {
        match action {
            UiAction::Back => {
                self.persist_loadout();
                self.set_phase(GamePhase::Menu);
            }
            UiAction::PrevPart(slot) => self.shipyard.cycle(slot, -1),
            UiAction::NextPart(slot) => self.shipyard.cycle(slot, 1),
            UiAction::UpgradeWeapon => match shipyard::buy_weapon_upgrade(&mut self.world.player) {
                Ok(_) => self.persist_loadout(),
                Err(e) => log::info!("Weapon upgrade refused: {}", e),
            },
            UiAction::UpgradeWings => match shipyard::buy_wing_upgrade(&mut self.world.player) {
                Ok(_) => self.persist_loadout(),
                Err(e) => log::info!("Wing upgrade refused: {}", e),
            },
            UiAction::Confirm => match self.shipyard.confirm(&mut self.loadout, &mut self.world.player) {
                Ok(_) => self.persist_loadout(),
                Err(e) => log::info!("Purchase refused: {}", e),
            },
            other => log::debug!("Ignoring {:?} in ship builder", other),
        }
    }

    /// Pick a paint directly (swatch click in the ship builder)
    pub fn select_part(&mut self, slot: PartSlot, id: &str) {
        if self.phase != GamePhase::ShipBuilder {
            return;
        }
        if let Err(e) = self.shipyard.select(slot, id) {
            log::warn!("{}", e);
        }
    }

    /// Reset run-scoped state and begin the countdown
    pub fn start_run(&mut self) {
        let now = self.clock.now_ms();
        self.world.reset_run();
        spawn_enemies(&mut self.world, INITIAL_WAVE_SIZE);
        self.dialog.clear();
        self.countdown = Countdown::new(now);
        self.run_started_ms = now;
        self.elapsed_secs = 0.0;
        self.score_recorded = false;
        self.last_rank = None;
        self.set_phase(GamePhase::Countdown);
        self.world.push_event(GameEvent::CountdownTick(COUNTDOWN_FROM));
    }

    /// Advance one fixed step. Returns the events raised during it.
    pub fn frame(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let now = self.clock.now_ms();
        match self.phase {
            GamePhase::Countdown => self.update_countdown(now),
            GamePhase::Playing => self.update_playing(input, now),
            GamePhase::Menu | GamePhase::ShipBuilder | GamePhase::GameOver => {}
        }
        self.world.drain_events()
    }

    fn update_countdown(&mut self, now: u64) {
        let number = self.countdown.number_at(now);
        if number == self.countdown.shown {
            return;
        }
        self.countdown.shown = number;
        if number > 0 {
            self.world.push_event(GameEvent::CountdownTick(number));
        } else if number == 0 {
            self.world.push_event(GameEvent::CountdownGo);
        } else {
            self.run_started_ms = now;
            self.dialog.enqueue_intro();
            self.set_phase(GamePhase::Playing);
        }
    }

    fn update_playing(&mut self, input: &TickInput, now: u64) {
        tick(&mut self.world, input, now);
        self.elapsed_secs = now.saturating_sub(self.run_started_ms) as f64 / 1000.0;

        if !self.settings.effective_screen_shake() {
            self.world.effects.shake_frames = 0;
        }
        if !self.settings.effective_screen_flash() {
            self.world.effects.flash_frames = 0;
        }

        for event in &self.world.events {
            match *event {
                GameEvent::LevelUp { level } => {
                    if let Some(line) = story_for_level(level) {
                        self.dialog.push(line);
                    }
                }
                GameEvent::BossSpawned { level } => self.dialog.push(boss_taunt(level)),
                _ => {}
            }
        }
        self.dialog.update(now);

        if self.world.player.is_dead() {
            self.finish_run();
        }
    }

    /// Game over: record the score once and save progression
    fn finish_run(&mut self) {
        self.set_phase(GamePhase::GameOver);
        if self.world.boss.take().is_some() {
            log::info!("Boss withdrew after the player was destroyed");
        }
        if self.score_recorded {
            return;
        }
        self.score_recorded = true;

        let (score, level) = (self.world.score, self.world.level);
        self.last_rank = self.high_scores.add_score(score, level, self.elapsed_secs);
        log::info!(
            "Game over: score {}, level {}, {:.1}s (rank {:?})",
            score,
            level,
            self.elapsed_secs,
            self.last_rank
        );
        if self.last_rank.is_some() {
            if let Err(e) = self.high_scores.save(&self.settings.scores_path) {
                log::warn!("Failed to save high scores: {}", e);
            }
        }
        self.persist_loadout();
    }

    fn persist_loadout(&mut self) {
        self.loadout.sync_from(&self.world.player);
        if let Err(e) = self.loadout.save(&self.settings.save_path) {
            log::warn!("Failed to save loadout: {}", e);
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }
}
