//! # Day-Level Market Simulator
//!
//! Short-horizon (30 day) price, holder and volume dynamics driven by
//! sentiment, volatility, momentum and random [`MarketEvent`]s.
//!
//! ## Daily step
//!
//! 1. Count down active events, expiring those that reach zero
//! 2. Maybe draw a new event (`0.05 + frequency/100`, none when frequency is 0)
//! 3. Sum effects of active events
//! 4. Sentiment: drift by event effect plus noise, clamped to [0, 1]
//! 5. Price: normal move around `(sentiment − 0.5) × 4%`, floored at 0.01
//! 6. Holders: normal move around sentiment and 5-day momentum, floored at 100
//! 7. Volume from the size of today's moves
//! 8. Market cap = price × holders × tokens per holder
//!
//! [`advance`] is the pure step function. [`MarketSession`] wraps it in the
//! `Idle → Running → (Paused | Completed)` lifecycle a UI loop drives; wall
//! clock pacing stays with the caller.

use crate::events::{EventEffects, MarketEvent, EVENT_CATALOG};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokenlab_core::{Day, RandomSource, Result, SeededRandom, TokenomicsError, PRICE_FLOOR};
use tracing::{debug, info};

/// Holder count never drops below this
pub const MIN_HOLDERS: f64 = 100.0;

/// Number of price points used for momentum
pub const MOMENTUM_WINDOW: usize = 5;

/// Wall-clock interval between steps at speed 1x
pub const BASE_STEP_INTERVAL_MS: u64 = 1_000;

/// Market simulator settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub initial_price: f64,
    pub initial_holders: f64,
    /// Starting sentiment in [0, 1]; 0.5 is neutral
    pub initial_sentiment: f64,
    /// Volatility on a 0-10 scale
    pub volatility: f64,
    /// Event frequency on a 0-10 scale; 0 disables events
    pub event_frequency: u32,
    pub horizon_days: Day,
    /// Tokens assumed held per holder when computing market cap
    pub tokens_per_holder: f64,
    /// Pacing multiplier for [`MarketSession::step_interval`]
    pub speed: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            initial_price: 1.0,
            initial_holders: 1_000.0,
            initial_sentiment: 0.5,
            volatility: 5.0,
            event_frequency: 5,
            horizon_days: 30,
            tokens_per_holder: 100.0,
            speed: 1.0,
        }
    }
}

impl MarketConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_price > 0.0) || !self.initial_price.is_finite() {
            return Err(TokenomicsError::invalid("initial price must be positive"));
        }
        if !(self.initial_holders >= MIN_HOLDERS) || !self.initial_holders.is_finite() {
            return Err(TokenomicsError::invalid(format!(
                "initial holders must be at least {}",
                MIN_HOLDERS
            )));
        }
        if !(0.0..=1.0).contains(&self.initial_sentiment) {
            return Err(TokenomicsError::invalid("initial sentiment must be within [0, 1]"));
        }
        if !(0.0..=10.0).contains(&self.volatility) {
            return Err(TokenomicsError::invalid("volatility must be within [0, 10]"));
        }
        if self.event_frequency > 10 {
            return Err(TokenomicsError::invalid("event frequency must be within [0, 10]"));
        }
        if !(self.tokens_per_holder >= 0.0) || !self.tokens_per_holder.is_finite() {
            return Err(TokenomicsError::invalid("tokens per holder must be non-negative"));
        }
        if !(self.speed > 0.0) || !self.speed.is_finite() {
            return Err(TokenomicsError::invalid("speed must be positive"));
        }
        Ok(())
    }

    /// Daily probability of a new event
    pub fn event_probability(&self) -> f64 {
        if self.event_frequency == 0 {
            0.0
        } else {
            0.05 + self.event_frequency as f64 / 100.0
        }
    }

    fn volatility_factor(&self) -> f64 {
        self.volatility / 10.0
    }
}

/// Full simulator state, owned by the caller
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    pub day: Day,
    pub price: f64,
    pub holders: f64,
    pub volume: f64,
    pub market_cap: f64,
    pub sentiment: f64,
    /// Prices for days `0..=day`
    pub price_history: Vec<f64>,
    /// Every event drawn so far, expired ones included
    pub events: Vec<MarketEvent>,
}

impl MarketState {
    /// Day-0 state for a configuration
    pub fn initial(config: &MarketConfig) -> Self {
        let price = config.initial_price;
        let holders = config.initial_holders;
        Self {
            day: 0,
            price,
            holders,
            volume: price * holders * 0.2,
            market_cap: price * holders * config.tokens_per_holder,
            sentiment: config.initial_sentiment,
            price_history: vec![price],
            events: Vec::new(),
        }
    }

    pub fn active_events(&self) -> impl Iterator<Item = &MarketEvent> {
        self.events.iter().filter(|e| e.is_active)
    }

    /// Percent price change over the trailing momentum window
    pub fn momentum(&self) -> f64 {
        let len = self.price_history.len();
        if len < MOMENTUM_WINDOW {
            return 0.0;
        }
        let base = self.price_history[len - MOMENTUM_WINDOW];
        if base > 0.0 {
            (self.price_history[len - 1] - base) / base
        } else {
            0.0
        }
    }

    /// Read-only view for presentation
    pub fn snapshot(&self) -> MarketSnapshot {
        MarketSnapshot {
            day: self.day,
            price: self.price,
            holders: self.holders,
            volume: self.volume,
            market_cap: self.market_cap,
            sentiment: self.sentiment,
            active_events: self.active_events().cloned().collect(),
        }
    }
}

/// What the presentation layer sees after each step
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub day: Day,
    pub price: f64,
    pub holders: f64,
    pub volume: f64,
    pub market_cap: f64,
    pub sentiment: f64,
    pub active_events: Vec<MarketEvent>,
}

/// Result of [`advance`]
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// State for the next day
    Advanced(MarketState),
    /// Horizon reached; nothing changed
    Completed,
}

/// Advance the market by one day.
///
/// Pure apart from the random draws: `state` is left untouched and the next
/// day's state is returned.
pub fn advance(
    state: &MarketState,
    config: &MarketConfig,
    rng: &mut dyn RandomSource,
) -> StepOutcome {
    if state.day >= config.horizon_days {
        return StepOutcome::Completed;
    }

    let mut next = state.clone();
    next.day += 1;
    let vol = config.volatility_factor();

    for event in next.events.iter_mut() {
        event.tick();
    }

    if rng.chance(config.event_probability()) {
        let index = rng.pick(EVENT_CATALOG.len()).min(EVENT_CATALOG.len() - 1);
        let archetype = &EVENT_CATALOG[index];
        let event = archetype.instantiate(next.day, rng);
        debug!(
            day = next.day,
            event = %event.name,
            price_effect = event.price_effect,
            duration = event.duration_days,
            "Market event fired"
        );
        next.events.push(event);
    }

    let effects = EventEffects::aggregate(&next.events);

    let noise = rng.uniform(-0.05, 0.05) * vol;
    next.sentiment = (state.sentiment + effects.sentiment + noise).clamp(0.0, 1.0);

    let price_change =
        rng.normal((next.sentiment - 0.5) * 0.04, 0.02 * vol) + effects.price;
    next.price = (state.price * (1.0 + price_change)).max(PRICE_FLOOR);
    next.price_history.push(next.price);

    let momentum = next.momentum();
    let holder_change = rng.normal(
        (next.sentiment - 0.5) * 0.03 + momentum * 0.02,
        0.01 * vol,
    ) + effects.holders;
    next.holders = (state.holders * (1.0 + holder_change)).max(MIN_HOLDERS);

    let volume_factor = price_change.abs() * 5.0 + holder_change.abs() * 3.0;
    next.volume = next.price
        * next.holders
        * 0.2
        * (0.8 + volume_factor + rng.uniform(0.0, 0.5) * vol);

    next.market_cap = next.price * next.holders * config.tokens_per_holder;

    StepOutcome::Advanced(next)
}

/// Lifecycle of a [`MarketSession`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Result of [`MarketSession::tick`]
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    Advanced(MarketSnapshot),
    /// Session is idle or paused
    NotRunning,
    Completed,
}

/// Stateful driver around [`advance`] with pause/resume/reset
#[derive(Clone, Debug)]
pub struct MarketSession {
    config: MarketConfig,
    seed: u64,
    rng: SeededRandom,
    state: MarketState,
    status: SessionStatus,
    history: Vec<MarketSnapshot>,
}

impl MarketSession {
    pub fn new(config: MarketConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let state = MarketState::initial(&config);
        let history = vec![state.snapshot()];
        Ok(Self {
            config,
            seed,
            rng: SeededRandom::new(seed),
            state,
            status: SessionStatus::Idle,
            history,
        })
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn state(&self) -> &MarketState {
        &self.state
    }

    /// Snapshots for every simulated day, day 0 first
    pub fn history(&self) -> &[MarketSnapshot] {
        &self.history
    }

    /// All events drawn so far, expired ones included
    pub fn events(&self) -> &[MarketEvent] {
        &self.state.events
    }

    /// Wall-clock pause between ticks for the configured speed
    pub fn step_interval(&self) -> Duration {
        let millis = BASE_STEP_INTERVAL_MS as f64 / self.config.speed;
        Duration::from_millis(millis.round().max(1.0) as u64)
    }

    pub fn start(&mut self) {
        if matches!(self.status, SessionStatus::Idle | SessionStatus::Paused) {
            info!(seed = self.seed, horizon = self.config.horizon_days, "Market session running");
            self.status = SessionStatus::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.status == SessionStatus::Running {
            self.status = SessionStatus::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.status == SessionStatus::Paused {
            self.status = SessionStatus::Running;
        }
    }

    /// Discard all progress and return to day 0 with the original seed
    pub fn reset(&mut self) {
        self.rng = SeededRandom::new(self.seed);
        self.state = MarketState::initial(&self.config);
        self.history = vec![self.state.snapshot()];
        self.status = SessionStatus::Idle;
    }

    /// Advance one day if running
    pub fn tick(&mut self) -> TickOutcome {
        match self.status {
            SessionStatus::Idle | SessionStatus::Paused => return TickOutcome::NotRunning,
            SessionStatus::Completed => return TickOutcome::Completed,
            SessionStatus::Running => {}
        }

        match advance(&self.state, &self.config, &mut self.rng) {
            StepOutcome::Advanced(next) => {
                self.state = next;
                let snapshot = self.state.snapshot();
                self.history.push(snapshot.clone());
                if self.state.day >= self.config.horizon_days {
                    info!(
                        final_price = self.state.price,
                        holders = self.state.holders,
                        events = self.state.events.len(),
                        "Market session completed"
                    );
                    self.status = SessionStatus::Completed;
                }
                TickOutcome::Advanced(snapshot)
            }
            StepOutcome::Completed => {
                self.status = SessionStatus::Completed;
                TickOutcome::Completed
            }
        }
    }

    /// Run from the current point to the horizon without pacing
    pub fn run_to_completion(&mut self) -> &[MarketSnapshot] {
        self.start();
        while let TickOutcome::Advanced(_) = self.tick() {}
        &self.history
    }
}
