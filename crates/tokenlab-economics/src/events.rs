//! # Market Events
//!
//! Discrete shocks injected by the day-level market simulator.
//!
//! | Event | Price/day | Holders/day | Sentiment | Days |
//! |-------|-----------|-------------|-----------|------|
//! | Exchange listing | +5..15% | +3..8% | +0.05..0.15 | 3-7 |
//! | Partnership | +2..8% | +1..4% | +0.03..0.10 | 2-5 |
//! | Security incident | -20..-8% | -6..-2% | -0.20..-0.10 | 3-8 |
//! | Whale sell-off | -12..-4% | -2..0% | -0.08..-0.03 | 1-3 |
//! | Influencer mention | +3..10% | +2..6% | +0.04..0.10 | 1-3 |
//! | Project update | +1..5% | +0.5..2% | +0.02..0.06 | 2-4 |
//! | Market rally | +2..6% | +1..3% | +0.03..0.08 | 5-10 |
//! | Market crash | -10..-4% | -3..-1% | -0.12..-0.05 | 4-9 |
//! | Favourable regulation | +2..7% | +1..3% | +0.04..0.10 | 3-6 |
//! | Unfavourable regulation | -8..-3% | -3..-1% | -0.10..-0.04 | 3-7 |
//!
//! Effects are drawn once when an event fires and stay fixed while it is active.

use serde::{Deserialize, Serialize};
use tokenlab_core::{Day, RandomSource};

/// Kinds of market event the simulator can draw
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ExchangeListing,
    Partnership,
    SecurityIncident,
    WhaleSellOff,
    InfluencerMention,
    ProjectUpdate,
    MarketRally,
    MarketCrash,
    FavorableRegulation,
    UnfavorableRegulation,
}

/// Effect ranges for one event kind
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EventArchetype {
    pub kind: EventKind,
    pub name: &'static str,
    pub description: &'static str,
    pub price_effect: (f64, f64),
    pub holder_effect: (f64, f64),
    pub sentiment_effect: (f64, f64),
    pub duration_days: (u32, u32),
}

/// The fixed event catalog
pub static EVENT_CATALOG: [EventArchetype; 10] = [
    EventArchetype {
        kind: EventKind::ExchangeListing,
        name: "Exchange Listing",
        description: "Token listed on a major exchange",
        price_effect: (0.05, 0.15),
        holder_effect: (0.03, 0.08),
        sentiment_effect: (0.05, 0.15),
        duration_days: (3, 7),
    },
    EventArchetype {
        kind: EventKind::Partnership,
        name: "Partnership Announcement",
        description: "Strategic partnership with an established project",
        price_effect: (0.02, 0.08),
        holder_effect: (0.01, 0.04),
        sentiment_effect: (0.03, 0.10),
        duration_days: (2, 5),
    },
    EventArchetype {
        kind: EventKind::SecurityIncident,
        name: "Security Incident",
        description: "Exploit or vulnerability disclosed",
        price_effect: (-0.20, -0.08),
        holder_effect: (-0.06, -0.02),
        sentiment_effect: (-0.20, -0.10),
        duration_days: (3, 8),
    },
    EventArchetype {
        kind: EventKind::WhaleSellOff,
        name: "Whale Sell-Off",
        description: "Large holder dumps a significant position",
        price_effect: (-0.12, -0.04),
        holder_effect: (-0.02, 0.0),
        sentiment_effect: (-0.08, -0.03),
        duration_days: (1, 3),
    },
    EventArchetype {
        kind: EventKind::InfluencerMention,
        name: "Influencer Mention",
        description: "Widely followed account promotes the token",
        price_effect: (0.03, 0.10),
        holder_effect: (0.02, 0.06),
        sentiment_effect: (0.04, 0.10),
        duration_days: (1, 3),
    },
    EventArchetype {
        kind: EventKind::ProjectUpdate,
        name: "Project Update",
        description: "Roadmap milestone or product release shipped",
        price_effect: (0.01, 0.05),
        holder_effect: (0.005, 0.02),
        sentiment_effect: (0.02, 0.06),
        duration_days: (2, 4),
    },
    EventArchetype {
        kind: EventKind::MarketRally,
        name: "Market Rally",
        description: "Broad crypto market moves up",
        price_effect: (0.02, 0.06),
        holder_effect: (0.01, 0.03),
        sentiment_effect: (0.03, 0.08),
        duration_days: (5, 10),
    },
    EventArchetype {
        kind: EventKind::MarketCrash,
        name: "Market Crash",
        description: "Broad crypto market sells off",
        price_effect: (-0.10, -0.04),
        holder_effect: (-0.03, -0.01),
        sentiment_effect: (-0.12, -0.05),
        duration_days: (4, 9),
    },
    EventArchetype {
        kind: EventKind::FavorableRegulation,
        name: "Favorable Regulation",
        description: "Regulator issues supportive guidance",
        price_effect: (0.02, 0.07),
        holder_effect: (0.01, 0.03),
        sentiment_effect: (0.04, 0.10),
        duration_days: (3, 6),
    },
    EventArchetype {
        kind: EventKind::UnfavorableRegulation,
        name: "Unfavorable Regulation",
        description: "Regulator announces restrictions",
        price_effect: (-0.08, -0.03),
        holder_effect: (-0.03, -0.01),
        sentiment_effect: (-0.10, -0.04),
        duration_days: (3, 7),
    },
];

impl EventKind {
    pub fn archetype(&self) -> &'static EventArchetype {
        let index = match self {
            Self::ExchangeListing => 0,
            Self::Partnership => 1,
            Self::SecurityIncident => 2,
            Self::WhaleSellOff => 3,
            Self::InfluencerMention => 4,
            Self::ProjectUpdate => 5,
            Self::MarketRally => 6,
            Self::MarketCrash => 7,
            Self::FavorableRegulation => 8,
            Self::UnfavorableRegulation => 9,
        };
        &EVENT_CATALOG[index]
    }
}

impl EventArchetype {
    /// Sample a concrete event starting on `day`
    pub fn instantiate(&self, day: Day, rng: &mut dyn RandomSource) -> MarketEvent {
        let (min_days, max_days) = self.duration_days;
        let span = (max_days - min_days + 1) as usize;
        let duration = (min_days + rng.pick(span).min(span - 1) as u32).max(1);

        MarketEvent {
            kind: self.kind,
            name: self.name.to_string(),
            description: self.description.to_string(),
            price_effect: rng.uniform(self.price_effect.0, self.price_effect.1),
            holder_effect: rng.uniform(self.holder_effect.0, self.holder_effect.1),
            sentiment_effect: rng.uniform(self.sentiment_effect.0, self.sentiment_effect.1),
            duration_days: duration,
            days_remaining: duration,
            origin_day: day,
            is_active: true,
        }
    }
}

/// A market event drawn by the simulator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketEvent {
    pub kind: EventKind,
    pub name: String,
    pub description: String,
    /// Added to the daily price change while active (0.05 = +5%)
    pub price_effect: f64,
    /// Added to the daily holder change while active
    pub holder_effect: f64,
    /// Added to sentiment each day while active
    pub sentiment_effect: f64,
    pub duration_days: u32,
    pub days_remaining: u32,
    /// Day the event fired
    pub origin_day: Day,
    pub is_active: bool,
}

impl MarketEvent {
    /// Count down one day; deactivates permanently when the countdown hits 0
    pub fn tick(&mut self) {
        if !self.is_active {
            return;
        }
        self.days_remaining = self.days_remaining.saturating_sub(1);
        if self.days_remaining == 0 {
            self.is_active = false;
        }
    }
}

/// Summed effects of all active events
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EventEffects {
    pub price: f64,
    pub holders: f64,
    pub sentiment: f64,
}

impl EventEffects {
    pub fn aggregate<'a>(events: impl IntoIterator<Item = &'a MarketEvent>) -> Self {
        events
            .into_iter()
            .filter(|e| e.is_active)
            .fold(Self::default(), |acc, e| Self {
                price: acc.price + e.price_effect,
                holders: acc.holders + e.holder_effect,
                sentiment: acc.sentiment + e.sentiment_effect,
            })
    }
}
