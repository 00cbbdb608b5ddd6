//! Presentation formatting
//!
//! Renders the structured codes the core emits (reasons, advice, tips,
//! tiers) into human-readable display strings. The scoring model itself
//! never produces display text, so this layer can be swapped or localized
//! without touching the engine.

use jetrank_common::types::{
    AdviceCode, CriticalFactor, HolisticScore, LayoverAssessment, LayoverTip, RecommendationTier,
    ScoreReason, TradeoffNote,
};

/// Display string for a strength/weakness reason code
pub fn describe_reason(reason: &ScoreReason) -> String {
    match reason {
        ScoreReason::MorningArrival => {
            "Arrives in the morning, the ideal window for circadian adaptation".into()
        }
        ScoreReason::LateNightArrival => {
            "Arrives late at night, landing straight into a disrupted sleep cycle".into()
        }
        ScoreReason::MinimalTimezoneShift { hours } => {
            format!("Only {hours:.0}h of timezone shift, minimal body-clock impact")
        }
        ScoreReason::LargeEastboundShift { hours } => {
            format!("{hours:.0}h eastbound shift, the hardest direction to adapt to")
        }
        ScoreReason::WestboundAdvantage => {
            "Westbound routing, the easier direction for the body clock".into()
        }
        ScoreReason::StrongCabinComfort => {
            "High sleep-comfort aircraft and well-rated cabin service".into()
        }
        ScoreReason::WeakCabinComfort => {
            "Low sleep-comfort equipment for an itinerary of this length".into()
        }
        ScoreReason::WellPlacedLayovers => {
            "Connections are well-timed and well-equipped for recovery".into()
        }
        ScoreReason::StressfulConnection { airport } => {
            format!("Tight or poorly-equipped connection at {airport}")
        }
        ScoreReason::TimeEfficientRouting => {
            "Among the fastest routings in these results".into()
        }
        ScoreReason::SlowRouting { extra_minutes } => {
            format!("Takes {} longer than the fastest option", minutes_phrase(*extra_minutes))
        }
        ScoreReason::ExtraStops { count } => {
            format!("{count} stops where faster routings exist")
        }
    }
}

/// Display string for a traveler advice code
pub fn describe_advice(advice: &AdviceCode) -> String {
    match advice {
        AdviceCode::PreAdjustSleepEarlier { days } => {
            format!("Shift bedtime one hour earlier per day for {days} days before departure")
        }
        AdviceCode::PreAdjustSleepLater { days } => {
            format!("Shift bedtime one hour later per day for {days} days before departure")
        }
        AdviceCode::SeekMorningLight => {
            "Get bright outdoor light on the first morning after arrival".into()
        }
        AdviceCode::AvoidEveningLight => {
            "Avoid bright light in the evening for the first days after arrival".into()
        }
        AdviceCode::SleepAlignedToDestination => {
            "Sleep on board according to destination night, not origin night".into()
        }
        AdviceCode::NapDuringLayover { airport } => {
            format!("The {airport} layover falls in your home night: nap there")
        }
        AdviceCode::StayAwakeUntilLocalNight => {
            "Stay awake until local bedtime on arrival day".into()
        }
    }
}

/// Display string for a layover tip
pub fn describe_tip(tip: &LayoverTip) -> String {
    match tip {
        LayoverTip::BelowMinimumConnection { minimum_minutes } => {
            format!("Below the airport's {minimum_minutes}-minute minimum connection time; missed-connection risk")
        }
        LayoverTip::ProceedDirectlyToGate => "Tight connection: go directly to your gate".into(),
        LayoverTip::UseFastTrack => "Fast-track security is available here".into(),
        LayoverTip::VisitLounge { quality } => {
            format!("Lounge rated {quality:.0}/10; worth visiting")
        }
        LayoverTip::TakeShower => "Long enough for a shower reset".into(),
        LayoverTip::NapInSleepPod => "Sleep pods available; book a recovery nap".into(),
        LayoverTip::RescreeningRequired => {
            "Security re-screening required; budget extra time".into()
        }
        LayoverTip::BestForJetlagRecovery => {
            "This layover falls in your home night; sleeping here directly reduces jetlag".into()
        }
    }
}

/// Display string for a tradeoff note
pub fn describe_tradeoff(note: &TradeoffNote) -> &'static str {
    match note {
        TradeoffNote::PriceOverJetlag => "Cheapest option, but with a harder circadian profile",
        TradeoffNote::JetlagOverPrice => "Pays a premium for a notably easier circadian profile",
        TradeoffNote::DurationForArrivalTiming => {
            "Trades extra travel time for a better-timed arrival"
        }
    }
}

/// Display string for a critical factor
pub fn describe_critical_factor(factor: &CriticalFactor) -> String {
    match factor {
        CriticalFactor::DegradedConfidence { reason } => {
            format!("Reduced scoring confidence: {reason}")
        }
        CriticalFactor::UnknownAirport { code } => {
            format!("No airport intelligence for {code}; neutral defaults used")
        }
    }
}

/// One-line summary for a scored flight, e.g.
/// `"87/100 (optimal) - est. recovery 2.5 days"`
pub fn summarize_score(score: &HolisticScore) -> String {
    format!(
        "{}/100 ({}) - est. recovery {}",
        score.display_score(),
        score.recommendation.as_str(),
        recovery_phrase(score.estimated_recovery_days),
    )
}

/// One-line summary for a layover assessment
pub fn summarize_layover(assessment: &LayoverAssessment) -> String {
    format!(
        "{} layover, {:.0}/100",
        assessment.class.as_str(),
        assessment.quality
    )
}

/// Recovery-day phrase: whole and half days read naturally
pub fn recovery_phrase(days: f64) -> String {
    if days <= 0.0 {
        "none".into()
    } else if days < 1.0 {
        "under a day".into()
    } else {
        format!("{days:.1} days")
    }
}

/// Tier display with the UI's coarse labels
pub fn tier_label(tier: RecommendationTier) -> &'static str {
    tier.as_str()
}

fn minutes_phrase(minutes: i64) -> String {
    if minutes >= 60 {
        let hours = minutes / 60;
        let rest = minutes % 60;
        if rest == 0 {
            format!("{hours}h")
        } else {
            format!("{hours}h{rest:02}m")
        }
    } else {
        format!("{minutes}m")
    }
}
