//! Airport/layover intelligence adapter
//!
//! Maps raw per-airport facility records into derived comfort, stress, and
//! jet-lag-support scores, and scores/classifies individual connections.
//! Missing source fields default to a neutral midpoint (5.0 on 0-10 scales,
//! `false` for booleans) rather than failing; an entirely unresolved airport
//! gets neutral facilities flagged `reduced_confidence`.

use jetrank_common::params;
use jetrank_common::types::{
    AirportFacilities, AirportIntel, LayoverAssessment, LayoverClass, LayoverTip,
};
use tracing::debug;

/// Connection complexity at or below this is an "easy" connection
const EASY_CONNECTION_COMPLEXITY: f64 = 3.0;

/// Derive the facility profile for one airport from its raw record
pub fn derive_facilities(raw: &AirportIntel) -> AirportFacilities {
    let lounge_quality = raw.lounge_quality.unwrap_or(params::NEUTRAL_MIDPOINT);
    let connection_complexity = raw.connection_complexity.unwrap_or(params::NEUTRAL_MIDPOINT);
    let premium_lounge = raw.premium_lounge.unwrap_or(false);
    let sleep_pods = raw.sleep_pods.unwrap_or(false);
    let showers = raw.showers.unwrap_or(false);
    let sleep_seating = raw.sleep_seating.unwrap_or(false);
    let quiet_zones = raw.quiet_zones.unwrap_or(false);
    let healthy_food = raw.healthy_food.unwrap_or(false);
    let fast_track = raw.fast_track.unwrap_or(false);
    let requires_rescreening = raw.requires_rescreening.unwrap_or(false);
    let easy_connection = connection_complexity <= EASY_CONNECTION_COMPLEXITY;

    // Comfort: base 5.0, lounge-weighted bonus up to +5, fixed facility bonuses
    let mut comfort_score = 5.0 + (lounge_quality / 10.0) * 5.0;
    if premium_lounge {
        comfort_score += 1.0;
    }
    if showers {
        comfort_score += 0.5;
    }
    if sleep_seating {
        comfort_score += 0.5;
    }
    if healthy_food {
        comfort_score += 0.3;
    }
    if easy_connection {
        comfort_score += 0.5;
    }
    let comfort_score = comfort_score.clamp(0.0, 10.0);

    // Stress: complexity as base, adjusted by mitigations and known challenges
    let mut stress_score = connection_complexity;
    if lounge_quality >= 7.0 {
        stress_score -= 1.0;
    }
    if fast_track {
        stress_score -= 0.5;
    }
    if requires_rescreening {
        stress_score += 1.0;
    }
    if raw.major_challenges.len() > 2 {
        stress_score += 0.5;
    }
    let stress_score = stress_score.clamp(0.0, 10.0);

    // Jet-lag support: lounge 0-3, pods 0-3, showers 0-2, food 0-1, ease 0-1
    let mut jetlag_support_score = (lounge_quality / 10.0) * 3.0;
    jetlag_support_score += match raw.sleep_pod_quality {
        Some(quality) => (quality / 10.0) * 3.0,
        None if sleep_pods => 2.0,
        None => 0.0,
    };
    jetlag_support_score += match raw.shower_quality {
        Some(quality) => (quality / 10.0) * 2.0,
        None if showers => 1.5,
        None => 0.0,
    };
    if healthy_food {
        jetlag_support_score += 1.0;
    }
    if easy_connection {
        jetlag_support_score += 1.0;
    }
    let jetlag_support_score = jetlag_support_score.clamp(0.0, 10.0);

    debug!(
        comfort = comfort_score,
        stress = stress_score,
        jetlag_support = jetlag_support_score,
        "Derived airport facility scores"
    );

    AirportFacilities {
        sleep_pods,
        showers,
        lounge_access: premium_lounge || raw.lounge_quality.map_or(false, |q| q > 0.0),
        quiet_zones,
        healthy_food,
        lounge_quality,
        connection_complexity,
        fast_track,
        requires_rescreening,
        comfort_score,
        stress_score,
        jetlag_support_score,
        min_connection_minutes: raw
            .min_connection_minutes
            .unwrap_or(params::DEFAULT_MIN_CONNECTION_MINUTES),
        realistic_connection_minutes: raw
            .realistic_connection_minutes
            .unwrap_or(params::DEFAULT_REALISTIC_CONNECTION_MINUTES),
        reduced_confidence: false,
    }
}

/// Neutral facility profile for an airport the enrichment layer cannot resolve
pub fn neutral_facilities() -> AirportFacilities {
    let mut facilities = derive_facilities(&AirportIntel::default());
    facilities.reduced_confidence = true;
    facilities
}

/// Score one specific connection (0-100).
///
/// Five weighted buckets: duration fit (30), lounge quality (25), connection
/// ease (20), recovery facilities (15), and stress penalties (up to -10), plus
/// a hard penalty below the airport's minimum connection time and a bonus when
/// the layover meets the realistic recommended time.
pub fn layover_quality(duration_minutes: u32, facilities: &AirportFacilities) -> f64 {
    let d = f64::from(duration_minutes);

    // Duration fit (30 pts): the 90-180 minute window is comfortable, with a
    // small bonus in the middle of it. Shorter scales down linearly; longer
    // bleeds points slowly.
    let duration_fit = if duration_minutes < params::LAYOVER_OPTIMAL_MIN_MINUTES {
        30.0 * d / f64::from(params::LAYOVER_OPTIMAL_MIN_MINUTES)
    } else if duration_minutes <= params::LAYOVER_OPTIMAL_MAX_MINUTES {
        if (110..=150).contains(&duration_minutes) {
            35.0
        } else {
            30.0
        }
    } else {
        let excess = d - f64::from(params::LAYOVER_OPTIMAL_MAX_MINUTES);
        30.0 - (excess / 30.0).min(5.0) * 3.0
    };

    // Lounge quality (25 pts)
    let lounge = (facilities.lounge_quality / 10.0) * 25.0;

    // Connection ease (20 pts): complexity 1 -> 20, complexity 10 -> 0
    let ease = ((10.0 - facilities.connection_complexity) / 9.0).clamp(0.0, 1.0) * 20.0;

    // Recovery facilities (15 pts)
    let mut recovery = 0.0;
    if facilities.sleep_pods {
        recovery += 7.0;
    }
    if facilities.showers {
        recovery += 5.0;
    }
    if facilities.quiet_zones {
        recovery += 3.0;
    }

    // Stress penalties (up to -10)
    let mut stress = 0.0;
    if facilities.requires_rescreening {
        stress -= 6.0;
    }
    let short_connection = duration_minutes < params::LAYOVER_OPTIMAL_MIN_MINUTES;
    if short_connection && !facilities.fast_track {
        stress -= 4.0;
    }

    let mut quality = duration_fit + lounge + ease + recovery + stress;

    // Below the published minimum connection time the connection is likely to
    // fail outright
    if duration_minutes < facilities.min_connection_minutes {
        quality -= 40.0;
    } else if duration_minutes >= facilities.realistic_connection_minutes {
        quality += 5.0;
    }

    quality.clamp(0.0, 100.0)
}

/// Classify one connection and emit ordered advisory tips.
///
/// `home_night` marks a layover falling inside the traveler's home-timezone
/// sleep window, where a nap directly offsets jetlag. Tip order is fixed:
/// general tips, then intelligence-specific tips, then the rescreening
/// warning, then the best-for-jetlag note.
pub fn assess_layover(
    duration_minutes: u32,
    facilities: &AirportFacilities,
    home_night: bool,
) -> LayoverAssessment {
    let quality = layover_quality(duration_minutes, facilities);

    let class = if duration_minutes < facilities.min_connection_minutes {
        LayoverClass::Insufficient
    } else if duration_minutes < facilities.realistic_connection_minutes {
        LayoverClass::Risky
    } else if quality >= 75.0 {
        LayoverClass::Excellent
    } else if quality >= 55.0 {
        LayoverClass::Good
    } else {
        LayoverClass::Marginal
    };

    let mut tips = Vec::new();

    // General tips
    if class == LayoverClass::Insufficient {
        tips.push(LayoverTip::BelowMinimumConnection {
            minimum_minutes: facilities.min_connection_minutes,
        });
    }
    if duration_minutes < facilities.realistic_connection_minutes {
        tips.push(LayoverTip::ProceedDirectlyToGate);
    }
    if facilities.fast_track {
        tips.push(LayoverTip::UseFastTrack);
    }

    // Intelligence-specific tips
    if facilities.lounge_access && facilities.lounge_quality >= 6.0 && duration_minutes >= 60 {
        tips.push(LayoverTip::VisitLounge {
            quality: facilities.lounge_quality,
        });
    }
    if facilities.showers && duration_minutes >= 90 {
        tips.push(LayoverTip::TakeShower);
    }
    if facilities.sleep_pods && duration_minutes >= 120 {
        tips.push(LayoverTip::NapInSleepPod);
    }

    // Rescreening warning
    if facilities.requires_rescreening {
        tips.push(LayoverTip::RescreeningRequired);
    }

    // Best-for-jetlag note
    if home_night && duration_minutes >= 120 {
        tips.push(LayoverTip::BestForJetlagRecovery);
    }

    LayoverAssessment { quality, class, tips }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rich_intel() -> AirportIntel {
        AirportIntel {
            lounge_quality: Some(9.0),
            premium_lounge: Some(true),
            sleep_pods: Some(true),
            sleep_pod_quality: Some(8.0),
            showers: Some(true),
            shower_quality: Some(8.0),
            sleep_seating: Some(true),
            quiet_zones: Some(true),
            healthy_food: Some(true),
            connection_complexity: Some(2.0),
            fast_track: Some(true),
            requires_rescreening: Some(false),
            major_challenges: vec![],
            min_connection_minutes: Some(45),
            realistic_connection_minutes: Some(75),
        }
    }

    fn bare_intel() -> AirportIntel {
        AirportIntel {
            lounge_quality: Some(2.0),
            connection_complexity: Some(9.0),
            requires_rescreening: Some(true),
            major_challenges: vec![
                "terminal change".into(),
                "long walk".into(),
                "passport control".into(),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn rich_airport_scores_high_comfort_low_stress() {
        let facilities = derive_facilities(&rich_intel());
        // 5.0 + 4.5 lounge + 1.0 + 0.5 + 0.5 + 0.3 + 0.5 clamps at 10
        assert_eq!(facilities.comfort_score, 10.0);
        // complexity 2.0, -1.0 lounge, -0.5 fast track
        assert!((facilities.stress_score - 0.5).abs() < 1e-9);
        assert!(facilities.jetlag_support_score > 8.0);
        assert!(!facilities.reduced_confidence);
    }

    #[test]
    fn poor_airport_scores_low_comfort_high_stress() {
        let facilities = derive_facilities(&bare_intel());
        // 5.0 + 1.0 lounge bonus, nothing else
        assert!((facilities.comfort_score - 6.0).abs() < 1e-9);
        // 9.0 + 1.0 rescreening + 0.5 challenges, clamped to 10
        assert_eq!(facilities.stress_score, 10.0);
        assert!(facilities.jetlag_support_score < 1.0);
    }

    #[test]
    fn missing_fields_default_to_neutral_midpoint() {
        let facilities = derive_facilities(&AirportIntel::default());
        assert_eq!(facilities.lounge_quality, 5.0);
        assert_eq!(facilities.connection_complexity, 5.0);
        assert!(!facilities.sleep_pods);
        assert!(!facilities.requires_rescreening);
        assert_eq!(facilities.min_connection_minutes, 60);
        assert_eq!(facilities.realistic_connection_minutes, 90);
    }

    #[test]
    fn neutral_facilities_flag_reduced_confidence() {
        let facilities = neutral_facilities();
        assert!(facilities.reduced_confidence);
        assert_eq!(facilities.lounge_quality, 5.0);
    }

    #[test]
    fn layover_quality_prefers_the_optimal_window() {
        let facilities = derive_facilities(&rich_intel());
        let short = layover_quality(40, &facilities);
        let optimal = layover_quality(120, &facilities);
        let long = layover_quality(360, &facilities);
        assert!(optimal > short);
        assert!(optimal > long);
        assert!(optimal <= 100.0);
    }

    #[test]
    fn below_minimum_connection_takes_a_hard_penalty() {
        let facilities = derive_facilities(&rich_intel());
        // min_connection_minutes is 45
        let infeasible = layover_quality(40, &facilities);
        let feasible = layover_quality(80, &facilities);
        assert!(feasible - infeasible > 30.0);
    }

    #[test]
    fn quality_is_always_clamped() {
        let rich = derive_facilities(&rich_intel());
        let poor = derive_facilities(&bare_intel());
        for minutes in [10, 45, 90, 130, 200, 600] {
            for f in [&rich, &poor] {
                let q = layover_quality(minutes, f);
                assert!((0.0..=100.0).contains(&q), "{minutes}min -> {q}");
            }
        }
    }

    #[test]
    fn classification_follows_connection_thresholds() {
        let facilities = derive_facilities(&rich_intel());
        assert_eq!(assess_layover(30, &facilities, false).class, LayoverClass::Insufficient);
        assert_eq!(assess_layover(60, &facilities, false).class, LayoverClass::Risky);
        // Above realistic time with rich facilities
        assert_eq!(assess_layover(120, &facilities, false).class, LayoverClass::Excellent);

        let poor = derive_facilities(&bare_intel());
        // Feasible and above realistic, but the airport itself is weak
        assert_eq!(assess_layover(120, &poor, false).class, LayoverClass::Marginal);
    }

    #[test]
    fn tips_come_out_in_fixed_priority_order() {
        let facilities = derive_facilities(&rich_intel());
        let assessment = assess_layover(150, &facilities, true);
        let tips = &assessment.tips;
        // General (fast track) -> intelligence (lounge, shower, pod) -> jetlag note
        assert_eq!(tips[0], LayoverTip::UseFastTrack);
        assert!(matches!(tips[1], LayoverTip::VisitLounge { .. }));
        assert_eq!(tips[2], LayoverTip::TakeShower);
        assert_eq!(tips[3], LayoverTip::NapInSleepPod);
        assert_eq!(tips[4], LayoverTip::BestForJetlagRecovery);
    }

    #[test]
    fn insufficient_connection_leads_with_the_warning() {
        let facilities = derive_facilities(&rich_intel());
        let assessment = assess_layover(30, &facilities, false);
        assert_eq!(
            assessment.tips[0],
            LayoverTip::BelowMinimumConnection { minimum_minutes: 45 }
        );
        assert_eq!(assessment.tips[1], LayoverTip::ProceedDirectlyToGate);
    }

    #[test]
    fn rescreening_warning_precedes_jetlag_note() {
        let mut intel = rich_intel();
        intel.requires_rescreening = Some(true);
        let facilities = derive_facilities(&intel);
        let assessment = assess_layover(150, &facilities, true);
        let rescreen_pos = assessment
            .tips
            .iter()
            .position(|t| *t == LayoverTip::RescreeningRequired)
            .unwrap();
        let jetlag_pos = assessment
            .tips
            .iter()
            .position(|t| *t == LayoverTip::BestForJetlagRecovery)
            .unwrap();
        assert!(rescreen_pos < jetlag_pos);
    }
}
