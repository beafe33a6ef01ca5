use crate::session::FeedbackEntry;
use serde::{Deserialize, Serialize};

/// Replace non-finite scores with 0.0 so a single bad value from the
/// analysis service cannot poison an aggregate.
pub fn sanitize(score: f64) -> f64 {
    if score.is_finite() {
        score
    } else {
        0.0
    }
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Raw totals accumulated across all answered questions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_grammar_errors: u32,
    pub total_pronunciation_errors: u32,
    pub total_fluency_score: f64,
    pub total_filler_words: u32,
    pub fluency_count: u32,
    pub total_advanced_words: u32,
    pub total_relevance_score: f64,
    pub total_quality_score: f64,
    pub total_correctness_score: f64,
    pub correctness_count: u32,
    pub total_pauses: u32,
    pub total_pause_duration: f64,
    pub pause_count: u32,
    pub total_questions: u32,
}

impl OverallStats {
    /// Accumulate totals from per-question feedback.
    ///
    /// Unanswered questions and missing analysis areas are skipped; each
    /// area keeps its own denominator so a question with no pause data
    /// does not drag down the pause average.
    pub fn from_feedback(feedback: &[Option<FeedbackEntry>], total_questions: u32) -> Self {
        let mut stats = Self {
            total_questions,
            ..Self::default()
        };

        for entry in feedback.iter().flatten() {
            let analysis = &entry.analysis;

            if let Some(grammar) = &analysis.grammar {
                stats.total_grammar_errors += grammar.error_count;
            }
            if let Some(pronunciation) = &analysis.pronunciation {
                stats.total_pronunciation_errors += pronunciation.error_count;
            }
            if let Some(fluency) = &analysis.fluency {
                stats.total_fluency_score += sanitize(fluency.fluency_score);
                stats.total_filler_words += fluency.filler_word_count;
                stats.fluency_count += 1;
            }
            if let Some(vocabulary) = &analysis.vocabulary {
                stats.total_advanced_words += vocabulary.total_advanced_words;
            }
            if let Some(correctness) = &analysis.correctness {
                stats.total_relevance_score += sanitize(correctness.relevance_score);
                stats.total_quality_score += sanitize(correctness.quality_score);
                stats.total_correctness_score += sanitize(correctness.score);
                stats.correctness_count += 1;
            }
            if let Some(pauses) = &analysis.pauses {
                stats.total_pauses += pauses.total_pauses;
                stats.total_pause_duration += sanitize(pauses.total_pause_duration);
                stats.pause_count += 1;
            }
        }

        stats
    }
}

/// Per-area performance scores on a 0..=100 scale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceScores {
    pub grammar: f64,
    pub pronunciation: f64,
    pub fluency: f64,
    pub pause: f64,
    pub correctness: f64,
}

impl PerformanceScores {
    /// Derive area scores from accumulated totals.
    ///
    /// Areas with no data default to 100.0, except correctness which
    /// defaults to 0.0: an unanswered assessment is fluent silence but
    /// not a correct one.
    pub fn from_stats(stats: &OverallStats) -> Self {
        let grammar = if stats.total_questions > 0 {
            clamp_score(
                100.0 - (stats.total_grammar_errors as f64 / stats.total_questions as f64) * 5.0,
            )
        } else {
            100.0
        };

        let pronunciation = if stats.total_questions > 0 {
            clamp_score(
                100.0
                    - (stats.total_pronunciation_errors as f64 / stats.total_questions as f64)
                        * 5.0,
            )
        } else {
            100.0
        };

        let fluency = if stats.fluency_count > 0 {
            sanitize(stats.total_fluency_score / stats.fluency_count as f64)
        } else {
            100.0
        };

        let pause = if stats.pause_count > 0 {
            clamp_score(100.0 - (stats.total_pauses as f64 / stats.pause_count as f64) * 10.0)
        } else {
            100.0
        };

        let correctness = if stats.correctness_count > 0 {
            sanitize(stats.total_correctness_score / stats.correctness_count as f64)
        } else {
            0.0
        };

        Self {
            grammar,
            pronunciation,
            fluency,
            pause,
            correctness,
        }
    }
}

/// How the single overall score is combined from the area scores.
///
/// Two formulas shipped historically; both are kept as named variants so
/// a caller can pick deliberately instead of depending on which page
/// computed the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallScoreFormula {
    /// Base weighted sum (grammar 30%, pronunciation 20%, fluency 25%,
    /// pause 25%) scaled by correctness: multiplier ranges from 0.3 (all
    /// answers wrong) to 0.6 (all correct). The canonical formula.
    CorrectnessScaled,
    /// Flat weighted sum: grammar 25%, pronunciation 5%, fluency 15%,
    /// pause 15%, correctness 40%.
    FlatWeighted,
}

impl OverallScoreFormula {
    pub fn compute(&self, scores: &PerformanceScores) -> i64 {
        match self {
            OverallScoreFormula::CorrectnessScaled => {
                let base = scores.grammar * 0.3
                    + scores.pronunciation * 0.2
                    + scores.fluency * 0.25
                    + scores.pause * 0.25;
                let correctness_impact = 0.3 + (scores.correctness / 100.0) * 0.3;
                (base * correctness_impact).round() as i64
            }
            OverallScoreFormula::FlatWeighted => {
                let total = scores.grammar * 0.25
                    + scores.pronunciation * 0.05
                    + scores.fluency * 0.15
                    + scores.pause * 0.15
                    + scores.correctness * 0.40;
                total.round() as i64
            }
        }
    }
}

/// Overall score using the canonical formula
pub fn overall_score(scores: &PerformanceScores) -> i64 {
    OverallScoreFormula::CorrectnessScaled.compute(scores)
}

/// Convenience: stats, area scores and overall score in one pass
pub fn score_feedback(
    feedback: &[Option<FeedbackEntry>],
) -> (OverallStats, PerformanceScores, i64) {
    let stats = OverallStats::from_feedback(feedback, feedback.len() as u32);
    let scores = PerformanceScores::from_stats(&stats);
    let overall = overall_score(&scores);
    (stats, scores, overall)
}
