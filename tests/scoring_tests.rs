// Unit tests for score aggregation
//
// These tests verify the per-area performance formulas, the defaults for
// missing data, and both overall-score variants against hand-computed
// values.

use speakcheck::scoring::{
    overall_score, score_feedback, OverallScoreFormula, OverallStats, PerformanceScores,
};
use speakcheck::session::{
    CorrectnessFeedback, FeedbackAnalysis, FeedbackEntry, FluencyFeedback, GrammarFeedback,
    PauseFeedback, PronunciationFeedback,
};

fn entry_with_grammar_errors(count: u32) -> FeedbackEntry {
    FeedbackEntry {
        text: "an answer with several words".to_string(),
        video_url: None,
        analysis: FeedbackAnalysis {
            grammar: Some(GrammarFeedback {
                error_count: count,
                errors: Vec::new(),
            }),
            ..FeedbackAnalysis::default()
        },
    }
}

#[test]
fn test_grammar_score_penalizes_errors_across_questions() {
    // 1 + 0 + 2 errors over 3 questions: 100 - (3/3)*5 = 95
    let feedback = vec![
        Some(entry_with_grammar_errors(1)),
        Some(entry_with_grammar_errors(0)),
        Some(entry_with_grammar_errors(2)),
    ];

    let stats = OverallStats::from_feedback(&feedback, 3);
    assert_eq!(stats.total_grammar_errors, 3);

    let scores = PerformanceScores::from_stats(&stats);
    assert_eq!(scores.grammar, 95.0);
}

#[test]
fn test_unanswered_assessment_defaults() {
    let feedback: Vec<Option<FeedbackEntry>> = vec![None, None, None];

    let stats = OverallStats::from_feedback(&feedback, 3);
    let scores = PerformanceScores::from_stats(&stats);

    assert_eq!(scores.grammar, 100.0);
    assert_eq!(scores.pronunciation, 100.0);
    assert_eq!(scores.fluency, 100.0);
    assert_eq!(scores.pause, 100.0);
    assert_eq!(scores.correctness, 0.0);

    // Perfect base scaled by the floor correctness multiplier of 0.3
    assert_eq!(overall_score(&scores), 30);
}

#[test]
fn test_zero_questions_never_divides() {
    let stats = OverallStats::from_feedback(&[], 0);
    let scores = PerformanceScores::from_stats(&stats);

    assert!(scores.grammar.is_finite());
    assert_eq!(scores.grammar, 100.0);
    assert_eq!(scores.pronunciation, 100.0);
    assert_eq!(scores.correctness, 0.0);
    assert!(overall_score(&scores) >= 0);
}

#[test]
fn test_non_finite_incoming_scores_are_sanitized() {
    let entry = FeedbackEntry {
        text: "some words here".to_string(),
        video_url: None,
        analysis: FeedbackAnalysis {
            fluency: Some(FluencyFeedback {
                fluency_score: f64::NAN,
                filler_word_count: 0,
                filler_words: Vec::new(),
            }),
            correctness: Some(CorrectnessFeedback {
                score: f64::INFINITY,
                relevance_score: 40.0,
                quality_score: 40.0,
                remark: None,
            }),
            ..FeedbackAnalysis::default()
        },
    };

    let stats = OverallStats::from_feedback(&[Some(entry)], 1);
    assert_eq!(stats.total_fluency_score, 0.0);
    assert_eq!(stats.total_correctness_score, 0.0);

    let scores = PerformanceScores::from_stats(&stats);
    assert!(scores.fluency.is_finite());
    assert!(scores.correctness.is_finite());
}

#[test]
fn test_scores_clamped_to_range() {
    // 50 errors on one question would go far below zero unclamped
    let feedback = vec![Some(entry_with_grammar_errors(50))];

    let stats = OverallStats::from_feedback(&feedback, 1);
    let scores = PerformanceScores::from_stats(&stats);

    assert_eq!(scores.grammar, 0.0);
}

#[test]
fn test_missing_areas_keep_their_own_denominator() {
    let with_fluency = FeedbackEntry {
        text: "first answer text".to_string(),
        video_url: None,
        analysis: FeedbackAnalysis {
            fluency: Some(FluencyFeedback {
                fluency_score: 80.0,
                filler_word_count: 2,
                filler_words: Vec::new(),
            }),
            ..FeedbackAnalysis::default()
        },
    };
    let without_fluency = FeedbackEntry {
        text: "second answer text".to_string(),
        video_url: None,
        analysis: FeedbackAnalysis::default(),
    };

    let stats = OverallStats::from_feedback(&[Some(with_fluency), Some(without_fluency)], 2);
    assert_eq!(stats.fluency_count, 1);

    let scores = PerformanceScores::from_stats(&stats);
    // Average over the one question that has fluency data, not both
    assert_eq!(scores.fluency, 80.0);
}

#[test]
fn test_pause_score_uses_average_pauses_per_answer() {
    let entry = FeedbackEntry {
        text: "answer".to_string(),
        video_url: None,
        analysis: FeedbackAnalysis {
            pauses: Some(PauseFeedback {
                total_pauses: 3,
                total_pause_duration: 4.5,
                pause_details: Vec::new(),
            }),
            ..FeedbackAnalysis::default()
        },
    };

    let stats = OverallStats::from_feedback(&[Some(entry)], 1);
    let scores = PerformanceScores::from_stats(&stats);

    // 100 - (3/1)*10 = 70
    assert_eq!(scores.pause, 70.0);
}

#[test]
fn test_overall_score_formulas_match_hand_computed_values() {
    let scores = PerformanceScores {
        grammar: 90.0,
        pronunciation: 80.0,
        fluency: 70.0,
        pause: 60.0,
        correctness: 50.0,
    };

    // base = 27 + 16 + 17.5 + 15 = 75.5; impact = 0.3 + 0.15 = 0.45
    assert_eq!(OverallScoreFormula::CorrectnessScaled.compute(&scores), 34);

    // 22.5 + 4 + 10.5 + 9 + 20 = 66
    assert_eq!(OverallScoreFormula::FlatWeighted.compute(&scores), 66);

    // The free function is the canonical variant
    assert_eq!(overall_score(&scores), 34);
}

#[test]
fn test_score_feedback_is_consistent_with_manual_pipeline() {
    let feedback = vec![
        Some(entry_with_grammar_errors(1)),
        Some(FeedbackEntry {
            text: "second answer".to_string(),
            video_url: None,
            analysis: FeedbackAnalysis {
                pronunciation: Some(PronunciationFeedback {
                    error_count: 2,
                    errors: Vec::new(),
                }),
                ..FeedbackAnalysis::default()
            },
        }),
    ];

    let (stats, scores, overall) = score_feedback(&feedback);

    assert_eq!(stats.total_questions, 2);
    assert_eq!(overall, overall_score(&scores));
}
