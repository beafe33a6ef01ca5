//! Assembles a finished assessment into a reviewable report and renders
//! it as a printable document.

use crate::ai::IdealAnswer;
use crate::scoring::{overall_score, OverallStats, PerformanceScores};
use crate::session::{AssessmentSession, AssessmentSetup, FeedbackAnalysis};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Per-question section of a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionReport {
    pub index: usize,
    pub question: String,
    pub answered: bool,
    pub transcript: Option<String>,
    pub video_url: Option<String>,
    pub word_count: usize,
    pub feedback: Option<FeedbackAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ideal: Option<IdealAnswer>,
}

/// Full assessment report: aggregate scores plus one section per question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub setup: AssessmentSetup,
    pub stats: OverallStats,
    pub scores: PerformanceScores,
    pub overall_score: i64,
    pub questions: Vec<QuestionReport>,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Build a report from a completed (or abandoned) session. Skipped
    /// questions appear as unanswered sections rather than being
    /// dropped.
    pub fn assemble(session: &AssessmentSession) -> Self {
        let total_questions = session.questions.len() as u32;
        let stats = OverallStats::from_feedback(&session.feedback, total_questions);
        let scores = PerformanceScores::from_stats(&stats);
        let overall = overall_score(&scores);

        let questions = session
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let entry = session.feedback.get(index).and_then(Option::as_ref);

                QuestionReport {
                    index,
                    question: question.clone(),
                    answered: entry.is_some(),
                    transcript: entry.map(|e| e.text.clone()),
                    video_url: entry.and_then(|e| e.video_url.clone()),
                    word_count: entry.map(|e| e.word_count()).unwrap_or(0),
                    feedback: entry.map(|e| e.analysis.clone()),
                    ideal: None,
                }
            })
            .collect();

        Self {
            setup: session.setup.clone(),
            stats,
            scores,
            overall_score: overall,
            questions,
            generated_at: Utc::now(),
        }
    }

    /// Attach a model answer to one question's section.
    pub fn attach_ideal_answer(&mut self, index: usize, ideal: IdealAnswer) {
        if let Some(question) = self.questions.get_mut(index) {
            question.ideal = Some(ideal);
        }
    }
}

/// Render a report as a markdown document.
pub fn render_markdown(report: &Report) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Assessment Report");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "- Language: {} | Topic: {} | Difficulty: {}",
        report.setup.language, report.setup.topic, report.setup.difficulty
    );
    let _ = writeln!(
        out,
        "- Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "## Overall Performance");
    let _ = writeln!(out);
    let _ = writeln!(out, "**Overall score: {}/100**", report.overall_score);
    let _ = writeln!(out);
    let _ = writeln!(out, "| Area | Score |");
    let _ = writeln!(out, "|------|-------|");
    let _ = writeln!(out, "| Grammar | {:.1} |", report.scores.grammar);
    let _ = writeln!(out, "| Pronunciation | {:.1} |", report.scores.pronunciation);
    let _ = writeln!(out, "| Fluency | {:.1} |", report.scores.fluency);
    let _ = writeln!(out, "| Pauses | {:.1} |", report.scores.pause);
    let _ = writeln!(out, "| Correctness | {:.1} |", report.scores.correctness);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} grammar errors, {} pronunciation errors, {} filler words, {} advanced words across {} questions.",
        report.stats.total_grammar_errors,
        report.stats.total_pronunciation_errors,
        report.stats.total_filler_words,
        report.stats.total_advanced_words,
        report.stats.total_questions
    );
    let _ = writeln!(out);

    for question in &report.questions {
        let _ = writeln!(out, "## Question {}: {}", question.index + 1, question.question);
        let _ = writeln!(out);

        if !question.answered {
            let _ = writeln!(out, "_This question was not answered._");
            let _ = writeln!(out);
            continue;
        }

        if let Some(transcript) = &question.transcript {
            let _ = writeln!(out, "> {}", transcript);
            let _ = writeln!(out);
            let _ = writeln!(out, "{} words.", question.word_count);
            let _ = writeln!(out);
        }

        if let Some(url) = &question.video_url {
            let _ = writeln!(out, "[Recording]({})", url);
            let _ = writeln!(out);
        }

        if let Some(feedback) = &question.feedback {
            render_feedback(&mut out, feedback);
        }

        if let Some(ideal) = &question.ideal {
            let _ = writeln!(out, "### Ideal answer");
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", ideal.ideal_answer);
            let _ = writeln!(out);
            let _ = writeln!(out, "**Strengths:** {}", ideal.user_strengths);
            let _ = writeln!(out);
            let _ = writeln!(out, "**Improvements:** {}", ideal.areas_for_improvement);
            let _ = writeln!(out);
        }
    }

    out
}

fn render_feedback(out: &mut String, feedback: &FeedbackAnalysis) {
    if let Some(grammar) = &feedback.grammar {
        let _ = writeln!(out, "### Grammar ({} errors)", grammar.error_count);
        for error in &grammar.errors {
            let _ = writeln!(
                out,
                "- `{}` -> `{}`: {}",
                error.word, error.suggestion, error.explanation
            );
        }
        let _ = writeln!(out);
    }

    if let Some(pronunciation) = &feedback.pronunciation {
        let _ = writeln!(
            out,
            "### Pronunciation ({} challenges)",
            pronunciation.error_count
        );
        for error in &pronunciation.errors {
            let _ = writeln!(
                out,
                "- `{}` [{}]: {}",
                error.word, error.phonetic, error.explanation
            );
        }
        let _ = writeln!(out);
    }

    if let Some(fluency) = &feedback.fluency {
        let _ = writeln!(
            out,
            "### Fluency: {:.1} ({} filler words)",
            fluency.fluency_score, fluency.filler_word_count
        );
        for filler in &fluency.filler_words {
            let _ = writeln!(out, "- \"{}\" at position {}", filler.word, filler.position);
        }
        let _ = writeln!(out);
    }

    if let Some(vocabulary) = &feedback.vocabulary {
        let _ = writeln!(
            out,
            "### Vocabulary: {} advanced words",
            vocabulary.total_advanced_words
        );
        if !vocabulary.unique_advanced_words.is_empty() {
            let _ = writeln!(out, "{}", vocabulary.unique_advanced_words.join(", "));
        }
        let _ = writeln!(out);
    }

    if let Some(pauses) = &feedback.pauses {
        let _ = writeln!(
            out,
            "### Pauses: {} ({:.1}s total)",
            pauses.total_pauses, pauses.total_pause_duration
        );
        let _ = writeln!(out);
    }

    if let Some(correctness) = &feedback.correctness {
        let _ = writeln!(
            out,
            "### Correctness: {:.0} (relevance {:.0}, quality {:.0})",
            correctness.score, correctness.relevance_score, correctness.quality_score
        );
        if let Some(remark) = &correctness.remark {
            let _ = writeln!(out, "{}", remark);
        }
        let _ = writeln!(out);
    }
}
