// Unit tests for report assembly and markdown rendering
//
// These tests verify that a report keeps one section per question,
// including unanswered ones, and that the rendered document carries
// the aggregate scores.

use speakcheck::report::{render_markdown, Report};
use speakcheck::scoring::overall_score;
use speakcheck::session::{
    AssessmentSession, AssessmentSetup, CorrectnessFeedback, FeedbackAnalysis, FeedbackEntry,
    GrammarError, GrammarFeedback,
};
use speakcheck::IdealAnswer;

fn sample_session() -> AssessmentSession {
    let answered = FeedbackEntry {
        text: "I enjoy reading books and hiking in the mountains".to_string(),
        video_url: Some("http://cdn.example.com/q0.webm".to_string()),
        analysis: FeedbackAnalysis {
            grammar: Some(GrammarFeedback {
                error_count: 1,
                errors: vec![GrammarError {
                    word: "goed".to_string(),
                    suggestion: "went".to_string(),
                    explanation: "irregular past tense".to_string(),
                }],
            }),
            correctness: Some(CorrectnessFeedback {
                score: 80.0,
                relevance_score: 40.0,
                quality_score: 40.0,
                remark: Some("On topic.".to_string()),
            }),
            ..FeedbackAnalysis::default()
        },
    };

    AssessmentSession {
        questions: vec![
            "Tell me about your hobbies.".to_string(),
            "Describe your hometown.".to_string(),
        ],
        feedback: vec![Some(answered), None],
        setup: AssessmentSetup::default(),
    }
}

#[test]
fn test_report_keeps_one_section_per_question() {
    let session = sample_session();
    let report = Report::assemble(&session);

    assert_eq!(report.questions.len(), 2);

    assert!(report.questions[0].answered);
    assert_eq!(report.questions[0].word_count, 9);
    assert!(report.questions[0].feedback.is_some());

    // The skipped question stays in the report as an unanswered section
    assert!(!report.questions[1].answered);
    assert!(report.questions[1].transcript.is_none());
    assert_eq!(report.questions[1].word_count, 0);
}

#[test]
fn test_report_scores_agree_with_scoring_module() {
    let session = sample_session();
    let report = Report::assemble(&session);

    assert_eq!(report.stats.total_questions, 2);
    assert_eq!(report.stats.total_grammar_errors, 1);
    assert_eq!(report.overall_score, overall_score(&report.scores));
}

#[test]
fn test_markdown_renders_answered_and_unanswered_sections() {
    let session = sample_session();
    let report = Report::assemble(&session);

    let markdown = render_markdown(&report);

    assert!(markdown.contains("# Assessment Report"));
    assert!(markdown.contains(&format!("**Overall score: {}/100**", report.overall_score)));
    assert!(markdown.contains("## Question 1: Tell me about your hobbies."));
    assert!(markdown.contains("> I enjoy reading books and hiking in the mountains"));
    assert!(markdown.contains("### Grammar (1 errors)"));
    assert!(markdown.contains("`goed` -> `went`: irregular past tense"));
    assert!(markdown.contains("[Recording](http://cdn.example.com/q0.webm)"));

    assert!(markdown.contains("## Question 2: Describe your hometown."));
    assert!(markdown.contains("_This question was not answered._"));
}

#[test]
fn test_attached_ideal_answer_appears_in_markdown() {
    let session = sample_session();
    let mut report = Report::assemble(&session);

    report.attach_ideal_answer(
        0,
        IdealAnswer {
            ideal_answer: "A structured answer covering two hobbies.".to_string(),
            user_strengths: "Concrete examples.".to_string(),
            areas_for_improvement: "Slow down between sentences.".to_string(),
        },
    );

    // Out-of-range attachments are ignored
    report.attach_ideal_answer(5, IdealAnswer::unavailable());

    assert!(report.questions[0].ideal.is_some());
    assert!(report.questions[1].ideal.is_none());

    let markdown = render_markdown(&report);
    assert!(markdown.contains("### Ideal answer"));
    assert!(markdown.contains("A structured answer covering two hobbies."));
    assert!(markdown.contains("**Strengths:** Concrete examples."));
}
