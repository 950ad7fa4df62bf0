//! End-to-end scoring scenarios and score properties

use resume_scorer::config::ScoringConfig;
use resume_scorer::processing::rules::{RuleId, RuleOutcome};
use resume_scorer::processing::text_processor::normalize;
use resume_scorer::{evaluate, ScoreReport, ScoringEngine};

const CLEAN_RESUME: &str = "PRIYA SHARMA
Senior Sales Manager
Pune (411001)
98765 43210 | priya.sharma@example.com | www.priyasharma.dev

PROFESSIONAL SUMMARY
Senior sales manager with nine years of experience in B2B software. I organise regional teams and analyse pipeline data to grow revenue.

WORK EXPERIENCE
Senior Sales Manager - Orbit Software Pvt Ltd (2020 - 2024)
- Led a team of 14 account executives across three regions
- Grew annual revenue by 38 percent in two years

EDUCATION
MBA, Symbiosis Institute of Business Management, 2016";

const US_SPELLING_RESUME: &str = "JOHN SMITH
Sales Manager
Mumbai (400001)
98765 43210 | john.smith@example.com | www.johnsmith.dev

PROFESSIONAL SUMMARY
Sales manager with eight years of experience who can organize regional teams, analyze market data and lead the defense of key accounts.

WORK EXPERIENCE
Sales Manager - Acme Traders Ltd (2019 - 2024)
- Led a team of 12 and grew revenue by 45 percent
- Reduced customer churn by 20 percent in two years
- Analyzed pricing data to improve margins by $2m

EDUCATION
MBA, Delhi University, 2015";

fn outcome(report: &ScoreReport, rule: RuleId) -> &RuleOutcome {
    report
        .outcomes
        .iter()
        .find(|o| o.rule == rule)
        .unwrap_or_else(|| panic!("no outcome for {}", rule))
}

#[test]
fn test_good_summary_and_experience_are_not_flagged() {
    let report = evaluate(
        "JOHN SMITH\nProfessional Summary:\nExperienced marketing manager with a proven track record.\n\nWork Experience:\n- Led team of 5 and grew sales by 45%",
    );

    assert!(!outcome(&report, RuleId::ProfessionalSummary).triggered);
    assert!(!outcome(&report, RuleId::WorkExperience).triggered);
    assert!(report.final_score <= 100);
}

#[test]
fn test_image_tab_and_undated_header_deduct_additively() {
    let text = "<img src=\"photo.png\">\nJOHN SMITH\tSales\nWork Experience:\nSales Lead - Acme Ltd\n- Led team of 5 and grew sales by 45%";
    let report = evaluate(text);

    assert_eq!(outcome(&report, RuleId::Images).penalty, 10.0);
    assert_eq!(outcome(&report, RuleId::SingleColumn).penalty, 5.0);
    assert_eq!(outcome(&report, RuleId::WorkExperience).penalty, 3.0);

    let expected = (100.0 - report.total_penalty()).round().clamp(0.0, 100.0) as u8;
    assert_eq!(report.final_score, expected);
    assert!(report.total_penalty() >= 18.0);
}

#[test]
fn test_empty_input_scores_zero_with_message() {
    let report = evaluate("");
    assert_eq!(report.final_score, 0);
    assert_eq!(report.suggestions.len(), 1);
    assert!(!report.suggestions[0].is_empty());
}

#[test]
fn test_us_spelling_only_costs_three_points() {
    let report = evaluate(US_SPELLING_RESUME);

    assert_eq!(report.final_score, 97, "deductions: {:?}", report.debug_log);
    let triggered: Vec<RuleId> = report.triggered().map(|o| o.rule).collect();
    assert_eq!(triggered, vec![RuleId::UkSpelling]);
}

#[test]
fn test_clean_resume_scores_full_marks() {
    let report = evaluate(CLEAN_RESUME);
    assert_eq!(report.final_score, 100, "deductions: {:?}", report.debug_log);
    assert!(report.debug_log.is_empty());
}

#[test]
fn test_removing_contact_details_lowers_score_by_their_penalty() {
    let penalties = ScoringConfig::default();

    let no_email = CLEAN_RESUME.replace(" | priya.sharma@example.com", "");
    assert_eq!(evaluate(&no_email).final_score, 100 - penalties.email_missing as u8);

    let no_phone = CLEAN_RESUME.replace("98765 43210 | ", "");
    assert_eq!(evaluate(&no_phone).final_score, 100 - penalties.phone_missing as u8);

    let no_link = CLEAN_RESUME.replace(" | www.priyasharma.dev", "");
    assert_eq!(evaluate(&no_link).final_score, 100 - penalties.link_missing as u8);
}

#[test]
fn test_removing_all_contact_markers_and_digits_scores_strictly_lower() {
    let full = evaluate(CLEAN_RESUME);
    let stripped: String = CLEAN_RESUME
        .replace("PRIYA SHARMA\n", "")
        .replace("98765 43210 | priya.sharma@example.com | www.priyasharma.dev\n", "")
        .chars()
        .filter(|c| !c.is_ascii_digit())
        .collect();
    let report = evaluate(&stripped);

    assert!(report.final_score < full.final_score);
    for rule in [RuleId::Phone, RuleId::Email, RuleId::ProfileLink, RuleId::Metrics] {
        assert!(outcome(&report, rule).triggered, "{} not triggered", rule);
    }
}

#[test]
fn test_missing_name_line_costs_its_penalty() {
    // six long lines keep the headings out of the name window
    let opening = "Results driven senior sales manager with nine years in B2B software\n\
        Based in Pune and open to relocation anywhere across the country\n\
        Reachable on 98765 43210 or at priya.sharma@example.com and www.priyasharma.dev\n\
        Known for building regional teams that consistently beat their targets\n\
        Comfortable presenting to boards, founders and enterprise buyers alike\n\
        Available to join within thirty days of a confirmed offer letter";
    let body = CLEAN_RESUME.splitn(5, '\n').nth(4).unwrap();

    let unnamed = format!("{}\n{}", opening, body);
    let named = format!("PRIYA SHARMA\n{}", unnamed);

    let without = evaluate(&unnamed);
    let with = evaluate(&named);
    assert!(outcome(&without, RuleId::Name).triggered);
    assert!(!outcome(&with, RuleId::Name).triggered);
    assert_eq!(
        with.final_score - without.final_score,
        ScoringConfig::default().name_missing as u8
    );
}

#[test]
fn test_adding_defects_never_raises_score() {
    let base = evaluate(CLEAN_RESUME).final_score;
    let defects = [
        format!("{}\n<img src=\"x.png\">", CLEAN_RESUME),
        CLEAN_RESUME.replacen("PRIYA SHARMA", "PRIYA\tSHARMA", 1),
        CLEAN_RESUME.replace("(2020 - 2024)", ""),
        format!("{}\nI recieve praise", CLEAN_RESUME),
        format!("{}\nSkills table", CLEAN_RESUME),
        CLEAN_RESUME.replace("organise", "organize"),
    ];

    for text in &defects {
        let score = evaluate(text).final_score;
        assert!(score < base, "score {} not below {} for {:?}", score, base, text);
    }
}

#[test]
fn test_scores_stay_in_bounds() {
    let noisy = "<img> <table> \t teh adn recieve\n".repeat(50);
    let samples = ["", "x", "!!!! #### %%%% &&&& ****", noisy.as_str(), CLEAN_RESUME];
    for sample in samples {
        let report = evaluate(sample);
        assert!(report.final_score <= 100);
        assert!(report.outcomes.iter().all(|o| o.penalty >= 0.0));
    }
}

#[test]
fn test_evaluation_is_deterministic() {
    for sample in [CLEAN_RESUME, US_SPELLING_RESUME, "JOHN SMITH"] {
        assert_eq!(evaluate(sample), evaluate(sample));
    }
}

#[test]
fn test_normalized_text_scores_the_same() {
    let messy = CLEAN_RESUME.replace('\n', "\r\n").replace("EDUCATION", "\n\n\nEDUCATION");
    let normalized = normalize(&messy);
    assert_eq!(normalize(&normalized), normalized);
    assert_eq!(evaluate(&normalized).final_score, evaluate(CLEAN_RESUME).final_score);
}

#[test]
fn test_custom_penalties_change_the_score() {
    let penalties = ScoringConfig {
        us_spelling: 7.0,
        ..ScoringConfig::default()
    };
    let report = ScoringEngine::new(penalties).evaluate(US_SPELLING_RESUME);
    assert_eq!(report.final_score, 93);
}
