//! Plain-text export of an assessment.

use crate::assessment::Assessment;
use crate::chart::ScaleConversion;
use crate::curriculum;
use crate::feedback::{Audience, Depth};
use crate::rubric::Rubric;
use crate::scoring;

/// Render an assessment as a plain-text report.
///
/// `conversion` is the scale conversion of the assessment's total and
/// `rubric` names each category level. Feedback is taken from the requested
/// grid cell after normalisation.
pub fn render_text(
    assessment: &Assessment,
    conversion: &ScaleConversion,
    rubric: &Rubric,
    audience: Audience,
    depth: Depth,
) -> String {
    let mut lines = vec![
        "e-asTTle Writing Assessment Results".to_string(),
        format!(
            "Generated: {}",
            assessment.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ),
    ];
    match (&assessment.student_name, assessment.year_level) {
        (Some(name), Some(year)) => lines.push(format!("Student: {name} (Year {year})")),
        (Some(name), None) => lines.push(format!("Student: {name}")),
        (None, Some(year)) => lines.push(format!("Year level: {year}")),
        (None, None) => {}
    }

    lines.push("\nSCORES\n======".to_string());
    lines.extend(assessment.scores.iter().map(|(category, score)| {
        format!(
            "{category}: {} ({score}/8) - {}",
            scoring::level_for_score(score),
            rubric.descriptor(category, score)
        )
    }));
    lines.push(format!("\nAverage Score: {:.1}/8", assessment.scores.average()));
    lines.push(format!("Total Score: {}/56", assessment.total()));
    lines.push(format!(
        "Scale Score: {} ± {} aWs",
        conversion.scale_score, conversion.error_margin
    ));
    lines.push(
        match curriculum::year_expectation(&conversion.curriculum_level) {
            Some(expected) => format!(
                "Curriculum Level: {} ({expected})",
                conversion.curriculum_level
            ),
            None => format!("Curriculum Level: {}", conversion.curriculum_level),
        },
    );

    lines.push("\nSTUDENT WRITING\n===============".to_string());
    lines.push(assessment.text.trim_end().to_string());

    lines.push(format!(
        "\nFEEDBACK ({}, {})",
        audience.as_str().to_uppercase(),
        depth.as_str().to_uppercase()
    ));
    lines.push(assessment.feedback.select(audience, depth));

    if let Some(steps) = &assessment.next_steps {
        lines.push("\nNEXT STEPS\n==========".to_string());
        lines.extend(steps.teacher_next_steps.iter().map(|step| format!("- {step}")));
        lines.push(format!("\nWriting book: {}", steps.student_book_feedback));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{AssessOptions, assess};
    use crate::{chart, rubric};

    #[test]
    fn report_has_every_section() {
        let options = AssessOptions {
            student_name: Some("Mere".to_string()),
            year_level: Some(2),
        };
        let rubric = rubric::default_rubric();
        let outcome = assess(
            "I like my cat. She is orange.",
            &options,
            &chart::default_chart(),
            &rubric,
        );
        let text = render_text(
            &outcome.assessment,
            &outcome.conversion,
            &rubric,
            Audience::Teacher,
            Depth::Simple,
        );

        assert!(text.starts_with("e-asTTle Writing Assessment Results\nGenerated: "));
        assert!(text.contains("Student: Mere (Year 2)\n\nSCORES\n======\nIdeas: "));
        assert!(text.contains("Ideas: 1B (0/8) - Simple, minimal ideas\n"));
        assert!(text.contains("Sentence Style: 1B (0/8) - Simple sentences\n"));
        assert!(text.contains("Spelling: 3A (8/8) - Expert spelling\n"));
        assert!(text.contains("\n\nAverage Score: 3.3/8\n"));
        assert!(text.contains("Total Score: 23/56"));
        assert!(text.contains("Scale Score: 1546 ± 66 aWs"));
        assert!(text.contains("Curriculum Level: 3P (Year 5-6 expected)\n"));
        assert!(text.contains("STUDENT WRITING\n===============\nI like my cat. She is orange.\n"));
        assert!(text.contains("FEEDBACK (TEACHER, SIMPLE)\nAverage 3.3/8"));
        assert!(text.contains("NEXT STEPS"));
        assert!(text.ends_with("Writing book: Great job with your spelling!\n"));
    }

    #[test]
    fn report_without_student_details() {
        let rubric = rubric::default_rubric();
        let outcome = assess(
            "The end.",
            &AssessOptions::default(),
            &chart::default_chart(),
            &rubric,
        );
        let text = render_text(
            &outcome.assessment,
            &outcome.conversion,
            &rubric,
            Audience::Student,
            Depth::Standard,
        );
        assert!(!text.contains("Student:"));
        assert!(!text.contains("NEXT STEPS"));
        assert!(text.contains("Generated: "));
        assert!(text.contains("FEEDBACK (STUDENT, STANDARD)"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn report_names_levels_from_the_given_rubric() {
        let custom = rubric::parse_rubric_text(
            "Spelling: 1B: Lots 1P: Many 1A: Some 2B: Few 2P: Rare 2A: Clean 3B: Exact",
        )
        .rubric;
        let outcome = assess(
            "I like my cat. She is orange.",
            &AssessOptions::default(),
            &chart::default_chart(),
            &custom,
        );
        let text = render_text(
            &outcome.assessment,
            &outcome.conversion,
            &custom,
            Audience::Teacher,
            Depth::Simple,
        );
        // Seven descriptors: score 8 takes the last one.
        assert!(text.contains("Spelling: 3A (8/8) - Exact\n"), "{text}");
        assert!(text.contains("Ideas: 1B (0/8) - Simple, minimal ideas\n"));
    }
}
