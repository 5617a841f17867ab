//! The `coursetrack quiz` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use coursetrack_core::progress::PASS_MARK_PERCENT;
use coursetrack_core::quiz;

use super::open_session;

pub fn execute(
    config_path: Option<PathBuf>,
    module_id: String,
    answers: Option<String>,
) -> Result<()> {
    let mut session = open_session(config_path)?;
    let module = session
        .catalog()
        .module(&module_id)
        .ok_or_else(|| anyhow::anyhow!("unknown module: {module_id}"))?
        .clone();

    let Some(answers) = answers else {
        println!("{} quiz ({} questions)", module.title, module.quiz.len());
        println!();
        for (i, q) in module.quiz.iter().enumerate() {
            println!("{}. {}", i + 1, q.prompt);
            for (j, option) in q.options.iter().enumerate() {
                println!("   {}) {}", j + 1, option);
            }
        }
        println!();
        println!(
            "Submit with: coursetrack quiz {} --answers <n,n,...>",
            module.id
        );
        if let Some(score) = session.record().quiz_score(&module.id) {
            println!("Last score: {}/{} ({}%)", score.correct, score.total, score.percent());
        }
        return Ok(());
    };

    let selections = parse_answers(&answers)?;
    if selections.len() > module.quiz.len() {
        tracing::warn!(
            given = selections.len(),
            questions = module.quiz.len(),
            "extra answers ignored"
        );
    }

    let score = session.submit_quiz(&module.id, &selections)?;
    println!(
        "Score: {}/{} ({}%)",
        score.correct,
        score.total,
        score.percent()
    );
    if score.is_passing() {
        println!("Pass");
    } else {
        println!("Retake: the pass mark is {PASS_MARK_PERCENT}%");
    }
    println!();

    for (i, (q, r)) in module
        .quiz
        .iter()
        .zip(quiz::review(&module.quiz, &selections))
        .enumerate()
    {
        let mark = if r.is_correct { "correct" } else { "wrong" };
        println!("{}. {} [{mark}]", i + 1, q.prompt);
        if !r.is_correct {
            let answer = q
                .options
                .get(r.answer_index)
                .map(String::as_str)
                .unwrap_or("?");
            println!("   Answer: {answer}");
        }
        if let Some(explanation) = &r.explanation {
            println!("   {explanation}");
        }
    }

    Ok(())
}

/// Parse `2,1,-,3` into zero-based selections; `-` or an empty slot is unanswered.
fn parse_answers(input: &str) -> Result<Vec<Option<usize>>> {
    input
        .split(',')
        .map(str::trim)
        .enumerate()
        .map(|(i, part)| {
            if part.is_empty() || part == "-" {
                return Ok(None);
            }
            let n: usize = part
                .parse()
                .with_context(|| format!("answer {} is not a number: {part:?}", i + 1))?;
            anyhow::ensure!(n >= 1, "answer {} must be 1 or greater", i + 1);
            Ok(Some(n - 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_are_one_based() {
        assert_eq!(
            parse_answers("2,1,3").unwrap(),
            vec![Some(1), Some(0), Some(2)]
        );
    }

    #[test]
    fn dash_and_blank_are_unanswered() {
        assert_eq!(
            parse_answers("1, - ,,2").unwrap(),
            vec![Some(0), None, None, Some(1)]
        );
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!(parse_answers("0").is_err());
        assert!(parse_answers("1,b").is_err());
    }
}
