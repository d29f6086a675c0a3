// SPDX-License-Identifier: MIT

//! Static quiz bank and scorer.
//!
//! Questions and correct answers are a fixed table per module; there is no
//! general question bank. Modules without an entry here simply have no quiz
//! and complete without one. Scoring is informational: a module may be
//! completed regardless of score.

use std::collections::HashMap;

use crate::error::AppError;

/// One multiple-choice question with a single correct option index.
pub struct QuizQuestion {
    pub id: i64,
    pub prompt: &'static str,
    pub options: &'static [&'static str],
    pub correct: i64,
}

/// Quiz for the "Importancia Clínica" module.
const IMPORTANCIA_CLINICA_QUIZ: &[QuizQuestion] = &[
    QuizQuestion {
        id: 1,
        prompt: "¿Qué porcentaje de cánceres gástricos pueden perderse durante una endoscopía?",
        options: &["5-10%", "10-20%", "20-30%"],
        correct: 1,
    },
    QuizQuestion {
        id: 2,
        prompt: "¿Cuántos segmentos anatómicos evalúa GRACE?",
        options: &["2", "3", "5"],
        correct: 1,
    },
    QuizQuestion {
        id: 3,
        prompt: "¿GRACE fue validada solo por expertos?",
        options: &["Verdadero", "Falso"],
        correct: 1,
    },
];

/// Look up the fixed question set for a module slug.
pub fn questions_for(slug: &str) -> Option<&'static [QuizQuestion]> {
    match slug {
        "importancia-clinica" => Some(IMPORTANCIA_CLINICA_QUIZ),
        _ => None,
    }
}

/// Validate a submission against the known question set, then score it.
///
/// Rejects unknown question ids and out-of-range option indexes before any
/// scoring happens. Unanswered questions are allowed and count as incorrect.
/// Score is the count of exact matches; no partial credit, no negative
/// scoring.
pub fn validate_and_score(
    questions: &[QuizQuestion],
    answers: &HashMap<i64, i64>,
) -> Result<i64, AppError> {
    for (question_id, option_index) in answers {
        let question = questions
            .iter()
            .find(|q| q.id == *question_id)
            .ok_or_else(|| {
                AppError::Validation(format!("Unknown quiz question id: {}", question_id))
            })?;
        if *option_index < 0 || *option_index >= question.options.len() as i64 {
            return Err(AppError::Validation(format!(
                "Option index {} out of range for question {}",
                option_index, question_id
            )));
        }
    }

    let score = questions
        .iter()
        .filter(|q| answers.get(&q.id) == Some(&q.correct))
        .count() as i64;
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Vec<QuizQuestion> {
        [1, 2, 3]
            .into_iter()
            .map(|id| QuizQuestion {
                id,
                prompt: "",
                options: &["a", "b"],
                correct: 1,
            })
            .collect()
    }

    #[test]
    fn test_score_counts_exact_matches() {
        let questions = fixture();
        let answers = HashMap::from([(1, 1), (2, 1), (3, 0)]);

        let score = validate_and_score(&questions, &answers).unwrap();
        assert_eq!(score, 2);
    }

    #[test]
    fn test_unanswered_questions_count_as_incorrect() {
        let questions = fixture();
        let answers = HashMap::from([(1, 1)]);

        let score = validate_and_score(&questions, &answers).unwrap();
        assert_eq!(score, 1);
    }

    #[test]
    fn test_unknown_question_id_rejected() {
        let questions = fixture();
        let answers = HashMap::from([(99, 0)]);

        let err = validate_and_score(&questions, &answers).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_out_of_range_option_rejected() {
        let questions = fixture();

        let err = validate_and_score(&questions, &HashMap::from([(1, 2)])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = validate_and_score(&questions, &HashMap::from([(1, -1)])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_module_one_bank_matches_seed_slug() {
        let questions = questions_for("importancia-clinica").unwrap();
        assert_eq!(questions.len(), 3);
        assert!(questions_for("fundamentos-grace").is_none());
    }
}
