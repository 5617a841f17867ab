//! Core data model types for coursetrack.
//!
//! The course catalog is static content: an ordered list of modules, each with
//! ordered lessons and a quiz. Nothing in here changes at runtime.

use serde::{Deserialize, Serialize};

/// A single lesson inside a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    /// Identifier, unique across the whole course.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Estimated reading time in minutes.
    #[serde(default)]
    pub duration_min: u32,
    /// Lesson body (plain text or simple markup, carried verbatim).
    #[serde(default)]
    pub content: String,
}

/// A multiple-choice quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier of the question.
    pub id: String,
    /// The question text.
    pub prompt: String,
    /// Answer options, in display order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub answer_index: usize,
    /// Shown to the learner once the quiz has been submitted.
    #[serde(default)]
    pub explanation: Option<String>,
}

/// A course module: lessons followed by a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Unique identifier for this module.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Short description of the module.
    #[serde(default)]
    pub description: String,
    /// Estimated time for the whole module in minutes.
    #[serde(default)]
    pub est_minutes: u32,
    /// The lessons in this module.
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    /// The module quiz.
    #[serde(default)]
    pub quiz: Vec<Question>,
}

/// A complete course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Course title, printed on the certificate.
    pub title: String,
    /// Course version identifier, carried into certificates and completion events.
    pub version: String,
    /// Prefix of certificate reference codes.
    #[serde(default = "default_reference_prefix")]
    pub reference_prefix: String,
    /// The modules, in course order.
    #[serde(default)]
    pub modules: Vec<Module>,
}

pub(crate) fn default_reference_prefix() -> String {
    "CRT".to_string()
}

impl Catalog {
    /// All lessons across all modules, in course order.
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|m| m.lessons.iter())
    }

    /// Total number of lessons in the course.
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    /// Find a lesson and the module that contains it.
    pub fn lesson(&self, id: &str) -> Option<(&Module, &Lesson)> {
        self.modules
            .iter()
            .find_map(|m| m.lessons.iter().find(|l| l.id == id).map(|l| (m, l)))
    }

    /// Sum of the per-module time estimates.
    pub fn est_minutes(&self) -> u32 {
        self.modules.iter().map(|m| m.est_minutes).sum()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Build a catalog with the given number of lessons per module and one
    /// question per quiz whose correct answer is option 1.
    pub fn catalog(lessons_per_module: &[usize]) -> Catalog {
        let modules = lessons_per_module
            .iter()
            .enumerate()
            .map(|(mi, &count)| {
                let mid = format!("m{}", mi + 1);
                Module {
                    id: mid.clone(),
                    title: format!("Module {}", mi + 1),
                    description: String::new(),
                    est_minutes: 30,
                    lessons: (0..count)
                        .map(|li| Lesson {
                            id: format!("{mid}l{}", li + 1),
                            title: format!("Lesson {}", li + 1),
                            duration_min: 10,
                            content: "Read carefully.".into(),
                        })
                        .collect(),
                    quiz: vec![Question {
                        id: format!("{mid}q1"),
                        prompt: "Pick the second option".into(),
                        options: vec!["first".into(), "second".into()],
                        answer_index: 1,
                        explanation: None,
                    }],
                }
            })
            .collect();

        Catalog {
            title: "Test Course".into(),
            version: "1.0.0".into(),
            reference_prefix: "TST".into(),
            modules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::catalog;

    #[test]
    fn lesson_lookup_returns_owning_module() {
        let cat = catalog(&[2, 3]);
        let (module, lesson) = cat.lesson("m2l3").unwrap();
        assert_eq!(module.id, "m2");
        assert_eq!(lesson.title, "Lesson 3");
        assert!(cat.lesson("m3l1").is_none());
    }

    #[test]
    fn counts_span_all_modules() {
        let cat = catalog(&[3, 3, 3, 2]);
        assert_eq!(cat.lesson_count(), 11);
        assert_eq!(cat.lessons().count(), 11);
        assert_eq!(cat.est_minutes(), 120);
    }

    #[test]
    fn catalog_serde_defaults_prefix() {
        let json = r#"{"title":"T","version":"1"}"#;
        let cat: super::Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(cat.reference_prefix, "CRT");
        assert!(cat.modules.is_empty());
    }
}
