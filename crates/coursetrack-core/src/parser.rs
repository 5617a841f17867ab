//! TOML course catalog parser.
//!
//! Loads catalogs from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{default_reference_prefix, Catalog, Lesson, Module, Question};

/// Intermediate TOML structure for parsing catalog files.
#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    course: TomlCourseHeader,
    #[serde(default)]
    modules: Vec<TomlModule>,
}

#[derive(Debug, Deserialize)]
struct TomlCourseHeader {
    title: String,
    version: String,
    #[serde(default = "default_reference_prefix")]
    reference_prefix: String,
}

#[derive(Debug, Deserialize)]
struct TomlModule {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    est_minutes: u32,
    #[serde(default)]
    lessons: Vec<TomlLesson>,
    #[serde(default)]
    quiz: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlLesson {
    id: String,
    title: String,
    #[serde(default)]
    duration_min: u32,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    prompt: String,
    options: Vec<String>,
    answer_index: usize,
    #[serde(default)]
    explanation: Option<String>,
}

/// Parse a single TOML file into a `Catalog`.
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a TOML string into a `Catalog` (useful for testing).
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<Catalog> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let modules = parsed
        .modules
        .into_iter()
        .map(|m| Module {
            id: m.id,
            title: m.title,
            description: m.description,
            est_minutes: m.est_minutes,
            lessons: m
                .lessons
                .into_iter()
                .map(|l| Lesson {
                    id: l.id,
                    title: l.title,
                    duration_min: l.duration_min,
                    content: l.content,
                })
                .collect(),
            quiz: m
                .quiz
                .into_iter()
                .map(|q| Question {
                    id: q.id,
                    prompt: q.prompt,
                    options: q.options,
                    answer_index: q.answer_index,
                    explanation: q.explanation,
                })
                .collect(),
        })
        .collect();

    Ok(Catalog {
        title: parsed.course.title,
        version: parsed.course.version,
        reference_prefix: parsed.course.reference_prefix,
        modules,
    })
}

/// Recursively load all `.toml` catalog files from a directory.
pub fn load_catalog_directory(dir: &Path) -> Result<Vec<Catalog>> {
    let mut catalogs = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            catalogs.extend(load_catalog_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_catalog(&path) {
                Ok(catalog) => catalogs.push(catalog),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(catalogs)
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The module ID (if applicable).
    pub module_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn module(module_id: &str, message: impl Into<String>) -> Self {
        Self {
            module_id: Some(module_id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a catalog for issues that would make the course impossible to finish
/// or confuse progress tracking.
pub fn validate_catalog(catalog: &Catalog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if catalog.version.trim().is_empty() {
        warnings.push(ValidationWarning {
            module_id: None,
            message: "course version is empty".into(),
        });
    }

    if catalog.modules.is_empty() {
        warnings.push(ValidationWarning {
            module_id: None,
            message: "course has no modules".into(),
        });
    }

    // Module ids key quiz scores, lesson ids key completion; both must be unique
    let mut seen_modules = HashSet::new();
    let mut seen_lessons = HashSet::new();
    for module in &catalog.modules {
        if !seen_modules.insert(&module.id) {
            warnings.push(ValidationWarning::module(
                &module.id,
                format!("duplicate module ID: {}", module.id),
            ));
        }
        for lesson in &module.lessons {
            if !seen_lessons.insert(&lesson.id) {
                warnings.push(ValidationWarning::module(
                    &module.id,
                    format!("duplicate lesson ID: {}", lesson.id),
                ));
            }
            if lesson.content.trim().is_empty() {
                warnings.push(ValidationWarning::module(
                    &module.id,
                    format!("lesson {} has no content", lesson.id),
                ));
            }
        }
    }

    for module in &catalog.modules {
        if module.quiz.is_empty() {
            warnings.push(ValidationWarning::module(
                &module.id,
                "module has no quiz questions and can never be passed",
            ));
        }

        let mut seen_questions = HashSet::new();
        for q in &module.quiz {
            if !seen_questions.insert(&q.id) {
                warnings.push(ValidationWarning::module(
                    &module.id,
                    format!("duplicate question ID: {}", q.id),
                ));
            }
            if q.options.len() < 2 {
                warnings.push(ValidationWarning::module(
                    &module.id,
                    format!("question {} needs at least 2 options", q.id),
                ));
            }
            if q.answer_index >= q.options.len() {
                warnings.push(ValidationWarning::module(
                    &module.id,
                    format!(
                        "question {} answer_index {} is out of range ({} options)",
                        q.id,
                        q.answer_index,
                        q.options.len()
                    ),
                ));
            }
        }
    }

    warnings
}
