//! Prompt templates for Coursescout.
//!
//! The analysis prompt can be customized by placing an `analysis.toml` file in
//! the custom prompts directory.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub analysis: AnalysisPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for grounded course analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisPrompts {
    pub system: String,
    pub user: String,
}

impl Default for AnalysisPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an experienced course advisor. You only discuss the courses supplied in the user's message.

Guidelines:
- Never recommend, name or invent courses that are not in the supplied list
- Refer to courses by their exact titles
- If the supplied courses do not fit the student's interest, say so plainly"#
                .to_string(),

            user: r#"Act as an experienced course advisor analyzing courses for a student interested in: "{{query}}"

Based on their interest, analyze these relevant courses:

{{courses}}

Provide a detailed analysis that includes:
1. Query Analysis: What specific learning needs or interests are indicated by this query
2. Course Recommendations: For each relevant course:
   - Explain why it matches the student's needs
   - Highlight key features and benefits
   - Specify who would benefit most from this course
3. Best Match: Identify the most suitable course and explain
4. Learning Path: Suggest how the student might progress through these courses if relevant

Be specific in your analysis, mentioning course titles and concrete features.
Focus on how each course addresses the student's learning objectives."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let analysis_path = custom_path.join("analysis.toml");
            if analysis_path.exists() {
                let content = std::fs::read_to_string(&analysis_path)?;
                prompts.analysis = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Placeholders are substituted in one left-to-right pass, so inserted
    /// values are never scanned again. Unknown placeholders are left as-is.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        placeholder_regex()
            .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid placeholder regex"))
}
