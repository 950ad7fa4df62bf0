//! Instruction prompt for structured resume extraction

/// Prompt template; `{resume}` is replaced with the resume text.
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub extraction: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            extraction: EXTRACTION_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    pub fn render_extraction(&self, resume_text: &str) -> String {
        log::debug!("Rendering extraction prompt for {} chars of resume text", resume_text.len());
        self.extraction.replace("{resume}", resume_text)
    }
}

const EXTRACTION_TEMPLATE: &str = r#"Act as an applicant tracking system reviewing the resume below.

First extract the candidate's personal details. Then rate the resume from 0 to 100 in three categories and add a one or two sentence comment for each:
- formatting: plain layout, standard fonts, consistent date formats, no images or tables
- content: strong action verbs, quantified results, visible impact
- contact: name first, then a professional headline, then contact details

<RESUME>
{resume}
</RESUME>

Reply with a single JSON object and nothing else, using exactly these keys:
{"personalData": {"name": "", "email": "", "phone": "", "latestJobRole": ""},
 "scores": {"formatting": 0, "content": 0, "contact": 0},
 "comments": {"formatting": "", "content": "", "contact": ""}}
Use an empty string for any detail the resume does not contain."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_resume() {
        let prompt = PromptTemplates::default().render_extraction("JANE DOE\nSales Lead");
        assert!(prompt.contains("<RESUME>\nJANE DOE\nSales Lead\n</RESUME>"));
        assert!(!prompt.contains("{resume}"));
        assert!(prompt.contains("latestJobRole"));
    }
}
