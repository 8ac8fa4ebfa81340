use crate::model::db::ChoiceId;

/// The voting form on the detail page.
#[derive(Debug, Clone, Copy, FromForm)]
pub struct VoteForm {
    /// The selected choice. `None` if nothing was selected, or the value
    /// was not a choice ID.
    pub choice: Option<ChoiceId>,
}

/// The question creation form.
#[derive(Debug, Clone, FromForm)]
pub struct QuestionForm {
    pub q: Option<String>,
}

impl QuestionForm {
    /// The submitted question text, trimmed, or `None` if it is blank.
    pub fn question_text(&self) -> Option<&str> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(q: Option<&str>) -> QuestionForm {
        QuestionForm {
            q: q.map(str::to_string),
        }
    }

    #[test]
    fn blank_question_is_rejected() {
        assert_eq!(form(None).question_text(), None);
        assert_eq!(form(Some("")).question_text(), None);
        assert_eq!(form(Some("  \t ")).question_text(), None);
    }

    #[test]
    fn question_text_is_trimmed() {
        assert_eq!(form(Some(" Why? ")).question_text(), Some("Why?"));
    }
}
