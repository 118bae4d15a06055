use crate::frontmatter::Header;
use crate::models::NotePath;
use crate::service::Suggestion;

/// One suggested tag and whether the user keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub tag: String,
    pub selected: bool,
}

/// How the review dialog ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// The user confirmed; holds exactly the selected tags, in suggestion order.
    Confirmed(Vec<String>),
    /// The user dismissed the dialog; nothing is written.
    Cancelled,
}

/// State of the tag review dialog.
///
/// Built from a [`Suggestion`] and discarded once the dialog closes.
#[derive(Debug, Clone)]
pub struct ReviewApp {
    path: NotePath,
    /// Note text after the header, shown as a preview.
    preview: String,
    existing: Vec<String>,
    candidates: Vec<Candidate>,
    /// Highlighted row (None only when there are no candidates)
    cursor: Option<usize>,
    outcome: Option<ReviewOutcome>,
}

impl ReviewApp {
    /// Creates the dialog state with every suggested tag selected.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagsmith::models::NotePath;
    /// use tagsmith::review::ReviewApp;
    /// use tagsmith::service::Suggestion;
    ///
    /// let suggestion = Suggestion {
    ///     path: NotePath::from("a.md"),
    ///     content: "Body".to_string(),
    ///     existing: Vec::new(),
    ///     tags: vec!["rust".to_string(), "async".to_string()],
    /// };
    ///
    /// let app = ReviewApp::new(&suggestion);
    /// assert_eq!(app.selected_tags(), vec!["rust", "async"]);
    /// assert_eq!(app.cursor(), Some(0));
    /// ```
    pub fn new(suggestion: &Suggestion) -> Self {
        let preview = Header::detect(&suggestion.content)
            .map(|header| header.rest().trim_start().to_string())
            .unwrap_or_else(|| suggestion.content.clone());

        let candidates: Vec<Candidate> = suggestion
            .tags
            .iter()
            .map(|tag| Candidate {
                tag: tag.clone(),
                selected: true,
            })
            .collect();

        Self {
            path: suggestion.path.clone(),
            preview,
            existing: suggestion.existing.clone(),
            cursor: if candidates.is_empty() { None } else { Some(0) },
            candidates,
            outcome: None,
        }
    }

    pub fn path(&self) -> &NotePath {
        &self.path
    }

    pub fn preview(&self) -> &str {
        &self.preview
    }

    /// Tags already in the note's header.
    pub fn existing(&self) -> &[String] {
        &self.existing
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Returns the selected tags in suggestion order.
    pub fn selected_tags(&self) -> Vec<String> {
        self.candidates
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.tag.clone())
            .collect()
    }

    /// Number of selected tags.
    pub fn selected_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.selected).count()
    }

    /// Moves the cursor down, wrapping to the top.
    pub fn select_next(&mut self) {
        if self.candidates.is_empty() {
            self.cursor = None;
            return;
        }

        self.cursor = Some(match self.cursor {
            None => 0,
            Some(i) if i + 1 >= self.candidates.len() => 0,
            Some(i) => i + 1,
        });
    }

    /// Moves the cursor up, wrapping to the bottom.
    pub fn select_previous(&mut self) {
        if self.candidates.is_empty() {
            self.cursor = None;
            return;
        }

        self.cursor = Some(match self.cursor {
            None | Some(0) => self.candidates.len() - 1,
            Some(i) => i - 1,
        });
    }

    /// Flips the selection of the highlighted tag.
    pub fn toggle_current(&mut self) {
        if let Some(i) = self.cursor
            && let Some(candidate) = self.candidates.get_mut(i)
        {
            candidate.selected = !candidate.selected;
        }
    }

    /// Selects every tag, or clears them all if every tag is already selected.
    pub fn toggle_all(&mut self) {
        let select = self.selected_count() < self.candidates.len();
        for candidate in &mut self.candidates {
            candidate.selected = select;
        }
    }

    /// Ends the dialog with the current selection.
    pub fn confirm(&mut self) {
        self.outcome = Some(ReviewOutcome::Confirmed(self.selected_tags()));
    }

    /// Ends the dialog without applying anything.
    pub fn cancel(&mut self) {
        self.outcome = Some(ReviewOutcome::Cancelled);
    }

    /// How the dialog ended, or `None` while it is still open.
    pub fn outcome(&self) -> Option<&ReviewOutcome> {
        self.outcome.as_ref()
    }

    /// Consumes the state, treating an unfinished dialog as cancelled.
    pub fn into_outcome(self) -> ReviewOutcome {
        self.outcome.unwrap_or(ReviewOutcome::Cancelled)
    }
}
