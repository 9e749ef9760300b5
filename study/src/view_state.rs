//! View model of the browser front-end: which result section is showing,
//! where the flashcard deck stands, quiz answers and the loading indicator.
//!
//! Every transition is a plain method that clamps its index, so the page
//! script only renders whatever state it is handed.

use crate::artifact::{ArtifactKind, Flashcard, QuizQuestion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Flashcards,
    Quiz,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Summary, Section::Flashcards, Section::Quiz];

    pub fn index(self) -> usize {
        match self {
            Section::Summary => 0,
            Section::Flashcards => 1,
            Section::Quiz => 2,
        }
    }

    pub fn container_id(self) -> &'static str {
        match self {
            Section::Summary => "summaryContainer",
            Section::Flashcards => "flashcardsContainer",
            Section::Quiz => "quizContainer",
        }
    }
}

impl From<ArtifactKind> for Section {
    fn from(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Summary => Section::Summary,
            ArtifactKind::Flashcards => Section::Flashcards,
            ArtifactKind::Quiz => Section::Quiz,
        }
    }
}

/// Outer navigation state. Exactly one section is visible at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    current_section: usize,
}

impl ViewState {
    pub fn current(&self) -> Section {
        Section::ALL[self.current_section]
    }

    pub fn show(&mut self, section: Section) {
        self.current_section = section.index();
    }

    pub fn next_section(&mut self) {
        self.current_section = (self.current_section + 1).min(Section::ALL.len() - 1);
    }

    pub fn prev_section(&mut self) {
        self.current_section = self.current_section.saturating_sub(1);
    }

    pub fn can_go_prev(&self) -> bool {
        self.current_section > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.current_section < Section::ALL.len() - 1
    }

    pub fn is_visible(&self, section: Section) -> bool {
        self.current() == section
    }

    /// Visibility flag of every section, in display order.
    pub fn visibility(&self) -> [(Section, bool); 3] {
        Section::ALL.map(|s| (s, self.is_visible(s)))
    }
}

/// One card shown at a time; the answer stays hidden until revealed.
#[derive(Debug, Clone, PartialEq)]
pub struct FlashcardDeck {
    cards: Vec<Flashcard>,
    index: usize,
    revealed: bool,
}

impl FlashcardDeck {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self {
            cards,
            index: 0,
            revealed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.index)
    }

    /// The answer of the current card once revealed.
    pub fn visible_answer(&self) -> Option<&str> {
        if self.revealed {
            self.current().map(|c| c.answer.as_str())
        } else {
            None
        }
    }

    pub fn reveal(&mut self) {
        if !self.cards.is_empty() {
            self.revealed = true;
        }
    }

    pub fn next(&mut self) {
        if self.can_go_next() {
            self.index += 1;
            self.revealed = false;
        }
    }

    pub fn prev(&mut self) {
        if self.can_go_prev() {
            self.index -= 1;
            self.revealed = false;
        }
    }

    pub fn can_go_prev(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.index + 1 < self.cards.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerFeedback {
    Correct,
    Incorrect,
}

/// The rendered quiz and the option picked for each question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizBoard {
    questions: Vec<QuizQuestion>,
    chosen: Vec<Option<usize>>,
}

impl QuizBoard {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        let chosen = vec![None; questions.len()];
        Self { questions, chosen }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// Record a click on `option` of `question`. Out-of-range clicks are ignored.
    pub fn choose(&mut self, question: usize, option: usize) -> Option<AnswerFeedback> {
        let q = self.questions.get(question)?;
        let picked = q.options.get(option)?;
        let feedback = if q.is_correct(picked) {
            AnswerFeedback::Correct
        } else {
            AnswerFeedback::Incorrect
        };
        self.chosen[question] = Some(option);
        Some(feedback)
    }

    pub fn feedback(&self, question: usize) -> Option<AnswerFeedback> {
        let option = (*self.chosen.get(question)?)?;
        let q = &self.questions[question];
        Some(if q.is_correct(&q.options[option]) {
            AnswerFeedback::Correct
        } else {
            AnswerFeedback::Incorrect
        })
    }

    pub fn score(&self) -> usize {
        (0..self.questions.len())
            .filter(|&i| self.feedback(i) == Some(AnswerFeedback::Correct))
            .count()
    }
}

/// Loading indicator and error line shared by every generation action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading(Section),
    Loaded(Section),
    Failed(String),
}

impl LoadState {
    pub fn begin(&mut self, view: &mut ViewState, section: Section) {
        view.show(section);
        *self = LoadState::Loading(section);
    }

    /// Ends the current action, success or not; the indicator always goes away.
    pub fn finish<T, E: std::fmt::Display>(&mut self, outcome: &Result<T, E>) {
        let section = match self {
            LoadState::Loading(section) | LoadState::Loaded(section) => *section,
            _ => return,
        };
        *self = match outcome {
            Ok(_) => LoadState::Loaded(section),
            Err(e) => LoadState::Failed(format!("An error occurred: {e}")),
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(n: usize) -> Vec<Flashcard> {
        (0..n)
            .map(|i| Flashcard {
                question: format!("q{i}"),
                answer: format!("a{i}"),
            })
            .collect()
    }

    #[test]
    fn starts_on_summary_with_prev_disabled() {
        let view = ViewState::default();
        assert_eq!(view.current(), Section::Summary);
        assert!(!view.can_go_prev());
        assert!(view.can_go_next());
    }

    #[test]
    fn section_index_is_clamped_whatever_the_click_order() {
        let mut view = ViewState::default();
        let clicks = [true, true, true, true, false, true, false, false, false, false, true];
        for next in clicks {
            if next {
                view.next_section();
            } else {
                view.prev_section();
            }
            assert!(view.current().index() < Section::ALL.len());
            let visible = view.visibility().iter().filter(|(_, v)| *v).count();
            assert_eq!(visible, 1);
        }
        assert_eq!(view.current(), Section::Flashcards);
    }

    #[test]
    fn next_past_the_last_section_is_a_no_op() {
        let mut view = ViewState::default();
        view.show(Section::Quiz);
        view.next_section();
        assert_eq!(view.current(), Section::Quiz);
        assert!(!view.can_go_next());
    }

    #[test]
    fn deck_navigation_stays_in_bounds() {
        let mut deck = FlashcardDeck::new(cards(3));
        deck.prev();
        assert_eq!(deck.index(), 0);
        for _ in 0..10 {
            deck.next();
        }
        assert_eq!(deck.index(), 2);
        assert!(!deck.can_go_next());
        assert_eq!(deck.current().unwrap().question, "q2");
    }

    #[test]
    fn answer_is_hidden_again_after_moving() {
        let mut deck = FlashcardDeck::new(cards(2));
        assert_eq!(deck.visible_answer(), None);
        deck.reveal();
        assert_eq!(deck.visible_answer(), Some("a0"));
        deck.next();
        assert_eq!(deck.visible_answer(), None);
        deck.reveal();
        deck.next();
        assert_eq!(deck.visible_answer(), Some("a1"));
    }

    #[test]
    fn empty_deck_has_nothing_to_show() {
        let mut deck = FlashcardDeck::new(Vec::new());
        deck.next();
        deck.reveal();
        assert!(deck.current().is_none());
        assert!(!deck.can_go_prev() && !deck.can_go_next());
    }

    #[test]
    fn deck_index_is_independent_of_section_index() {
        let mut view = ViewState::default();
        let mut deck = FlashcardDeck::new(cards(5));
        view.show(Section::Flashcards);
        deck.next();
        deck.next();
        view.next_section();
        assert_eq!(deck.index(), 2);
        assert_eq!(view.current(), Section::Quiz);
    }

    #[test]
    fn quiz_feedback_follows_correct_answer() {
        let mut board = QuizBoard::new(vec![QuizQuestion {
            question: "Largest planet?".into(),
            options: vec!["Mars".into(), "Jupiter".into()],
            correct_answer: "Jupiter".into(),
        }]);
        assert_eq!(board.choose(0, 0), Some(AnswerFeedback::Incorrect));
        assert_eq!(board.score(), 0);
        assert_eq!(board.choose(0, 1), Some(AnswerFeedback::Correct));
        assert_eq!(board.feedback(0), Some(AnswerFeedback::Correct));
        assert_eq!(board.score(), 1);
        assert_eq!(board.choose(0, 7), None);
        assert_eq!(board.choose(3, 0), None);
    }

    #[test]
    fn loading_indicator_always_clears() {
        let mut view = ViewState::default();
        let mut load = LoadState::default();

        load.begin(&mut view, Section::Quiz);
        assert!(load.is_loading());
        assert_eq!(view.current(), Section::Quiz);

        load.finish::<(), _>(&Err("Error while generating the quiz."));
        assert!(!load.is_loading());
        assert_eq!(
            load.error_message(),
            Some("An error occurred: Error while generating the quiz.")
        );

        load.begin(&mut view, Section::from(ArtifactKind::Summary));
        load.finish::<(), String>(&Ok(()));
        assert_eq!(load, LoadState::Loaded(Section::Summary));
        assert_eq!(load.error_message(), None);
        assert_eq!(view.current(), Section::Summary);
    }
}
