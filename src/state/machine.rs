//! Application state machine for the quiz session.
//!
//! The machine owns the deck, the current card index, the UI mode and the
//! edit drafts. It processes one event at a time and returns at most one
//! outgoing store request; it never touches a widget or a socket itself.
//! The hosting shell runs the event loop, renders whatever the machine
//! holds, and executes the requests.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::codec::{decode, encode};
use crate::models::{Card, Deck};
use crate::store::FetchError;

/// UI mode of the session.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Quiz,
    Edit,
}

/// Everything that can happen to the session: user interactions from the
/// shell and completions from the store threads.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Store fetch succeeded; payload is the raw wire text.
    DeckLoaded(String),
    /// Store fetch failed; the session degrades to a one-card deck showing
    /// the error tag as the question.
    DeckLoadFailed(FetchError),
    PickRandom,
    ToggleAnswer,
    EnterEdit,
    QuestionDraftChanged(String),
    AnswerDraftChanged(String),
    CancelEdit,
    SaveEdit,
    /// Fire-and-forget write resolved; the payload is diagnostics only and
    /// never mutates the deck.
    StoreWriteCompleted(Result<(), String>),
}

/// Request the machine asks the shell to execute against the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreRequest {
    Fetch,
    Put(String),
}

/// Session state. Mutated exclusively through [`QuizState::update`].
pub struct QuizState {
    deck: Deck,
    current_index: usize,
    mode: Mode,
    answer_visible: bool,
    question_draft: String,
    answer_draft: String,
    rng: StdRng,
}

impl QuizState {
    /// Creates the startup state: an empty deck with the initial deck fetch
    /// already pending. The shell must execute the returned request.
    pub fn new() -> (Self, StoreRequest) {
        (Self::with_rng(StdRng::from_entropy()), StoreRequest::Fetch)
    }

    /// Deterministic variant for tests: random picks replay identically for
    /// a given seed.
    pub fn with_seed(seed: u64) -> (Self, StoreRequest) {
        (Self::with_rng(StdRng::seed_from_u64(seed)), StoreRequest::Fetch)
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            deck: Deck::default(),
            current_index: 0,
            mode: Mode::Quiz,
            answer_visible: false,
            question_draft: String::new(),
            answer_draft: String::new(),
            rng,
        }
    }

    /// Processes one event to completion and returns the outgoing store
    /// request, if the transition produced one.
    pub fn update(&mut self, event: Event) -> Option<StoreRequest> {
        match event {
            Event::DeckLoaded(text) => {
                self.replace_deck(decode(&text));
                None
            }
            Event::DeckLoadFailed(error) => {
                // The UI must always have something to display, so the
                // error tag becomes the sole card of the deck.
                self.replace_deck(Deck {
                    cards: vec![Card {
                        question: error.tag().to_string(),
                        answer: String::new(),
                    }],
                });
                None
            }
            Event::PickRandom => {
                self.pick_random();
                None
            }
            Event::ToggleAnswer => {
                if self.mode == Mode::Quiz {
                    self.answer_visible = !self.answer_visible;
                }
                None
            }
            Event::EnterEdit => {
                self.enter_edit();
                None
            }
            Event::QuestionDraftChanged(text) => {
                if self.mode == Mode::Edit {
                    self.question_draft = text;
                }
                None
            }
            Event::AnswerDraftChanged(text) => {
                if self.mode == Mode::Edit {
                    self.answer_draft = text;
                }
                None
            }
            Event::CancelEdit => {
                if self.mode == Mode::Edit {
                    self.leave_edit();
                }
                None
            }
            Event::SaveEdit => self.save_edit(),
            // Saves are fire-and-forget: the result is logged by the store
            // thread and the local edit stands either way.
            Event::StoreWriteCompleted(_) => None,
        }
    }

    /// Replaces the deck wholesale and rewinds to the first card.
    fn replace_deck(&mut self, deck: Deck) {
        self.deck = deck;
        self.current_index = 0;
        self.answer_visible = false;
    }

    /// Draws a uniformly random index over the current deck length. The
    /// range is recomputed at call time, never cached.
    fn pick_random(&mut self) {
        if self.deck.is_empty() {
            return;
        }
        self.current_index = self.rng.gen_range(0..self.deck.len());
        self.answer_visible = false;
    }

    fn enter_edit(&mut self) {
        if self.mode != Mode::Quiz {
            return;
        }
        // Without a current card there is nothing to seed the drafts from.
        if let Some(card) = self.deck.get(self.current_index) {
            self.question_draft = card.question.clone();
            self.answer_draft = card.answer.clone();
            self.mode = Mode::Edit;
        }
    }

    fn save_edit(&mut self) -> Option<StoreRequest> {
        if self.mode != Mode::Edit {
            return None;
        }

        let mut request = None;
        if let Some(card) = self.deck.cards.get_mut(self.current_index) {
            if card.question != self.question_draft || card.answer != self.answer_draft {
                card.question = self.question_draft.clone();
                card.answer = self.answer_draft.clone();
                request = Some(StoreRequest::Put(encode(&self.deck)));
            }
        }
        self.leave_edit();
        request
    }

    fn leave_edit(&mut self) {
        self.mode = Mode::Quiz;
        self.question_draft.clear();
        self.answer_draft.clear();
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.deck.get(self.current_index)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn answer_visible(&self) -> bool {
        self.answer_visible
    }

    pub fn question_draft(&self) -> &str {
        &self.question_draft
    }

    pub fn answer_draft(&self) -> &str {
        &self.answer_draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A freshly loaded two-card state with a fixed seed.
    fn loaded_state(body: &str) -> QuizState {
        let (mut state, _) = QuizState::with_seed(42);
        state.update(Event::DeckLoaded(body.to_string()));
        state
    }

    #[test]
    fn test_new_state_is_empty_and_requests_fetch() {
        let (state, request) = QuizState::new();
        assert!(state.deck().is_empty());
        assert!(state.current_card().is_none());
        assert_eq!(state.mode(), Mode::Quiz);
        assert!(!state.answer_visible());
        assert_eq!(request, StoreRequest::Fetch);
    }

    #[test]
    fn test_deck_loaded_replaces_deck_and_rewinds() {
        let mut state = loaded_state("q1,a1\nq2,a2\n");
        assert_eq!(state.deck().len(), 2);
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.current_card().unwrap().question, "q1");

        // A later load rewinds the index and hides the answer again.
        state.update(Event::ToggleAnswer);
        state.update(Event::DeckLoaded("x,y\n".to_string()));
        assert_eq!(state.deck().len(), 1);
        assert_eq!(state.current_index(), 0);
        assert!(!state.answer_visible());
    }

    #[test]
    fn test_deck_load_failed_degrades_to_pseudo_card() {
        let (mut state, _) = QuizState::with_seed(42);
        state.update(Event::DeckLoadFailed(FetchError::NetworkError));

        assert_eq!(state.deck().len(), 1);
        let card = state.current_card().unwrap();
        assert_eq!(card.question, "NetworkError");
        assert_eq!(card.answer, "");
        assert_eq!(state.mode(), Mode::Quiz);
    }

    #[test]
    fn test_pick_random_stays_in_range() {
        let mut state = loaded_state("a,1\nb,2\nc,3\nd,4\ne,5\n");
        for _ in 0..100 {
            state.update(Event::PickRandom);
            assert!(state.current_index() < 5);
        }
    }

    #[test]
    fn test_pick_random_single_card_always_picks_it() {
        let mut state = loaded_state("only,card\n");
        for _ in 0..20 {
            state.update(Event::PickRandom);
            assert_eq!(state.current_index(), 0);
        }
    }

    #[test]
    fn test_pick_random_on_empty_deck_is_noop() {
        let mut state = loaded_state("");
        assert!(state.deck().is_empty());
        state.update(Event::PickRandom);
        assert_eq!(state.current_index(), 0);
        assert!(state.current_card().is_none());
    }

    #[test]
    fn test_pick_random_hides_answer() {
        let mut state = loaded_state("q1,a1\nq2,a2\n");
        for _ in 0..20 {
            state.update(Event::ToggleAnswer);
            assert!(state.answer_visible());
            state.update(Event::PickRandom);
            assert!(!state.answer_visible());
        }
    }

    #[test]
    fn test_toggle_answer_flips_visibility() {
        let mut state = loaded_state("q1,a1\n");
        state.update(Event::ToggleAnswer);
        assert!(state.answer_visible());
        state.update(Event::ToggleAnswer);
        assert!(!state.answer_visible());
    }

    #[test]
    fn test_toggle_answer_ignored_in_edit_mode() {
        let mut state = loaded_state("q1,a1\n");
        state.update(Event::EnterEdit);
        state.update(Event::ToggleAnswer);
        assert!(!state.answer_visible());
    }

    #[test]
    fn test_enter_edit_seeds_drafts_from_current_card() {
        let mut state = loaded_state("q1,a1\n");
        state.update(Event::EnterEdit);
        assert_eq!(state.mode(), Mode::Edit);
        assert_eq!(state.question_draft(), "q1");
        assert_eq!(state.answer_draft(), "a1");
    }

    #[test]
    fn test_enter_edit_without_current_card_is_noop() {
        let mut state = loaded_state("");
        state.update(Event::EnterEdit);
        assert_eq!(state.mode(), Mode::Quiz);
    }

    #[test]
    fn test_cancel_edit_discards_drafts_and_keeps_deck() {
        let mut state = loaded_state("q1,a1\nq2,a2\n");
        let before = encode(state.deck());

        state.update(Event::EnterEdit);
        state.update(Event::QuestionDraftChanged("scribble".to_string()));
        state.update(Event::AnswerDraftChanged("more scribble".to_string()));
        state.update(Event::CancelEdit);

        assert_eq!(state.mode(), Mode::Quiz);
        assert_eq!(encode(state.deck()), before);
        assert_eq!(state.question_draft(), "");
        assert_eq!(state.answer_draft(), "");
    }

    #[test]
    fn test_draft_changes_ignored_outside_edit_mode() {
        let mut state = loaded_state("q1,a1\n");
        state.update(Event::QuestionDraftChanged("scribble".to_string()));
        state.update(Event::AnswerDraftChanged("scribble".to_string()));
        assert_eq!(state.question_draft(), "");
        assert_eq!(state.answer_draft(), "");
        assert_eq!(state.current_card().unwrap().question, "q1");
    }

    #[test]
    fn test_save_with_unchanged_drafts_issues_no_write() {
        let mut state = loaded_state("q1,a1\n");
        state.update(Event::EnterEdit);
        let request = state.update(Event::SaveEdit);

        assert_eq!(request, None);
        assert_eq!(state.mode(), Mode::Quiz);
        assert_eq!(state.current_card().unwrap().answer, "a1");
    }

    #[test]
    fn test_save_with_changed_drafts_replaces_card_and_writes() {
        let mut state = loaded_state("q1,a1\nq2,a2\n");
        state.update(Event::EnterEdit);
        state.update(Event::AnswerDraftChanged("a1-edited".to_string()));
        let request = state.update(Event::SaveEdit);

        assert_eq!(
            request,
            Some(StoreRequest::Put("q1,a1-edited\nq2,a2\n".to_string()))
        );
        assert_eq!(state.mode(), Mode::Quiz);
        assert_eq!(state.current_card().unwrap().answer, "a1-edited");
    }

    #[test]
    fn test_failed_write_is_not_rolled_back() {
        let mut state = loaded_state("q1,a1\n");
        state.update(Event::EnterEdit);
        state.update(Event::AnswerDraftChanged("optimistic".to_string()));
        state.update(Event::SaveEdit);

        state.update(Event::StoreWriteCompleted(Err("503".to_string())));
        assert_eq!(state.current_card().unwrap().answer, "optimistic");
    }

    #[test]
    fn test_store_write_completed_is_noop() {
        let mut state = loaded_state("q1,a1\nq2,a2\n");
        state.update(Event::ToggleAnswer);

        let request = state.update(Event::StoreWriteCompleted(Ok(())));
        assert_eq!(request, None);
        assert_eq!(state.current_index(), 0);
        assert!(state.answer_visible());
        assert_eq!(state.deck().len(), 2);
    }

    #[test]
    fn test_full_session_scenario() {
        let (mut state, request) = QuizState::with_seed(7);
        assert_eq!(request, StoreRequest::Fetch);

        state.update(Event::DeckLoaded("q1,a1\nq2,a2\n".to_string()));
        assert_eq!(state.deck().len(), 2);
        assert_eq!(state.current_index(), 0);

        // Draw until the second card comes up; every draw must stay in
        // range and hide the answer.
        let mut draws = 0;
        while state.current_index() != 1 {
            state.update(Event::PickRandom);
            assert!(state.current_index() < 2);
            assert!(!state.answer_visible());
            draws += 1;
            assert!(draws < 1000, "uniform draw never selected index 1");
        }

        state.update(Event::ToggleAnswer);
        assert!(state.answer_visible());

        state.update(Event::EnterEdit);
        assert_eq!(state.question_draft(), "q2");
        assert_eq!(state.answer_draft(), "a2");

        state.update(Event::AnswerDraftChanged("a2-edited".to_string()));
        let request = state.update(Event::SaveEdit);

        assert_eq!(
            request,
            Some(StoreRequest::Put("q1,a1\nq2,a2-edited\n".to_string()))
        );
        assert_eq!(state.current_card().unwrap().answer, "a2-edited");
        assert_eq!(state.mode(), Mode::Quiz);
    }
}
