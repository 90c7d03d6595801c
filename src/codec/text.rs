//! Flat-text wire format for decks: one card per line, question and answer
//! separated by the first comma.
//!
//! The format has no escaping. A comma inside a question or a newline inside
//! either field will not round-trip; that is a compatibility constraint of
//! the store, not something to repair here.

use crate::models::{Card, Deck};

/// Decodes wire text into a deck.
///
/// Each line splits on the first comma only, so answers may contain commas.
/// A line with no comma becomes a card with an empty answer. Lines whose
/// question half is empty are dropped.
pub fn decode(text: &str) -> Deck {
    let cards = text
        .split('\n')
        .filter_map(|line| {
            let (question, answer) = match line.split_once(',') {
                Some((question, answer)) => (question, answer),
                None => (line, ""),
            };

            if question.is_empty() {
                None
            } else {
                Some(Card {
                    question: question.to_string(),
                    answer: answer.to_string(),
                })
            }
        })
        .collect();

    Deck { cards }
}

/// Encodes a deck as wire text, one `question,answer` record per line with a
/// trailing newline after the last record. The empty deck encodes to `""`.
pub fn encode(deck: &Deck) -> String {
    let mut text = String::new();

    for card in &deck.cards {
        text.push_str(&card.question);
        text.push(',');
        text.push_str(&card.answer);
        text.push('\n');
    }

    text
}
