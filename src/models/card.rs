//! Card is a pair <question, answer>. Only text is used in questions and answers

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub question: String,
    pub answer: String,
}
