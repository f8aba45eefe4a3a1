//! Mock-interview state machine.
//!
//! Strictly linear over a fixed ordered question list: inactive →
//! active(index) → inactive. Nothing survives the session.

pub const DEFAULT_QUESTIONS: [&str; 3] = [
    "Can you explain the concept of polymorphism in object-oriented programming?",
    "How does a binary search algorithm work?",
    "What are the differences between TCP and UDP protocols?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterviewState {
    Inactive,
    /// Index of the question currently awaiting an answer.
    Active { question_index: usize },
}

pub struct MockInterview {
    questions: Vec<String>,
    state: InterviewState,
}

impl Default for MockInterview {
    fn default() -> Self {
        Self::new(DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect())
    }
}

impl MockInterview {
    pub fn new(questions: Vec<String>) -> Self {
        Self {
            questions,
            state: InterviewState::Inactive,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, InterviewState::Active { .. })
    }

    /// Begins the interview and returns the first question with its
    /// 1-based number. Returns None when the bank is empty.
    pub fn start(&mut self) -> Option<(usize, String)> {
        if self.questions.is_empty() {
            return None;
        }
        self.state = InterviewState::Active { question_index: 0 };
        Some((1, self.questions[0].clone()))
    }

    /// The question the candidate is currently answering.
    pub fn current_question(&self) -> Option<(usize, String)> {
        match self.state {
            InterviewState::Active { question_index } => {
                Some((question_index + 1, self.questions[question_index].clone()))
            }
            InterviewState::Inactive => None,
        }
    }

    /// Moves past the answered question. Returns the next question, or
    /// None once the bank is exhausted (the interview then ends).
    pub fn advance(&mut self) -> Option<(usize, String)> {
        let InterviewState::Active { question_index } = self.state else {
            return None;
        };
        let next = question_index + 1;
        if next < self.questions.len() {
            self.state = InterviewState::Active {
                question_index: next,
            };
            Some((next + 1, self.questions[next].clone()))
        } else {
            self.state = InterviewState::Inactive;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_and_finite() {
        let mut interview = MockInterview::default();
        assert!(!interview.is_active());
        assert!(interview.current_question().is_none());

        let (number, question) = interview.start().unwrap();
        assert_eq!(number, 1);
        assert_eq!(question, DEFAULT_QUESTIONS[0]);
        assert!(interview.is_active());

        let (number, question) = interview.advance().unwrap();
        assert_eq!(number, 2);
        assert_eq!(question, DEFAULT_QUESTIONS[1]);

        let (number, _) = interview.advance().unwrap();
        assert_eq!(number, 3);

        // Third answer exhausts the bank and deactivates the interview.
        assert!(interview.advance().is_none());
        assert!(!interview.is_active());
    }

    #[test]
    fn test_empty_bank_cannot_start() {
        let mut interview = MockInterview::new(Vec::new());
        assert!(interview.start().is_none());
        assert!(!interview.is_active());
    }

    #[test]
    fn test_advance_while_inactive_is_noop() {
        let mut interview = MockInterview::default();
        assert!(interview.advance().is_none());
        assert!(!interview.is_active());
    }
}
