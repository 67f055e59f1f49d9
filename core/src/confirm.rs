//! Yes/no confirmation capability gating destructive operations.

/// Prompt used when the caller has nothing more specific to ask.
pub const DEFAULT_PROMPT: &str = "Confirm action?";

/// Asks the user a yes/no question. The answer gates the operation.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Always answers the same way. Handy for scripted callers and tests.
#[derive(Debug, Clone, Copy)]
pub struct Always(pub bool);

impl Confirm for Always {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn closures_receive_the_prompt() {
        let seen = RefCell::new(String::new());
        let answer = |prompt: &str| {
            seen.replace(prompt.to_string());
            false
        };
        assert!(!answer.confirm("Delete this appointment?"));
        assert_eq!(seen.into_inner(), "Delete this appointment?");
    }

    #[test]
    fn always_ignores_the_prompt() {
        assert!(Always(true).confirm(DEFAULT_PROMPT));
        assert!(!Always(false).confirm(DEFAULT_PROMPT));
    }
}
