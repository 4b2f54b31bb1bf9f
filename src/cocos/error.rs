use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CocoError {
    #[error("({context}) No or wrong type of {expected} provided ({found})!")]
    InvalidInput {
        context: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("unknown context condition '{0}'")]
    UnknownCoco(String),
}

#[cfg(test)]
mod tests {
    use super::CocoError;

    #[test]
    fn invalid_input_message() {
        let err = CocoError::InvalidInput {
            context: "CorrectOrderInEquation",
            expected: "neuron",
            found: "Variable",
        };
        assert_eq!(
            err.to_string(),
            "(CorrectOrderInEquation) No or wrong type of neuron provided (Variable)!"
        );
    }
}
