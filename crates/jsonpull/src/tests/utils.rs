use crate::{Token, Tokenizer};

/// Pulls every token through the terminal one, pairing each with the text
/// its accessor exposes at that point.
pub fn pull_all(input: &[u8]) -> Vec<(Token, Option<String>)> {
    let mut tokenizer = Tokenizer::new(input);
    let mut trace = Vec::new();
    loop {
        let token = tokenizer.next_token();
        let text = match token {
            Token::Name => tokenizer.name().map(ToString::to_string),
            Token::String
            | Token::Int64
            | Token::Uint64
            | Token::Double
            | Token::Boolean
            | Token::Null => tokenizer.value().map(ToString::to_string),
            Token::Error => tokenizer.error().map(ToString::to_string),
            _ => None,
        };
        let terminal = token.is_terminal();
        trace.push((token, text));
        if terminal {
            break;
        }
    }
    trace
}

/// Asserts a full token/text trace for `input`.
pub fn assert_trace(input: &[u8], expected: &[(Token, Option<&str>)]) {
    let trace = pull_all(input);
    let trace: Vec<(Token, Option<&str>)> = trace
        .iter()
        .map(|(token, text)| (*token, text.as_deref()))
        .collect();
    assert_eq!(trace, expected, "input: {:?}", String::from_utf8_lossy(input));
}
