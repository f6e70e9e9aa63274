use std::io::Cursor;

use bstr::BStr;

use crate::{ReadSource, Token, Tokenizer};

#[test]
fn each_accessor_is_valid_only_for_its_token() {
    let mut tokenizer = Tokenizer::new(br#"{"a":"b"}"#.as_slice());

    assert_eq!(tokenizer.next_token(), Token::StartObject);
    assert_eq!(tokenizer.name(), None);
    assert_eq!(tokenizer.value(), None);
    assert_eq!(tokenizer.error(), None);

    assert_eq!(tokenizer.next_token(), Token::Name);
    assert_eq!(tokenizer.name().unwrap(), BStr::new(b"a"));
    assert_eq!(tokenizer.value(), None);

    assert_eq!(tokenizer.next_token(), Token::String);
    assert_eq!(tokenizer.value().unwrap(), BStr::new(b"b"));
    assert_eq!(tokenizer.name(), None);

    assert_eq!(tokenizer.next_token(), Token::EndObject);
    assert_eq!(tokenizer.name(), None);
    assert_eq!(tokenizer.value(), None);
}

#[test]
fn typed_accessors_gate_on_the_number_classification() {
    let mut tokenizer = Tokenizer::new(b"[17, -3, 2.5, true]".as_slice());
    assert_eq!(tokenizer.next_token(), Token::StartArray);

    assert_eq!(tokenizer.next_token(), Token::Uint64);
    assert_eq!(tokenizer.value_u64(), Some(17));
    assert_eq!(tokenizer.value_i64(), None);
    assert_eq!(tokenizer.value_f64(), None);

    assert_eq!(tokenizer.next_token(), Token::Int64);
    assert_eq!(tokenizer.value_i64(), Some(-3));
    assert_eq!(tokenizer.value_u64(), None);

    assert_eq!(tokenizer.next_token(), Token::Double);
    assert_eq!(tokenizer.value_f64(), Some(2.5));
    assert_eq!(tokenizer.value_bool(), None);

    assert_eq!(tokenizer.next_token(), Token::Boolean);
    assert_eq!(tokenizer.value_bool(), Some(true));
    assert_eq!(tokenizer.value_u64(), None);
}

#[test]
fn boolean_and_null_expose_their_literal_text() {
    let mut tokenizer = Tokenizer::new(b"[false, null]".as_slice());
    assert_eq!(tokenizer.next_token(), Token::StartArray);
    assert_eq!(tokenizer.next_token(), Token::Boolean);
    assert_eq!(tokenizer.value().unwrap(), BStr::new(b"false"));
    assert_eq!(tokenizer.value_bool(), Some(false));
    assert_eq!(tokenizer.next_token(), Token::Null);
    assert_eq!(tokenizer.value().unwrap(), BStr::new(b"null"));
}

#[test]
fn payloads_are_invalidated_by_the_next_pull() {
    let mut tokenizer = Tokenizer::new(br#"["x","y"]"#.as_slice());
    assert_eq!(tokenizer.next_token(), Token::StartArray);
    assert_eq!(tokenizer.next_token(), Token::String);
    assert_eq!(tokenizer.value().unwrap(), BStr::new(b"x"));
    assert_eq!(tokenizer.next_token(), Token::String);
    assert_eq!(tokenizer.value().unwrap(), BStr::new(b"y"));
    assert_eq!(tokenizer.next_token(), Token::EndArray);
    assert_eq!(tokenizer.value(), None);
}

#[test]
fn read_sources_behave_like_slices() {
    let source = ReadSource::new(Cursor::new(br#"{"k":[1,2]}"#.to_vec()));
    let tokens: Vec<Token> = Tokenizer::new(source).collect();
    assert_eq!(
        tokens,
        vec![
            Token::StartObject,
            Token::Name,
            Token::StartArray,
            Token::Uint64,
            Token::Uint64,
            Token::EndArray,
            Token::EndObject,
            Token::EndDocument,
        ],
    );
}

#[test]
fn open_reports_missing_files_at_open_time() {
    assert!(Tokenizer::open("/definitely/not/here.json").is_err());
}

#[test]
fn open_reads_a_real_file() {
    let path = std::env::temp_dir().join("jsonpull-open-test.json");
    std::fs::write(&path, br#"{"ok":true}"#).unwrap();
    let mut tokenizer = Tokenizer::open(&path).unwrap();
    assert_eq!(tokenizer.next_token(), Token::StartObject);
    assert_eq!(tokenizer.next_token(), Token::Name);
    assert_eq!(tokenizer.name().unwrap(), BStr::new(b"ok"));
    assert_eq!(tokenizer.next_token(), Token::Boolean);
    assert_eq!(tokenizer.next_token(), Token::EndObject);
    assert_eq!(tokenizer.next_token(), Token::EndDocument);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn custom_nesting_limits_apply() {
    let options = crate::TokenizerOptions {
        max_nesting_level: 2,
    };
    let mut tokenizer = Tokenizer::with_options(b"[[[1]]]".as_slice(), options);
    assert_eq!(tokenizer.next_token(), Token::StartArray);
    assert_eq!(tokenizer.next_token(), Token::StartArray);
    assert_eq!(tokenizer.next_token(), Token::Error);
}
