use rb_collections::dictionary::Dictionary;
use rb_collections::matrix::Matrix;
use rb_collections::red_black_tree::RedBlackMap;
use serde_test::{assert_de_tokens, assert_de_tokens_error, assert_tokens, Token};

fn entry_tokens(key: u32, value: &'static str) -> Vec<Token> {
    vec![
        Token::Struct {
            name: "Entry",
            len: 2,
        },
        Token::Str("key"),
        Token::U32(key),
        Token::Str("value"),
        Token::Str(value),
        Token::StructEnd,
    ]
}

fn seq_tokens(entries: &[(u32, &'static str)]) -> Vec<Token> {
    let mut tokens = vec![Token::Seq {
        len: Some(entries.len()),
    }];
    for (key, value) in entries {
        tokens.extend(entry_tokens(*key, value));
    }
    tokens.push(Token::SeqEnd);
    tokens
}

#[test]
fn int_test_map_tokens() {
    let map: RedBlackMap<u32, String> = vec![(2, "b"), (1, "a"), (2, "c")]
        .into_iter()
        .map(|(key, value)| (key, String::from(value)))
        .collect();
    assert_tokens(&map, &seq_tokens(&[(1, "a"), (2, "b"), (2, "c")]));

    let empty: RedBlackMap<u32, String> = RedBlackMap::new();
    assert_tokens(&empty, &seq_tokens(&[]));
}

#[test]
fn int_test_dictionary_deduplicates() {
    let dict: Dictionary<u32, String> = vec![(1, String::from("a")), (2, String::from("c"))]
        .into_iter()
        .collect();
    assert_de_tokens(&dict, &seq_tokens(&[(1, "x"), (2, "c"), (1, "a")]));
}

#[test]
fn int_test_matrix_shape_checked() {
    let mut tokens = vec![
        Token::Struct {
            name: "Matrix",
            len: 3,
        },
        Token::Str("rows"),
        Token::U64(2),
        Token::Str("columns"),
        Token::U64(1),
        Token::Str("cells"),
        Token::Seq { len: Some(1) },
        Token::Struct {
            name: "Entry",
            len: 2,
        },
        Token::Str("key"),
        Token::U64(0),
        Token::Str("value"),
        Token::I32(5),
        Token::StructEnd,
        Token::SeqEnd,
        Token::StructEnd,
    ];
    assert_de_tokens_error::<Matrix<i32>>(&tokens, "expected 2 entries, found 1");

    tokens[2] = Token::U64(1);
    let matrix: Matrix<i32> = "1 1 5".parse().unwrap();
    assert_de_tokens(&matrix, &tokens);
}

#[test]
fn int_test_bincode_round_trip() {
    let map: RedBlackMap<u32, String> =
        (0..100u32).map(|key| (key % 10, key.to_string())).collect();
    let bytes = bincode::serialize(&map).unwrap();
    let copy: RedBlackMap<u32, String> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(copy, map);
    copy.validate().unwrap();

    let matrix: Matrix<i64> = "2 3 1 -2 3 -4 5 -6".parse().unwrap();
    let bytes = bincode::serialize(&matrix).unwrap();
    let copy: Matrix<i64> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(copy, matrix);

    let dict: Dictionary<String, u32> = vec![(String::from("a"), 1), (String::from("b"), 2)]
        .into_iter()
        .collect();
    let bytes = bincode::serialize(&dict).unwrap();
    let copy: Dictionary<String, u32> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(copy, dict);
}
