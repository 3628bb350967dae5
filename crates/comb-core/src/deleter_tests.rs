use crate::deleter::{ByteDeleter, Deleter, RuneTypeChangeDeleter, SpaceDeleter};

#[test]
fn byte_deleter_counts_bytes() {
    assert_eq!(ByteDeleter.delete(b"abcdef", 3), 3);
    assert_eq!(ByteDeleter.delete(b"ab", 5), 2);
    assert_eq!(ByteDeleter.delete(b"", 1), 0);
    assert_eq!(ByteDeleter.token_len("é".as_bytes()), 1);
}

#[test]
fn rune_type_change_groups_same_class() {
    let d = RuneTypeChangeDeleter;
    assert_eq!(d.delete(b"abc123 def", 1), 3);
    assert_eq!(d.delete(b"abc123 def", 2), 6);
    assert_eq!(d.delete(b"abc123 def", 3), 7);
    assert_eq!(d.delete(b"abc123 def", 10), 10);
}

#[test]
fn rune_type_change_splits_punctuation() {
    let d = RuneTypeChangeDeleter;
    assert_eq!(d.delete(b"],[3]", 1), 1);
    assert_eq!(d.delete(b"],[3]", 3), 3);
}

#[test]
fn rune_type_change_keeps_multibyte_whole() {
    let d = RuneTypeChangeDeleter;
    let input = "ééé1".as_bytes();
    assert_eq!(d.delete(input, 1), 6);
    assert_eq!(d.token_len("€€x".as_bytes()), 6);
}

#[test]
fn space_deleter_takes_word_and_trailing_space() {
    let d = SpaceDeleter;
    assert_eq!(d.delete(b"foo  bar baz", 1), 5);
    assert_eq!(d.delete(b"foo  bar baz", 2), 9);
    assert_eq!(d.delete(b"   bar", 1), 3);
    assert_eq!(d.delete(b"", 1), 0);
}
