//! Property-Based Test Generators
//!
//! Provides proptest strategies for document numbers, sex codes, and
//! document types.

use proptest::collection::vec;
use proptest::prelude::*;

use core_kernel::DocumentTypeId;
use domain_beneficiary::{DocumentType, MAX_DOCUMENT_LENGTH};

/// Strategy for a string of exactly `len` ASCII digits
pub fn digits_strategy(len: usize) -> impl Strategy<Value = String> {
    vec(prop::char::range('0', '9'), len).prop_map(String::from_iter)
}

/// Strategy for a string of exactly `len` uppercase letters and digits
pub fn alphanumeric_strategy(len: usize) -> impl Strategy<Value = String> {
    vec(
        prop_oneof![prop::char::range('A', 'Z'), prop::char::range('0', '9')],
        len,
    )
    .prop_map(String::from_iter)
}

/// Strategy for a string of `len` characters with at least one non-digit
///
/// The non-digit is a letter, punctuation, whitespace, or a non-ASCII digit.
pub fn non_numeric_strategy(len: usize) -> impl Strategy<Value = String> {
    let len = len.max(1);
    let intruder = prop_oneof![
        prop::char::range('A', 'Z'),
        prop::char::range('a', 'z'),
        Just('-'),
        Just(' '),
        Just('.'),
        Just('٣'),
    ];

    (digits_strategy(len - 1), intruder, 0..len).prop_map(|(digits, c, pos)| {
        let mut chars: Vec<char> = digits.chars().collect();
        chars.insert(pos, c);
        chars.into_iter().collect()
    })
}

/// Strategy for a length in `0..=MAX_DOCUMENT_LENGTH + 5` other than `expected`
pub fn wrong_length_strategy(expected: u16) -> impl Strategy<Value = usize> {
    (0usize..=usize::from(MAX_DOCUMENT_LENGTH) + 5)
        .prop_filter("length must differ from expected", move |len| *len != usize::from(expected))
}

/// Strategy for the valid sex codes
pub fn sex_code_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just("M".to_string()), Just("F".to_string())]
}

/// Strategy for short strings that are not a valid sex code
pub fn invalid_sex_code_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z ]{0,3}".prop_filter("must not be a valid code", |s| s != "M" && s != "F")
}

/// Strategy for document types with any valid length and either character rule
pub fn document_type_strategy() -> impl Strategy<Value = DocumentType> {
    (1u16..=MAX_DOCUMENT_LENGTH, any::<bool>()).prop_map(|(length, numeric_only)| {
        DocumentType::new(DocumentTypeId::new(1), "Documento", "DOC", "Perú", length, numeric_only)
            .expect("length within bounds")
    })
}

/// Strategy for a document type paired with a number that satisfies it
pub fn valid_document_strategy() -> impl Strategy<Value = (DocumentType, String)> {
    document_type_strategy().prop_flat_map(|document_type| {
        let len = usize::from(document_type.expected_length);
        let number = if document_type.numeric_only {
            digits_strategy(len).boxed()
        } else {
            alphanumeric_strategy(len).boxed()
        };
        (Just(document_type), number)
    })
}
