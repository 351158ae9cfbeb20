use rolo_kernel::SAFE_ALPHABET;
use rolo_kernel::safe_nanoid;

#[test]
fn generates_expected_length_and_charset() {
    let id = safe_nanoid!();
    assert_eq!(id.len(), 12);

    for ch in id.chars() {
        assert!(SAFE_ALPHABET.contains(&ch), "unexpected character in nanoid: {ch}");
    }
}

#[test]
fn custom_length() {
    let id = safe_nanoid!(20);
    assert_eq!(id.len(), 20);
}

#[test]
fn generated_ids_pass_the_shape_check() {
    assert!(rolo_kernel::is_safe_nanoid(&safe_nanoid!(), 12));
    assert!(!rolo_kernel::is_safe_nanoid("I0l1I0l1I0l1", 12));
    assert!(!rolo_kernel::is_safe_nanoid("abc", 12));
}
