use super::*;

fn ror128(val: u128, shift: u32) -> u128 {
    (val >> shift) | (val << (128 - shift))
}

fn rol128(val: u128, shift: u32) -> u128 {
    (val << shift) | (val >> (128 - shift))
}

#[test]
fn matches_shift_based_formula() {
    let key_x: u128 = 0x0123456789ABCDEF0011223344556677;
    let key_y: u128 = 0xFEDCBA98765432108899AABBCCDDEEFF;
    let expected = ror128(
        (rol128(key_x, 2) ^ key_y).wrapping_add(CTR_SCRAMBLER_CONSTANT),
        41,
    );

    let got = scrambler_for(CryptMethod::Initial).scramble(&key_x.to_be_bytes(), &key_y.to_be_bytes());
    assert_eq!(u128::from_be_bytes(got), expected);
}

#[test]
fn zero_inputs_rotate_the_constant() {
    let got = scrambler_for(CryptMethod::V9_6).scramble(&[0; 16], &[0; 16]);
    assert_eq!(u128::from_be_bytes(got), CTR_SCRAMBLER_CONSTANT.rotate_left(87));
}

#[test]
fn key_y_changes_the_normal_key() {
    let s = scrambler_for(CryptMethod::V7_0);
    let key_x = [0x11u8; 16];
    let a = s.scramble(&key_x, &[0x22; 16]);
    let b = s.scramble(&key_x, &[0x23; 16]);
    assert_ne!(a, b);
}

#[test]
fn retail_methods_share_the_ctr_constant() {
    for &method in CryptMethod::all() {
        assert_eq!(scrambler_for(method).constant(), CTR_SCRAMBLER_CONSTANT);
    }
}
