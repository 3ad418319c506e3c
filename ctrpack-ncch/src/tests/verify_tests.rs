use super::*;
use crate::fixtures::{self, NcchSpec};
use crate::section::{open_exefs_header, open_exheader, open_romfs};
use std::io::Cursor;

#[test]
fn decrypted_sections_match_header_hashes() {
    let (_, enc, header, keys) = fixtures::encrypted_image(&NcchSpec::default());
    let mut cursor = Cursor::new(enc);

    let mut exheader = open_exheader(&header, &mut cursor, &keys).unwrap();
    assert_eq!(verify_exheader(&header, &mut exheader).unwrap(), HashResult::Ok);

    let mut exefs = open_exefs_header(&header, &mut cursor, &keys).unwrap();
    assert!(verify_exefs(&header, &mut exefs).unwrap().is_ok());

    let mut romfs = open_romfs(&header, &mut cursor, &keys).unwrap();
    assert!(verify_romfs(&header, &mut romfs).unwrap().is_ok());
}

#[test]
fn wrong_keys_show_up_as_mismatch() {
    let (_, enc, header, _) = fixtures::encrypted_image(&NcchSpec::default());
    let wrong = crate::keys::NcchKeys::Keyed {
        primary: [0x01; 16],
        secondary: [0x02; 16],
    };
    let mut romfs = open_romfs(&header, Cursor::new(enc), &wrong).unwrap();
    match verify_romfs(&header, &mut romfs).unwrap() {
        HashResult::Mismatch { expected, actual } => {
            assert_eq!(expected, hex_string(&header.romfs_hash));
            assert_ne!(expected, actual);
        }
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn verification_rewinds_stream() {
    let (plain, enc, header, keys) = fixtures::encrypted_image(&NcchSpec::default());
    let mut romfs = open_romfs(&header, Cursor::new(enc), &keys).unwrap();
    romfs.seek(SeekFrom::Start(0x80)).unwrap();
    verify_romfs(&header, &mut romfs).unwrap();

    let mut buf = [0u8; 4];
    romfs.read_exact(&mut buf).unwrap();
    assert_eq!(buf[..], plain[0x1200..0x1204]);
}

#[test]
fn zero_hash_or_size_is_empty() {
    let rom = fixtures::plain_image(&NcchSpec::no_crypto());
    let mut header = fixtures::parse(&rom);
    let keys = crate::keys::NcchKeys::NoCrypto;

    header.romfs_hash = [0; 32];
    let mut romfs = open_romfs(&header, Cursor::new(rom.clone()), &keys).unwrap();
    assert_eq!(verify_romfs(&header, &mut romfs).unwrap(), HashResult::Empty);

    header.exefs_hash_size_mu = 0;
    let mut exefs = open_exefs_header(&header, Cursor::new(rom), &keys).unwrap();
    assert_eq!(verify_exefs(&header, &mut exefs).unwrap(), HashResult::Empty);
}

#[test]
fn oversized_hash_region_is_corrupt() {
    let rom = fixtures::plain_image(&NcchSpec::no_crypto());
    let mut header = fixtures::parse(&rom);
    header.exefs_hash_size_mu = header.exefs_size_mu + 1;
    let mut exefs =
        open_exefs_header(&header, Cursor::new(rom), &crate::keys::NcchKeys::NoCrypto).unwrap();
    assert!(matches!(
        verify_exefs(&header, &mut exefs),
        Err(NcchError::CorruptData(_))
    ));
}
