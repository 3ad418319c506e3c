use super::*;
use crate::fixtures::{self, NcchSpec, PARTITION_ID};
use std::io::Cursor;

fn raw_header(spec: &NcchSpec) -> [u8; NCCH_HEADER_SIZE] {
    let rom = fixtures::plain_image(spec);
    let mut buf = [0u8; NCCH_HEADER_SIZE];
    buf.copy_from_slice(&rom[..NCCH_HEADER_SIZE]);
    buf
}

// -------------------------------------------------------------------------
// Decoding
// -------------------------------------------------------------------------

#[test]
fn decodes_identity_fields() {
    let header = NcchHeader::parse(&raw_header(&NcchSpec::default())).unwrap();
    assert_eq!(header.key_y, fixtures::KEY_Y);
    assert_eq!(header.partition_id, PARTITION_ID);
    assert_eq!(header.program_id, PARTITION_ID);
    assert_eq!(header.maker_code, "01");
    assert_eq!(header.version, 2);
    assert_eq!(header.product_code, "CTR-P-ABCE");
    assert_eq!(header.content_size_mu, fixtures::CONTENT_SIZE_MU);
    assert_eq!(header.content_size_bytes(), 0x2200);
}

#[test]
fn decodes_flags() {
    let spec = NcchSpec {
        crypt_method: 0x0B,
        platform: 0x02,
        flags: NcchFlags::USES_SEED | NcchFlags::NO_ROMFS,
        ..NcchSpec::default()
    };
    let header = NcchHeader::parse(&raw_header(&spec)).unwrap();
    assert_eq!(header.crypt_method().unwrap(), CryptMethod::V9_6);
    assert_eq!(header.platform().unwrap(), ContentPlatform::New3ds);
    assert!(header.flags.uses_seed());
    assert!(header.flags.no_romfs());
    assert!(!header.flags.no_crypto());
    assert!(!header.flags.fixed_key());
    assert_eq!(header.content_unit_size, 0x200);
    assert!(header.content_type.is_executable());
    assert_eq!(header.content_type.description(), "Executable");
}

#[test]
fn decodes_region_fields() {
    let header = NcchHeader::parse(&raw_header(&NcchSpec::default())).unwrap();
    assert_eq!(header.exheader_size, 0x400);
    assert_eq!((header.plain_offset_mu, header.plain_size_mu), fixtures::PLAIN_MU);
    assert_eq!((header.logo_offset_mu, header.logo_size_mu), fixtures::LOGO_MU);
    assert_eq!((header.exefs_offset_mu, header.exefs_size_mu), fixtures::EXEFS_MU);
    assert_eq!((header.romfs_offset_mu, header.romfs_size_mu), fixtures::ROMFS_MU);
    assert_eq!(header.exefs_hash_size_mu, 1);
    assert_eq!(header.romfs_hash_size_mu, 1);
    assert!(header.exefs_hash.iter().any(|&b| b != 0));
}

#[test]
fn decoding_is_deterministic() {
    let buf = raw_header(&NcchSpec::default());
    assert_eq!(NcchHeader::parse(&buf).unwrap(), NcchHeader::parse(&buf).unwrap());
}

#[test]
fn unknown_method_and_platform_are_kept_raw() {
    let spec = NcchSpec {
        crypt_method: 0x42,
        platform: 0x07,
        ..NcchSpec::default()
    };
    let header = NcchHeader::parse(&raw_header(&spec)).unwrap();
    assert_eq!(header.crypt_method, 0x42);
    assert!(matches!(
        header.crypt_method(),
        Err(NcchError::UnsupportedCryptMethod(0x42))
    ));
    assert!(matches!(
        header.platform(),
        Err(NcchError::UnsupportedPlatform(0x07))
    ));
}

#[test]
fn oversized_unit_exponent_gives_zero_unit_size() {
    let mut buf = raw_header(&NcchSpec::default());
    buf[FLAGS_OFFSET + 6] = 40;
    let header = NcchHeader::parse(&buf).unwrap();
    assert_eq!(header.content_unit_size, 0);
}

#[test]
fn system_title_bit() {
    let spec = NcchSpec {
        program_id: 0x0004_0010_0002_1000,
        ..NcchSpec::default()
    };
    assert!(NcchHeader::parse(&raw_header(&spec)).unwrap().is_system_title());
    assert!(!NcchHeader::parse(&raw_header(&NcchSpec::default())).unwrap().is_system_title());
}

// -------------------------------------------------------------------------
// Rejection
// -------------------------------------------------------------------------

#[test]
fn bad_magic_is_corrupt() {
    let mut buf = raw_header(&NcchSpec::default());
    buf[0x100..0x104].copy_from_slice(b"NCSD");
    assert!(matches!(NcchHeader::parse(&buf), Err(NcchError::CorruptData(_))));
}

#[test]
fn short_stream_is_corrupt() {
    let rom = fixtures::plain_image(&NcchSpec::default());
    let mut cursor = Cursor::new(rom[..0x150].to_vec());
    assert!(matches!(
        read_ncch_header(&mut cursor),
        Err(NcchError::CorruptData(_))
    ));
}

#[test]
fn reads_from_start_regardless_of_position() {
    let rom = fixtures::plain_image(&NcchSpec::default());
    let mut cursor = Cursor::new(rom);
    cursor.set_position(0x1234);
    let header = read_ncch_header(&mut cursor).unwrap();
    assert_eq!(header.partition_id, PARTITION_ID);
}
