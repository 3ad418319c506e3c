use super::*;
use crate::fixtures::{self, NcchSpec};

fn header() -> NcchHeader {
    fixtures::parse(&fixtures::plain_image(&NcchSpec::default()))
}

// -------------------------------------------------------------------------
// Sections
// -------------------------------------------------------------------------

#[test]
fn locates_every_section() {
    let h = header();
    let cases = [
        (Section::ExHeader, 0x200, 0x400),
        (Section::Plain, 0x600, 0x200),
        (Section::Logo, 0x800, 0x200),
        (Section::ExeFs, 0xA00, 0x800),
        (Section::RomFs, 0x1200, 0x1000),
    ];
    for (section, offset, size) in cases {
        let region = locate(&h, section).unwrap();
        assert_eq!(region.kind, RegionKind::Section(section));
        assert_eq!((region.offset, region.size), (offset, size), "{}", section.name());
    }
}

#[test]
fn romfs_may_end_exactly_at_content_end() {
    let h = header();
    assert_eq!(locate(&h, Section::RomFs).unwrap().end(), h.content_size_bytes());
}

#[test]
fn absent_regions_are_not_found() {
    let mut h = header();
    h.exheader_size = 0;
    h.romfs_size_mu = 0;
    h.exefs_offset_mu = 0;
    h.logo_offset_mu = 0;
    h.logo_size_mu = 0;
    for section in [Section::ExHeader, Section::RomFs, Section::ExeFs, Section::Logo] {
        assert!(
            matches!(locate(&h, section), Err(NcchError::NotFound(_))),
            "{}",
            section.name()
        );
    }
    assert!(locate(&h, Section::Plain).is_ok());
}

#[test]
fn odd_exheader_size_is_corrupt() {
    let mut h = header();
    h.exheader_size = 0x200;
    assert!(matches!(
        locate(&h, Section::ExHeader),
        Err(NcchError::CorruptData(_))
    ));
}

#[test]
fn region_past_content_is_corrupt() {
    let mut h = header();
    h.romfs_size_mu += 1;
    assert!(matches!(
        locate(&h, Section::RomFs),
        Err(NcchError::CorruptData(_))
    ));

    let mut h = header();
    h.content_size_mu = 2;
    assert!(matches!(
        locate(&h, Section::ExHeader),
        Err(NcchError::CorruptData(_))
    ));
}

#[test]
fn huge_fields_do_not_overflow() {
    let mut h = header();
    h.romfs_offset_mu = u32::MAX;
    h.romfs_size_mu = u32::MAX;
    assert!(matches!(
        locate(&h, Section::RomFs),
        Err(NcchError::CorruptData(_))
    ));
}

// -------------------------------------------------------------------------
// ExeFS files
// -------------------------------------------------------------------------

#[test]
fn exefs_file_offset_skips_exefs_header() {
    let h = header();
    let region = locate_exefs_file(&h, &fixtures::icon_file()).unwrap();
    assert_eq!(region.kind, RegionKind::ExeFsFile);
    assert_eq!(region.offset, 0xA00 + 0x200 + 0x240);
    assert_eq!(region.size, 0x100);
}

#[test]
fn exefs_file_may_fill_the_region() {
    let h = header();
    let file = ExefsFileHeader::new("banner", 0, 0x600);
    assert_eq!(locate_exefs_file(&h, &file).unwrap().end(), 0x1200);
}

#[test]
fn exefs_file_past_region_is_corrupt() {
    let h = header();
    let file = ExefsFileHeader::new("banner", 0x500, 0x200);
    assert!(matches!(
        locate_exefs_file(&h, &file),
        Err(NcchError::CorruptData(_))
    ));
}
