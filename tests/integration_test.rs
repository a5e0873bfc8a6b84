use proptest::prelude::*;
use rapidlink::facts::{FileFacts, SLICE_LEN};
use rapidlink::link::{self, LinkError, LinkFormat};
use std::io::Write;
use tempfile::NamedTempFile;

const LONG_LINK: &str =
    "3DA0828AF220120B53159D0FDD18FFFB#1FA85F7D75CADCBB576552340B566EFB#1871135#archive.zip";

#[test]
fn test_create_long_link_from_small_content() {
    // 3 bytes, well under the 256 KiB slice, so both digests are equal.
    let facts = FileFacts::from_bytes("a.txt", &[0x01, 0x02, 0x03]);
    assert_eq!(
        link::render(&facts, LinkFormat::Long),
        "5289DF737DF57326FCDD22597AFB1FAC#5289DF737DF57326FCDD22597AFB1FAC#3#a.txt"
    );
}

#[test]
fn test_convert_long_to_baidupcs_go() {
    let facts = link::parse(LONG_LINK).unwrap();
    assert_eq!(
        link::render(&facts, LinkFormat::BaiduPcsGo),
        "BaiduPCS-Go rapidupload -length=1871135 -md5=3DA0828AF220120B53159D0FDD18FFFB \
         -slicemd5=1FA85F7D75CADCBB576552340B566EFB \"archive.zip\""
    );
}

#[test]
fn test_convert_long_to_pandownload_and_back() {
    let facts = link::parse(LONG_LINK).unwrap();
    let pan = link::render(&facts, LinkFormat::PanDownload);
    assert_eq!(
        pan,
        "bdpan://YXJjaGl2ZS56aXB8MTg3MTEzNXwzREEwODI4QUYyMjAxMjBCNTMxNTlE\
         MEZERDE4RkZGQnwxRkE4NUY3RDc1Q0FEQ0JCNTc2NTUyMzQwQjU2NkVGQg=="
    );
    assert_eq!(link::parse(&pan).unwrap(), facts);
}

#[test]
fn test_unknown_format_is_rejected() {
    let err = link::resolve_formats(&["unknown-format".to_string()]).unwrap_err();
    assert!(matches!(err, LinkError::UnknownFormat(name) if name == "unknown-format"));
}

#[test]
fn test_short_link_is_not_a_parse_source() {
    let err = link::parse("3DA0828AF220120B53159D0FDD18FFFB#1871135#archive.zip").unwrap_err();
    assert!(matches!(err, LinkError::Unrecognized(_)));

    // The same holds for a short link we rendered ourselves.
    let facts = link::parse(LONG_LINK).unwrap();
    let short = link::render(&facts, LinkFormat::Short);
    assert!(link::parse(&short).is_err());
}

#[test]
fn test_pipe_in_name_survives_pandownload() {
    let facts = FileFacts {
        name: "weird|name.bin".to_string(),
        length: 42,
        md5: "0123456789ABCDEF0123456789ABCDEF".to_string(),
        slice_md5: "FEDCBA9876543210FEDCBA9876543210".to_string(),
    };
    let pan = link::render(&facts, LinkFormat::PanDownload);
    assert_eq!(link::parse(&pan).unwrap(), facts);
}

#[test]
fn test_cross_format_equivalence() {
    let facts = link::parse(LONG_LINK).unwrap();
    let via_long = link::parse(&link::render(&facts, LinkFormat::Long)).unwrap();
    let via_pan = link::parse(&link::render(&facts, LinkFormat::PanDownload)).unwrap();
    assert_eq!(via_long, via_pan);
    assert_eq!(via_long, facts);
}

#[test]
fn test_slice_checksum_over_large_content() {
    // 256 KiB + 17 bytes of a repeating pattern.
    let data: Vec<u8> = (0u8..=255).cycle().take(SLICE_LEN + 17).collect();
    let facts = FileFacts::from_bytes("big.bin", &data);
    let head = FileFacts::from_bytes("head.bin", &data[..SLICE_LEN]);
    assert_eq!(facts.slice_md5, head.md5);
    assert_ne!(facts.slice_md5, facts.md5);
}

#[test]
fn test_extract_from_disk_matches_in_memory() {
    let mut file = NamedTempFile::new().unwrap();
    let content = b"rapid-upload fixture content";
    file.write_all(content).unwrap();
    file.flush().unwrap();

    let from_disk = FileFacts::from_path(file.path()).unwrap();
    let name = file.path().file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(from_disk, FileFacts::from_bytes(name, content));
}

#[test]
fn test_missing_path_is_not_found() {
    let err = FileFacts::from_path(std::path::Path::new("/no/such/file.bin")).unwrap_err();
    assert!(matches!(err, rapidlink::FactsError::NotFound(_)));
}

// ── properties ───────────────────────────────────────────────────────────────

fn arb_facts() -> impl Strategy<Value = FileFacts> {
    (
        "[A-Za-z0-9 ._-]{0,40}",
        any::<u64>(),
        "[0-9A-F]{32}",
        "[0-9A-F]{32}",
    )
        .prop_map(|(name, length, md5, slice_md5)| FileFacts { name, length, md5, slice_md5 })
}

proptest! {
    #[test]
    fn prop_non_lossy_round_trip(facts in arb_facts()) {
        for format in [LinkFormat::BaiduPcsGo, LinkFormat::PanDownload, LinkFormat::Long] {
            let rendered = link::render(&facts, format);
            prop_assert_eq!(&link::parse(&rendered).unwrap(), &facts);
        }
    }

    #[test]
    fn prop_patterns_are_mutually_exclusive(facts in arb_facts()) {
        for format in [LinkFormat::BaiduPcsGo, LinkFormat::PanDownload, LinkFormat::Long] {
            let rendered = link::render(&facts, format);
            prop_assert_eq!(link::detect(&rendered), Some(format));
        }
        prop_assert_eq!(link::detect(&link::render(&facts, LinkFormat::Short)), None);
    }

    #[test]
    fn prop_slice_digest_ignores_tail(head in proptest::collection::vec(any::<u8>(), 0..512),
                                      tail in proptest::collection::vec(any::<u8>(), 1..512)) {
        // Pad the head out to exactly SLICE_LEN so the tail is pure overflow.
        let mut data = head;
        data.resize(SLICE_LEN, 0x5A);
        let base = FileFacts::from_bytes("f", &data);
        data.extend_from_slice(&tail);
        let grown = FileFacts::from_bytes("f", &data);
        prop_assert_eq!(grown.slice_md5, base.md5);
    }

    #[test]
    fn prop_small_content_slice_equals_full(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let facts = FileFacts::from_bytes("f", &data);
        prop_assert_eq!(facts.slice_md5, facts.md5);
    }
}
