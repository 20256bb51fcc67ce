use std::path::Path;

use landrop_core::FileMeta;
use landrop_core::transfer::utils::sanitize_file_name;

#[test]
fn hostile_names_collapse_to_base_names() {
    assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
    assert_eq!(sanitize_file_name("/etc/shadow"), "shadow");
    assert_eq!(sanitize_file_name("..\\..\\windows\\system32\\cmd.exe"), "cmd.exe");
    assert_eq!(sanitize_file_name(".."), "unknown_file");
    assert_eq!(sanitize_file_name("...."), "....");
}

#[test]
fn joined_destination_stays_inside() {
    let dest = Path::new("/tmp/landrop_inbox");

    for hostile in ["../../etc/passwd", "/etc/shadow", "a/../../b"] {
        let name = sanitize_file_name(hostile);
        let target = dest.join(&name);

        assert!(target.starts_with(dest), "{hostile} escaped to {target:?}");
        assert_eq!(target.parent(), Some(dest));
    }
}

#[test]
fn header_with_traversal_name_decodes_to_base_name() {
    let mut buf = [0u8; FileMeta::WIRE_LEN];
    let hostile = b"../../etc/passwd";
    buf[..hostile.len()].copy_from_slice(hostile);
    buf[256..264].copy_from_slice(&7i64.to_be_bytes());
    buf[264..].copy_from_slice(&0o644u32.to_be_bytes());

    let meta = FileMeta::decode(&buf).unwrap();
    assert_eq!(meta.name, "passwd");
    assert_eq!(meta.size, 7);
    assert_eq!(meta.mode, 0o644);
}
