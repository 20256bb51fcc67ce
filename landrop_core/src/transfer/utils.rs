use crate::transfer::constants::MAX_FILENAME_LENGTH;

/// Windows device names that must never be used as file names.
const RESERVED_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Reduces an untrusted file name to a safe base name.
///
/// Strips any directory components (both separator styles), drops control
/// characters, rejects reserved device names and empty results, and caps the
/// length at [`MAX_FILENAME_LENGTH`] bytes.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        return "unknown_file".to_string();
    }

    let stem = cleaned.split('.').next().unwrap_or(cleaned);
    if RESERVED_NAMES.iter().any(|r| r.eq_ignore_ascii_case(stem)) {
        return "unknown_file".to_string();
    }

    if cleaned.len() > MAX_FILENAME_LENGTH {
        return truncate_name(cleaned, MAX_FILENAME_LENGTH);
    }

    cleaned.to_string()
}

/// Shortens a name to `limit` bytes, keeping the extension when it is short
/// enough to be worth preserving. Cuts land on char boundaries.
fn truncate_name(name: &str, limit: usize) -> String {
    if let Some(dot) = name.rfind('.') {
        let ext = &name[dot..];
        if ext.len() < 20 && ext.len() < limit {
            let keep = limit - ext.len();
            let mut cut = keep;
            while cut > 0 && !name.is_char_boundary(cut) {
                cut -= 1;
            }
            return format!("{}{}", &name[..cut], ext);
        }
    }
    let mut cut = limit;
    while cut > 0 && !name.is_char_boundary(cut) {
        cut -= 1;
    }
    name[..cut].to_string()
}

/// Human-readable size with 1024-based units.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(sanitize_file_name("report.txt"), "report.txt");
        assert_eq!(sanitize_file_name("archive.tar.gz"), "archive.tar.gz");
    }

    #[test]
    fn unix_paths_collapse_to_base_name() {
        assert_eq!(sanitize_file_name("/etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("a/b/c/d.txt"), "d.txt");
    }

    #[test]
    fn windows_paths_collapse_to_base_name() {
        assert_eq!(sanitize_file_name("C:\\Users\\x\\doc.pdf"), "doc.pdf");
        assert_eq!(sanitize_file_name("..\\..\\boot.ini"), "boot.ini");
    }

    #[test]
    fn dangerous_names_are_replaced() {
        assert_eq!(sanitize_file_name(""), "unknown_file");
        assert_eq!(sanitize_file_name("."), "unknown_file");
        assert_eq!(sanitize_file_name(".."), "unknown_file");
        assert_eq!(sanitize_file_name("   "), "unknown_file");
        assert_eq!(sanitize_file_name("\x00\x01\x02"), "unknown_file");
    }

    #[test]
    fn reserved_device_names_are_replaced() {
        assert_eq!(sanitize_file_name("CON"), "unknown_file");
        assert_eq!(sanitize_file_name("con.txt"), "unknown_file");
        assert_eq!(sanitize_file_name("LPT1.log"), "unknown_file");
        assert_eq!(sanitize_file_name("console.txt"), "console.txt");
    }

    #[test]
    fn control_characters_are_stripped() {
        assert_eq!(sanitize_file_name("he\x00llo\x1f.txt"), "hello.txt");
    }

    #[test]
    fn long_names_keep_their_extension() {
        let long = format!("{}.txt", "a".repeat(300));
        let out = sanitize_file_name(&long);
        assert_eq!(out.len(), MAX_FILENAME_LENGTH);
        assert!(out.ends_with(".txt"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let crabs = "🦀".repeat(100);
        let out = sanitize_file_name(&crabs);
        assert!(out.len() <= MAX_FILENAME_LENGTH);
        assert!(out.chars().all(|c| c == '🦀'));
    }

    #[test]
    fn sizes_format_by_tier() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }
}
