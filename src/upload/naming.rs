//! Stored name generation

/// Stem used when nothing survives sanitization
const FALLBACK_STEM: &str = "file";

/// Check whether the last dot-separated segment is `pdf`, ignoring case
pub fn is_pdf_filename(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("pdf"))
}

/// Reduce a client filename to a safe stem without its extension
///
/// Path separators and whitespace collapse into `_` and anything outside
/// `[A-Za-z0-9._-]` is dropped. The stem left after removing the extension
/// has leading and trailing `.`/`_` trimmed.
pub fn sanitize_stem(filename: &str) -> String {
    let spaced = filename.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let safe: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    let stem = match safe.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => safe.as_str(),
    };
    let stem = stem.trim_matches(|c| c == '.' || c == '_');

    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}

/// Build `{timestamp_ms}_{stem}.pdf`, with `-{suffix}` on the stem when given
pub fn stored_name(original_name: &str, timestamp_ms: i64, suffix: Option<&str>) -> String {
    let stem = sanitize_stem(original_name);
    match suffix {
        Some(suffix) => format!("{}_{}-{}.pdf", timestamp_ms, stem, suffix),
        None => format!("{}_{}.pdf", timestamp_ms, stem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extension_is_case_insensitive() {
        assert!(is_pdf_filename("report.pdf"));
        assert!(is_pdf_filename("REPORT.PDF"));
        assert!(is_pdf_filename("archive.tar.Pdf"));
    }

    #[test]
    fn test_non_pdf_names_rejected() {
        assert!(!is_pdf_filename("x.txt"));
        assert!(!is_pdf_filename("pdf"));
        assert!(!is_pdf_filename("report.pdf.exe"));
        assert!(!is_pdf_filename(""));
    }

    #[test]
    fn test_sanitize_strips_extension_and_unsafe_chars() {
        assert_eq!(sanitize_stem("My Report (final).pdf"), "My_Report_final");
        assert_eq!(sanitize_stem("../../etc/passwd.pdf"), "etc_passwd");
        assert_eq!(sanitize_stem("résumé.pdf"), "rsum");
        assert_eq!(sanitize_stem("v1.2-notes.pdf"), "v1.2-notes");
    }

    #[test]
    fn test_sanitize_falls_back_for_empty_stem() {
        assert_eq!(sanitize_stem(".pdf"), FALLBACK_STEM);
        assert_eq!(sanitize_stem("日本語.pdf"), FALLBACK_STEM);
    }

    #[test]
    fn test_stored_name_format() {
        assert_eq!(
            stored_name("Q3 Report.PDF", 1_700_000_000_123, None),
            "1700000000123_Q3_Report.pdf"
        );
        assert_eq!(
            stored_name("Q3 Report.pdf", 1_700_000_000_123, Some("a1b2c3d4")),
            "1700000000123_Q3_Report-a1b2c3d4.pdf"
        );
    }
}
