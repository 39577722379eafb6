//! ASCII-safe transliteration of enclosure file names.

use deunicode::deunicode;

/// Transliterates a file name to a portable ASCII character set.
///
/// uGet mangles non-ASCII names passed on its command line, and the
/// completion watcher must later recognize the exact on-disk name in
/// directory events, so the mapping has to be deterministic: the same input
/// always yields the same output, and an already-clean name passes through
/// unchanged. Path separators and control characters are replaced since the
/// result is a single path component.
pub fn clean_file_name(name: &str) -> String {
    let ascii = deunicode(name);
    ascii
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c == '\0' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transliterates_accents() {
        assert_eq!(clean_file_name("Ep 1: Título.mp4"), "Ep 1: Titulo.mp4");
        assert_eq!(clean_file_name("Früh über Çay"), "Fruh uber Cay");
    }

    #[test]
    fn ascii_passes_through() {
        assert_eq!(clean_file_name("plain name-2.mkv"), "plain name-2.mkv");
    }

    #[test]
    fn idempotent() {
        let once = clean_file_name("Tschüß / Привет.opus");
        assert_eq!(clean_file_name(&once), once);
    }

    #[test]
    fn replaces_separators_and_controls() {
        assert_eq!(clean_file_name("a/b\\c\x07d"), "a_b_c_d");
    }
}
