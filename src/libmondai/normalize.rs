/// Left behind by `\pard` once `\par` has been turned into a newline.
const PARD_RESIDUE: &str = "d";

/// Line terminators: `\n`, `\r`, vertical tab, form feed, the file/group/
/// record separators, NEL and the Unicode line and paragraph separators.
/// `\r\n` leaves an empty piece in between, which is dropped anyway.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Trims every line and drops blank lines and `\pard` residue.
pub fn normalize(text: &str) -> String {
    text.split(is_line_break)
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != PARD_RESIDUE)
        .collect::<Vec<_>>()
        .join("\n")
}
