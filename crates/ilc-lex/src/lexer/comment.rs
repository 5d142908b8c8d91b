//! Line comment skipping.

use crate::cursor::Cursor;

/// Consumes a `//` or `#` comment through the end of the line (or end of
/// file). Assumes the cursor is positioned at the comment's first marker
/// character.
pub(super) fn skip_line_comment(cursor: &mut Cursor) {
    if cursor.current_char() == '#' {
        cursor.advance();
    } else {
        cursor.advance(); // first '/'
        cursor.advance(); // second '/'
    }
    while !cursor.is_at_end() && cursor.current_char() != '\n' {
        cursor.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_slash_stops_before_newline() {
        let mut cursor = Cursor::new("// hello\nnext");
        skip_line_comment(&mut cursor);
        assert_eq!(cursor.current_char(), '\n');
    }

    #[test]
    fn hash_comment_stops_before_newline() {
        let mut cursor = Cursor::new("# hello\nnext");
        skip_line_comment(&mut cursor);
        assert_eq!(cursor.current_char(), '\n');
    }

    #[test]
    fn stops_at_end_of_file() {
        let mut cursor = Cursor::new("// hello");
        skip_line_comment(&mut cursor);
        assert!(cursor.is_at_end());
    }
}
