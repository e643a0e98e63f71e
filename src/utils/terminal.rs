//! Terminal output sanitization
//!
//! Chat exports are untrusted input. Message text reaches the terminal through ratatui and
//! through the line-oriented `search`/`stats` commands, so escape sequences embedded in a
//! message could otherwise move the cursor, recolor the screen or plant OSC 8 hyperlinks.

/// Removes terminal escape sequences and control characters from message text
///
/// Strips CSI sequences (`ESC [ ... final`), OSC sequences (`ESC ] ... BEL` or
/// `ESC ] ... ESC \`), any other lone `ESC x` pair, and control characters other than
/// newline and tab.
///
/// # Examples
///
/// ```
/// use chat_export_explorer::utils::terminal::sanitize_for_terminal;
///
/// assert_eq!(sanitize_for_terminal("\x1b[31mred\x1b[0m"), "red");
/// assert_eq!(sanitize_for_terminal("\x1b]8;;http://x\x07link\x1b]8;;\x07"), "link");
/// ```
pub fn sanitize_for_terminal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            match chars.next() {
                Some('[') => {
                    // parameters and intermediates run until a byte in '@'..='~'
                    for next in chars.by_ref() {
                        if ('@'..='~').contains(&next) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    while let Some(next) = chars.next() {
                        if next == '\x07' {
                            break;
                        }
                        if next == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        if ch.is_control() && ch != '\n' && ch != '\t' {
            continue;
        }
        out.push(ch);
    }

    out
}
