mod macros;

/// Strip the module path from a Rust type name, keeping generic arguments readable.
///
/// `my_game::components::Position` becomes `Position` and
/// `my_game::Wrapper<my_game::Inner>` becomes `Wrapper<Inner>`.
pub(crate) fn short_type_name(full: &str) -> String {
    let mut short = String::with_capacity(full.len());
    let mut segment_start = 0;
    for (index, ch) in full.char_indices() {
        match ch {
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' => {
                short.push_str(last_segment(&full[segment_start..index]));
                short.push(ch);
                segment_start = index + ch.len_utf8();
            }
            _ => {}
        }
    }
    short.push_str(last_segment(&full[segment_start..]));
    short
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::short_type_name;

    #[test]
    fn plain_path() {
        assert_eq!(short_type_name("game::components::Position"), "Position");
        assert_eq!(short_type_name("Position"), "Position");
    }

    #[test]
    fn generic_path() {
        assert_eq!(
            short_type_name("game::Wrapper<game::inner::Inner, alloc::string::String>"),
            "Wrapper<Inner, String>"
        );
    }
}
