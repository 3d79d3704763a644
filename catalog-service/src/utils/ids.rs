use crate::models::reading::BookRef;
use regex::Regex;
use std::sync::OnceLock;

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[,\s]+").unwrap())
}

pub fn parse_book_ids(raw: &str) -> Vec<BookRef> {
    separator()
        .split(raw.trim())
        .filter(|token| !token.is_empty())
        .map(BookRef::parse)
        .collect()
}

pub fn parse_book_id_args<S: AsRef<str>>(args: &[S]) -> Vec<BookRef> {
    args.iter()
        .flat_map(|arg| parse_book_ids(arg.as_ref()))
        .collect()
}
