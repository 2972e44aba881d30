use std::fmt::{Display, Write};

/// Joins an iterator of [`Display`]'ables into a new [`String`], separated by `delim`.
pub(crate) fn iter_join<I, T>(iter: I, delim: &str) -> String
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    let mut s = String::new();
    let mut it = iter.into_iter().peekable();
    while let Some(n) = it.next() {
        let _ = write!(s, "{}", n);
        if it.peek().is_some() {
            s.push_str(delim);
        }
    }
    s
}
