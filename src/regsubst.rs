// regsubst.rs - Replacement templates and the Replacer trait.
//
// Template markers: `$$`, `$&`, `` $` ``, `$'`, `$n` / `$nn` and `$<name>`.
// Anything that does not form a valid marker is copied literally.

use memchr::memchr;

use crate::api::Captures;
use crate::regparse_types::GroupTable;

/// One parsed unit of a replacement template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Piece<'t> {
    Literal(&'t str),
    /// `$&`
    WholeMatch,
    /// `` $` ``
    Before,
    /// `$'`
    After,
    /// `$n`, `$nn` or `$<name>`, resolved to a group index.
    Group(usize),
}

/// A replacement template parsed against one pattern's group table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template<'t> {
    pieces: Vec<Piece<'t>>,
}

impl<'t> Template<'t> {
    pub fn parse(template: &'t str, table: &GroupTable) -> Self {
        let bytes = template.as_bytes();
        let mut pieces = Vec::new();
        let mut lit_start = 0;
        let mut i = 0;

        while let Some(off) = memchr(b'$', &bytes[i..]) {
            let d = i + off;
            match parse_marker(template, d, table) {
                Some((piece, len)) => {
                    if lit_start < d {
                        pieces.push(Piece::Literal(&template[lit_start..d]));
                    }
                    pieces.push(piece);
                    i = d + len;
                    lit_start = i;
                }
                None => i = d + 1,
            }
        }
        if lit_start < template.len() {
            pieces.push(Piece::Literal(&template[lit_start..]));
        }
        Template { pieces }
    }

    pub fn pieces(&self) -> &[Piece<'t>] {
        &self.pieces
    }

    /// Append the expansion for `caps` to `dst`.
    pub fn expand(&self, caps: &Captures<'_, '_>, dst: &mut String) {
        let input = caps.input();
        let whole = caps.get(0);
        for piece in &self.pieces {
            match *piece {
                Piece::Literal(s) => dst.push_str(s),
                Piece::WholeMatch => dst.push_str(whole.map_or("", |m| m.as_str())),
                Piece::Before => {
                    if let Some(m) = whole {
                        dst.push_str(&input[..m.start()]);
                    }
                }
                Piece::After => {
                    if let Some(m) = whole {
                        dst.push_str(&input[m.end()..]);
                    }
                }
                Piece::Group(n) => {
                    if let Some(m) = caps.get(n) {
                        dst.push_str(m.as_str());
                    }
                }
            }
        }
    }
}

/// Parse the marker starting with the `$` at byte `d`. Returns the piece
/// and the marker's byte length, or `None` when the `$` is literal.
fn parse_marker<'t>(template: &'t str, d: usize, table: &GroupTable) -> Option<(Piece<'t>, usize)> {
    let rest = &template.as_bytes()[d + 1..];
    let num_groups = table.len();

    match *rest.first()? {
        b'$' => Some((Piece::Literal(&template[d + 1..d + 2]), 2)),
        b'&' => Some((Piece::WholeMatch, 2)),
        b'`' => Some((Piece::Before, 2)),
        b'\'' => Some((Piece::After, 2)),
        c @ b'0'..=b'9' => {
            let d1 = (c - b'0') as usize;
            if let Some(&c2) = rest.get(1) {
                if c2.is_ascii_digit() {
                    let nn = d1 * 10 + (c2 - b'0') as usize;
                    if (1..=num_groups).contains(&nn) {
                        return Some((Piece::Group(nn), 3));
                    }
                }
            }
            (1..=num_groups)
                .contains(&d1)
                .then_some((Piece::Group(d1), 2))
        }
        b'<' => {
            if !table.has_named_groups() {
                return None;
            }
            let close = memchr(b'>', &rest[1..])?;
            let name = &template[d + 2..d + 2 + close];
            let index = table.name_to_group_number(name)?;
            Some((Piece::Group(index), close + 3))
        }
        _ => None,
    }
}

// ============================================================================
// Replacer
// ============================================================================

/// Produces the replacement text for each match.
///
/// Implemented for template strings (`&str`, `String`, `&String`) and for
/// closures `FnMut(&Captures) -> T` whose output is used verbatim.
pub trait Replacer {
    fn replace_append(&mut self, caps: &Captures<'_, '_>, dst: &mut String);
}

impl Replacer for &str {
    fn replace_append(&mut self, caps: &Captures<'_, '_>, dst: &mut String) {
        caps.expand(*self, dst);
    }
}

impl Replacer for String {
    fn replace_append(&mut self, caps: &Captures<'_, '_>, dst: &mut String) {
        caps.expand(self.as_str(), dst);
    }
}

impl Replacer for &String {
    fn replace_append(&mut self, caps: &Captures<'_, '_>, dst: &mut String) {
        caps.expand(self.as_str(), dst);
    }
}

impl<F, T> Replacer for F
where
    F: FnMut(&Captures<'_, '_>) -> T,
    T: AsRef<str>,
{
    fn replace_append(&mut self, caps: &Captures<'_, '_>, dst: &mut String) {
        dst.push_str((*self)(caps).as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(names: &[Option<&str>]) -> GroupTable {
        let mut t = GroupTable::new();
        for name in names {
            t.add(*name, false, false).unwrap();
        }
        t
    }

    #[test]
    fn plain_text() {
        let t = Template::parse("no markers", &table(&[]));
        assert_eq!(t.pieces(), &[Piece::Literal("no markers")]);
        assert!(Template::parse("", &table(&[])).pieces().is_empty());
    }

    #[test]
    fn special_markers() {
        let t = Template::parse("[$&|$`|$'|$$]", &table(&[]));
        assert_eq!(
            t.pieces(),
            &[
                Piece::Literal("["),
                Piece::WholeMatch,
                Piece::Literal("|"),
                Piece::Before,
                Piece::Literal("|"),
                Piece::After,
                Piece::Literal("|"),
                Piece::Literal("$"),
                Piece::Literal("]"),
            ]
        );
    }

    #[test]
    fn numbered_markers() {
        let groups: Vec<Option<&str>> = vec![None; 12];
        let t = Template::parse("$1$12$13$0$01", &table(&groups));
        assert_eq!(
            t.pieces(),
            &[
                Piece::Group(1),
                Piece::Group(12),
                // `$13` is out of range: `$1` followed by "3"
                Piece::Group(1),
                Piece::Literal("3$0"),
                Piece::Group(1),
            ]
        );
        let t = Template::parse("$2", &table(&[None]));
        assert_eq!(t.pieces(), &[Piece::Literal("$2")]);
    }

    #[test]
    fn named_markers() {
        let t = table(&[Some("year"), None, Some("day")]);
        let tpl = Template::parse("$<day>/$<year>", &t);
        assert_eq!(
            tpl.pieces(),
            &[Piece::Group(3), Piece::Literal("/"), Piece::Group(1)]
        );
    }

    #[test]
    fn undeclared_name_is_literal() {
        let t = table(&[Some("a")]);
        let tpl = Template::parse("$<b>-$<a", &t);
        assert_eq!(tpl.pieces(), &[Piece::Literal("$<b>-$<a")]);

        let unnamed = table(&[None]);
        let tpl = Template::parse("$<a>", &unnamed);
        assert_eq!(tpl.pieces(), &[Piece::Literal("$<a>")]);
    }

    #[test]
    fn trailing_dollar() {
        let tpl = Template::parse("cost: 5$", &table(&[]));
        assert_eq!(tpl.pieces(), &[Piece::Literal("cost: 5$")]);
    }
}
