// newick.rs - Newick parser with BEAST-style annotation comments

use std::collections::BTreeMap;
use crate::phylo::tree::{Node, Tree};
use crate::phylo::TreeError;

/// Parse the first tree of a Newick string.
///
/// Accepts quoted labels, missing branch lengths and `[&key=value,...]`
/// comments placed after a label or after the branch-length colon. Other
/// `[...]` comments are skipped. Anything after the terminating `;` is
/// ignored.
pub fn parse_newick(text: &str) -> Result<Tree, TreeError> {
    let mut parser = Parser {
        bytes: text.as_bytes(),
        pos: 0,
        nodes: Vec::new(),
    };

    parser.skip_whitespace();
    parser.skip_leading_comments()?;
    if parser.peek().is_none() {
        return Err(TreeError::EmptyTree);
    }

    parser.parse_nodes()?;
    parser.skip_whitespace();
    match parser.next_byte() {
        Some(b';') | None => {}
        Some(c) => return Err(parser.unexpected(c)),
    }

    Tree::from_nodes(parser.nodes)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    nodes: Vec<Node>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn next_byte(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn unexpected(&self, c: u8) -> TreeError {
        TreeError::Syntax {
            position: self.pos.saturating_sub(1),
            message: format!("unexpected character '{}'", c as char),
        }
    }

    fn push_node(&mut self, parent: Option<usize>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node::new(parent));
        if let Some(p) = parent {
            self.nodes[p].children.push(idx);
        }
        idx
    }

    /// Parse one tree without recursion.
    ///
    /// `open` holds the internal nodes whose `)` has not been seen yet, so
    /// stack use does not grow with tree depth. Nodes are pushed before
    /// their children, giving pre-order indices.
    fn parse_nodes(&mut self) -> Result<(), TreeError> {
        let mut open: Vec<usize> = Vec::new();
        let mut current = self.push_node(None);

        loop {
            self.skip_whitespace();
            if self.peek() == Some(b'(') {
                self.pos += 1;
                open.push(current);
                current = self.push_node(Some(current));
                continue;
            }

            self.parse_node_tail(current)?;
            loop {
                self.skip_whitespace();
                let parent = match open.last() {
                    Some(&p) => p,
                    None => return Ok(()),
                };
                match self.next_byte() {
                    Some(b',') => {
                        current = self.push_node(Some(parent));
                        break;
                    }
                    Some(b')') => {
                        open.pop();
                        current = parent;
                        self.parse_node_tail(current)?;
                    }
                    Some(c) => return Err(self.unexpected(c)),
                    None => return Err(TreeError::UnexpectedEnd),
                }
            }
        }
    }

    /// label, comments and `:length` following a leaf or a closing bracket
    fn parse_node_tail(&mut self, idx: usize) -> Result<(), TreeError> {
        self.skip_whitespace();
        self.read_comments(idx)?;
        self.nodes[idx].label = self.read_label()?;
        self.skip_whitespace();
        self.read_comments(idx)?;

        if self.peek() == Some(b':') {
            self.pos += 1;
            self.skip_whitespace();
            self.read_comments(idx)?;
            self.nodes[idx].length = Some(self.read_length()?);
            self.skip_whitespace();
            self.read_comments(idx)?;
        }
        Ok(())
    }

    fn read_label(&mut self) -> Result<Option<String>, TreeError> {
        if self.peek() == Some(b'\'') || self.peek() == Some(b'"') {
            return self.read_quoted().map(Some);
        }

        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || matches!(b, b'(' | b')' | b',' | b':' | b';' | b'[') {
                break;
            }
            self.pos += 1;
        }

        if start == self.pos {
            Ok(None)
        } else {
            Ok(Some(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned()))
        }
    }

    /// Quoted label; a doubled quote stands for a literal quote
    fn read_quoted(&mut self) -> Result<String, TreeError> {
        let quote = self.next_byte().ok_or(TreeError::UnexpectedEnd)?;
        let mut out = Vec::new();
        loop {
            match self.next_byte() {
                Some(b) if b == quote => {
                    if self.peek() == Some(quote) {
                        self.pos += 1;
                        out.push(quote);
                    } else {
                        break;
                    }
                }
                Some(b) => out.push(b),
                None => return Err(TreeError::UnexpectedEnd),
            }
        }
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    fn read_length(&mut self) -> Result<f64, TreeError> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E')) {
            self.pos += 1;
        }
        let raw = String::from_utf8_lossy(&self.bytes[start..self.pos]);
        raw.parse::<f64>().map_err(|_| TreeError::InvalidBranchLength {
            position: start,
            value: raw.into_owned(),
        })
    }

    fn read_comment(&mut self) -> Result<&'a str, TreeError> {
        // caller guarantees the current byte is '['
        let bytes = self.bytes;
        self.pos += 1;
        let start = self.pos;
        while let Some(b) = self.next_byte() {
            if b == b']' {
                let body = &bytes[start..self.pos - 1];
                return std::str::from_utf8(body).map_err(|_| TreeError::Syntax {
                    position: start,
                    message: "comment is not valid UTF-8".to_string(),
                });
            }
        }
        Err(TreeError::UnexpectedEnd)
    }

    fn read_comments(&mut self, idx: usize) -> Result<(), TreeError> {
        while self.peek() == Some(b'[') {
            let body = self.read_comment()?;
            if let Some(annotations) = body.strip_prefix('&') {
                parse_annotations(annotations, &mut self.nodes[idx].traits);
            }
            self.skip_whitespace();
        }
        Ok(())
    }

    /// `[&R]`/`[&U]` rooting flags in front of the tree carry no node data
    fn skip_leading_comments(&mut self) -> Result<(), TreeError> {
        while self.peek() == Some(b'[') {
            self.read_comment()?;
            self.skip_whitespace();
        }
        Ok(())
    }
}

/// Split `key=value` pairs on top-level commas; also accepts the NHX
/// `&NHX:key=value:key=value` form
fn parse_annotations(body: &str, traits: &mut BTreeMap<String, String>) {
    let (body, separator) = match body.strip_prefix("&NHX:") {
        Some(rest) => (rest, b':'),
        None => (body, b','),
    };

    let mut depth = 0usize;
    let mut in_quote: Option<u8> = None;
    let mut start = 0;
    let bytes = body.as_bytes();

    for (i, &b) in bytes.iter().enumerate() {
        match (in_quote, b) {
            (Some(q), _) if b == q => in_quote = None,
            (Some(_), _) => {}
            (None, b'"') | (None, b'\'') => in_quote = Some(b),
            (None, b'{') => depth += 1,
            (None, b'}') => depth = depth.saturating_sub(1),
            (None, _) if b == separator && depth == 0 => {
                insert_annotation(&body[start..i], traits);
                start = i + 1;
            }
            _ => {}
        }
    }
    insert_annotation(&body[start..], traits);
}

fn insert_annotation(entry: &str, traits: &mut BTreeMap<String, String>) {
    let entry = entry.trim();
    if entry.is_empty() {
        return;
    }
    let (key, value) = match entry.split_once('=') {
        Some((k, v)) => (k.trim(), v.trim()),
        None => (entry, ""),
    };
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);
    traits.insert(key.to_string(), value.to_string());
}
