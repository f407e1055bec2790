//! A resource whose contents are parsed only when first needed.
//!
//! [`EagerResource`] parses its document when constructed. [`LazyResource`]
//! binds a call site whose resolver does the parsing, so nothing is read
//! until [`ConstantResource::notes`] runs; afterwards the site is bound to a
//! constant and the document is never touched again.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use lazylink_bind::{fixed, CallSite, CallSiteRegistry, Lookup, MemberTable, ResolutionError};
use lazylink_handle::combinators::constant;
use lazylink_ir::{
    OperationDescriptor, OwnerType, ResolverDescriptor, ResolverSignature, Signature, Type, Value,
};
use tracing::{debug, info};

use crate::{DemoError, ResourceError};

/// Owner of the lazy notes site and its resolver.
pub const LAZY_CONSTANT: OwnerType = OwnerType::new("LazyConstant");

/// Upper-cased text of the first `<notes>` inside an `<employee>` inside a
/// `<company>`, or `""` if the document has none.
///
/// Understands elements, quoted attributes, text, comments, CDATA,
/// processing instructions and the predefined and numeric character
/// references.
pub fn extract_notes(xml: &str) -> Result<String, ResourceError> {
    let mut scanner = Scanner { src: xml, pos: 0 };
    let mut open: Vec<&str> = Vec::new();
    // Depth of the `<notes>` being captured and the text gathered so far.
    let mut capture: Option<(usize, String)> = None;

    loop {
        let offset = scanner.pos;
        let Some(event) = scanner.next_event()? else {
            break;
        };
        match event {
            Event::Open { name, self_closing } => {
                let is_target = capture.is_none() && name == "notes" && under_employee(&open);
                if self_closing {
                    if is_target {
                        return Ok(String::new());
                    }
                    continue;
                }
                if is_target {
                    capture = Some((open.len(), String::new()));
                }
                open.push(name);
            }
            Event::Close(name) => {
                if open.pop() != Some(name) {
                    return Err(malformed(offset, "mismatched closing tag"));
                }
                if let Some((depth, text)) = &capture {
                    if open.len() == *depth {
                        return Ok(text.to_uppercase());
                    }
                }
            }
            Event::Text(raw) => {
                if let Some((_, text)) = &mut capture {
                    decode_into(raw, offset, text)?;
                }
            }
            Event::CData(raw) => {
                if let Some((_, text)) = &mut capture {
                    text.push_str(raw);
                }
            }
        }
    }

    if capture.is_some() || !open.is_empty() {
        return Err(malformed(xml.len(), "unclosed element"));
    }
    Ok(String::new())
}

/// Read `resource` and extract its notes. An empty name yields `""`.
pub fn parse_notes(resource: &str) -> Result<String, ResourceError> {
    if resource.is_empty() {
        info!("no resource specified");
        return Ok(String::new());
    }
    debug!(resource, "parsing notes");
    let xml = std::fs::read_to_string(resource).map_err(|source| ResourceError::Io {
        path: Path::new(resource).to_path_buf(),
        source,
    })?;
    extract_notes(&xml)
}

fn under_employee(open: &[&str]) -> bool {
    open.iter()
        .position(|name| *name == "company")
        .is_some_and(|company| open[company + 1..].contains(&"employee"))
}

fn malformed(offset: usize, message: &'static str) -> ResourceError {
    ResourceError::Malformed { offset, message }
}

enum Event<'a> {
    Open { name: &'a str, self_closing: bool },
    Close(&'a str),
    Text(&'a str),
    CData(&'a str),
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn next_event(&mut self) -> Result<Option<Event<'a>>, ResourceError> {
        loop {
            let start = self.pos;
            let rest = &self.src[start..];
            if rest.is_empty() {
                return Ok(None);
            }
            if !rest.starts_with('<') {
                let len = rest.find('<').unwrap_or(rest.len());
                self.pos += len;
                return Ok(Some(Event::Text(&rest[..len])));
            }

            if let Some(body) = rest.strip_prefix("<![CDATA[") {
                let len = self.skip_past(body, "]]>", start, "unterminated CDATA")?;
                return Ok(Some(Event::CData(&body[..len])));
            }
            if let Some(body) = rest.strip_prefix("<!--") {
                self.skip_past(body, "-->", start, "unterminated comment")?;
                continue;
            }
            if let Some(body) = rest.strip_prefix("<?") {
                self.skip_past(body, "?>", start, "unterminated processing instruction")?;
                continue;
            }
            if let Some(body) = rest.strip_prefix("<!") {
                self.skip_past(body, ">", start, "unterminated declaration")?;
                continue;
            }

            let Some(end) = tag_end(rest) else {
                return Err(malformed(start, "unterminated tag"));
            };
            self.pos += end + 1;
            let inner = &rest[1..end];
            if let Some(name) = inner.strip_prefix('/') {
                return Ok(Some(Event::Close(name.trim())));
            }
            let self_closing = inner.ends_with('/');
            let inner = inner.trim_end_matches('/');
            let name = inner.split(|c: char| c.is_whitespace()).next().unwrap_or("");
            if name.is_empty() {
                return Err(malformed(start, "missing element name"));
            }
            return Ok(Some(Event::Open { name, self_closing }));
        }
    }

    /// Move past `terminator` in `body`, which starts after an opening
    /// delimiter at `start`. Returns the length of `body` before it.
    fn skip_past(
        &mut self,
        body: &str,
        terminator: &str,
        start: usize,
        message: &'static str,
    ) -> Result<usize, ResourceError> {
        let len = body.find(terminator).ok_or_else(|| malformed(start, message))?;
        let opener = self.src[start..].len() - body.len();
        self.pos = start + opener + len + terminator.len();
        Ok(len)
    }
}

/// Index of the `>` closing the tag at the start of `rest`, skipping any
/// inside quoted attribute values.
fn tag_end(rest: &str) -> Option<usize> {
    let mut quote = None;
    for (i, ch) in rest.char_indices() {
        match (quote, ch) {
            (None, '"' | '\'') => quote = Some(ch),
            (Some(open), _) if ch == open => quote = None,
            (None, '>') => return Some(i),
            _ => {}
        }
    }
    None
}

fn decode_into(raw: &str, offset: usize, out: &mut String) -> Result<(), ResourceError> {
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let semi = tail
            .find(';')
            .ok_or_else(|| malformed(offset, "unterminated character reference"))?;
        let decoded = match &tail[1..semi] {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            reference => numeric_reference(reference)
                .ok_or_else(|| malformed(offset, "unknown character reference"))?,
        };
        out.push(decoded);
        rest = &tail[semi + 1..];
    }
    out.push_str(rest);
    Ok(())
}

fn numeric_reference(reference: &str) -> Option<char> {
    let digits = reference.strip_prefix('#')?;
    let code = match digits.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}

/// A resource exposing one expensive constant and one cheap operation.
pub trait ConstantResource {
    /// An operation that never looks at the notes.
    fn not_needing_notes(&self) -> &'static str {
        "called 'not_needing_notes'"
    }

    /// The notes of the underlying document.
    fn notes(&self) -> Result<String, DemoError>;
}

/// Parses the document when constructed.
#[derive(Debug)]
pub struct EagerResource {
    notes: String,
}

impl EagerResource {
    pub fn load(resource: &str) -> Result<Self, ResourceError> {
        Ok(EagerResource {
            notes: parse_notes(resource)?,
        })
    }
}

impl ConstantResource for EagerResource {
    fn notes(&self) -> Result<String, DemoError> {
        Ok(self.notes.clone())
    }
}

/// Parses the document the first time the notes are requested.
pub struct LazyResource {
    site: Rc<CallSite>,
    parses: Rc<Cell<u32>>,
}

impl LazyResource {
    /// Bind the notes site. Does not touch `resource`.
    pub fn new(resource: &str) -> Result<Self, DemoError> {
        let parses = Rc::new(Cell::new(0));
        let counter = Rc::clone(&parses);

        let table = Rc::new(MemberTable::new());
        table.define_resolver(
            LAZY_CONSTANT,
            "parse_notes",
            fixed(
                [Type::Str],
                move |_: &Lookup, _: &OperationDescriptor, extra_args: &[Value]| {
                    let resource = extra_args[0].as_str().unwrap_or_default();
                    counter.set(counter.get() + 1);
                    let notes = parse_notes(resource)
                        .map_err(|err| ResolutionError::bootstrap(err.to_string()))?;
                    Ok(constant(Type::Str, Value::from(notes))?)
                },
            ),
        );

        let registry = CallSiteRegistry::new(Lookup::new(table, LAZY_CONSTANT));
        let site = registry.bind(
            OperationDescriptor::new("notes", Signature::nullary(Type::Str)),
            ResolverDescriptor::new(LAZY_CONSTANT, "parse_notes")
                .with_signature(ResolverSignature::Fixed(vec![Type::Str]))
                .with_args([Value::str(resource)]),
        )?;
        Ok(LazyResource { site, parses })
    }

    /// Times the resolver has parsed the document.
    pub fn parse_count(&self) -> u32 {
        self.parses.get()
    }

    #[inline]
    pub fn site(&self) -> &Rc<CallSite> {
        &self.site
    }
}

impl ConstantResource for LazyResource {
    fn notes(&self) -> Result<String, DemoError> {
        Ok(self.site.invoke(&[])?.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
