// src/naming.rs
//! Symbol name of a packet's declaration line.
//!
//! Cheap, grammar-free: the name is the last identifier before the parameter list
//! (or before `;`, `=`, `{`, `[` for fields), so leading keywords such as `virtual`,
//! `static`, `FORCEINLINE` or return types with template arguments don't shift it.

use crate::packet::Packet;

/// Returned when no identifier can be found on the declaration line.
pub const SENTINEL_NAME: &str = "BADNAME";

const DECL_CUTS: [char; 5] = ['(', ';', '=', '{', '['];

/// Resolve the declared symbol for a packet, degrading to `SENTINEL_NAME`.
pub fn resolve_name(packet: &Packet) -> String {
    let decl = packet.declaration().unwrap_or("");
    match declared_ident(decl) {
        Some(name) => name,
        None => {
            log::warn!("[naming] no identifier in declaration {:?}; packet:\n{}", decl, packet.text());
            SENTINEL_NAME.to_string()
        }
    }
}

/// Last identifier before the first declaration cut character.
pub fn declared_ident(decl: &str) -> Option<String> {
    let head = match decl.find(DECL_CUTS) {
        Some(i) => &decl[..i],
        None => decl,
    };

    let idents = identifiers(head);
    let last = idents.last()?;

    // `operator==`, `operator()`, `operator new`: the symbol may contain cut characters
    let op = idents.iter().rposition(|t| t == "operator" || t.ends_with("::operator"));
    if let Some(op_name) = op.map(|i| &idents[i]) {
        if let Some(kw) = head.rfind("operator") {
            let after = &decl[kw + "operator".len()..];
            let symbol = if after.starts_with("()") {
                "()"
            } else {
                after.split('(').next().unwrap_or("").trim()
            };
            if symbol.starts_with(|c: char| c.is_ascii_alphabetic()) {
                return Some(format!("{op_name} {symbol}"));
            }
            if !symbol.is_empty() {
                return Some(format!("{op_name}{symbol}"));
            }
        }
    }
    Some(last.clone())
}

/// Identifier tokens outside template brackets. `A::B` stays one token.
fn identifiers(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut depth = 0usize;
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '<' => {
                flush(&mut cur, &mut out);
                depth += 1;
            }
            '>' => {
                flush(&mut cur, &mut out);
                depth = depth.saturating_sub(1);
            }
            _ if depth > 0 => {}
            c if c == '_' || c.is_ascii_alphanumeric() => {
                if cur.is_empty() && c.is_ascii_digit() {
                    continue;
                }
                cur.push(c);
            }
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                if cur.is_empty() {
                    // leading `::Global` or `Foo<T>::Bar`: keep going with the tail
                    continue;
                }
                cur.push_str("::");
            }
            _ => flush(&mut cur, &mut out),
        }
    }
    flush(&mut cur, &mut out);
    out
}

fn flush(cur: &mut String, out: &mut Vec<String>) {
    let tok = cur.trim_end_matches(':');
    if !tok.is_empty() {
        out.push(tok.to_string());
    }
    cur.clear();
}

/* ===================================== Tests ===================================== */
