// src/extract.rs
//! Comment/declaration extractor.
//!
//! Walks trimmed source lines and groups a documentation comment (a `//` run or a
//! `/* ... */` block) with the declaration that follows it. Annotation macros
//! between the two (`UFUNCTION(...)`, `UPROPERTY(...)`) belong to the unit; the
//! first other code line is the declaration, and the unit runs on until a blank
//! line or the next comment.
//!
//!   Idle ──`//`──▶ ExpectDeclaration ──code──▶ Declared ──blank / comment──▶ Found
//!     │               ▲    │     ▲
//!     └──`/*`──▶ BlockComment  └─ Annotation ─┘
//!
//!   ExpectDeclaration ──blank / banned──▶ Rejected
//!
//! `eat` performs one step and hands back the unconsumed remainder; `parse` drives
//! it to the end of a file.

use crate::packet::Packet;

/// Outcome of one `eat` step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scan {
    /// Comment, annotations, and one declaration with its continuation lines.
    Found(Packet),
    /// A comment was opened but no usable declaration followed (blank line,
    /// banned prefix, or end of input). The input it covered is consumed.
    Rejected,
    /// No comment left in the input.
    Exhausted,
}

/// Markers and policies the scanner matches trimmed lines against.
#[derive(Clone, Debug)]
pub struct ScanRules {
    pub line_comment: String,
    pub block_open: String,
    pub block_close: String,
    /// Lines that end an open packet. Blank line only, by default.
    pub terminators: Vec<String>,
    /// Declarations starting with one of these are not documented.
    pub banned_prefixes: Vec<String>,
    /// Macro lines that sit between a comment and its declaration.
    pub annotation_prefixes: Vec<String>,
}

impl Default for ScanRules {
    fn default() -> Self {
        Self {
            line_comment: "//".into(),
            block_open: "/*".into(),
            block_close: "*/".into(),
            terminators: vec![String::new()],
            banned_prefixes: vec!["UCLASS".into(), "class".into()],
            annotation_prefixes: ["UFUNCTION", "UPROPERTY", "USTRUCT", "UENUM", "UDELEGATE"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ScanRules {
    pub fn is_terminator(&self, line: &str) -> bool {
        self.terminators.iter().any(|t| t == line)
    }

    pub fn is_banned(&self, line: &str) -> bool {
        self.banned_prefixes.iter().any(|b| line.starts_with(b.as_str()))
    }

    pub fn is_annotation(&self, line: &str) -> bool {
        self.annotation_prefixes.iter().any(|a| line.starts_with(a.as_str()))
    }

    fn is_comment(&self, line: &str) -> bool {
        line.starts_with(self.line_comment.as_str()) || line.starts_with(self.block_open.as_str())
    }

    /// State after a line that opens a block comment: `/** one-liner */` closes in place.
    fn after_block_open(&self, line: &str) -> State {
        let body = &line[self.block_open.len()..];
        if body.contains(self.block_close.as_str()) {
            State::ExpectDeclaration
        } else {
            State::BlockComment
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    BlockComment,
    ExpectDeclaration,
    /// Inside an annotation's unclosed argument list, at this paren depth.
    Annotation(usize),
    /// Declaration captured at packet index `at`, source index `src`.
    Declared { at: usize, src: usize },
}

fn paren_depth(mut depth: usize, line: &str) -> usize {
    for ch in line.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    depth
}

fn after_annotation(depth: usize) -> State {
    if depth > 0 {
        State::Annotation(depth)
    } else {
        State::ExpectDeclaration
    }
}

/// Scan forward for the next documented declaration.
///
/// Returns the unconsumed remainder with the outcome. On `Rejected` the remainder
/// starts at the line that caused the rejection, so a banned declaration is left
/// for the next pass. On `Found` a closing terminator line is consumed; a closing
/// comment line is left to start the next unit.
pub fn eat<'a, S: AsRef<str>>(lines: &'a [S], rules: &ScanRules) -> (&'a [S], Scan) {
    let mut state = State::Idle;
    let mut packet: Vec<String> = Vec::new();

    for (idx, raw) in lines.iter().enumerate() {
        let line = raw.as_ref().trim();

        match state {
            State::Idle => {
                if line.starts_with(rules.line_comment.as_str()) {
                    packet.push(line.to_string());
                    state = State::ExpectDeclaration;
                } else if line.starts_with(rules.block_open.as_str()) {
                    packet.push(line.to_string());
                    state = rules.after_block_open(line);
                }
            }
            State::BlockComment => {
                packet.push(line.to_string());
                if line.starts_with(rules.block_close.as_str()) {
                    state = State::ExpectDeclaration;
                }
            }
            State::ExpectDeclaration => {
                if rules.is_terminator(line) || rules.is_banned(line) {
                    return (&lines[idx..], Scan::Rejected);
                }
                if line.starts_with(rules.line_comment.as_str()) {
                    packet.push(line.to_string());
                } else if line.starts_with(rules.block_open.as_str()) {
                    packet.push(line.to_string());
                    state = rules.after_block_open(line);
                } else if rules.is_annotation(line) {
                    packet.push(line.to_string());
                    state = after_annotation(paren_depth(0, line));
                } else {
                    state = State::Declared { at: packet.len(), src: idx };
                    packet.push(line.to_string());
                }
            }
            State::Annotation(depth) => {
                if rules.is_terminator(line) {
                    return (&lines[idx..], Scan::Rejected);
                }
                packet.push(line.to_string());
                state = after_annotation(paren_depth(depth, line));
            }
            State::Declared { at, src } => {
                if rules.is_terminator(line) {
                    return (&lines[idx + 1..], Scan::Found(Packet::with_declaration(packet, at, src + 1)));
                }
                if rules.is_comment(line) {
                    return (&lines[idx..], Scan::Found(Packet::with_declaration(packet, at, src + 1)));
                }
                packet.push(line.to_string());
            }
        }
    }

    let rest = &lines[lines.len()..];
    match state {
        State::Declared { at, src } => (rest, Scan::Found(Packet::with_declaration(packet, at, src + 1))),
        _ if packet.is_empty() => (rest, Scan::Exhausted),
        _ => (rest, Scan::Rejected),
    }
}

/// Extract every well-formed unit from one file's lines, in source order.
/// Packet line numbers are relative to `lines`.
pub fn parse<S: AsRef<str>>(lines: &[S], rules: &ScanRules) -> Vec<Packet> {
    let mut packets = Vec::new();
    let mut rest = lines;

    while !rest.is_empty() {
        let offset = lines.len() - rest.len();
        let (next, scan) = eat(rest, rules);
        debug_assert!(next.len() < rest.len(), "scanner made no progress");

        match scan {
            Scan::Found(mut packet) => {
                packet.line += offset;
                packets.push(packet);
            }
            Scan::Rejected => {
                log::debug!("[extract] dropped unit ending before line {}", lines.len() - next.len() + 1);
            }
            Scan::Exhausted => break,
        }
        rest = next;
    }

    packets
}

/* ===================================== Tests ===================================== */

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ScanRules {
        ScanRules::default()
    }

    fn found(scan: Scan) -> Packet {
        match scan {
            Scan::Found(p) => p,
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn no_comments_is_exhausted() {
        let lines = ["#pragma once", "", "int x;", "void f();"];
        let (rest, scan) = eat(&lines, &rules());
        assert_eq!(scan, Scan::Exhausted);
        assert!(rest.is_empty());
    }

    #[test]
    fn empty_input_is_exhausted() {
        let lines: [&str; 0] = [];
        let (rest, scan) = eat(&lines, &rules());
        assert_eq!(scan, Scan::Exhausted);
        assert!(rest.is_empty());
    }

    #[test]
    fn line_comment_then_declaration() {
        let lines = ["// Does a thing", "void Foo(int x);", "", "int y;"];
        let (rest, scan) = eat(&lines, &rules());
        let p = found(scan);
        assert_eq!(p.lines, vec!["// Does a thing", "void Foo(int x);"]);
        assert_eq!(p.line, 2);
        assert_eq!(rest, &["int y;"]);
    }

    #[test]
    fn declaration_without_trailing_blank_keeps_next_line() {
        let lines = ["// a", "void A();", "// b", "void B();"];
        let (rest, scan) = eat(&lines, &rules());
        assert_eq!(found(scan).lines, vec!["// a", "void A();"]);
        assert_eq!(rest, &["// b", "void B();"]);
    }

    #[test]
    fn lines_are_trimmed() {
        let lines = ["    // indented", "\tvirtual void Tick(float Dt) override;  ", ""];
        let (_, scan) = eat(&lines, &rules());
        assert_eq!(found(scan).lines, vec!["// indented", "virtual void Tick(float Dt) override;"]);
    }

    #[test]
    fn line_comment_run_is_grouped() {
        let lines = ["// one", "// two", "/// three", "float Get() const;"];
        let (rest, scan) = eat(&lines, &rules());
        assert_eq!(found(scan).len(), 4);
        assert!(rest.is_empty());
    }

    #[test]
    fn banned_declaration_is_rejected_and_left_in_place() {
        let lines = ["// Forward Decl", "class Foo;", "", "void g();"];
        let (rest, scan) = eat(&lines, &rules());
        assert_eq!(scan, Scan::Rejected);
        assert_eq!(rest, &["class Foo;", "", "void g();"]);
    }

    #[test]
    fn banned_check_applies_after_block_comment() {
        let lines = ["/**", " * @brief Component", " */", "UCLASS(BlueprintType)", "class API UComp"];
        let (rest, scan) = eat(&lines, &rules());
        assert_eq!(scan, Scan::Rejected);
        assert_eq!(rest[0], "UCLASS(BlueprintType)");
    }

    #[test]
    fn blank_after_comment_is_rejected_at_blank() {
        let lines = ["// Copyright Someone 2023", "", "#pragma once"];
        let (rest, scan) = eat(&lines, &rules());
        assert_eq!(scan, Scan::Rejected);
        assert_eq!(rest, &["", "#pragma once"]);
    }

    #[test]
    fn block_comment_spanning_lines() {
        let lines = [
            "    /**",
            "     * @brief Length of a Day in Seconds",
            "     * This refers to both Solar and Calendar days",
            "     */",
            "    float GetLengthOfDay();",
            "",
        ];
        let (rest, scan) = eat(&lines, &rules());
        let p = found(scan);
        assert_eq!(
            p.lines,
            vec![
                "/**",
                "* @brief Length of a Day in Seconds",
                "* This refers to both Solar and Calendar days",
                "*/",
                "float GetLengthOfDay();",
            ]
        );
        assert_eq!(p.line, 5);
        assert!(rest.is_empty());
    }

    #[test]
    fn blank_lines_inside_block_are_kept() {
        let lines = ["/*", "a", "", "b", "*/", "int F();"];
        let (_, scan) = eat(&lines, &rules());
        assert_eq!(found(scan).lines, vec!["/*", "a", "", "b", "*/", "int F();"]);
    }

    #[test]
    fn single_line_block_comment_closes_in_place() {
        let lines = ["/** Current time scale */", "float GetTimeScale();"];
        let (_, scan) = eat(&lines, &rules());
        assert_eq!(found(scan).lines, vec!["/** Current time scale */", "float GetTimeScale();"]);
    }

    #[test]
    fn undocumented_code_before_comment_is_skipped() {
        let lines = ["#include \"X.h\"", "int plain;", "// doc", "int Documented();"];
        let (_, scan) = eat(&lines, &rules());
        let p = found(scan);
        assert_eq!(p.lines, vec!["// doc", "int Documented();"]);
        assert_eq!(p.line, 4);
    }

    #[test]
    fn comment_at_end_of_input_is_rejected() {
        let lines = ["int a;", "// trailing"];
        let (rest, scan) = eat(&lines, &rules());
        assert_eq!(scan, Scan::Rejected);
        assert!(rest.is_empty());
    }

    #[test]
    fn custom_terminator_ends_packet() {
        let mut r = rules();
        r.terminators.push("#endif".into());
        let lines = ["// doc", "#endif", "void f();"];
        let (rest, scan) = eat(&lines, &r);
        assert_eq!(scan, Scan::Rejected);
        assert_eq!(rest, &["#endif", "void f();"]);
    }

    #[test]
    fn annotation_macro_joins_the_unit() {
        let lines = [
            "    /**",
            "     * @brief Populate DateStruct with today's date",
            "     */",
            "    UFUNCTION(BlueprintCallable, Category = \"Date and Time|Core\")",
            "    virtual void GetTodaysDate(FDateTimeSystemStruct& DateStruct) override;",
            "",
            "    int32 Next;",
        ];
        let (rest, scan) = eat(&lines, &rules());
        let p = found(scan);
        assert_eq!(p.len(), 5);
        assert_eq!(p.declaration(), Some("virtual void GetTodaysDate(FDateTimeSystemStruct& DateStruct) override;"));
        assert_eq!(p.comments().last().map(String::as_str), Some("UFUNCTION(BlueprintCallable, Category = \"Date and Time|Core\")"));
        assert_eq!(p.line, 5);
        assert_eq!(rest, &["    int32 Next;"]);
    }

    #[test]
    fn annotation_arguments_may_span_lines() {
        let lines = ["// Scale", "UPROPERTY(EditAnywhere,", "Category = \"Time\")", "float TimeScale;"];
        let (_, scan) = eat(&lines, &rules());
        let p = found(scan);
        assert_eq!(p.declaration(), Some("float TimeScale;"));
        assert_eq!(p.line, 4);
    }

    #[test]
    fn annotation_without_declaration_is_rejected() {
        let lines = ["// Orphan", "UPROPERTY()", "", "int x;"];
        let (rest, scan) = eat(&lines, &rules());
        assert_eq!(scan, Scan::Rejected);
        assert_eq!(rest, &["", "int x;"]);
    }

    #[test]
    fn continuation_lines_stay_with_the_declaration() {
        let lines = ["// Adds", "int32 Add(int32 A,", "    int32 B);", "", "void g();"];
        let (rest, scan) = eat(&lines, &rules());
        let p = found(scan);
        assert_eq!(p.lines, vec!["// Adds", "int32 Add(int32 A,", "int32 B);"]);
        assert_eq!(p.declaration(), Some("int32 Add(int32 A,"));
        assert_eq!(p.line, 2);
        assert_eq!(rest, &["void g();"]);
    }

    #[test]
    fn parse_empty_file() {
        let lines: Vec<String> = Vec::new();
        assert!(parse(&lines, &rules()).is_empty());
    }

    #[test]
    fn parse_without_comments() {
        let lines = ["#pragma once", "struct S {", "  int x;", "};"];
        assert!(parse(&lines, &rules()).is_empty());
    }

    #[test]
    fn parse_collects_units_in_source_order() {
        let src = "\
// Copyright Acinonyx Ltd. 2023. All Rights Reserved.

#pragma once

// Forward Decl
class UClimateComponent;

/**
 * @brief Gets the sun
 */
FVector GetSunVector(float Latitude);

// Ticks the clock
virtual void Tick(float DeltaTime);
// Undocumented follows
int Count;
";
        let lines: Vec<&str> = src.split('\n').collect();
        let packets = parse(&lines, &rules());
        let decls: Vec<&str> = packets.iter().filter_map(Packet::declaration).collect();
        assert_eq!(decls, vec!["FVector GetSunVector(float Latitude);", "virtual void Tick(float DeltaTime);", "int Count;"]);
        assert_eq!(packets[0].line, 11);
        assert_eq!(packets[1].line, 14);
        assert_eq!(packets[2].line, 16);
    }

    #[test]
    fn parse_names_reflected_members_by_signature() {
        let src = "\
/**
 * @brief Length of a Day in Seconds
 */
UPROPERTY(EditAnywhere, Category = \"Date and Time|Configuration\")
float LengthOfDay;

/**
 * @brief Internal begin
 */
UFUNCTION()
void InternalBegin();
";
        let lines: Vec<&str> = src.split('\n').collect();
        let names: Vec<String> = parse(&lines, &rules()).iter().map(crate::naming::resolve_name).collect();
        assert_eq!(names, vec!["LengthOfDay", "InternalBegin"]);
    }

    #[test]
    fn parse_counts_well_formed_pairs() {
        let mut lines = Vec::new();
        for i in 0..5 {
            lines.push(format!("// doc {i}"));
            lines.push(format!("void F{i}();"));
            lines.push(String::new());
        }
        let packets = parse(&lines, &rules());
        assert_eq!(packets.len(), 5);
        assert!(packets.iter().all(|p| p.len() == 2));
    }
}
