//! Whole-pipeline properties: termination, span containment and the
//! safety governor, checked on generated and adversarial input.

use loom_common::{Limits, Span};
use loom_diagnostic::{Diagnostic, ErrorCode};
use loom_lexer::{TokenKind, scan};
use loom_parser::{ParseOptions, ProductionTrace, parse, parse_observed, parse_with};
use loom_syntax::visit::*;
use loom_syntax::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Deeply nested input recurses up to the nesting limit; give it room.
fn on_big_stack(f: impl FnOnce() + Send + 'static) {
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(f)
        .unwrap();
    handle.join().unwrap();
}

const SAMPLES: &[&str] = &[
    r#"
import { useState } from "loom";
import * as icons from "./icons";

type Item = { id: number; label: string; done?: boolean };

export default component TodoList({ items, onToggle }: { items: Item[]; onToggle: (id: number) => void }) {
    const [filter, setFilter] = useState("all");
    const visible = items.filter((item) => filter === "all" || !item.done);
    return (
        <ul class="todos">
            {visible.map((item) => (
                <li key={item.id} onClick={() => onToggle(item.id)}>
                    <icons.Check done={item.done} /> {item.label} &amp; more
                </li>
            ))}
            {visible.length === 0 ? <p>Nothing to do</p> : null}
        </ul>
    );
}
"#,
    r#"
function sum(values: number[], start = 0): number {
    let total = start;
    for (const v of values) {
        if (v < 0) continue;
        total += v ** 2 >> 1;
    }
    label: while (total > 100) {
        total = total / 2;
        break label;
    }
    return total;
}

const greet = (name: string): string => `hello ${name.toUpperCase()}!`;
let pattern = /a[/]b/gi, count = 3;
switch (count) {
    case 1: greet("one"); break;
    default: greet(`${count}`);
}
try { sum([1, 2, , 4]); } catch (e) { throw e; } finally { count--; }
"#,
    r##"
export const theme = { dark: true, colors: { fg: "#fff" }, ...base, get size() { return 2; } };
export { theme as default, greet };
const { dark, colors: { fg = "red" }, ...rest } = theme;
const view = <>
    <Layout.Header title='Home' {...rest} />
    {/* comment only */}
    <main>{dark && <span>{fg}</span>}</main>
</>;
"##,
];

// ============================================================================
// Span Containment
// ============================================================================

/// Checks that every node lies inside the node that contains it.
struct Containment {
    stack: Vec<Span>,
    violations: Vec<(Span, Span)>,
}

impl Containment {
    fn check(&mut self, span: Span) {
        if let Some(&parent) = self.stack.last() {
            if !parent.contains(span) {
                self.violations.push((parent, span));
            }
        }
    }

    fn enter(&mut self, span: Span) {
        self.check(span);
        self.stack.push(span);
    }
}

impl Visitor for Containment {
    fn visit_program(&mut self, program: &Program) {
        self.enter(program.span);
        walk_program(self, program);
        self.stack.pop();
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        self.enter(stmt.span);
        walk_stmt(self, stmt);
        self.stack.pop();
    }

    fn visit_block(&mut self, block: &Block) {
        self.enter(block.span);
        walk_block(self, block);
        self.stack.pop();
    }

    fn visit_expr(&mut self, expr: &Expr) {
        self.enter(expr.span);
        walk_expr(self, expr);
        self.stack.pop();
    }

    fn visit_pattern(&mut self, pattern: &Pattern) {
        self.enter(pattern.span);
        walk_pattern(self, pattern);
        self.stack.pop();
    }

    fn visit_type(&mut self, ty: &TypeAnnotation) {
        self.enter(ty.span);
        walk_type(self, ty);
        self.stack.pop();
    }

    fn visit_markup_element(&mut self, element: &MarkupElement) {
        self.enter(element.span);
        walk_markup_element(self, element);
        self.stack.pop();
    }

    fn visit_markup_fragment(&mut self, fragment: &MarkupFragment) {
        self.enter(fragment.span);
        walk_markup_fragment(self, fragment);
        self.stack.pop();
    }

    fn visit_markup_text(&mut self, text: &MarkupTextRun) {
        self.check(text.span);
    }

    fn visit_ident(&mut self, ident: &Ident) {
        self.check(ident.span);
    }
}

fn assert_contained(source: &str, program: &Program) {
    let mut containment = Containment {
        stack: Vec::new(),
        violations: Vec::new(),
    };
    containment.visit_program(program);
    assert!(
        containment.violations.is_empty(),
        "{source:?}: {:?}",
        containment.violations
    );
    assert!(containment.stack.is_empty());
}

#[test]
fn test_child_spans_lie_inside_parents() {
    for source in SAMPLES {
        let (program, diagnostics) = parse(source);
        assert!(diagnostics.is_empty(), "{diagnostics:#?}");
        assert_contained(source, &program);
    }
}

#[test]
fn test_observer_sees_balanced_productions_on_samples() {
    for source in SAMPLES {
        let mut trace = ProductionTrace::new();
        parse_observed(source, &ParseOptions::default(), &mut trace);
        assert_eq!(trace.entered("program"), 1);
        assert!(trace.entered("statement") > 0);
        assert_eq!(trace.faults().count(), 0);
    }
}

// ============================================================================
// Generated Input
// ============================================================================

const FRAGMENTS: &[&str] = &[
    "let", "const", "x", "y", "=", "==", "(", ")", "{", "}", "[", "]", "<div>", "</div>", "<", ">",
    "/>", "</", "<>", "</>", "/", "`", "${", "'", "\"", "=>", ":", "?", "?.", ";", ",", "...",
    "component", "type", "function", "return", "if", "else", "for", "of", "as", "1", "0x", ".",
    "\n", " ", "/*", "*/", "//", "&amp;", "async", "await", "yield", "|", "&&", "!", "@", "#",
];

fn soup(rng: &mut StdRng) -> String {
    let len = rng.gen_range(0..80);
    let mut source = String::new();
    for _ in 0..len {
        if let Some(fragment) = FRAGMENTS.choose(rng) {
            source.push_str(fragment);
        }
        if rng.gen_bool(0.5) {
            source.push(' ');
        }
    }
    source
}

fn mutate(rng: &mut StdRng, source: &str) -> String {
    let mut bytes = source.as_bytes().to_vec();
    for _ in 0..rng.gen_range(1..8) {
        let at = rng.gen_range(0..=bytes.len());
        match rng.gen_range(0..3) {
            0 if at < bytes.len() => {
                bytes.remove(at);
            }
            1 => {
                let insert = *b"{}()<>/`'\";=".choose(rng).unwrap_or(&b';');
                bytes.insert(at, insert);
            }
            _ => {
                let cut = rng.gen_range(at..=bytes.len());
                bytes.drain(at..cut.min(at + 12));
            }
        }
    }
    // The samples are ASCII, so any byte edit keeps the text valid.
    String::from_utf8(bytes).unwrap()
}

fn assert_well_behaved(source: &str, limits: Limits) {
    let (tokens, _) = scan(source);
    assert_eq!(tokens.all_tokens().last().map(|t| t.kind), Some(TokenKind::Eof));
    let mut previous_end = 0;
    for token in tokens.all_tokens() {
        let range = token.span.range();
        assert!(range.start >= previous_end, "{source:?}: overlapping token {token:?}");
        assert!(source.get(range.clone()).is_some(), "{source:?}: bad token span {token:?}");
        previous_end = range.end;
    }

    let options = ParseOptions::new().limits(limits);
    let (program, diagnostics) = parse_with(source, &options);
    assert_eq!(program.span.range(), 0..source.len());
    // Recovered nodes are held to the same containment rule as clean ones.
    assert_contained(source, &program);
    assert!(diagnostics.len() <= limits.max_diagnostics + 1);
    for diag in &diagnostics {
        assert_in_source(source, diag);
    }
}

fn assert_in_source(source: &str, diag: &Diagnostic) {
    let range = diag.span.range();
    assert!(range.start <= range.end, "{source:?}: {diag:#?}");
    assert!(range.end <= source.len(), "{source:?}: {diag:#?}");
    assert!(diag.start.line >= 1 && diag.start.column >= 1);
}

#[test]
fn test_random_token_soup_terminates() {
    on_big_stack(|| {
        let mut rng = StdRng::seed_from_u64(0x100);
        for _ in 0..400 {
            let source = soup(&mut rng);
            assert_well_behaved(&source, Limits::default());
        }
    });
}

#[test]
fn test_mutated_samples_terminate() {
    on_big_stack(|| {
        let mut rng = StdRng::seed_from_u64(42);
        for round in 0..300 {
            let sample = SAMPLES[round % SAMPLES.len()];
            let source = mutate(&mut rng, sample);
            assert_well_behaved(&source, Limits::default());
        }
    });
}

#[test]
fn test_tight_limits_still_terminate() {
    on_big_stack(|| {
        let mut rng = StdRng::seed_from_u64(7);
        let limits = Limits::new()
            .max_diagnostics(3)
            .max_iterations(16)
            .max_nesting_depth(4);
        for _ in 0..200 {
            let source = soup(&mut rng);
            assert_well_behaved(&source, limits);
        }
        for sample in SAMPLES {
            assert_well_behaved(sample, limits);
        }
    });
}

// ============================================================================
// Safety Governor
// ============================================================================

fn count(diagnostics: &[Diagnostic], code: ErrorCode) -> usize {
    diagnostics.iter().filter(|d| d.code == code).count()
}

#[test]
fn test_deep_parentheses_hit_the_nesting_limit() {
    on_big_stack(|| {
        let depth = 5_000;
        let source = format!("let v = {}x{};", "(".repeat(depth), ")".repeat(depth));
        let (program, diagnostics) = parse(&source);
        assert!(count(&diagnostics, ErrorCode::NestingTooDeep) >= 1);
        assert!(diagnostics.len() < 10, "{diagnostics:#?}");
        assert_eq!(program.body.len(), 1);
    });
}

#[test]
fn test_deep_markup_hits_the_nesting_limit() {
    on_big_stack(|| {
        let depth = 2_000;
        let source = format!("let v = {}{};", "<a>".repeat(depth), "</a>".repeat(depth));
        let (_, diagnostics) = parse(&source);
        assert!(count(&diagnostics, ErrorCode::NestingTooDeep) >= 1);
    });
}

#[test]
fn test_deep_arrays_and_types_are_bounded() {
    on_big_stack(|| {
        let depth = 3_000;
        let arrays = format!("x = {}1{};", "[".repeat(depth), "]".repeat(depth));
        let (_, diagnostics) = parse(&arrays);
        assert!(count(&diagnostics, ErrorCode::NestingTooDeep) >= 1);

        let types = format!("type T = {}string{};", "(".repeat(depth), ")".repeat(depth));
        let (_, diagnostics) = parse(&types);
        assert!(count(&diagnostics, ErrorCode::NestingTooDeep) >= 1);
    });
}

#[test]
fn test_iteration_limit_stops_a_loop() {
    let source = "x;\n".repeat(50);
    let options = ParseOptions::new().limits(Limits::new().max_iterations(10));
    let mut trace = ProductionTrace::new();
    let (program, diagnostics) = parse_observed(&source, &options, &mut trace);

    assert_eq!(program.body.len(), 10);
    assert_eq!(count(&diagnostics, ErrorCode::IterationLimit), 1);
    assert_eq!(trace.faults().collect::<Vec<_>>(), vec![ErrorCode::IterationLimit]);
}

#[test]
fn test_long_flat_input_is_not_limited() {
    let source = "a = a + 1;\n".repeat(2_000);
    let (program, diagnostics) = parse(&source);
    assert!(diagnostics.is_empty());
    assert_eq!(program.body.len(), 2_000);
}
