//! Statement and declaration parsing.
//! 语句与声明解析。

use loom_common::{BytePos, Span};
use loom_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode, Label};
use loom_lexer::{TokenKind, cook_string};
use loom_syntax::*;

use crate::parser::Parser;
use crate::recovery::is_stmt_start;

impl<'a, 'src> Parser<'a, 'src> {
    /// Parse one statement, skipping to the next statement boundary when
    /// nothing at the cursor could be used.
    pub(crate) fn parse_stmt_or_recover(&mut self) -> Stmt {
        let before = self.pos;
        let stmt = self.parse_statement();
        if self.pos != before {
            return stmt;
        }

        let start = self.start();
        self.synchronize();
        if self.pos == before {
            self.advance();
        }
        Stmt::new(StmtKind::Error, self.span_from(start))
    }

    /// Statements up to (not including) a token accepted by `stop`.
    pub(crate) fn parse_stmt_list(
        &mut self,
        production: &'static str,
        stop: impl Fn(&Self) -> bool,
    ) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        let mut guard = self.loop_guard(production);
        while !self.at_end() && !stop(self) {
            if !self.step(&mut guard) {
                break;
            }
            stmts.push(self.parse_stmt_or_recover());
        }
        stmts
    }

    pub(crate) fn parse_statement(&mut self) -> Stmt {
        self.nested(
            "statement",
            |p| {
                p.enter("statement");
                let stmt = p.parse_statement_kind();
                p.exit("statement", stmt.span);
                stmt
            },
            |span| Stmt::new(StmtKind::Error, span),
        )
    }

    fn parse_statement_kind(&mut self) -> Stmt {
        let start = self.start();
        let errors = self.diagnostics.error_count();

        let kind = match self.current_kind() {
            TokenKind::LBrace => StmtKind::Block(self.parse_block()),
            TokenKind::Let | TokenKind::Const | TokenKind::Var => {
                let decl = self.parse_var_decl();
                self.consume_semicolon(errors);
                StmtKind::VarDecl(decl)
            }
            TokenKind::Function => StmtKind::Function(self.parse_function(start, false, true)),
            TokenKind::Async if self.at_async_function() => {
                let span = self.advance().span;
                self.unsupported(span, "async function");
                StmtKind::Function(self.parse_function(start, true, true))
            }
            TokenKind::Identifier if self.at_component_decl() => {
                StmtKind::Component(self.parse_component())
            }
            TokenKind::Identifier if self.at_type_alias() => {
                StmtKind::TypeAlias(self.parse_type_alias())
            }
            TokenKind::Identifier if self.peek_kind(1) == TokenKind::Colon => {
                let label = self.parse_ident("a label");
                self.advance();
                let body = Box::new(self.parse_statement());
                StmtKind::Labeled { label, body }
            }
            TokenKind::Import
                if !matches!(self.peek_kind(1), TokenKind::LParen | TokenKind::Dot) =>
            {
                StmtKind::Import(self.parse_import())
            }
            TokenKind::Export => self.parse_export(),
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => {
                self.advance();
                let test = self.parse_condition("`while`");
                let body = Box::new(self.parse_statement());
                StmtKind::While { test, body }
            }
            TokenKind::Do => {
                self.advance();
                let body = Box::new(self.parse_statement());
                self.expect(TokenKind::While, "after the `do` body");
                let test = self.parse_condition("`while`");
                self.eat(TokenKind::Semicolon);
                StmtKind::DoWhile { body, test }
            }
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Try => self.parse_try(),
            TokenKind::Throw => {
                self.advance();
                let argument = self.parse_expression();
                self.consume_semicolon(errors);
                StmtKind::Throw(argument)
            }
            TokenKind::Return => {
                self.advance();
                let argument = if self.at_stmt_end() || self.current().newline_before {
                    None
                } else {
                    Some(self.parse_expression())
                };
                self.consume_semicolon(errors);
                StmtKind::Return(argument)
            }
            TokenKind::Break | TokenKind::Continue => {
                let is_break = self.advance().kind == TokenKind::Break;
                let label = if self.check(TokenKind::Identifier) && !self.current().newline_before {
                    Some(self.parse_ident("a label"))
                } else {
                    None
                };
                self.consume_semicolon(errors);
                if is_break {
                    StmtKind::Break(label)
                } else {
                    StmtKind::Continue(label)
                }
            }
            TokenKind::Semicolon => {
                self.advance();
                StmtKind::Empty
            }
            TokenKind::Else
            | TokenKind::Case
            | TokenKind::Default
            | TokenKind::Catch
            | TokenKind::Finally => {
                let keyword = self.current_kind().describe();
                self.error_here(
                    ErrorCode::UnexpectedToken,
                    format!("{keyword} is not allowed here"),
                );
                self.advance();
                StmtKind::Error
            }
            TokenKind::RBrace => {
                // Left in place: it may close an enclosing block.
                self.unexpected(ErrorCode::UnexpectedToken, "a statement");
                return Stmt::new(StmtKind::Error, self.missing_span());
            }
            _ => return self.parse_expression_statement(errors),
        };

        Stmt::new(kind, self.span_from(start))
    }

    fn parse_expression_statement(&mut self, errors: usize) -> Stmt {
        let before = self.pos;
        let expr = self.parse_expression();
        if self.pos == before {
            return Stmt::new(StmtKind::Error, expr.span);
        }
        self.consume_semicolon(errors);
        let span = self.span_from(expr.span.start);
        Stmt::new(StmtKind::Expr(expr), span)
    }

    /// Accept `;`, or insert one before `}`, end of file or a line break.
    ///
    /// Nothing is reported when the statement already produced an error.
    pub(crate) fn consume_semicolon(&mut self, errors_before: usize) {
        if self.eat(TokenKind::Semicolon)
            || self.check(TokenKind::RBrace)
            || self.at_end()
            || self.current().newline_before
        {
            return;
        }

        if self.diagnostics.error_count() == errors_before {
            let message = format!("expected `;` after statement, found {}", self.found());
            self.error_here(ErrorCode::MissingSemicolon, message);
        }
        if !is_stmt_start(self.current_kind()) {
            self.synchronize();
        }
    }

    pub(crate) fn parse_block(&mut self) -> Block {
        let start = self.start();
        let open = self.current_span();
        if !self.expect(TokenKind::LBrace, "to open a block") {
            return Block {
                stmts: Vec::new(),
                span: self.missing_span(),
            };
        }

        let stmts = self.allowing_in(|p| p.parse_stmt_list("block", |p| p.check(TokenKind::RBrace)));
        self.expect_closing(TokenKind::RBrace, open, "this block");
        Block {
            stmts,
            span: self.span_from(start),
        }
    }

    /// `(expr)` after `if`, `while` and `switch`.
    fn parse_condition(&mut self, keyword: &str) -> Expr {
        let open = self.current_span();
        if !self.expect(TokenKind::LParen, &format!("after {keyword}")) {
            return self.parse_expression();
        }
        let test = self.allowing_in(|p| p.parse_expression());
        self.expect_closing(TokenKind::RParen, open, "the condition");
        test
    }

    // ========== Declarations ==========

    /// `let`/`const`/`var` followed by declarators; no semicolon.
    pub(crate) fn parse_var_decl(&mut self) -> VarDecl {
        let start = self.start();
        let kind = match self.advance().kind {
            TokenKind::Let => VarKind::Let,
            TokenKind::Const => VarKind::Const,
            _ => VarKind::Var,
        };

        let mut declarators = Vec::new();
        let mut guard = self.loop_guard("declarations");
        loop {
            if !self.step(&mut guard) {
                break;
            }
            declarators.push(self.parse_declarator());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        VarDecl {
            kind,
            declarators,
            span: self.span_from(start),
        }
    }

    fn parse_declarator(&mut self) -> Declarator {
        let pattern = self.parse_binding_target();
        let ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_type())
        } else {
            None
        };
        let init = if self.eat(TokenKind::Eq) {
            Some(self.parse_assignment())
        } else {
            None
        };
        let span = self.span_from(pattern.span.start);
        Declarator {
            pattern,
            ty,
            init,
            span,
        }
    }

    fn at_async_function(&self) -> bool {
        self.check(TokenKind::Async)
            && self.peek_kind(1) == TokenKind::Function
            && !self.peek(1).newline_before
    }

    /// `function name<T>(params): R { }` with the cursor on `function`.
    /// `async` has already been consumed when `is_async` is set.
    pub(crate) fn parse_function(&mut self, start: BytePos, is_async: bool, named: bool) -> Function {
        let keyword = self.advance().span;

        let is_generator = self.check(TokenKind::Star);
        if is_generator {
            let star = self.advance().span;
            self.unsupported(keyword.merge(star), "function*");
        }

        let name = if self.check(TokenKind::Identifier) {
            Some(self.parse_ident("a function name"))
        } else {
            if named {
                self.unexpected(ErrorCode::ExpectedIdentifier, "a function name");
            }
            None
        };

        let type_params = self.parse_type_params();
        let params = self.parse_params();
        let return_type = self.parse_return_type();
        let body = self.parse_block();

        Function {
            name,
            type_params,
            params,
            return_type,
            body,
            is_async,
            is_generator,
            span: self.span_from(start),
        }
    }

    pub(crate) fn parse_return_type(&mut self) -> Option<TypeAnnotation> {
        if self.eat(TokenKind::Colon) {
            Some(self.parse_type())
        } else {
            None
        }
    }

    /// `(a, b: T = 1, ...rest)`.
    pub(crate) fn parse_params(&mut self) -> Vec<Param> {
        let open = self.current_span();
        if !self.expect(TokenKind::LParen, "to start the parameter list") {
            return Vec::new();
        }
        let params = self.allowing_in(|p| {
            p.parse_comma_list(TokenKind::RParen, "parameters", |p| Some(p.parse_param()))
        });
        self.expect_closing(TokenKind::RParen, open, "the parameter list");
        params
    }

    pub(crate) fn parse_param(&mut self) -> Param {
        let rest_start = self.start();
        let rest = self.eat(TokenKind::Ellipsis);
        let pattern = self.parse_binding_target();
        let optional = self.eat(TokenKind::Question);
        let ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_type())
        } else {
            None
        };
        let default = if self.eat(TokenKind::Eq) {
            Some(self.parse_assignment())
        } else {
            None
        };
        let start = if rest { rest_start } else { pattern.span.start };
        Param {
            pattern,
            ty,
            default,
            rest,
            optional,
            span: self.span_from(start),
        }
    }

    pub(crate) fn at_component_decl(&self) -> bool {
        self.check_word("component")
            && self.peek_kind(1) == TokenKind::Identifier
            && !self.peek(1).newline_before
    }

    /// `component Name<T>(props) { ... }`.
    pub(crate) fn parse_component(&mut self) -> ComponentDecl {
        let start = self.start();
        self.advance();
        let name = self.parse_ident("a component name");
        let type_params = self.parse_type_params();
        let params = self.parse_params();
        let return_type = self.parse_return_type();
        let body = self.parse_block();
        ComponentDecl {
            name,
            type_params,
            params,
            return_type,
            body,
            span: self.span_from(start),
        }
    }

    fn at_type_alias(&self) -> bool {
        self.check_word("type")
            && self.peek_kind(1) == TokenKind::Identifier
            && matches!(self.peek_kind(2), TokenKind::Eq | TokenKind::Lt)
    }

    /// `type Name<T> = T;`.
    fn parse_type_alias(&mut self) -> TypeAlias {
        let start = self.start();
        let errors = self.diagnostics.error_count();
        self.advance();
        let name = self.parse_ident("a type name");
        let type_params = self.parse_type_params();
        let ty = if self.expect(TokenKind::Eq, "after the type alias name") {
            self.parse_type()
        } else {
            TypeAnnotation::unknown(self.missing_span())
        };
        self.consume_semicolon(errors);
        TypeAlias {
            name,
            type_params,
            ty,
            span: self.span_from(start),
        }
    }

    // ========== Control Flow ==========

    fn parse_if(&mut self) -> StmtKind {
        self.advance();
        let test = self.parse_condition("`if`");
        let consequent = Box::new(self.parse_statement());
        let alternate = if self.eat(TokenKind::Else) {
            Some(Box::new(self.parse_statement()))
        } else {
            None
        };
        StmtKind::If {
            test,
            consequent,
            alternate,
        }
    }

    fn parse_for(&mut self) -> StmtKind {
        let keyword = self.advance().span;
        if self.check(TokenKind::Await) {
            let span = keyword.merge(self.advance().span);
            self.unsupported(span, "for await");
        }

        let open = self.current_span();
        self.expect(TokenKind::LParen, "after `for`");

        let init = match self.current_kind() {
            TokenKind::Semicolon => None,
            TokenKind::Let | TokenKind::Const | TokenKind::Var => {
                let decl = self.without_in(|p| p.parse_var_decl());
                if let Some(of) = self.at_for_in_of() {
                    if decl.declarators.len() != 1 || decl.declarators[0].init.is_some() {
                        self.error(
                            ErrorCode::UnexpectedToken,
                            decl.span,
                            "a `for ... in/of` head declares exactly one binding without initializer",
                        );
                    }
                    return self.finish_for_in_of(ForHead::VarDecl(decl), of, open);
                }
                Some(ForInit::VarDecl(decl))
            }
            _ => {
                let expr = self.without_in(|p| p.parse_expression());
                if let Some(of) = self.at_for_in_of() {
                    if !expr.is_assignment_target() {
                        self.error(
                            ErrorCode::InvalidAssignmentTarget,
                            expr.span,
                            "the left side of a `for ... in/of` loop must be assignable",
                        );
                    }
                    return self.finish_for_in_of(ForHead::Target(expr), of, open);
                }
                Some(ForInit::Expr(expr))
            }
        };

        self.expect(TokenKind::Semicolon, "after the loop initializer");
        let test = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.allowing_in(|p| p.parse_expression()))
        };
        self.expect(TokenKind::Semicolon, "after the loop condition");
        let update = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.allowing_in(|p| p.parse_expression()))
        };
        self.expect_closing(TokenKind::RParen, open, "the `for` head");
        let body = Box::new(self.parse_statement());

        StmtKind::For {
            init,
            test,
            update,
            body,
        }
    }

    /// `Some(true)` at `of`, `Some(false)` at `in`.
    fn at_for_in_of(&self) -> Option<bool> {
        if self.check_word("of") {
            Some(true)
        } else if self.check(TokenKind::In) {
            Some(false)
        } else {
            None
        }
    }

    fn finish_for_in_of(&mut self, left: ForHead, of: bool, open: Span) -> StmtKind {
        self.advance();
        let right = if of {
            self.allowing_in(|p| p.parse_assignment())
        } else {
            self.allowing_in(|p| p.parse_expression())
        };
        self.expect_closing(TokenKind::RParen, open, "the `for` head");
        let body = Box::new(self.parse_statement());
        if of {
            StmtKind::ForOf { left, right, body }
        } else {
            StmtKind::ForIn { left, right, body }
        }
    }

    fn parse_switch(&mut self) -> StmtKind {
        self.advance();
        let discriminant = self.parse_condition("`switch`");

        let open = self.current_span();
        if !self.expect(TokenKind::LBrace, "to open the `switch` body") {
            return StmtKind::Switch {
                discriminant,
                cases: Vec::new(),
            };
        }

        let mut cases = Vec::new();
        let mut guard = self.loop_guard("switch cases");
        while !self.check(TokenKind::RBrace) && !self.at_end() {
            if !self.step(&mut guard) {
                break;
            }

            let start = self.start();
            let test = if self.eat(TokenKind::Case) {
                Some(self.parse_expression())
            } else if self.eat(TokenKind::Default) {
                None
            } else {
                self.unexpected(ErrorCode::UnexpectedToken, "`case` or `default`");
                let before = self.pos;
                self.synchronize();
                if self.pos == before {
                    self.advance();
                }
                continue;
            };
            self.expect(TokenKind::Colon, "after the case label");
            let body = self.parse_stmt_list("case body", |p| {
                matches!(
                    p.current_kind(),
                    TokenKind::Case | TokenKind::Default | TokenKind::RBrace
                )
            });
            cases.push(SwitchCase {
                test,
                body,
                span: self.span_from(start),
            });
        }

        self.expect_closing(TokenKind::RBrace, open, "the `switch` body");
        StmtKind::Switch {
            discriminant,
            cases,
        }
    }

    fn parse_try(&mut self) -> StmtKind {
        let keyword = self.advance().span;
        let block = self.parse_block();

        let handler = if self.check(TokenKind::Catch) {
            let start = self.start();
            self.advance();
            let param = if self.check(TokenKind::LParen) {
                let open = self.advance().span;
                let param = self.parse_binding_target();
                if self.eat(TokenKind::Colon) {
                    // `catch (e: unknown)`; the annotation carries no information.
                    self.parse_type();
                }
                self.expect_closing(TokenKind::RParen, open, "the `catch` binding");
                Some(param)
            } else {
                None
            };
            let body = self.parse_block();
            Some(CatchClause {
                param,
                body,
                span: self.span_from(start),
            })
        } else {
            None
        };

        let finalizer = if self.eat(TokenKind::Finally) {
            Some(self.parse_block())
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            self.diagnostics.report(
                Diagnostic::error(
                    ErrorCode::UnexpectedToken,
                    self.current_span(),
                    format!("expected `catch` or `finally`, found {}", self.found()),
                )
                .with_label(Label::new(keyword, "this `try` needs a handler")),
            );
        }

        StmtKind::Try {
            block,
            handler,
            finalizer,
        }
    }

    // ========== Modules ==========

    fn parse_import(&mut self) -> ImportDecl {
        let start = self.start();
        let errors = self.diagnostics.error_count();
        self.advance();

        let mut specifiers = Vec::new();
        if !self.check(TokenKind::String) {
            if self.check(TokenKind::Identifier) {
                specifiers.push(ImportSpecifier::Default(self.parse_ident("a binding name")));
                self.eat(TokenKind::Comma);
            }

            if self.eat(TokenKind::Star) {
                if !self.eat_word("as") {
                    self.unexpected(ErrorCode::UnexpectedToken, "`as` after `*`");
                }
                specifiers.push(ImportSpecifier::Namespace(self.parse_ident("a namespace name")));
            } else if self.check(TokenKind::LBrace) {
                let open = self.advance().span;
                let named = self.parse_comma_list(TokenKind::RBrace, "import specifiers", |p| {
                    let imported = p.parse_name("an imported name");
                    let local = if p.eat_word("as") {
                        p.parse_ident("a local name")
                    } else {
                        imported.clone()
                    };
                    Some(ImportSpecifier::Named { imported, local })
                });
                specifiers.extend(named);
                self.expect_closing(TokenKind::RBrace, open, "the import list");
            }

            if !self.eat_word("from") {
                self.unexpected(ErrorCode::UnexpectedToken, "`from`");
            }
        }

        let source = self.parse_module_source();
        self.consume_semicolon(errors);
        ImportDecl {
            specifiers,
            source,
            span: self.span_from(start),
        }
    }

    fn parse_module_source(&mut self) -> StrLit {
        if self.check(TokenKind::String) {
            let token = self.advance();
            StrLit {
                value: cook_string(token.text),
                span: token.span,
            }
        } else {
            self.unexpected(ErrorCode::UnexpectedToken, "a module path string");
            StrLit {
                value: String::new(),
                span: self.missing_span(),
            }
        }
    }

    fn parse_export(&mut self) -> StmtKind {
        let errors = self.diagnostics.error_count();
        self.advance();

        let decl = match self.current_kind() {
            TokenKind::Default => {
                self.advance();
                let start = self.start();
                if self.check(TokenKind::Function) {
                    let function = self.parse_function(start, false, false);
                    let stmt = Stmt::new(StmtKind::Function(function), self.span_from(start));
                    ExportDecl::DefaultDecl(Box::new(stmt))
                } else if self.at_async_function() {
                    let span = self.advance().span;
                    self.unsupported(span, "async function");
                    let function = self.parse_function(start, true, false);
                    let stmt = Stmt::new(StmtKind::Function(function), self.span_from(start));
                    ExportDecl::DefaultDecl(Box::new(stmt))
                } else if self.at_component_decl() {
                    let component = self.parse_component();
                    let stmt = Stmt::new(StmtKind::Component(component), self.span_from(start));
                    ExportDecl::DefaultDecl(Box::new(stmt))
                } else {
                    let expr = self.parse_assignment();
                    self.consume_semicolon(errors);
                    ExportDecl::DefaultExpr(expr)
                }
            }
            TokenKind::Star => {
                self.advance();
                let exported = if self.eat_word("as") {
                    Some(self.parse_name("an export name"))
                } else {
                    None
                };
                if !self.eat_word("from") {
                    self.unexpected(ErrorCode::UnexpectedToken, "`from`");
                }
                let source = self.parse_module_source();
                self.consume_semicolon(errors);
                ExportDecl::All { exported, source }
            }
            TokenKind::LBrace => {
                let open = self.advance().span;
                let specifiers = self.parse_comma_list(TokenKind::RBrace, "export specifiers", |p| {
                    let local = p.parse_name("an exported name");
                    let exported = if p.eat_word("as") {
                        p.parse_name("an export name")
                    } else {
                        local.clone()
                    };
                    let span = p.span_from(local.span.start);
                    Some(ExportSpecifier {
                        local,
                        exported,
                        span,
                    })
                });
                self.expect_closing(TokenKind::RBrace, open, "the export list");
                let source = if self.eat_word("from") {
                    Some(self.parse_module_source())
                } else {
                    None
                };
                self.consume_semicolon(errors);
                ExportDecl::Named { specifiers, source }
            }
            TokenKind::Let | TokenKind::Const | TokenKind::Var | TokenKind::Function => {
                ExportDecl::Decl(Box::new(self.parse_statement()))
            }
            TokenKind::Async if self.at_async_function() => {
                ExportDecl::Decl(Box::new(self.parse_statement()))
            }
            TokenKind::Identifier if self.at_component_decl() || self.at_type_alias() => {
                ExportDecl::Decl(Box::new(self.parse_statement()))
            }
            _ => {
                self.unexpected(ErrorCode::UnexpectedToken, "a declaration after `export`");
                return StmtKind::Error;
            }
        };

        StmtKind::Export(decl)
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use loom_diagnostic::ErrorCode;
    use loom_syntax::*;
    use pretty_assertions::assert_eq;

    fn single(source: &str) -> StmtKind {
        let (program, diagnostics) = parse(source);
        assert!(diagnostics.is_empty(), "{diagnostics:#?}");
        assert_eq!(program.body.len(), 1, "{:#?}", program.body);
        program.body.into_iter().next().map(|s| s.kind).unwrap_or(StmtKind::Error)
    }

    #[test]
    fn variable_declarations() {
        let StmtKind::VarDecl(decl) = single("const a = 1, { b, c: d } = obj;") else {
            panic!("expected a declaration");
        };
        assert_eq!(decl.kind, VarKind::Const);
        assert_eq!(decl.declarators.len(), 2);
        assert!(matches!(decl.declarators[1].pattern.kind, PatternKind::Object { .. }));
    }

    #[test]
    fn semicolons_are_inserted_at_line_breaks() {
        let (program, diagnostics) = parse("let a = 1\nlet b = 2\n");
        assert!(diagnostics.is_empty(), "{diagnostics:#?}");
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn missing_semicolon_on_one_line() {
        let (program, diagnostics) = parse("let a = 1 let b = 2;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::MissingSemicolon);
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn function_and_component_declarations() {
        let StmtKind::Function(function) = single("function add<T>(a: T, b = 2, ...rest): T { return a; }")
        else {
            panic!("expected a function");
        };
        assert_eq!(function.name.map(|n| n.name).as_deref(), Some("add"));
        assert_eq!(function.type_params.len(), 1);
        assert_eq!(function.params.len(), 3);
        assert!(function.params[2].rest);
        assert!(function.return_type.is_some());

        let StmtKind::Component(component) = single("component Card(props: Props) { return <div/>; }")
        else {
            panic!("expected a component");
        };
        assert_eq!(component.name.name, "Card");
        assert_eq!(component.body.stmts.len(), 1);
    }

    #[test]
    fn contextual_words_stay_identifiers() {
        let StmtKind::Expr(expr) = single("component = type;") else {
            panic!("expected an expression statement");
        };
        assert!(matches!(expr.kind, ExprKind::Assign { .. }));
    }

    #[test]
    fn loops() {
        assert!(matches!(single("for (let i = 0; i < n; i++) {}"), StmtKind::For { .. }));
        assert!(matches!(single("for (const x of xs) {}"), StmtKind::ForOf { .. }));
        assert!(matches!(single("for (key in obj) {}"), StmtKind::ForIn { .. }));
        assert!(matches!(single("for (;;) break;"), StmtKind::For { init: None, .. }));
        assert!(matches!(single("do x++; while (x < 3);"), StmtKind::DoWhile { .. }));
    }

    #[test]
    fn switch_and_try() {
        let StmtKind::Switch { cases, .. } = single("switch (x) { case 1: a(); break; default: b(); }")
        else {
            panic!("expected a switch");
        };
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].body.len(), 2);
        assert!(cases[1].test.is_none());

        let StmtKind::Try { handler, finalizer, .. } = single("try { a(); } catch { b(); } finally { c(); }")
        else {
            panic!("expected a try");
        };
        assert!(handler.is_some_and(|h| h.param.is_none()));
        assert!(finalizer.is_some());
    }

    #[test]
    fn imports() {
        let StmtKind::Import(import) = single(r#"import React, { useState as use, default as d } from "react";"#)
        else {
            panic!("expected an import");
        };
        assert_eq!(import.source.value, "react");
        assert_eq!(import.specifiers.len(), 3);
        assert!(matches!(
            &import.specifiers[1],
            ImportSpecifier::Named { imported, local } if imported.name == "useState" && local.name == "use"
        ));

        let StmtKind::Import(import) = single("import './styles.css';") else {
            panic!("expected an import");
        };
        assert!(import.specifiers.is_empty());
    }

    #[test]
    fn exports() {
        assert!(matches!(
            single("export default component App() {}"),
            StmtKind::Export(ExportDecl::DefaultDecl(_))
        ));
        assert!(matches!(
            single("export const x = 1;"),
            StmtKind::Export(ExportDecl::Decl(_))
        ));
        assert!(matches!(
            single("export { a, b as c } from './m';"),
            StmtKind::Export(ExportDecl::Named { source: Some(_), .. })
        ));
        assert!(matches!(
            single("export * as ns from './m';"),
            StmtKind::Export(ExportDecl::All { exported: Some(_), .. })
        ));
        assert!(matches!(
            single("export default 42;"),
            StmtKind::Export(ExportDecl::DefaultExpr(_))
        ));
    }

    #[test]
    fn labels_and_jumps() {
        let StmtKind::Labeled { label, body } = single("outer: while (true) { continue outer; }") else {
            panic!("expected a labeled statement");
        };
        assert_eq!(label.name, "outer");
        assert!(matches!(body.kind, StmtKind::While { .. }));
    }

    #[test]
    fn malformed_statement_degrades_locally() {
        let (program, diagnostics) = parse("let a = 1;\n) ) );\nlet b = 2;");
        assert!(!diagnostics.is_empty());
        let declarations = program
            .body
            .iter()
            .filter(|s| matches!(s.kind, StmtKind::VarDecl(_)))
            .count();
        assert_eq!(declarations, 2);
    }

    #[test]
    fn unclosed_block_points_at_its_brace() {
        let (_, diagnostics) = parse("function f() {\n  let x = 1;\n");
        let unclosed = diagnostics
            .iter()
            .find(|d| d.code == ErrorCode::UnclosedDelimiter)
            .map(|d| d.labels.len());
        assert_eq!(unclosed, Some(1));
    }

    #[test]
    fn stray_closing_brace_at_top_level() {
        let (program, diagnostics) = parse("a();\n}\nb();");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(program.body.len(), 3);
    }

    #[test]
    fn generators_are_reported() {
        let (program, diagnostics) = parse("function* gen() { yield 1; }");
        assert!(diagnostics.iter().all(|d| d.code == ErrorCode::UnsupportedConstruct));
        assert_eq!(diagnostics.len(), 2);
        let StmtKind::Function(function) = &program.body[0].kind else {
            panic!("expected a function");
        };
        assert!(function.is_generator);
    }
}
