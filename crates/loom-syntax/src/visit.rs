//! Read-only traversal of the syntax tree.
//!
//! Every `visit_*` method defaults to the matching `walk_*` function, which
//! visits the node's children in source order. Override the methods for the
//! nodes you care about and call `walk_*` to keep descending.
//!
//! ```ignore
//! struct CountElements(usize);
//!
//! impl Visitor for CountElements {
//!     fn visit_markup_element(&mut self, element: &MarkupElement) {
//!         self.0 += 1;
//!         walk_markup_element(self, element);
//!     }
//! }
//! ```

use crate::*;

pub trait Visitor: Sized {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_function(&mut self, function: &Function) {
        walk_function(self, function);
    }

    fn visit_param(&mut self, param: &Param) {
        walk_param(self, param);
    }

    fn visit_type_param(&mut self, param: &TypeParam) {
        walk_type_param(self, param);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_template(&mut self, template: &Template) {
        walk_template(self, template);
    }

    fn visit_pattern(&mut self, pattern: &Pattern) {
        walk_pattern(self, pattern);
    }

    fn visit_type(&mut self, ty: &TypeAnnotation) {
        walk_type(self, ty);
    }

    fn visit_markup_element(&mut self, element: &MarkupElement) {
        walk_markup_element(self, element);
    }

    fn visit_markup_fragment(&mut self, fragment: &MarkupFragment) {
        walk_markup_fragment(self, fragment);
    }

    fn visit_markup_attribute(&mut self, attribute: &MarkupAttributeItem) {
        walk_markup_attribute(self, attribute);
    }

    fn visit_markup_expression(&mut self, container: &MarkupExpressionContainer) {
        walk_markup_expression(self, container);
    }

    fn visit_markup_text(&mut self, _text: &MarkupTextRun) {}

    fn visit_ident(&mut self, _ident: &Ident) {}
}

pub fn walk_program<V: Visitor>(v: &mut V, program: &Program) {
    for stmt in &program.body {
        v.visit_stmt(stmt);
    }
}

pub fn walk_block<V: Visitor>(v: &mut V, block: &Block) {
    for stmt in &block.stmts {
        v.visit_stmt(stmt);
    }
}

fn walk_var_decl<V: Visitor>(v: &mut V, decl: &VarDecl) {
    for declarator in &decl.declarators {
        v.visit_pattern(&declarator.pattern);
        if let Some(ty) = &declarator.ty {
            v.visit_type(ty);
        }
        if let Some(init) = &declarator.init {
            v.visit_expr(init);
        }
    }
}

fn walk_for_head<V: Visitor>(v: &mut V, head: &ForHead) {
    match head {
        ForHead::VarDecl(decl) => walk_var_decl(v, decl),
        ForHead::Target(expr) => v.visit_expr(expr),
    }
}

pub fn walk_stmt<V: Visitor>(v: &mut V, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::VarDecl(decl) => walk_var_decl(v, decl),
        StmtKind::Function(function) => v.visit_function(function),
        StmtKind::Component(component) => {
            v.visit_ident(&component.name);
            for param in &component.type_params {
                v.visit_type_param(param);
            }
            for param in &component.params {
                v.visit_param(param);
            }
            if let Some(ty) = &component.return_type {
                v.visit_type(ty);
            }
            v.visit_block(&component.body);
        }
        StmtKind::TypeAlias(alias) => {
            v.visit_ident(&alias.name);
            for param in &alias.type_params {
                v.visit_type_param(param);
            }
            v.visit_type(&alias.ty);
        }
        StmtKind::Import(import) => {
            for specifier in &import.specifiers {
                match specifier {
                    ImportSpecifier::Default(local) | ImportSpecifier::Namespace(local) => {
                        v.visit_ident(local)
                    }
                    ImportSpecifier::Named { imported, local } => {
                        v.visit_ident(imported);
                        if local.span != imported.span {
                            v.visit_ident(local);
                        }
                    }
                }
            }
        }
        StmtKind::Export(export) => match export {
            ExportDecl::Decl(inner) | ExportDecl::DefaultDecl(inner) => v.visit_stmt(inner),
            ExportDecl::DefaultExpr(expr) => v.visit_expr(expr),
            ExportDecl::Named { specifiers, .. } => {
                for specifier in specifiers {
                    v.visit_ident(&specifier.local);
                    if specifier.exported.span != specifier.local.span {
                        v.visit_ident(&specifier.exported);
                    }
                }
            }
            ExportDecl::All { exported, .. } => {
                if let Some(name) = exported {
                    v.visit_ident(name);
                }
            }
        },
        StmtKind::Block(block) => v.visit_block(block),
        StmtKind::If {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expr(test);
            v.visit_stmt(consequent);
            if let Some(alternate) = alternate {
                v.visit_stmt(alternate);
            }
        }
        StmtKind::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::VarDecl(decl)) => walk_var_decl(v, decl),
                Some(ForInit::Expr(expr)) => v.visit_expr(expr),
                None => {}
            }
            if let Some(test) = test {
                v.visit_expr(test);
            }
            if let Some(update) = update {
                v.visit_expr(update);
            }
            v.visit_stmt(body);
        }
        StmtKind::ForIn { left, right, body } | StmtKind::ForOf { left, right, body } => {
            walk_for_head(v, left);
            v.visit_expr(right);
            v.visit_stmt(body);
        }
        StmtKind::While { test, body } => {
            v.visit_expr(test);
            v.visit_stmt(body);
        }
        StmtKind::DoWhile { body, test } => {
            v.visit_stmt(body);
            v.visit_expr(test);
        }
        StmtKind::Switch {
            discriminant,
            cases,
        } => {
            v.visit_expr(discriminant);
            for case in cases {
                if let Some(test) = &case.test {
                    v.visit_expr(test);
                }
                for stmt in &case.body {
                    v.visit_stmt(stmt);
                }
            }
        }
        StmtKind::Try {
            block,
            handler,
            finalizer,
        } => {
            v.visit_block(block);
            if let Some(handler) = handler {
                if let Some(param) = &handler.param {
                    v.visit_pattern(param);
                }
                v.visit_block(&handler.body);
            }
            if let Some(finalizer) = finalizer {
                v.visit_block(finalizer);
            }
        }
        StmtKind::Throw(expr) | StmtKind::Expr(expr) => v.visit_expr(expr),
        StmtKind::Return(expr) => {
            if let Some(expr) = expr {
                v.visit_expr(expr);
            }
        }
        StmtKind::Break(label) | StmtKind::Continue(label) => {
            if let Some(label) = label {
                v.visit_ident(label);
            }
        }
        StmtKind::Labeled { label, body } => {
            v.visit_ident(label);
            v.visit_stmt(body);
        }
        StmtKind::Empty | StmtKind::Error => {}
    }
}

pub fn walk_function<V: Visitor>(v: &mut V, function: &Function) {
    if let Some(name) = &function.name {
        v.visit_ident(name);
    }
    for param in &function.type_params {
        v.visit_type_param(param);
    }
    for param in &function.params {
        v.visit_param(param);
    }
    if let Some(ty) = &function.return_type {
        v.visit_type(ty);
    }
    v.visit_block(&function.body);
}

pub fn walk_param<V: Visitor>(v: &mut V, param: &Param) {
    v.visit_pattern(&param.pattern);
    if let Some(ty) = &param.ty {
        v.visit_type(ty);
    }
    if let Some(default) = &param.default {
        v.visit_expr(default);
    }
}

pub fn walk_type_param<V: Visitor>(v: &mut V, param: &TypeParam) {
    v.visit_ident(&param.name);
    if let Some(constraint) = &param.constraint {
        v.visit_type(constraint);
    }
    if let Some(default) = &param.default {
        v.visit_type(default);
    }
}

fn walk_property_key<V: Visitor>(v: &mut V, key: &PropertyKey) {
    match key {
        PropertyKey::Ident(ident) => v.visit_ident(ident),
        PropertyKey::Computed(expr) => v.visit_expr(expr),
        PropertyKey::String { .. } | PropertyKey::Number { .. } => {}
    }
}

fn walk_arguments<V: Visitor>(v: &mut V, args: &[Argument]) {
    for arg in args {
        v.visit_expr(arg.expr());
    }
}

pub fn walk_expr<V: Visitor>(v: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::Ident(ident) => v.visit_ident(ident),
        ExprKind::Literal(_) | ExprKind::Regex { .. } | ExprKind::This | ExprKind::Error => {}
        ExprKind::Template(template) => v.visit_template(template),
        ExprKind::TaggedTemplate { tag, quasi } => {
            v.visit_expr(tag);
            v.visit_template(quasi);
        }
        ExprKind::Array(elements) => {
            for element in elements.iter().flatten() {
                match element {
                    ArrayElement::Expr(expr) | ArrayElement::Spread(expr) => v.visit_expr(expr),
                }
            }
        }
        ExprKind::Object(properties) => {
            for property in properties {
                match &property.kind {
                    PropertyKind::KeyValue { key, value } => {
                        walk_property_key(v, key);
                        v.visit_expr(value);
                    }
                    PropertyKind::Shorthand(ident) => v.visit_ident(ident),
                    PropertyKind::Method { key, function, .. } => {
                        walk_property_key(v, key);
                        v.visit_function(function);
                    }
                    PropertyKind::Spread(expr) => v.visit_expr(expr),
                }
            }
        }
        ExprKind::Function(function) => v.visit_function(function),
        ExprKind::Arrow(arrow) => {
            for param in &arrow.type_params {
                v.visit_type_param(param);
            }
            for param in &arrow.params {
                v.visit_param(param);
            }
            if let Some(ty) = &arrow.return_type {
                v.visit_type(ty);
            }
            match &arrow.body {
                ArrowBody::Expr(body) => v.visit_expr(body),
                ArrowBody::Block(block) => v.visit_block(block),
            }
        }
        ExprKind::Unary { operand, .. } | ExprKind::Update { operand, .. } => {
            v.visit_expr(operand)
        }
        ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        ExprKind::Assign { target, value, .. } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expr(test);
            v.visit_expr(consequent);
            v.visit_expr(alternate);
        }
        ExprKind::Call { callee, args, .. } => {
            v.visit_expr(callee);
            walk_arguments(v, args);
        }
        ExprKind::New { callee, args } => {
            v.visit_expr(callee);
            if let Some(args) = args {
                walk_arguments(v, args);
            }
        }
        ExprKind::Member {
            object, property, ..
        } => {
            v.visit_expr(object);
            match property {
                MemberProperty::Ident(ident) => v.visit_ident(ident),
                MemberProperty::Computed(expr) => v.visit_expr(expr),
            }
        }
        ExprKind::Sequence(exprs) => {
            for expr in exprs {
                v.visit_expr(expr);
            }
        }
        ExprKind::Paren(inner) | ExprKind::NonNull(inner) => v.visit_expr(inner),
        ExprKind::As { expr, ty } => {
            v.visit_expr(expr);
            v.visit_type(ty);
        }
        ExprKind::Element(element) => v.visit_markup_element(element),
        ExprKind::Fragment(fragment) => v.visit_markup_fragment(fragment),
        ExprKind::Unsupported { argument, .. } => {
            if let Some(argument) = argument {
                v.visit_expr(argument);
            }
        }
    }
}

/// Interpolated expressions in source order.
pub fn walk_template<V: Visitor>(v: &mut V, template: &Template) {
    for expr in &template.exprs {
        v.visit_expr(expr);
    }
}

pub fn walk_pattern<V: Visitor>(v: &mut V, pattern: &Pattern) {
    match &pattern.kind {
        PatternKind::Ident(ident) => v.visit_ident(ident),
        PatternKind::Object { properties, rest } => {
            for property in properties {
                if !property.shorthand {
                    walk_property_key(v, &property.key);
                }
                v.visit_pattern(&property.value);
            }
            if let Some(rest) = rest {
                v.visit_pattern(rest);
            }
        }
        PatternKind::Array { elements, rest } => {
            for element in elements.iter().flatten() {
                v.visit_pattern(element);
            }
            if let Some(rest) = rest {
                v.visit_pattern(rest);
            }
        }
        PatternKind::Assign { target, default } => {
            v.visit_pattern(target);
            v.visit_expr(default);
        }
        PatternKind::Error => {}
    }
}

pub fn walk_type<V: Visitor>(v: &mut V, ty: &TypeAnnotation) {
    match &ty.kind {
        TypeKind::Reference { name, args } => {
            for part in name {
                v.visit_ident(part);
            }
            for arg in args {
                v.visit_type(arg);
            }
        }
        TypeKind::Union(members) | TypeKind::Tuple(members) => {
            for member in members {
                v.visit_type(member);
            }
        }
        TypeKind::Array(element) | TypeKind::Paren(element) => v.visit_type(element),
        TypeKind::Function { params, result } => {
            for param in params {
                v.visit_ident(&param.name);
                if let Some(ty) = &param.ty {
                    v.visit_type(ty);
                }
            }
            v.visit_type(result);
        }
        TypeKind::Object(members) => {
            for member in members {
                v.visit_ident(&member.name);
                v.visit_type(&member.ty);
            }
        }
        TypeKind::Typeof(path) => {
            for part in path {
                v.visit_ident(part);
            }
        }
        TypeKind::Literal(_) | TypeKind::Void | TypeKind::Unknown => {}
    }
}

fn walk_markup_children<V: Visitor>(v: &mut V, children: &[MarkupChild]) {
    for child in children {
        match child {
            MarkupChild::Element(element) => v.visit_markup_element(element),
            MarkupChild::Fragment(fragment) => v.visit_markup_fragment(fragment),
            MarkupChild::Expression(container) => v.visit_markup_expression(container),
            MarkupChild::Text(text) => v.visit_markup_text(text),
        }
    }
}

pub fn walk_markup_element<V: Visitor>(v: &mut V, element: &MarkupElement) {
    for part in &element.opening.name.parts {
        v.visit_ident(part);
    }
    for attribute in &element.opening.attributes {
        v.visit_markup_attribute(attribute);
    }
    walk_markup_children(v, &element.children);
    if let Some(closing) = &element.closing {
        for part in &closing.name.parts {
            v.visit_ident(part);
        }
    }
}

pub fn walk_markup_fragment<V: Visitor>(v: &mut V, fragment: &MarkupFragment) {
    walk_markup_children(v, &fragment.children);
}

pub fn walk_markup_attribute<V: Visitor>(v: &mut V, attribute: &MarkupAttributeItem) {
    match attribute {
        MarkupAttributeItem::Attribute(attr) => {
            v.visit_ident(&attr.name);
            if let Some(MarkupAttributeValue::Expression(container)) = &attr.value {
                v.visit_markup_expression(container);
            }
        }
        MarkupAttributeItem::Spread(spread) => v.visit_expr(&spread.argument),
    }
}

pub fn walk_markup_expression<V: Visitor>(v: &mut V, container: &MarkupExpressionContainer) {
    if let MarkupExpression::Expr(expr) = &container.expression {
        v.visit_expr(expr);
    }
}
